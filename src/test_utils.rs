#[cfg(test)]
pub mod fixtures {
    use lopdf::{
        content::{Content, Operation},
        dictionary, Document, Object, Stream,
    };

    fn pdf_from_operations(operations: Vec<Operation>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content stream encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("PDF serializes");
        bytes
    }

    /// Single-page PDF with one text line per entry.
    pub fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 750.into()]),
        ];
        for line in lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("Td", vec![0.into(), (-20).into()]));
        }
        operations.push(Operation::new("ET", vec![]));
        pdf_from_operations(operations)
    }

    /// Single-page PDF whose page carries no text layer, like a bare scan.
    pub fn pdf_without_text() -> Vec<u8> {
        pdf_from_operations(Vec::new())
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use actix_web::http::StatusCode;
    use async_trait::async_trait;

    use crate::{
        errors::{AppError, AppResult},
        models::domain::GenerationParams,
        services::generation_client::GenerationClient,
    };

    /// Generation client that replays canned answers and records every prompt.
    #[derive(Clone, Default)]
    pub struct ScriptedGenerationClient {
        responses: Arc<Mutex<VecDeque<AppResult<String>>>>,
        calls: Arc<Mutex<Vec<(String, GenerationParams)>>>,
    }

    impl ScriptedGenerationClient {
        pub fn with_responses<I, S>(responses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let client = Self::default();
            for response in responses {
                client.push_ok(response);
            }
            client
        }

        pub fn push_ok(&self, text: impl Into<String>) {
            self.responses.lock().unwrap().push_back(Ok(text.into()));
        }

        pub fn push_err(&self, err: AppError) {
            self.responses.lock().unwrap().push_back(Err(err));
        }

        pub fn prompts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(prompt, _)| prompt.clone())
                .collect()
        }

        pub fn params(&self) -> Vec<GenerationParams> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, params)| params.clone())
                .collect()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedGenerationClient {
        async fn generate(&self, prompt: &str, params: &GenerationParams) -> AppResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), params.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::GenerationFailed("no scripted response".into())))
        }
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, test_helpers::*};
    use crate::{models::domain::GenerationParams, services::generation_client::GenerationClient};

    #[test]
    fn test_fixture_pdfs_have_pdf_header() {
        assert!(pdf_with_lines(&["hello"]).starts_with(b"%PDF-1.5"));
        assert!(pdf_without_text().starts_with(b"%PDF-1.5"));
    }

    #[actix_rt::test]
    async fn test_scripted_client_replays_in_order() {
        let client = ScriptedGenerationClient::with_responses(["one", "two"]);
        let params = GenerationParams::new("m", 0.1);

        assert_eq!(client.generate("a", &params).await.unwrap(), "one");
        assert_eq!(client.generate("b", &params).await.unwrap(), "two");
        assert!(client.generate("c", &params).await.is_err());
        assert_eq!(client.prompts(), vec!["a", "b", "c"]);
    }
}
