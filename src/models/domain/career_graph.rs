use serde::Serialize;

pub const ROOT_NODE: &str = "User Background";

pub const CAREER_SECTIONS: [&str; 5] = [
    "Transferable Skills",
    "Obsolete Skills",
    "Suggested Learning Tracks",
    "Suitable Roles",
    "What to unlearn",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Section,
    Item,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CareerSection {
    pub name: String,
    pub items: Vec<String>,
}

/// Directed graph `User Background -> section -> item` built from the
/// bullet lists of a career mapping answer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CareerGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl CareerGraph {
    pub fn from_sections(sections: &[CareerSection]) -> Self {
        let mut graph = CareerGraph::default();
        graph.add_node(ROOT_NODE, NodeKind::Root);

        for section in sections {
            graph.add_node(&section.name, NodeKind::Section);
            graph.add_edge(ROOT_NODE, &section.name);
            for item in &section.items {
                graph.add_node(item, NodeKind::Item);
                graph.add_edge(&section.name, item);
            }
        }
        graph
    }

    fn add_node(&mut self, id: &str, kind: NodeKind) {
        if !self.nodes.iter().any(|node| node.id == id) {
            self.nodes.push(GraphNode {
                id: id.to_string(),
                kind,
            });
        }
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        if !self.edges.iter().any(|e| e.from == from && e.to == to) {
            self.edges.push(GraphEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }
}

fn strip_list_marker(line: &str) -> (&str, bool) {
    let trimmed = line.trim();
    for marker in ["- ", "* ", "• ", "◦ ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return (rest.trim(), true);
        }
    }
    (trimmed, false)
}

fn normalize_heading(line: &str) -> String {
    let without_hashes = line.trim_start_matches('#').trim();
    let without_number = without_hashes
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['.', ')'])
        .trim();
    without_number
        .trim_matches(|c: char| c == '*' || c == '_' || c == ':' || c.is_whitespace())
        .to_string()
}

fn match_section(line: &str) -> Option<&'static str> {
    let heading = normalize_heading(line).to_lowercase();
    CAREER_SECTIONS
        .iter()
        .copied()
        .find(|section| heading == section.to_lowercase())
}

/// Splits a bullet-point answer into the known career sections.
///
/// Headings may be numbered, bulleted, bold or markdown headers. Items are
/// the bullet lines that follow a heading; items before the first heading are
/// ignored. Sections appear in their canonical order, including empty ones.
pub fn parse_career_sections(output: &str) -> Vec<CareerSection> {
    let mut sections: Vec<CareerSection> = CAREER_SECTIONS
        .iter()
        .map(|name| CareerSection {
            name: name.to_string(),
            items: Vec::new(),
        })
        .collect();
    let mut current: Option<usize> = None;

    for line in output.lines() {
        let (content, is_bullet) = strip_list_marker(line);
        if content.is_empty() {
            continue;
        }
        if let Some(name) = match_section(content) {
            current = sections.iter().position(|s| s.name == name);
            continue;
        }
        if let (Some(index), true) = (current, is_bullet) {
            let item = content.trim_matches('*').trim().to_string();
            if !item.is_empty() {
                sections[index].items.push(item);
            }
        }
    }
    sections
}
