use serde::Deserialize;
use validator::Validate;

// Presence of required fields is checked by pipeline readiness, so every
// field defaults to empty and validation only bounds lengths.

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct StudyTextRequestDto {
    #[validate(length(max = 200000))]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct BackgroundRequestDto {
    #[validate(length(max = 10000))]
    pub background: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SkillGapRequestDto {
    #[validate(length(max = 100))]
    pub domain: String,

    /// Comma-separated list, e.g. "Python, Excel, SQL".
    #[validate(length(max = 2000))]
    pub skills: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UnlearningRequestDto {
    #[validate(length(max = 10000))]
    pub background: Option<String>,

    #[validate(length(max = 200))]
    pub target_domain: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TrackRequestDto {
    #[validate(length(max = 1000))]
    pub goal: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NavigationRequestDto {
    #[validate(length(max = 2000))]
    pub education: String,

    #[validate(length(max = 2000))]
    pub roles: String,

    #[validate(length(max = 2000))]
    pub interests: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UxPrototypeRequestDto {
    #[validate(length(max = 200))]
    pub project: String,

    #[validate(length(max = 200))]
    pub domain: String,

    #[validate(length(max = 500))]
    pub activity: String,
}
