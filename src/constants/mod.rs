pub mod domain_skills;
pub mod prompts;
