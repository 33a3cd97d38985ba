//! Fixed stage chains for each assistant.

pub mod career;
pub mod study;
pub mod ux;
