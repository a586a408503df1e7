pub mod archive;
pub mod course_code;
pub mod discovery;
pub mod elements;
pub mod engine;
pub mod manifest;
pub mod module_parser;
pub mod scoring;

pub use crate::domain::model::{ComplianceStatus, CourseData, Module, QmCompliance};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
