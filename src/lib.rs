pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, settings::ParserSettings, toml_config::TomlConfig};

pub use core::discovery::{DiscoveryStrategy, ModuleDiscovery};
pub use core::engine::{CourseParser, ParseOutcome};
pub use domain::model::{
    ComplianceStatus, CourseData, Module, ModuleItem, ModuleItemType, QmCompliance,
};
pub use utils::error::{ImsccError, Result};
