pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_provider, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "imscc-map")]
#[command(about = "Map a course export package (.imscc) to modules with quality scores")]
pub struct CliConfig {
    /// Course package to parse
    pub input: String,

    /// TOML configuration file; replaces the archive and upload flags when set
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory for the JSON output; prints to stdout when omitted
    #[arg(short, long)]
    pub output_path: Option<String>,

    #[arg(long, default_value = "imsmanifest.xml")]
    pub manifest_entry: String,

    #[arg(long, default_value = "/module_")]
    pub module_marker: String,

    #[arg(long, value_delimiter = ',', default_value = ".xml")]
    pub descriptor_extensions: Vec<String>,

    #[arg(long, default_value = "4")]
    pub concurrent_reads: usize,

    #[arg(long, value_delimiter = ',', default_value = ".imscc")]
    pub accepted_extensions: Vec<String>,

    #[arg(long, default_value = "100")]
    pub max_file_size_mb: u64,

    /// Seed for reproducible compliance scores and course codes
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, help = "Pretty-print the JSON output")]
    pub pretty: bool,

    #[arg(long, help = "Print a course summary")]
    pub summary: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per parse phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn manifest_entry(&self) -> &str {
        &self.manifest_entry
    }

    fn module_marker(&self) -> &str {
        &self.module_marker
    }

    fn descriptor_extensions(&self) -> &[String] {
        &self.descriptor_extensions
    }

    fn concurrent_reads(&self) -> usize {
        self.concurrent_reads
    }

    fn accepted_extensions(&self) -> &[String] {
        &self.accepted_extensions
    }

    fn max_upload_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    fn score_seed(&self) -> Option<u64> {
        self.seed
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_path("input", &self.input)?;
        validate_provider(self)
    }
}
