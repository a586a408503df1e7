use crate::core::discovery::{
    DEFAULT_CONCURRENT_READS, DEFAULT_DESCRIPTOR_EXTENSIONS, DEFAULT_MODULE_MARKER,
};
use crate::core::manifest::DEFAULT_MANIFEST_ENTRY;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_provider, Validate};

pub const DEFAULT_ACCEPTED_EXTENSIONS: &[&str] = &[".imscc"];
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 100;

/// Plain settings with the package conventions of a Canvas course export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    pub manifest_entry: String,
    pub module_marker: String,
    pub descriptor_extensions: Vec<String>,
    pub concurrent_reads: usize,
    pub accepted_extensions: Vec<String>,
    pub max_upload_bytes: u64,
    pub score_seed: Option<u64>,
    pub output_path: Option<String>,
}

impl ParserSettings {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.score_seed = Some(seed);
        self
    }
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            manifest_entry: DEFAULT_MANIFEST_ENTRY.to_string(),
            module_marker: DEFAULT_MODULE_MARKER.to_string(),
            descriptor_extensions: to_strings(DEFAULT_DESCRIPTOR_EXTENSIONS),
            concurrent_reads: DEFAULT_CONCURRENT_READS,
            accepted_extensions: to_strings(DEFAULT_ACCEPTED_EXTENSIONS),
            max_upload_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            score_seed: None,
            output_path: None,
        }
    }
}

pub(crate) fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl ConfigProvider for ParserSettings {
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
        self.max_upload_bytes
    }

    fn score_seed(&self) -> Option<u64> {
        self.score_seed
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

impl Validate for ParserSettings {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
