use crate::config::settings::{to_strings, DEFAULT_ACCEPTED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_MB};
use crate::core::discovery::{
    DEFAULT_CONCURRENT_READS, DEFAULT_DESCRIPTOR_EXTENSIONS, DEFAULT_MODULE_MARKER,
};
use crate::core::manifest::DEFAULT_MANIFEST_ENTRY;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ImsccError, Result};
use crate::utils::validation::{validate_provider, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub manifest_entry: String,
    pub module_marker: String,
    pub descriptor_extensions: Vec<String>,
    pub concurrent_reads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub accepted_extensions: Vec<String>,
    pub max_file_size_mb: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            manifest_entry: DEFAULT_MANIFEST_ENTRY.to_string(),
            module_marker: DEFAULT_MODULE_MARKER.to_string(),
            descriptor_extensions: to_strings(DEFAULT_DESCRIPTOR_EXTENSIONS),
            concurrent_reads: DEFAULT_CONCURRENT_READS,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: to_strings(DEFAULT_ACCEPTED_EXTENSIONS),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ImsccError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ImsccError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn pretty_output(&self) -> bool {
        self.output.pretty.unwrap_or(false)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn manifest_entry(&self) -> &str {
        &self.archive.manifest_entry
    }

    fn module_marker(&self) -> &str {
        &self.archive.module_marker
    }

    fn descriptor_extensions(&self) -> &[String] {
        &self.archive.descriptor_extensions
    }

    fn concurrent_reads(&self) -> usize {
        self.archive.concurrent_reads
    }

    fn accepted_extensions(&self) -> &[String] {
        &self.upload.accepted_extensions
    }

    fn max_upload_bytes(&self) -> u64 {
        self.upload.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    fn score_seed(&self) -> Option<u64> {
        self.scoring.seed
    }

    fn output_path(&self) -> Option<&str> {
        self.output.path.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
