use crate::core::archive::ArchiveReader;
use crate::utils::error::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_MANIFEST_ENTRY: &str = "imsmanifest.xml";

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>([^<]+)</title>").expect("title pattern is valid"));

/// Trimmed text of the first `<title>…</title>` span without nested markup.
pub fn extract_title(text: &str) -> Option<String> {
    TITLE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Course title taken from the uploaded file name: directories dropped, cut at the first `.`.
pub fn title_from_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);

    base.split('.').next().unwrap_or_default().to_string()
}

/// What the root manifest contributed to the course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Raw manifest text, `None` when the package has no manifest entry.
    pub content: Option<String>,
    pub title: Option<String>,
}

impl ManifestInfo {
    pub fn has_manifest(&self) -> bool {
        self.content.is_some()
    }

    /// Title from the manifest, or the file name based fallback.
    pub fn course_title(&self, file_name: &str) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => title_from_file_name(file_name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ManifestExtractor {
    entry_name: String,
}

impl ManifestExtractor {
    pub fn new(entry_name: impl Into<String>) -> Self {
        Self {
            entry_name: entry_name.into(),
        }
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    pub fn extract(&self, archive: &mut ArchiveReader) -> Result<ManifestInfo> {
        let Some(content) = archive.read_text(&self.entry_name)? else {
            tracing::warn!(
                "No '{}' entry in package, title falls back to the file name",
                self.entry_name
            );
            return Ok(ManifestInfo::default());
        };

        let title = extract_title(&content);
        match &title {
            Some(title) => tracing::debug!("Manifest title: {}", title),
            None => tracing::warn!("Manifest has no <title>, title falls back to the file name"),
        }

        Ok(ManifestInfo {
            content: Some(content),
            title,
        })
    }
}

impl Default for ManifestExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_ENTRY)
    }
}
