use crate::core::archive::ArchiveReader;
use crate::core::course_code::generate_course_code;
use crate::core::discovery::{ArchiveLayout, DiscoveryContext, ModuleDiscovery};
use crate::core::manifest::ManifestExtractor;
use crate::domain::model::CourseData;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use crate::utils::validation::{validate_upload_size, validate_upload_type};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Result of one parse: the course plus where its modules came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub course: CourseData,
    pub strategy: &'static str,
    pub source_file: String,
    pub parsed_at: DateTime<Utc>,
}

/// Turns course package bytes into [`CourseData`].
///
/// Holds no state between calls. Dropping a pending `parse` future cancels it and
/// releases the archive buffer.
pub struct CourseParser<C: ConfigProvider> {
    config: C,
    discovery: ModuleDiscovery,
    monitor: SystemMonitor,
}

impl<C: ConfigProvider> CourseParser<C> {
    pub fn new(config: C) -> Self {
        Self::new_with_monitoring(config, false)
    }

    pub fn new_with_monitoring(config: C, monitor_enabled: bool) -> Self {
        Self {
            config,
            discovery: ModuleDiscovery::standard(),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Replaces the standard strategy cascade.
    pub fn with_discovery(mut self, discovery: ModuleDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// `file_name` only supplies the fallback title when the manifest has none.
    pub async fn parse(&self, bytes: Vec<u8>, file_name: &str) -> Result<ParseOutcome> {
        tracing::info!("Parsing course package '{}' ({} bytes)", file_name, bytes.len());
        let mut rng = match self.config.score_seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut trace = self.monitor.start(file_name);

        let mut archive = ArchiveReader::open(bytes).inspect_err(|e| {
            tracing::error!("Cannot open '{}' as an archive: {}", file_name, e);
        })?;
        trace.phase("Archive opened");

        let manifest = ManifestExtractor::new(self.config.manifest_entry()).extract(&mut archive)?;
        let course_title = manifest.course_title(file_name);

        let ctx = DiscoveryContext {
            archive,
            manifest,
            course_title,
            layout: ArchiveLayout::from_config(&self.config),
        };
        let discovery = self.discovery.discover(&ctx, &mut rng).await?;
        trace.phase("Modules discovered");

        let code = generate_course_code(&ctx.course_title, &mut rng);
        let course = CourseData {
            title: ctx.course_title,
            code,
            modules: discovery.modules,
        };

        tracing::info!(
            "Parsed '{}' [{}]: {} modules via {}, overall score {}",
            course.title,
            course.code,
            course.modules.len(),
            discovery.strategy,
            course.overall_score()
        );
        trace.finish(course.modules.len());

        Ok(ParseOutcome {
            course,
            strategy: discovery.strategy,
            source_file: file_name.to_string(),
            parsed_at: Utc::now(),
        })
    }

    /// Reads an uploaded package from storage, checks type and size, then parses it.
    pub async fn parse_upload<S: Storage>(&self, storage: &S, path: &str) -> Result<ParseOutcome> {
        validate_upload_type(path, self.config.accepted_extensions())?;

        let bytes = storage.read_file(path).await?;
        validate_upload_size(bytes.len() as u64, self.config.max_upload_bytes())?;

        self.parse(bytes, path).await
    }

    /// Writes the course document as `<name>.course.json` and returns the file name.
    pub async fn save<S: Storage>(
        &self,
        storage: &S,
        outcome: &ParseOutcome,
        pretty: bool,
    ) -> Result<String> {
        let json = if pretty {
            outcome.course.to_json_pretty()?
        } else {
            outcome.course.to_json()?
        };

        let file_name = output_file_name(&outcome.source_file);
        storage.write_file(&file_name, json.as_bytes()).await?;
        tracing::debug!("Wrote {} bytes to {}", json.len(), file_name);

        Ok(file_name)
    }
}

/// `uploads/Biology.imscc` becomes `Biology.course.json`.
pub fn output_file_name(source_file: &str) -> String {
    let base = std::path::Path::new(source_file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(source_file);

    let stem = match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    };

    format!("{}.course.json", stem)
}
