use crate::core::archive::ArchiveReader;
use crate::core::elements::opening_tag_pattern;
use crate::core::manifest::{extract_title, ManifestInfo};
use crate::core::module_parser::ModuleXmlParser;
use crate::core::scoring::score_organization_item;
use crate::domain::model::{ComplianceStatus, Module, QmCompliance};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ImsccError, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const DEFAULT_MODULE_MARKER: &str = "/module_";
pub const DEFAULT_DESCRIPTOR_EXTENSIONS: &[&str] = &[".xml"];
pub const DEFAULT_CONCURRENT_READS: usize = 4;

static ORGANIZATIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<organizations>(.*?)</organizations>").expect("organizations pattern is valid")
});

static ITEM_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| opening_tag_pattern("item").expect("item opening pattern is valid"));

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<item[^>]*>(.*?)</item>").expect("item pattern is valid"));

/// Where module descriptors live inside a package and how many may be read at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    pub module_marker: String,
    pub descriptor_extensions: Vec<String>,
    pub concurrent_reads: usize,
}

impl ArchiveLayout {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            module_marker: config.module_marker().to_string(),
            descriptor_extensions: config.descriptor_extensions().to_vec(),
            concurrent_reads: config.concurrent_reads(),
        }
    }

    pub fn is_module_descriptor(&self, path: &str) -> bool {
        path.contains(self.module_marker.as_str())
            && self
                .descriptor_extensions
                .iter()
                .any(|ext| path.ends_with(ext.as_str()))
    }
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self {
            module_marker: DEFAULT_MODULE_MARKER.to_string(),
            descriptor_extensions: DEFAULT_DESCRIPTOR_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            concurrent_reads: DEFAULT_CONCURRENT_READS,
        }
    }
}

/// Everything a strategy may look at. Built once per parse.
#[derive(Debug, Clone)]
pub struct DiscoveryContext {
    pub archive: ArchiveReader,
    pub manifest: ManifestInfo,
    pub course_title: String,
    pub layout: ArchiveLayout,
}

impl DiscoveryContext {
    /// Module descriptor paths in archive listing order.
    pub fn module_descriptor_paths(&self) -> Vec<String> {
        self.archive
            .list_entries()
            .into_iter()
            .filter(|path| self.layout.is_module_descriptor(path))
            .collect()
    }
}

#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` (or an empty list) hands over to the next strategy.
    async fn discover(
        &self,
        ctx: &DiscoveryContext,
        rng: &mut StdRng,
    ) -> Result<Option<Vec<Module>>>;
}

/// Modules found and the strategy that found them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub strategy: &'static str,
    pub modules: Vec<Module>,
}

/// Ordered strategy cascade; the first non-empty result wins and results are never merged.
pub struct ModuleDiscovery {
    strategies: Vec<Box<dyn DiscoveryStrategy>>,
}

impl ModuleDiscovery {
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Per-module files, then the manifest organization, then a synthetic module.
    pub fn standard() -> Self {
        Self::empty()
            .with_strategy(ModuleFiles::default())
            .with_strategy(ManifestOrganizations)
            .with_strategy(SyntheticModule)
    }

    pub fn with_strategy(mut self, strategy: impl DiscoveryStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Always yields at least one module; a synthetic one closes the cascade if nothing else did.
    pub async fn discover(&self, ctx: &DiscoveryContext, rng: &mut StdRng) -> Result<Discovery> {
        for strategy in &self.strategies {
            match strategy.discover(ctx, rng).await? {
                Some(modules) if !modules.is_empty() => {
                    tracing::info!(
                        "Strategy '{}' discovered {} modules",
                        strategy.name(),
                        modules.len()
                    );
                    return Ok(Discovery {
                        strategy: strategy.name(),
                        modules,
                    });
                }
                _ => tracing::warn!(
                    "Strategy '{}' found no modules, falling back",
                    strategy.name()
                ),
            }
        }

        Ok(Discovery {
            strategy: SyntheticModule.name(),
            modules: vec![synthetic_module(&ctx.course_title)],
        })
    }
}

impl Default for ModuleDiscovery {
    fn default() -> Self {
        Self::standard()
    }
}

/// One module per `.../module_*.xml` descriptor entry.
#[derive(Debug, Clone, Default)]
pub struct ModuleFiles {
    parser: ModuleXmlParser,
}

#[async_trait]
impl DiscoveryStrategy for ModuleFiles {
    fn name(&self) -> &'static str {
        "module-files"
    }

    async fn discover(
        &self,
        ctx: &DiscoveryContext,
        rng: &mut StdRng,
    ) -> Result<Option<Vec<Module>>> {
        let paths = ctx.module_descriptor_paths();
        if paths.is_empty() {
            tracing::debug!("No entries match '{}'", ctx.layout.module_marker);
            return Ok(None);
        }
        tracing::debug!("Reading {} module descriptors", paths.len());

        let texts = read_entries(&ctx.archive, paths, ctx.layout.concurrent_reads).await?;

        let mut modules = Vec::with_capacity(texts.len());
        for text in texts.into_iter().flatten() {
            let number = modules.len() + 1;
            modules.push(self.parser.parse(&text, number, rng));
        }

        Ok(Some(modules))
    }
}

/// Reads entries on blocking worker tasks, at most `concurrency` at a time.
/// Results come back in the order of `paths`, whatever order the reads finish in.
async fn read_entries(
    archive: &ArchiveReader,
    paths: Vec<String>,
    concurrency: usize,
) -> Result<Vec<Option<String>>> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut texts = vec![None; paths.len()];
    let mut tasks = JoinSet::new();

    for (index, path) in paths.into_iter().enumerate() {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| ImsccError::ProcessingError {
                message: format!("read limiter closed: {}", e),
            })?;
        let mut reader = archive.clone();

        tasks.spawn_blocking(move || {
            let _permit = permit;
            (index, reader.read_text(&path))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, text) = joined?;
        texts[index] = text?;
    }

    Ok(texts)
}

/// Modules recovered from `<item>` blocks of the manifest `<organizations>` section.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestOrganizations;

#[async_trait]
impl DiscoveryStrategy for ManifestOrganizations {
    fn name(&self) -> &'static str {
        "manifest-organizations"
    }

    async fn discover(
        &self,
        ctx: &DiscoveryContext,
        _rng: &mut StdRng,
    ) -> Result<Option<Vec<Module>>> {
        let Some(manifest) = ctx.manifest.content.as_deref() else {
            return Ok(None);
        };

        Ok(organization_modules(manifest))
    }
}

/// Item blocks end at the first `</item>` after their opening tag; nested openings inside
/// that span estimate the module's activities.
pub fn organization_modules(manifest: &str) -> Option<Vec<Module>> {
    let organizations = ORGANIZATIONS_RE.captures(manifest)?.get(1)?.as_str();

    let modules = ITEM_RE
        .captures_iter(organizations)
        .enumerate()
        .map(|(i, caps)| {
            let number = i + 1;
            let body = caps.get(1).map_or("", |m| m.as_str());
            let title = extract_title(body).unwrap_or_else(|| format!("Module {}", number));
            let activities = ITEM_OPEN_RE.find_iter(body).count() as u32;

            Module::numbered(
                number,
                &title,
                score_organization_item(activities),
                1,
                activities,
                activities / 3,
            )
        })
        .collect();

    Some(modules)
}

/// Last resort: a single introduction module named after the course.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticModule;

#[async_trait]
impl DiscoveryStrategy for SyntheticModule {
    fn name(&self) -> &'static str {
        "synthetic-default"
    }

    async fn discover(
        &self,
        ctx: &DiscoveryContext,
        _rng: &mut StdRng,
    ) -> Result<Option<Vec<Module>>> {
        Ok(Some(vec![synthetic_module(&ctx.course_title)]))
    }
}

pub fn synthetic_module(course_title: &str) -> Module {
    Module::numbered(
        1,
        &format!("Introduction to {}", course_title),
        QmCompliance {
            status: ComplianceStatus::NonCompliant,
            score: 50,
        },
        1,
        2,
        1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::archive::build_archive;
    use crate::core::manifest::ManifestExtractor;
    use rand::SeedableRng;

    fn context(entries: &[(&str, &str)]) -> DiscoveryContext {
        let mut archive = ArchiveReader::open(build_archive(entries)).unwrap();
        let manifest = ManifestExtractor::default().extract(&mut archive).unwrap();
        let course_title = manifest.course_title("Sample.imscc");
        DiscoveryContext {
            archive,
            manifest,
            course_title,
            layout: ArchiveLayout::default(),
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_layout_matches_module_descriptors() {
        let layout = ArchiveLayout::default();
        assert!(layout.is_module_descriptor("course/module_1.xml"));
        assert!(layout.is_module_descriptor("a/b/module_intro.xml"));
        assert!(!layout.is_module_descriptor("module_1.xml"));
        assert!(!layout.is_module_descriptor("course/module_1.html"));
        assert!(!layout.is_module_descriptor("course/module_1.XML"));
        assert!(!layout.is_module_descriptor("course/modules.xml"));
    }

    #[tokio::test]
    async fn test_module_files_in_listing_order() {
        let ctx = context(&[
            ("imsmanifest.xml", "<manifest><title>Biology</title></manifest>"),
            ("course/module_2.xml", "<title>Genetics</title><quiz/>"),
            ("course/resources/file.txt", "ignored"),
            ("course/module_1.xml", "<title>Cells</title><learning_outcome/>"),
        ]);

        let modules = ModuleFiles::default()
            .discover(&ctx, &mut rng())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].id, "module-1");
        assert_eq!(modules[0].name, "Module 1: Genetics");
        assert_eq!(modules[1].id, "module-2");
        assert_eq!(modules[1].name, "Module 2: Cells");
    }

    #[tokio::test]
    async fn test_module_files_order_independent_of_concurrency() {
        let mut entries = Vec::new();
        let names: Vec<String> = (1..=12).map(|i| format!("m/module_{:02}.xml", i)).collect();
        let bodies: Vec<String> = (1..=12).map(|i| format!("<title>Unit {}</title>", i)).collect();
        for (name, body) in names.iter().zip(&bodies) {
            entries.push((name.as_str(), body.as_str()));
        }

        let mut ctx = context(&entries);
        for concurrency in [1, 3, 16] {
            ctx.layout.concurrent_reads = concurrency;
            let modules = ModuleFiles::default()
                .discover(&ctx, &mut rng())
                .await
                .unwrap()
                .unwrap();

            let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
            let expected: Vec<String> = (1..=12).map(|i| format!("Module {}: Unit {}", i, i)).collect();
            assert_eq!(names, expected);
        }
    }

    #[tokio::test]
    async fn test_module_files_absent_defers() {
        let ctx = context(&[("imsmanifest.xml", "<manifest/>")]);
        let result = ModuleFiles::default().discover(&ctx, &mut rng()).await.unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_organization_modules_flat_items() {
        let manifest = r#"<manifest>
  <organizations>
    <organization identifier="org">
      <item identifier="i1"><title>Getting Started</title></item>
      <item identifier="i2"><title>Module Two</title></item>
      <item identifier="i3"><title> Wrap Up </title></item>
    </organization>
  </organizations>
</manifest>"#;

        let modules = organization_modules(manifest).unwrap();
        assert_eq!(modules.len(), 3);
        assert_eq!(modules[0].name, "Module 1: Getting Started");
        assert_eq!(modules[1].name, "Module Two");
        assert_eq!(modules[2].name, "Module 3: Wrap Up");
        for module in &modules {
            assert_eq!(module.objectives, 1);
            assert_eq!(module.activities, 0);
            assert_eq!(module.assessments, 0);
            assert_eq!(module.qm_compliance.score, 55);
            assert_eq!(module.qm_compliance.status, ComplianceStatus::NonCompliant);
        }
    }

    #[test]
    fn test_item_opening_pattern_matches_element_count() {
        let body = r#"<title>Week</title><item identifier="a"/><item>x</item><items/><itemref/>"#;
        assert_eq!(
            ITEM_OPEN_RE.find_iter(body).count(),
            crate::core::elements::count_elements(body, "item")
        );
        assert_eq!(ITEM_OPEN_RE.find_iter(body).count(), 4);
    }

    #[test]
    fn test_organization_modules_count_nested_openings() {
        // The block runs from the first <item> to the first </item>: six nested openings.
        let manifest = r#"<organizations><organization>
<item identifier="week1"><title>Week 1</title>
  <item identifier="r1"/><item identifier="r2"/><item identifier="r3"/>
  <item identifier="r4"/><item identifier="r5"/>
  <item identifier="r6"><title>Reading</title></item>
<item identifier="week2">No title here</item>
</organization></organizations>"#;

        let modules = organization_modules(manifest).unwrap();
        assert_eq!(modules.len(), 2);

        assert_eq!(modules[0].name, "Module 1: Week 1");
        assert_eq!(modules[0].activities, 6);
        assert_eq!(modules[0].assessments, 2);
        assert_eq!(
            modules[0].qm_compliance,
            QmCompliance {
                status: ComplianceStatus::Partial,
                score: 75
            }
        );

        assert_eq!(modules[1].id, "module-2");
        assert_eq!(modules[1].name, "Module 2");
        assert_eq!(modules[1].activities, 0);
    }

    #[test]
    fn test_organization_modules_requires_block() {
        assert_eq!(organization_modules("<manifest/>"), None);
        assert_eq!(
            organization_modules("<organizations></organizations>"),
            Some(Vec::new())
        );
    }

    #[tokio::test]
    async fn test_cascade_prefers_module_files() {
        let ctx = context(&[
            (
                "imsmanifest.xml",
                "<organizations><item><title>From manifest</title></item></organizations>",
            ),
            ("course/module_1.xml", "<title>From file</title>"),
        ]);

        let discovery = ModuleDiscovery::standard()
            .discover(&ctx, &mut rng())
            .await
            .unwrap();
        assert_eq!(discovery.strategy, "module-files");
        assert_eq!(discovery.modules.len(), 1);
        assert_eq!(discovery.modules[0].name, "Module 1: From file");
    }

    #[tokio::test]
    async fn test_cascade_falls_back_to_organizations() {
        let ctx = context(&[(
            "imsmanifest.xml",
            "<title>Course</title><organizations><item><title>Only</title></item></organizations>",
        )]);

        let discovery = ModuleDiscovery::standard()
            .discover(&ctx, &mut rng())
            .await
            .unwrap();
        assert_eq!(discovery.strategy, "manifest-organizations");
        assert_eq!(discovery.modules[0].name, "Module 1: Only");
    }

    #[tokio::test]
    async fn test_cascade_ends_with_synthetic_module() {
        let ctx = context(&[(
            "imsmanifest.xml",
            "<title>Statistics</title><organizations></organizations>",
        )]);

        let discovery = ModuleDiscovery::standard()
            .discover(&ctx, &mut rng())
            .await
            .unwrap();
        assert_eq!(discovery.strategy, "synthetic-default");
        assert_eq!(discovery.modules, vec![synthetic_module("Statistics")]);
        assert_eq!(discovery.modules[0].name, "Module 1: Introduction to Statistics");
    }

    #[tokio::test]
    async fn test_empty_cascade_still_yields_a_module() {
        let ctx = context(&[("notes.txt", "hello")]);
        let discovery = ModuleDiscovery::empty()
            .discover(&ctx, &mut rng())
            .await
            .unwrap();

        assert_eq!(discovery.modules.len(), 1);
        assert_eq!(discovery.modules[0].name, "Module 1: Introduction to Sample");
    }

    #[test]
    fn test_standard_strategy_order() {
        assert_eq!(
            ModuleDiscovery::standard().strategy_names(),
            vec!["module-files", "manifest-organizations", "synthetic-default"]
        );
    }
}
