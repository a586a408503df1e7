use crate::core::elements::ElementCounter;
use crate::core::manifest::extract_title;
use crate::core::scoring::score_module;
use crate::domain::model::Module;
use rand::Rng;

const OBJECTIVE_TAGS: &[&str] = &["learning_outcome"];
const ACTIVITY_TAGS: &[&str] = &["assignment", "discussion_topic"];
const ASSESSMENT_TAGS: &[&str] = &["quiz", "assessment"];

/// Element tallies of one module descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementSummary {
    pub objectives: u32,
    pub activities: u32,
    pub assessments: u32,
}

/// Turns module descriptor text into a scored [`Module`].
#[derive(Debug, Clone)]
pub struct ModuleXmlParser {
    counter: ElementCounter,
}

impl ModuleXmlParser {
    pub fn new() -> Self {
        let tags = OBJECTIVE_TAGS
            .iter()
            .chain(ACTIVITY_TAGS)
            .chain(ASSESSMENT_TAGS)
            .copied();
        Self {
            counter: ElementCounter::new(tags),
        }
    }

    pub fn summarize(&self, xml: &str) -> ElementSummary {
        ElementSummary {
            objectives: self.counter.count_all(xml, OBJECTIVE_TAGS) as u32,
            activities: self.counter.count_all(xml, ACTIVITY_TAGS) as u32,
            assessments: self.counter.count_all(xml, ASSESSMENT_TAGS) as u32,
        }
    }

    /// `number` is the module's 1-based position in the course.
    pub fn parse<R: Rng>(&self, xml: &str, number: usize, rng: &mut R) -> Module {
        let title = extract_title(xml).unwrap_or_else(|| format!("Module {}", number));
        let summary = self.summarize(xml);
        let qm_compliance = score_module(
            rng,
            summary.objectives,
            summary.activities,
            summary.assessments,
        );

        tracing::debug!(
            "Module {} '{}': {} objectives, {} activities, {} assessments -> {} ({})",
            number,
            title,
            summary.objectives,
            summary.activities,
            summary.assessments,
            qm_compliance.status,
            qm_compliance.score
        );

        Module::numbered(
            number,
            &title,
            qm_compliance,
            summary.objectives,
            summary.activities,
            summary.assessments,
        )
    }
}

impl Default for ModuleXmlParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ComplianceStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FULL_MODULE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<module identifier="m1">
  <title>Cell Biology</title>
  <learning_outcome id="lo1">Describe organelles</learning_outcome>
  <learning_outcome id="lo2">Explain mitosis</learning_outcome>
  <assignment id="a1">Lab report</assignment>
  <discussion_topic id="d1">Cells in daily life</discussion_topic>
  <quiz id="q1">Organelle quiz</quiz>
</module>"#;

    #[test]
    fn test_summarize_counts_each_group() {
        let parser = ModuleXmlParser::new();
        assert_eq!(
            parser.summarize(FULL_MODULE),
            ElementSummary {
                objectives: 2,
                activities: 2,
                assessments: 1
            }
        );
    }

    #[test]
    fn test_parse_full_module_is_compliant() {
        let mut rng = StdRng::seed_from_u64(1);
        let module = ModuleXmlParser::new().parse(FULL_MODULE, 1, &mut rng);

        assert_eq!(module.id, "module-1");
        assert_eq!(module.name, "Module 1: Cell Biology");
        assert_eq!(module.qm_compliance.status, ComplianceStatus::Compliant);
        assert!((85..=99).contains(&module.qm_compliance.score));
        assert!(module.items.is_none());
    }

    #[test]
    fn test_parse_without_title_uses_number() {
        let mut rng = StdRng::seed_from_u64(1);
        let xml = "<module><learning_outcome/><assessment/></module>";
        let module = ModuleXmlParser::new().parse(xml, 3, &mut rng);

        assert_eq!(module.name, "Module 3");
        assert_eq!(module.assessments, 1);
        assert_eq!(module.qm_compliance.status, ComplianceStatus::Partial);
    }

    #[test]
    fn test_parse_keeps_titles_starting_with_module() {
        let mut rng = StdRng::seed_from_u64(1);
        let xml = "<module><title>Module 7 - Review</title></module>";
        let module = ModuleXmlParser::new().parse(xml, 2, &mut rng);

        assert_eq!(module.id, "module-2");
        assert_eq!(module.name, "Module 7 - Review");
        assert_eq!(module.qm_compliance.score, 0);
    }
}
