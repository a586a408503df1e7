use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Normalized course structure produced by one parse of a course package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseData {
    pub title: String,
    pub code: String,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub name: String,
    pub qm_compliance: QmCompliance,
    pub objectives: u32,
    pub activities: u32,
    pub assessments: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ModuleItem>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QmCompliance {
    pub status: ComplianceStatus,
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    Partial,
    NonCompliant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: ModuleItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleItemType {
    Objective,
    Activity,
    Assessment,
    Content,
}

/// Module counts per compliance status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplianceBreakdown {
    pub compliant: usize,
    pub partial: usize,
    pub non_compliant: usize,
}

impl Module {
    /// `module-<n>` id and the `Module <n>: ` name prefix, unless the title already starts with "Module".
    pub fn numbered(
        number: usize,
        title: &str,
        qm_compliance: QmCompliance,
        objectives: u32,
        activities: u32,
        assessments: u32,
    ) -> Self {
        let name = if title.starts_with("Module") {
            title.to_string()
        } else {
            format!("Module {}: {}", number, title)
        };

        Self {
            id: format!("module-{}", number),
            name,
            qm_compliance,
            objectives,
            activities,
            assessments,
            items: None,
        }
    }
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::Partial => "partial",
            ComplianceStatus::NonCompliant => "non-compliant",
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CourseData {
    /// Rounded mean of the module scores, halves rounding up.
    pub fn overall_score(&self) -> u8 {
        if self.modules.is_empty() {
            return 0;
        }

        let total: usize = self
            .modules
            .iter()
            .map(|m| m.qm_compliance.score as usize)
            .sum();
        let count = self.modules.len();

        ((total * 2 + count) / (count * 2)) as u8
    }

    pub fn search_modules(&self, term: &str) -> Vec<&Module> {
        let needle = term.to_lowercase();
        self.modules
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn compliance_breakdown(&self) -> ComplianceBreakdown {
        let mut breakdown = ComplianceBreakdown::default();
        for module in &self.modules {
            match module.qm_compliance.status {
                ComplianceStatus::Compliant => breakdown.compliant += 1,
                ComplianceStatus::Partial => breakdown.partial += 1,
                ComplianceStatus::NonCompliant => breakdown.non_compliant += 1,
            }
        }
        breakdown
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(number: usize, title: &str, status: ComplianceStatus, score: u8) -> Module {
        Module::numbered(number, title, QmCompliance { status, score }, 1, 1, 1)
    }

    fn sample_course() -> CourseData {
        CourseData {
            title: "Intro to Biology".to_string(),
            code: "ITB123".to_string(),
            modules: vec![
                module(1, "Cells", ComplianceStatus::Compliant, 92),
                module(2, "Module 2 - Genetics", ComplianceStatus::Partial, 77),
                module(3, "Ecology", ComplianceStatus::NonCompliant, 45),
            ],
        }
    }

    #[test]
    fn test_numbered_module_prefixes_name() {
        let m = module(4, "Evolution", ComplianceStatus::Partial, 70);
        assert_eq!(m.id, "module-4");
        assert_eq!(m.name, "Module 4: Evolution");
        assert!(m.items.is_none());
    }

    #[test]
    fn test_numbered_module_keeps_module_title() {
        let m = module(2, "Module Two: Genetics", ComplianceStatus::Partial, 70);
        assert_eq!(m.name, "Module Two: Genetics");
        // Only the literal prefix counts; case matters.
        let m = module(3, "module three", ComplianceStatus::Partial, 70);
        assert_eq!(m.name, "Module 3: module three");
    }

    #[test]
    fn test_json_field_names() {
        let json = sample_course().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Intro to Biology");
        assert_eq!(value["code"], "ITB123");
        assert_eq!(value["modules"][0]["id"], "module-1");
        assert_eq!(value["modules"][0]["qmCompliance"]["status"], "compliant");
        assert_eq!(value["modules"][0]["qmCompliance"]["score"], 92);
        assert_eq!(value["modules"][2]["qmCompliance"]["status"], "non-compliant");
        assert_eq!(value["modules"][1]["objectives"], 1);
        assert!(value["modules"][0].get("items").is_none());
    }

    #[test]
    fn test_json_round_trip_with_items() {
        let mut course = sample_course();
        course.modules[0].items = Some(vec![
            ModuleItem {
                id: "item-1".to_string(),
                title: "Describe cell structure".to_string(),
                item_type: ModuleItemType::Objective,
                content: None,
            },
            ModuleItem {
                id: "item-2".to_string(),
                title: "Lab report".to_string(),
                item_type: ModuleItemType::Assessment,
                content: Some("Submit within a week".to_string()),
            },
        ]);

        let json = course.to_json_pretty().unwrap();
        assert!(json.contains("\"type\": \"objective\""));

        let restored = CourseData::from_json(&json).unwrap();
        assert_eq!(restored, course);
    }

    #[test]
    fn test_overall_score_rounds_half_up() {
        let course = sample_course();
        // (92 + 77 + 45) / 3 = 71.33
        assert_eq!(course.overall_score(), 71);

        let mut course = sample_course();
        course.modules.truncate(2);
        course.modules[1].qm_compliance.score = 77;
        // (92 + 77) / 2 = 84.5
        assert_eq!(course.overall_score(), 85);

        course.modules.clear();
        assert_eq!(course.overall_score(), 0);
    }

    #[test]
    fn test_search_modules_is_case_insensitive() {
        let course = sample_course();
        let found = course.search_modules("GENETICS");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "module-2");

        assert_eq!(course.search_modules("").len(), 3);
        assert!(course.search_modules("chemistry").is_empty());
    }

    #[test]
    fn test_compliance_breakdown() {
        let breakdown = sample_course().compliance_breakdown();
        assert_eq!(
            breakdown,
            ComplianceBreakdown {
                compliant: 1,
                partial: 1,
                non_compliant: 1
            }
        );
    }
}
