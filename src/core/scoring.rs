use crate::domain::model::{ComplianceStatus, QmCompliance};
use rand::Rng;
use std::ops::RangeInclusive;

pub const COMPLIANT_BAND: RangeInclusive<u8> = 85..=99;
pub const PARTIAL_BAND: RangeInclusive<u8> = 70..=84;
pub const NON_COMPLIANT_BAND: RangeInclusive<u8> = 40..=69;

/// Maps element counts to a compliance status and a score drawn uniformly from the
/// status band. Modules with no elements at all score exactly 0.
pub fn score_module<R: Rng>(
    rng: &mut R,
    objectives: u32,
    activities: u32,
    assessments: u32,
) -> QmCompliance {
    let Some(status) = classify(objectives, activities, assessments) else {
        return QmCompliance {
            status: ComplianceStatus::NonCompliant,
            score: 0,
        };
    };

    let band = match status {
        ComplianceStatus::Compliant => COMPLIANT_BAND,
        ComplianceStatus::Partial => PARTIAL_BAND,
        ComplianceStatus::NonCompliant => NON_COMPLIANT_BAND,
    };

    QmCompliance {
        status,
        score: rng.gen_range(band),
    }
}

/// Status for the given counts, `None` when all three are zero.
pub fn classify(objectives: u32, activities: u32, assessments: u32) -> Option<ComplianceStatus> {
    if objectives == 0 && activities == 0 && assessments == 0 {
        return None;
    }

    let status = if objectives > 0 && activities > 0 && assessments > 0 {
        ComplianceStatus::Compliant
    } else if objectives > 0 && (activities > 0 || assessments > 0) {
        ComplianceStatus::Partial
    } else {
        ComplianceStatus::NonCompliant
    };
    Some(status)
}

/// Banding used for modules recovered from the manifest organization: fixed scores, no draw.
pub fn score_organization_item(activities: u32) -> QmCompliance {
    if activities > 5 {
        QmCompliance {
            status: ComplianceStatus::Partial,
            score: 75,
        }
    } else {
        QmCompliance {
            status: ComplianceStatus::NonCompliant,
            score: 55,
        }
    }
}
