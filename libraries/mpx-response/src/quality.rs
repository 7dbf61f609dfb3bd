//! Flatness quality grading
//!
//! Grades use half-open ripple bands, lower edge inclusive:
//!
//! | Ripple (dB)  | Grade     |
//! |--------------|-----------|
//! | [0, 0.1)     | Excellent |
//! | [0.1, 0.5)   | Very good |
//! | [0.5, 1.0)   | Good      |
//! | [1.0, 2.0)   | Fair      |
//! | [2.0, ∞)     | Poor      |

use crate::ripple::RippleReport;
use serde::Serialize;
use std::fmt;

/// Audio flatness grade, ordered best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityGrade {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl QualityGrade {
    /// All grades, best first
    pub const ALL: [QualityGrade; 5] = [
        Self::Excellent,
        Self::VeryGood,
        Self::Good,
        Self::Fair,
        Self::Poor,
    ];

    /// Grade a peak-to-peak ripple value
    ///
    /// NaN is graded `Poor`.
    pub fn from_ripple_db(ripple_db: f64) -> Self {
        if ripple_db < 0.1 {
            Self::Excellent
        } else if ripple_db < 0.5 {
            Self::VeryGood
        } else if ripple_db < 1.0 {
            Self::Good
        } else if ripple_db < 2.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Exclusive upper ripple bound of this grade (`None` for `Poor`)
    pub fn upper_bound_db(&self) -> Option<f64> {
        match self {
            Self::Excellent => Some(0.1),
            Self::VeryGood => Some(0.5),
            Self::Good => Some(1.0),
            Self::Fair => Some(2.0),
            Self::Poor => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::VeryGood => "VERY GOOD",
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Poor => "POOR",
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grade a ripple value
pub fn classify(ripple_db: f64) -> QualityGrade {
    QualityGrade::from_ripple_db(ripple_db)
}

/// A stage's own passband ripple
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    pub stage: String,
    pub ripple_db: f64,
}

/// Rank stages by their individual ripple, largest first
///
/// The sort is stable: stages with equal ripple keep their input order.
pub fn rank_contributors<S: AsRef<str>>(reports: &[(S, RippleReport)]) -> Vec<Contributor> {
    let mut ranked: Vec<Contributor> = reports
        .iter()
        .map(|(stage, report)| Contributor {
            stage: stage.as_ref().to_string(),
            ripple_db: report.ripple_db,
        })
        .collect();

    ranked.sort_by(|a, b| b.ripple_db.total_cmp(&a.ripple_db));
    ranked
}

/// The stage limiting overall flatness (first ranked contributor)
pub fn primary_limiter(ranked: &[Contributor]) -> Option<&Contributor> {
    ranked.first()
}
