//! Effectiveness report
//!
//! [`EffectivenessReport`] is the structured result of one analysis cycle;
//! [`render`] turns it into the terminal text block.

pub mod render;

pub use render::{render_bar, render_report, BAR_WIDTH, MAX_BAR_CELLS};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::advisor::Recommendation;
use crate::analysis::{PatternStat, RoiResult, TrendResult};

/// One entry of the recent-improvements section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentImprovement {
    /// 1-based iteration number within the full history
    pub iteration: usize,
    pub improvement: f64,
}

/// Everything shown by one report cycle
#[derive(Debug, Clone, Serialize)]
pub struct EffectivenessReport {
    pub generated_at: NaiveDateTime,
    pub roi: RoiResult,
    pub trend: TrendResult,

    /// Remaining iterations until convergence, if predictable
    pub convergence_eta: Option<usize>,

    /// Highest-impact patterns, best first
    pub patterns: Vec<PatternStat>,

    pub recommendations: Vec<Recommendation>,

    /// Latest improvements, oldest first
    pub recent: Vec<RecentImprovement>,
}

impl EffectivenessReport {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the recent-improvements tail of a history
    pub fn recent_from(improvements: &[f64], limit: usize) -> Vec<RecentImprovement> {
        let start = improvements.len().saturating_sub(limit);
        improvements[start..]
            .iter()
            .enumerate()
            .map(|(offset, &improvement)| RecentImprovement {
                iteration: start + offset + 1,
                improvement,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_from_tail() {
        let recent = EffectivenessReport::recent_from(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].iteration, 3);
        assert_eq!(recent[0].improvement, 3.0);
        assert_eq!(recent[4].iteration, 7);
    }

    #[test]
    fn test_recent_from_short_history() {
        let recent = EffectivenessReport::recent_from(&[4.0, 2.0], 5);
        assert_eq!(
            recent,
            vec![
                RecentImprovement { iteration: 1, improvement: 4.0 },
                RecentImprovement { iteration: 2, improvement: 2.0 },
            ]
        );
        assert!(EffectivenessReport::recent_from(&[], 5).is_empty());
    }
}
