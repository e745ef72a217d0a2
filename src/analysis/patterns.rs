//! Pattern effectiveness
//!
//! Applied optimizations are grouped by pattern name in first-seen order,
//! summarized, then stably sorted by total impact so equal impacts keep the
//! order in which the patterns first appeared.

use crate::analysis::types::PatternStat;
use crate::types::AppliedOptimization;
use std::collections::HashMap;

/// Floor for the mean when computing reliability
const MIN_RELIABILITY_MEAN: f64 = 0.001;

/// Running group for one pattern
#[derive(Debug, Default)]
struct PatternGroup {
    pattern: String,
    improvements: Vec<f64>,
}

impl PatternGroup {
    fn into_stat(self) -> PatternStat {
        let count = self.improvements.len();
        let total: f64 = self.improvements.iter().sum();
        let avg = total / count as f64;

        let std = if count > 1 {
            let variance = self
                .improvements
                .iter()
                .map(|v| (v - avg) * (v - avg))
                .sum::<f64>()
                / count as f64;
            variance.sqrt()
        } else {
            0.0
        };

        PatternStat {
            pattern: self.pattern,
            count,
            avg_improvement: avg,
            std_improvement: std,
            total_impact: total,
            reliability: 1.0 - std / avg.max(MIN_RELIABILITY_MEAN),
        }
    }
}

/// Identify patterns and their effectiveness, highest total impact first
pub fn identify_patterns(applied: &[AppliedOptimization]) -> Vec<PatternStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<PatternGroup> = Vec::new();

    for opt in applied {
        let slot = *index.entry(opt.pattern.as_str()).or_insert_with(|| {
            groups.push(PatternGroup {
                pattern: opt.pattern.clone(),
                improvements: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].improvements.push(opt.improvement);
    }

    let mut stats: Vec<PatternStat> = groups.into_iter().map(PatternGroup::into_stat).collect();

    // sort_by is stable
    stats.sort_by(|a, b| b.total_impact.total_cmp(&a.total_impact));
    stats
}
