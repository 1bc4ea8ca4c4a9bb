use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Confidence, MatchFailure, ResultRow};

// ---------------------------------------------------------------------------
// Score bands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 5] = [
        Self::Excellent,
        Self::Good,
        Self::Fair,
        Self::Poor,
        Self::VeryPoor,
    ];

    /// Lower bound, inclusive. Each band runs up to the next band's bound;
    /// `Excellent` includes 1.0.
    pub fn lower_bound(&self) -> f64 {
        match self {
            Self::Excellent => 0.9,
            Self::Good => 0.7,
            Self::Fair => 0.5,
            Self::Poor => 0.3,
            Self::VeryPoor => 0.0,
        }
    }

    pub fn for_score(score: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| score >= band.lower_bound())
            .unwrap_or(Self::VeryPoor)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent (0.9-1.0)",
            Self::Good => "Good (0.7-0.9)",
            Self::Fair => "Fair (0.5-0.7)",
            Self::Poor => "Poor (0.3-0.5)",
            Self::VeryPoor => "Very Poor (0.0-0.3)",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BandCount {
    pub band: ScoreBand,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub total_rows: usize,
    pub successful_matches: usize,
    /// Percentage of rows matched.
    pub success_rate: f64,
    pub high_confidence_matches: usize,
    /// Percentage of rows matched at or above the threshold.
    pub high_confidence_rate: f64,
    /// Mean score of successful matches.
    pub average_score: Option<f64>,
    pub threshold: f64,
    pub failure_counts: BTreeMap<MatchFailure, usize>,
    pub score_bands: Vec<BandCount>,
}

impl MatchSummary {
    pub fn unmatched(&self) -> usize {
        self.total_rows - self.successful_matches
    }

    /// Metric/value pairs for the workbook summary sheet and the CLI.
    pub fn metrics(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("Total Rows Processed".to_string(), self.total_rows.to_string()),
            ("Successful Matches".to_string(), self.successful_matches.to_string()),
            ("Success Rate (%)".to_string(), format!("{:.1}", self.success_rate)),
            (
                "High Confidence Matches".to_string(),
                self.high_confidence_matches.to_string(),
            ),
            (
                "High Confidence Rate (%)".to_string(),
                format!("{:.1}", self.high_confidence_rate),
            ),
            (
                "Average Dice Score".to_string(),
                self.average_score
                    .map(|s| format!("{s:.3}"))
                    .unwrap_or_else(|| "N/A".into()),
            ),
            ("Threshold Used".to_string(), self.threshold.to_string()),
        ];
        for (failure, count) in &self.failure_counts {
            out.push((format!("Unmatched: {failure}"), count.to_string()));
        }
        for band in &self.score_bands {
            out.push((band.band.label().to_string(), band.count.to_string()));
        }
        out
    }
}

/// Compute summary statistics over result rows.
pub fn compute_summary(rows: &[ResultRow], threshold: f64) -> MatchSummary {
    let mut failure_counts: BTreeMap<MatchFailure, usize> =
        MatchFailure::ALL.iter().map(|f| (*f, 0)).collect();
    let mut band_counts = [0usize; 5];
    let mut successful = 0;
    let mut high = 0;
    let mut score_sum = 0.0;

    for row in rows {
        if let Some(kind) = row.error_kind {
            *failure_counts.entry(kind).or_insert(0) += 1;
        }
        if !row.success {
            continue;
        }
        successful += 1;
        score_sum += row.dice_score;
        if row.confidence == Some(Confidence::High) {
            high += 1;
        }
        let band = ScoreBand::for_score(row.dice_score);
        if let Some(slot) = ScoreBand::ALL.iter().position(|b| *b == band) {
            band_counts[slot] += 1;
        }
    }

    let percent = |n: usize| {
        if rows.is_empty() {
            0.0
        } else {
            n as f64 / rows.len() as f64 * 100.0
        }
    };

    MatchSummary {
        total_rows: rows.len(),
        successful_matches: successful,
        success_rate: percent(successful),
        high_confidence_matches: high,
        high_confidence_rate: percent(high),
        average_score: (successful > 0).then(|| score_sum / successful as f64),
        threshold,
        failure_counts,
        score_bands: ScoreBand::ALL
            .iter()
            .zip(band_counts)
            .map(|(band, count)| BandCount { band: *band, count })
            .collect(),
    }
}
