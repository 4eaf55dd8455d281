//! Summary statistics over a history snapshot.

use crate::history::Sample;

/// Aggregate statistics over the successful samples of one snapshot.
///
/// A `None` field means "no data": the snapshot held no successful samples,
/// or (for `stddev`) fewer than two.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub stddev: Option<f64>,
}

/// Reduce a snapshot to min/mean/max/stddev over its successful samples.
///
/// Failure samples are skipped. The standard deviation is the sample form
/// (n-1 denominator), so a single success yields no stddev. Operates on a
/// copied sequence and never mutates the source history.
pub fn summarize(samples: &[Sample]) -> Summary {
    let values: Vec<f64> = samples
        .iter()
        .filter_map(|s| match s {
            Sample::Latency(ms) => Some(*ms),
            Sample::Failed => None,
        })
        .collect();

    if values.is_empty() {
        return Summary::default();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    let stddev = if values.len() > 1 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (values.len() - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };

    Summary {
        min: Some(min),
        mean: Some(mean),
        max: Some(max),
        stddev,
    }
}
