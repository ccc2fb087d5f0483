//! Text trend chart for a history series.

use crate::core::HistorySeries;

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Averages `values` down into at most `width` buckets.
fn resample(values: &[f64], width: usize) -> Vec<f64> {
    let len = values.len();
    if len <= width {
        return values.to_vec();
    }
    (0..width)
        .map(|i| {
            let start = i * len / width;
            let end = ((i + 1) * len / width).max(start + 1);
            let bucket = &values[start..end];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect()
}

/// Renders values as a one-line sparkline no wider than `max_width`.
pub fn sparkline(values: &[f64], max_width: usize) -> String {
    if values.is_empty() || max_width == 0 {
        return String::new();
    }

    let points = resample(values, max_width);
    let low = points.iter().copied().fold(f64::INFINITY, f64::min);
    let high = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = high - low;
    let top = (LEVELS.len() - 1) as f64;

    points
        .iter()
        .map(|v| {
            let level = if span > 0.0 {
                ((v - low) / span * top).round() as usize
            } else {
                0
            };
            LEVELS[level.min(LEVELS.len() - 1)]
        })
        .collect()
}

/// Sparkline plus a line with the first and last dates underneath.
pub fn render(series: &HistorySeries, max_width: usize) -> String {
    let line = sparkline(&series.rates(), max_width);
    let (Some(first), Some(last)) = (series.points.first(), series.points.last()) else {
        return line;
    };

    let width = line.chars().count();
    let start = first.date.format("%Y-%m-%d").to_string();
    let end = last.date.format("%Y-%m-%d").to_string();
    let gap = width.saturating_sub(start.len() + end.len()).max(1);
    format!("{line}\n{start}{}{end}", " ".repeat(gap))
}
