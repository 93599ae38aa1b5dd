//! Decimation of long histories for display.

use crate::model::Value;

/// Reduce `history` to at most `cap` points.
///
/// With `keep_latest_only` the most recent `cap` points are kept. Otherwise
/// `cap` indices are spread evenly over the whole history, rounded to the
/// nearest index, so the first and last points always survive.
pub fn downsample<T: Copy>(history: &[T], cap: usize, keep_latest_only: bool) -> Vec<T> {
    let len = history.len();
    if len <= cap {
        return history.to_vec();
    }
    if keep_latest_only {
        return history[len - cap..].to_vec();
    }
    match cap {
        0 => Vec::new(),
        1 => vec![history[0]],
        _ => (0..cap)
            .map(|i| history[spread_index(i, len, cap)])
            .collect(),
    }
}

/// `round(i * (len - 1) / (cap - 1))` in integer arithmetic, half rounding up.
fn spread_index(i: usize, len: usize, cap: usize) -> usize {
    let span = (len - 1) as u128;
    let steps = (cap - 1) as u128;
    ((2 * i as u128 * span + steps) / (2 * steps)) as usize
}

/// The plottable form of a history: every entry a scalar, at least one entry.
/// Vector and text series are shown as their latest value instead.
pub fn numeric_history(history: &[Value]) -> Option<Vec<f64>> {
    if history.is_empty() {
        return None;
    }
    history
        .iter()
        .map(|v| v.as_scalar().map(|n| n.as_f64()))
        .collect()
}
