//! Per-variable history and running statistics.
//!
//! Series are created the first time a name is recorded and live until
//! [`VariableTracker::reset_all`]. Iteration follows first-seen order, which is
//! the order a display lists them in.

use crate::model::{Value, VariableSeries};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct VariableTracker {
    series: IndexMap<String, VariableSeries>,
    reset_clears_bounds: bool,
}

impl VariableTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, [`reset`](Self::reset) also forgets `min`/`max`. Off by
    /// default: a reset series keeps reporting the bounds it saw before.
    pub fn with_reset_clears_bounds(mut self, clear: bool) -> Self {
        self.reset_clears_bounds = clear;
        self
    }

    /// Append `value` to the series `name`, creating it if needed.
    ///
    /// Returns `false` when the series is paused and nothing was recorded.
    pub fn record(&mut self, name: &str, value: Value) -> bool {
        let series = self
            .series
            .entry(name.to_string())
            .or_insert_with(|| VariableSeries::new(name));
        if series.paused {
            return false;
        }
        if let Value::Scalar(n) = &value {
            series.observe(*n);
        }
        series.history.push(value);
        true
    }

    pub fn pause(&mut self, name: &str) -> bool {
        self.set_paused(name, true)
    }

    pub fn resume(&mut self, name: &str) -> bool {
        self.set_paused(name, false)
    }

    /// Flip the pause flag. Returns the new state, or `None` for an unknown name.
    pub fn toggle_pause(&mut self, name: &str) -> Option<bool> {
        let series = self.series.get_mut(name)?;
        series.paused = !series.paused;
        Some(series.paused)
    }

    /// Clear the history of one series. Returns `false` for an unknown name.
    pub fn reset(&mut self, name: &str) -> bool {
        let Some(series) = self.series.get_mut(name) else {
            return false;
        };
        series.history.clear();
        if self.reset_clears_bounds {
            series.min = None;
            series.max = None;
        }
        true
    }

    /// Drop every series.
    pub fn reset_all(&mut self) {
        self.series.clear();
    }

    pub fn get(&self, name: &str) -> Option<&VariableSeries> {
        self.series.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableSeries> {
        self.series.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn set_paused(&mut self, name: &str, paused: bool) -> bool {
        match self.series.get_mut(name) {
            Some(series) => {
                series.paused = paused;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Number;

    fn int(i: i64) -> Value {
        Value::Scalar(Number::Int(i))
    }

    #[test]
    fn first_record_creates_series() {
        let mut t = VariableTracker::new();
        assert!(t.record("x", int(5)));
        let s = t.get("x").unwrap();
        assert_eq!(s.history, vec![int(5)]);
        assert_eq!(s.min, Some(Number::Int(5)));
        assert_eq!(s.max, Some(Number::Int(5)));
        assert!(!s.paused);
    }

    #[test]
    fn bounds_follow_scalars_only() {
        let mut t = VariableTracker::new();
        t.record("x", int(5));
        t.record("x", int(2));
        t.record("x", Value::Scalar(Number::Float(9.5)));
        t.record("x", Value::Vector(vec![Number::Int(100)]));
        t.record("x", Value::Text("hi".into()));
        let s = t.get("x").unwrap();
        assert_eq!(s.history.len(), 5);
        assert_eq!(s.min, Some(Number::Int(2)));
        assert_eq!(s.max, Some(Number::Float(9.5)));
    }

    #[test]
    fn tie_keeps_existing_bound() {
        let mut t = VariableTracker::new();
        t.record("x", int(2));
        t.record("x", Value::Scalar(Number::Float(2.0)));
        let s = t.get("x").unwrap();
        assert_eq!(s.min, Some(Number::Int(2)));
        assert_eq!(s.max, Some(Number::Int(2)));
    }

    #[test]
    fn paused_series_ignores_records() {
        let mut t = VariableTracker::new();
        t.record("x", int(1));
        assert!(t.pause("x"));
        assert!(!t.record("x", int(50)));
        assert_eq!(t.get("x").unwrap().history, vec![int(1)]);
        assert_eq!(t.get("x").unwrap().max, Some(Number::Int(1)));
        assert!(t.resume("x"));
        assert!(t.record("x", int(50)));
        assert_eq!(t.get("x").unwrap().history.len(), 2);
    }

    #[test]
    fn pause_unknown_name_is_noop() {
        let mut t = VariableTracker::new();
        assert!(!t.pause("nope"));
        assert_eq!(t.toggle_pause("nope"), None);
        assert!(t.is_empty());
    }

    #[test]
    fn toggle_pause_flips() {
        let mut t = VariableTracker::new();
        t.record("x", int(1));
        assert_eq!(t.toggle_pause("x"), Some(true));
        assert_eq!(t.toggle_pause("x"), Some(false));
    }

    #[test]
    fn reset_keeps_bounds_by_default() {
        let mut t = VariableTracker::new();
        t.record("x", int(1));
        t.record("x", int(9));
        assert!(t.reset("x"));
        let s = t.get("x").unwrap();
        assert!(s.history.is_empty());
        assert_eq!(s.min, Some(Number::Int(1)));
        assert_eq!(s.max, Some(Number::Int(9)));

        t.record("x", int(5));
        let s = t.get("x").unwrap();
        assert_eq!((s.min, s.max), (Some(Number::Int(1)), Some(Number::Int(9))));
    }

    #[test]
    fn reset_can_clear_bounds() {
        let mut t = VariableTracker::new().with_reset_clears_bounds(true);
        t.record("x", int(1));
        t.record("x", int(9));
        t.reset("x");
        t.record("x", int(5));
        let s = t.get("x").unwrap();
        assert_eq!((s.min, s.max), (Some(Number::Int(5)), Some(Number::Int(5))));
    }

    #[test]
    fn reset_all_forgets_everything() {
        let mut t = VariableTracker::new();
        t.record("a", int(1));
        t.record("b", int(2));
        t.pause("a");
        t.reset_all();
        assert!(t.is_empty());
        assert!(t.record("a", int(3)));
        let s = t.get("a").unwrap();
        assert!(!s.paused);
        assert_eq!(s.min, Some(Number::Int(3)));
    }

    #[test]
    fn iteration_is_first_seen_order() {
        let mut t = VariableTracker::new();
        for name in ["zeta", "alpha", "mid", "alpha"] {
            t.record(name, int(0));
        }
        assert_eq!(t.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }
}
