// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Cumulative wall-clock timing per named stage.

use crate::profile::stage_profiler::StageProfiler;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// Accumulated timing of a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMetrics {
    name: &'static str,
    total: Duration,
    hits: u64,
}

impl StageMetrics {
    #[inline]
    fn new(name: &'static str) -> Self {
        Self {
            name,
            total: Duration::ZERO,
            hits: 0,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the total time spent in the stage over all completed entries.
    #[inline]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Returns how many times the stage was completed.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Returns the mean duration of one entry, or zero if the stage never completed.
    #[inline]
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.hits) {
            Ok(0) => Duration::ZERO,
            Ok(hits) => self.total / hits,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.hits as f64),
        }
    }
}

/// Profiler that accumulates elapsed time and hit counts per stage.
///
/// Stages are reported in the order they were first entered. Re-entering a stage that is
/// still open (recursion) is supported; each exit closes the innermost matching entry.
#[derive(Debug, Clone, Default)]
pub struct TimingProfiler {
    index: FxHashMap<&'static str, usize>,
    stages: Vec<StageMetrics>,
    open: Vec<(usize, Instant)>,
}

impl TimingProfiler {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a profiler with room for `stages` distinct stage names.
    #[inline]
    pub fn preallocated(stages: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(stages, Default::default()),
            stages: Vec::with_capacity(stages),
            open: Vec::with_capacity(stages),
        }
    }

    /// Returns the metrics of `name`, if the stage was ever entered.
    #[inline]
    pub fn stage(&self, name: &str) -> Option<&StageMetrics> {
        self.index.get(name).map(|&slot| &self.stages[slot])
    }

    /// Returns all stages in first-entered order.
    #[inline]
    pub fn stages(&self) -> &[StageMetrics] {
        &self.stages
    }

    /// Returns the number of stages that are entered but not yet exited.
    #[inline]
    pub fn open_stages(&self) -> usize {
        self.open.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Discards all collected metrics.
    pub fn reset(&mut self) {
        self.index.clear();
        self.stages.clear();
        self.open.clear();
    }

    fn slot_of(&mut self, stage: &'static str) -> usize {
        if let Some(&slot) = self.index.get(stage) {
            return slot;
        }
        let slot = self.stages.len();
        self.stages.push(StageMetrics::new(stage));
        self.index.insert(stage, slot);
        slot
    }
}

impl StageProfiler for TimingProfiler {
    fn name(&self) -> &str {
        "TimingProfiler"
    }

    fn enter_stage(&mut self, stage: &'static str) {
        let slot = self.slot_of(stage);
        self.open.push((slot, Instant::now()));
    }

    fn exit_stage(&mut self, stage: &'static str) {
        let now = Instant::now();
        let Some(&slot) = self.index.get(stage) else {
            log::warn!("TimingProfiler: exit of unknown stage `{}` ignored", stage);
            return;
        };
        let Some(position) = self.open.iter().rposition(|&(open, _)| open == slot) else {
            log::warn!("TimingProfiler: exit of stage `{}` that is not open", stage);
            return;
        };

        let (_, started) = self.open.remove(position);
        let metrics = &mut self.stages[slot];
        metrics.total = metrics.total.saturating_add(now.duration_since(started));
        metrics.hits = metrics.hits.saturating_add(1);
    }
}

impl std::fmt::Display for TimingProfiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<24} | {:>10} | {:>14} | {:>14}", "Stage", "Hits", "Total", "Mean")?;
        writeln!(f, "{}", "-".repeat(70))?;
        for stage in &self.stages {
            writeln!(
                f,
                "{:<24} | {:>10} | {:>14} | {:>14}",
                stage.name,
                stage.hits,
                format!("{:.2?}", stage.total),
                format!("{:.2?}", stage.mean())
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_keep_first_entered_order() {
        let mut p = TimingProfiler::new();
        p.enter_stage("Total");
        for _ in 0..3 {
            p.enter_stage("CycleSearch");
            p.exit_stage("CycleSearch");
            p.enter_stage("Pivot");
            p.exit_stage("Pivot");
        }
        p.exit_stage("Total");

        let names: Vec<_> = p.stages().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Total", "CycleSearch", "Pivot"]);
        assert_eq!(p.stage("CycleSearch").unwrap().hits(), 3);
        assert_eq!(p.stage("Total").unwrap().hits(), 1);
        assert_eq!(p.open_stages(), 0);
    }

    #[test]
    fn test_nested_stage_includes_inner_time() {
        let mut p = TimingProfiler::preallocated(2);
        p.enter_stage("Outer");
        p.enter_stage("Inner");
        std::thread::sleep(Duration::from_millis(2));
        p.exit_stage("Inner");
        p.exit_stage("Outer");

        let outer = p.stage("Outer").unwrap().total();
        let inner = p.stage("Inner").unwrap().total();
        assert!(inner >= Duration::from_millis(2));
        assert!(outer >= inner);
    }

    #[test]
    fn test_unmatched_exit_is_ignored() {
        let mut p = TimingProfiler::new();
        p.exit_stage("Never");
        assert!(p.is_empty());
        assert!(p.stage("Never").is_none());
    }

    #[test]
    fn test_mean_of_unfinished_stage_is_zero() {
        let mut p = TimingProfiler::new();
        p.enter_stage("Open");
        assert_eq!(p.stage("Open").unwrap().mean(), Duration::ZERO);
        assert_eq!(p.open_stages(), 1);
        p.reset();
        assert!(p.is_empty());
    }

    #[test]
    fn test_display_lists_every_stage() {
        let mut p = TimingProfiler::new();
        p.enter_stage("Pivot");
        p.exit_stage("Pivot");
        let table = p.to_string();
        assert!(table.starts_with("Stage"));
        assert!(table.contains("Pivot"));
    }
}
