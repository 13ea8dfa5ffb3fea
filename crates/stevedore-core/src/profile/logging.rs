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

use crate::profile::stage_profiler::StageProfiler;
use std::time::Instant;

/// Profiler that reports every finished stage through the `log` facade.
#[derive(Debug, Clone)]
pub struct LogProfiler {
    level: log::Level,
    open: Vec<(&'static str, Instant)>,
}

impl LogProfiler {
    /// Creates a profiler logging at `level`.
    #[inline]
    pub fn new(level: log::Level) -> Self {
        Self {
            level,
            open: Vec::new(),
        }
    }

    #[inline]
    pub fn level(&self) -> log::Level {
        self.level
    }
}

impl Default for LogProfiler {
    fn default() -> Self {
        Self::new(log::Level::Debug)
    }
}

impl StageProfiler for LogProfiler {
    fn name(&self) -> &str {
        "LogProfiler"
    }

    fn enter_stage(&mut self, stage: &'static str) {
        self.open.push((stage, Instant::now()));
    }

    fn exit_stage(&mut self, stage: &'static str) {
        if let Some(position) = self.open.iter().rposition(|&(open, _)| open == stage) {
            let (_, started) = self.open.remove(position);
            log::log!(
                self.level,
                "stage `{}` finished in {:.2?} (depth {})",
                stage,
                started.elapsed(),
                self.open.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_profiler_closes_innermost_entry() {
        let mut p = LogProfiler::new(log::Level::Trace);
        p.enter_stage("A");
        p.enter_stage("B");
        p.exit_stage("B");
        assert_eq!(p.open.len(), 1);
        p.exit_stage("A");
        assert!(p.open.is_empty());
        assert_eq!(p.level(), log::Level::Trace);
    }
}
