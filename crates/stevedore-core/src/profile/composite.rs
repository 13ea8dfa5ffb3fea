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

/// Fans every notification out to a list of profilers, in insertion order.
pub struct CompositeProfiler<'a> {
    profilers: Vec<Box<dyn StageProfiler + 'a>>,
}

impl<'a> CompositeProfiler<'a> {
    /// Creates an empty composite.
    #[inline]
    pub fn new() -> Self {
        Self {
            profilers: Vec::new(),
        }
    }

    /// Appends a profiler.
    #[inline]
    pub fn add_profiler<P>(&mut self, profiler: P)
    where
        P: StageProfiler + 'a,
    {
        self.profilers.push(Box::new(profiler));
    }

    /// Builder-style variant of [`CompositeProfiler::add_profiler`].
    #[inline]
    pub fn with_profiler<P>(mut self, profiler: P) -> Self
    where
        P: StageProfiler + 'a,
    {
        self.add_profiler(profiler);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.profilers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.profilers.is_empty()
    }
}

impl Default for CompositeProfiler<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompositeProfiler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.profilers.iter().map(|p| p.name()))
            .finish()
    }
}

impl StageProfiler for CompositeProfiler<'_> {
    fn name(&self) -> &str {
        "CompositeProfiler"
    }

    fn enter_stage(&mut self, stage: &'static str) {
        for profiler in self.profilers.iter_mut() {
            profiler.enter_stage(stage);
        }
    }

    fn exit_stage(&mut self, stage: &'static str) {
        for profiler in self.profilers.iter_mut() {
            profiler.exit_stage(stage);
        }
    }
}
