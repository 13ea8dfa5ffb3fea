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

/// Receives begin/end notifications around named solver phases.
///
/// Stages may nest and may be entered many times; every `enter_stage` is paired with an
/// `exit_stage` carrying the same name. Implementations must not influence the solver.
pub trait StageProfiler {
    /// Returns the name of the profiler.
    fn name(&self) -> &str;

    /// Called when the solver enters `stage`.
    fn enter_stage(&mut self, stage: &'static str);

    /// Called when the solver leaves `stage`.
    fn exit_stage(&mut self, stage: &'static str);
}

impl<P> StageProfiler for &mut P
where
    P: StageProfiler + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn enter_stage(&mut self, stage: &'static str) {
        (**self).enter_stage(stage);
    }

    #[inline(always)]
    fn exit_stage(&mut self, stage: &'static str) {
        (**self).exit_stage(stage);
    }
}

impl<P> StageProfiler for Box<P>
where
    P: StageProfiler + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn enter_stage(&mut self, stage: &'static str) {
        (**self).enter_stage(stage);
    }

    #[inline]
    fn exit_stage(&mut self, stage: &'static str) {
        (**self).exit_stage(stage);
    }
}
