use crate::{
    context::{Accumulator, AccumulatorView},
    expression::BlockBuilder,
};

/// Result phase: compute the final value from accumulator state.
///
/// The accumulator is only reachable as a read-only view. Results may be
/// requested several times against the same state (overlapping frames), so
/// the phase must leave every slot untouched.
pub trait ResultContext {
    fn block(&mut self) -> &mut BlockBuilder;
    fn accumulator(&self) -> AccumulatorView;
}

/// Merge phase: combine another unit's state (same layout) into this one.
pub trait MergeContext {
    fn block(&mut self) -> &mut BlockBuilder;
    fn accumulator(&self) -> Accumulator;
    fn other(&self) -> AccumulatorView;
}

pub struct AggResultContext<'a> {
    block: &'a mut BlockBuilder,
    accumulator: AccumulatorView,
}

impl<'a> AggResultContext<'a> {
    pub fn new(block: &'a mut BlockBuilder, accumulator: AccumulatorView) -> Self {
        Self { block, accumulator }
    }
}

impl ResultContext for AggResultContext<'_> {
    fn block(&mut self) -> &mut BlockBuilder { self.block }
    fn accumulator(&self) -> AccumulatorView { self.accumulator.clone() }
}

pub struct AggMergeContext<'a> {
    block: &'a mut BlockBuilder,
    accumulator: Accumulator,
    other: AccumulatorView,
}

impl<'a> AggMergeContext<'a> {
    pub fn new(block: &'a mut BlockBuilder, accumulator: Accumulator, other: AccumulatorView) -> Self {
        Self { block, accumulator, other }
    }
}

impl MergeContext for AggMergeContext<'_> {
    fn block(&mut self) -> &mut BlockBuilder { self.block }
    fn accumulator(&self) -> Accumulator { self.accumulator.clone() }
    fn other(&self) -> AccumulatorView { self.other.clone() }
}
