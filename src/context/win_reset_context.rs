use crate::{
    context::{Accumulator, PartitionFrame, ResetContext, ResetMode, WindowFrame},
    expression::{BlockBuilder, ExprRef},
};

/// Reset context of a windowed aggregate.
///
/// The very first reset is a warm-up issued before any partition is known:
/// it has no frame, and `partition_row_count_hint` is only good for pre-sizing
/// collections. Later resets carry the frame of a concrete partition.
pub struct WinAggResetContext<'a> {
    block: &'a mut BlockBuilder,
    accumulator: Accumulator,
    mode: ResetMode,
}

impl<'a> WinAggResetContext<'a> {
    pub fn new(block: &'a mut BlockBuilder, accumulator: Accumulator, mode: ResetMode) -> Self {
        Self { block, accumulator, mode }
    }

    pub fn mode(&self) -> &ResetMode { &self.mode }

    pub fn is_warm_up(&self) -> bool { matches!(self.mode, ResetMode::WarmUp(_)) }

    pub fn frame(&self) -> Option<&PartitionFrame> {
        match &self.mode {
            ResetMode::Partition(frame) => Some(frame),
            ResetMode::WarmUp(_) => None,
        }
    }

    pub fn current_row(&self) -> Option<&ExprRef> { self.frame().map(WindowFrame::current_row) }
    pub fn frame_start(&self) -> Option<&ExprRef> { self.frame().map(WindowFrame::frame_start) }
    pub fn frame_end(&self) -> Option<&ExprRef> { self.frame().map(WindowFrame::frame_end) }
    pub fn has_rows(&self) -> Option<&ExprRef> { self.frame().map(WindowFrame::has_rows) }

    /// Row count of the partition, or the warm-up estimate.
    pub fn partition_row_count_hint(&self) -> &ExprRef {
        match &self.mode {
            ResetMode::WarmUp(hint) => hint.row_count(),
            ResetMode::Partition(frame) => frame.partition_row_count(),
        }
    }
}

impl ResetContext for WinAggResetContext<'_> {
    fn block(&mut self) -> &mut BlockBuilder { self.block }
    fn accumulator(&self) -> Accumulator { self.accumulator.clone() }
}
