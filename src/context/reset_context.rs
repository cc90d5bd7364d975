use crate::{
    context::Accumulator,
    expression::{BlockBuilder, ExprRef},
};

/// Reset phase: emit statements that (re)initialise every accumulator slot.
pub trait ResetContext {
    fn block(&mut self) -> &mut BlockBuilder;
    fn accumulator(&self) -> Accumulator;
}

/// Add phase: fold the current row's arguments into the accumulator.
pub trait AddContext {
    fn block(&mut self) -> &mut BlockBuilder;
    fn accumulator(&self) -> Accumulator;
    /// Declared arguments evaluated at the row being added.
    fn arguments(&self) -> &[ExprRef];
}

pub struct AggResetContext<'a> {
    block: &'a mut BlockBuilder,
    accumulator: Accumulator,
}

impl<'a> AggResetContext<'a> {
    pub fn new(block: &'a mut BlockBuilder, accumulator: Accumulator) -> Self {
        Self { block, accumulator }
    }
}

impl ResetContext for AggResetContext<'_> {
    fn block(&mut self) -> &mut BlockBuilder { self.block }
    fn accumulator(&self) -> Accumulator { self.accumulator.clone() }
}

pub struct AggAddContext<'a> {
    block: &'a mut BlockBuilder,
    accumulator: Accumulator,
    arguments: Vec<ExprRef>,
}

impl<'a> AggAddContext<'a> {
    pub fn new(block: &'a mut BlockBuilder, accumulator: Accumulator, arguments: Vec<ExprRef>) -> Self {
        Self { block, accumulator, arguments }
    }
}

impl AddContext for AggAddContext<'_> {
    fn block(&mut self) -> &mut BlockBuilder { self.block }
    fn accumulator(&self) -> Accumulator { self.accumulator.clone() }
    fn arguments(&self) -> &[ExprRef] { &self.arguments }
}
