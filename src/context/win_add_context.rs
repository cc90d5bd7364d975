use crate::{
    codegen::CodegenError,
    context::{translate_checked, Accumulator, AddContext, PartitionFrame, RowTranslator, WindowFrame, WindowFrameResult},
    expression::{BlockBuilder, ExprRef},
};

pub struct WinAggAddContext<'a> {
    block: &'a mut BlockBuilder,
    accumulator: Accumulator,
    frame: &'a PartitionFrame,
    translator: &'a dyn RowTranslator,
    name: &'a str,
    arity: usize,
    arguments: Vec<ExprRef>,
}

impl<'a> WinAggAddContext<'a> {
    /// Fails when the translator does not yield `arity` arguments for the current row.
    pub fn new(
        block: &'a mut BlockBuilder,
        accumulator: Accumulator,
        frame: &'a PartitionFrame,
        translator: &'a dyn RowTranslator,
        name: &'a str,
        arity: usize,
    ) -> Result<Self, CodegenError> {
        let arguments = translate_checked(name, arity, translator, frame.current_row())?;
        Ok(Self { block, accumulator, frame, translator, name, arity, arguments })
    }
}

impl AddContext for WinAggAddContext<'_> {
    fn block(&mut self) -> &mut BlockBuilder { self.block }
    fn accumulator(&self) -> Accumulator { self.accumulator.clone() }
    fn arguments(&self) -> &[ExprRef] { &self.arguments }
}

impl WindowFrame for WinAggAddContext<'_> {
    fn current_row(&self) -> &ExprRef { self.frame.current_row() }
    fn frame_start(&self) -> &ExprRef { self.frame.frame_start() }
    fn frame_end(&self) -> &ExprRef { self.frame.frame_end() }
    fn has_rows(&self) -> &ExprRef { self.frame.has_rows() }
    fn partition_row_count(&self) -> &ExprRef { self.frame.partition_row_count() }
}

impl WindowFrameResult for WinAggAddContext<'_> {
    fn arguments_at(&self, row: &ExprRef) -> Result<Vec<ExprRef>, CodegenError> {
        translate_checked(self.name, self.arity, self.translator, row)
    }
}
