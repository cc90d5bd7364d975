use crate::{
    codegen::CodegenError,
    context::{
        translate_checked, AccumulatorView, PartitionFrame, ResultContext, RowTranslator, WindowFrame,
        WindowFrameResult,
    },
    expression::{BlockBuilder, ExprRef},
};

/// Result context of a windowed aggregate: base result phase plus frame facts
/// plus argument translation. Independent of the windowed reset context; a
/// regular implementor's result phase accepts it unchanged.
pub struct WinAggResultContext<'a> {
    block: &'a mut BlockBuilder,
    accumulator: AccumulatorView,
    frame: &'a PartitionFrame,
    translator: &'a dyn RowTranslator,
    name: &'a str,
    arity: usize,
}

impl<'a> WinAggResultContext<'a> {
    pub fn new(
        block: &'a mut BlockBuilder,
        accumulator: AccumulatorView,
        frame: &'a PartitionFrame,
        translator: &'a dyn RowTranslator,
        name: &'a str,
        arity: usize,
    ) -> Self {
        Self { block, accumulator, frame, translator, name, arity }
    }
}

impl ResultContext for WinAggResultContext<'_> {
    fn block(&mut self) -> &mut BlockBuilder { self.block }
    fn accumulator(&self) -> AccumulatorView { self.accumulator.clone() }
}

impl WindowFrame for WinAggResultContext<'_> {
    fn current_row(&self) -> &ExprRef { self.frame.current_row() }
    fn frame_start(&self) -> &ExprRef { self.frame.frame_start() }
    fn frame_end(&self) -> &ExprRef { self.frame.frame_end() }
    fn has_rows(&self) -> &ExprRef { self.frame.has_rows() }
    fn partition_row_count(&self) -> &ExprRef { self.frame.partition_row_count() }
}

impl WindowFrameResult for WinAggResultContext<'_> {
    fn arguments_at(&self, row: &ExprRef) -> Result<Vec<ExprRef>, CodegenError> {
        translate_checked(self.name, self.arity, self.translator, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::{Accumulator, PartitionArguments},
        expression::{DataType, Expr},
    };
    use std::sync::Arc;

    #[test]
    fn arguments_at_forwards_any_row() {
        let mut block = BlockBuilder::new();
        let acc = Accumulator::new("first_value", vec![block.allocate_slot(DataType::Int)]);
        let frame = PartitionFrame::constant(1, 0, 2, 3);
        let translator = PartitionArguments::new(1);
        let ctx = WinAggResultContext::new(&mut block, acc.view(), &frame, &translator, "first_value", 1);

        let at_start = ctx.arguments_at(ctx.frame_start()).unwrap();
        assert_eq!(at_start.len(), 1);
        assert_eq!(*at_start[0], Expr::Argument { index: 0, row: Expr::int(0) });

        let far = ctx.arguments_at(&Expr::int(99)).unwrap();
        assert_eq!(far.len(), 1);

        assert!(Arc::ptr_eq(ctx.accumulator().get(0).unwrap(), acc.slots()[0].expr()));
    }
}
