use crate::{
    codegen::CodegenError,
    context::{AddContext, AggContext, ResetContext, ResultContext, WinAggResetContext},
    expression::{DataType, Expr, ExprRef},
    implementor::{single_argument, single_type, AggImplementor, WinAggImplementor},
};

/// ARRAY_AGG(expr): collects every value, NULLs included, in add order.
pub struct ArrayAggImpl;

impl AggImplementor for ArrayAggImpl {
    fn name(&self) -> &'static str { "array_agg" }

    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
        single_type(self.name(), arg_types)?;
        Ok((DataType::Array, false))
    }

    fn state_types(&self, _info: &AggContext) -> Vec<DataType> { vec![DataType::Array] }

    fn implement_reset(&self, _info: &AggContext, ctx: &mut dyn ResetContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        ctx.block().assign(acc.slot(0)?, Expr::empty_list());
        Ok(())
    }

    fn implement_add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let v = single_argument(info.name(), ctx.arguments())?.clone();
        ctx.block().push(acc.slot(0)?, v);
        Ok(())
    }

    fn implement_result(&self, _info: &AggContext, ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError> {
        Ok(ctx.accumulator().get(0)?.clone())
    }
}

impl WinAggImplementor for ArrayAggImpl {
    // The row count only sizes the list; warm-up and partition resets emit the same shape.
    fn implement_win_reset(&self, info: &AggContext, ctx: &mut WinAggResetContext<'_>) -> Result<(), CodegenError> {
        self.implement_reset(info, ctx)?;
        let acc = ResetContext::accumulator(ctx);
        let hint = ctx.partition_row_count_hint().clone();
        ResetContext::block(ctx).reserve(acc.slot(0)?, hint);
        Ok(())
    }
}
