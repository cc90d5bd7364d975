use crate::{
    codegen::CodegenError,
    context::{
        AddContext, AggContext, ResetContext, ResultContext, WinAggAddContext, WinAggResultContext, WindowFrame,
        WindowFrameResult,
    },
    expression::{DataType, Expr, ExprRef},
    implementor::{single_argument, single_type, AggImplementor, WinAggImplementor},
};

/// FIRST_VALUE(expr). Over a window it reads the argument at the frame start
/// directly; as a plain aggregate it keeps the first added value.
pub struct FirstValueImpl;

/// LAST_VALUE(expr). Over a window it reads the argument at the frame end.
pub struct LastValueImpl;

// [value, seen]
fn value_state(info: &AggContext) -> Vec<DataType> { vec![info.return_type(), DataType::Bool] }

fn reset_value(ctx: &mut dyn ResetContext) -> Result<(), CodegenError> {
    let acc = ctx.accumulator();
    ctx.block().assign(acc.slot(0)?, Expr::null());
    ctx.block().assign(acc.slot(1)?, Expr::bool(false));
    Ok(())
}

/// Argument value at `row`, or NULL when the partition is empty.
fn value_at(info: &AggContext, ctx: &WinAggResultContext<'_>, row: &ExprRef) -> Result<ExprRef, CodegenError> {
    let args = ctx.arguments_at(row)?;
    let v = single_argument(info.name(), &args)?.clone();
    Ok(Expr::conditional(ctx.has_rows().clone(), v, Expr::null()))
}

impl AggImplementor for FirstValueImpl {
    fn name(&self) -> &'static str { "first_value" }

    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
        Ok((single_type(self.name(), arg_types)?, true))
    }

    fn state_types(&self, info: &AggContext) -> Vec<DataType> { value_state(info) }

    fn implement_reset(&self, _info: &AggContext, ctx: &mut dyn ResetContext) -> Result<(), CodegenError> {
        reset_value(ctx)
    }

    fn implement_add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let (value, seen) = (acc.slot(0)?, acc.slot(1)?);
        let v = single_argument(info.name(), ctx.arguments())?.clone();
        ctx.block().if_then(Expr::not(seen.expr().clone()), |b| {
            b.assign(value, v);
            b.assign(seen, Expr::bool(true));
            Ok(())
        })
    }

    fn implement_result(&self, _info: &AggContext, ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError> {
        Ok(ctx.accumulator().get(0)?.clone())
    }
}

impl WinAggImplementor for FirstValueImpl {
    fn implement_win_add(&self, _info: &AggContext, _ctx: &mut WinAggAddContext<'_>) -> Result<(), CodegenError> {
        Ok(())
    }

    fn implement_win_result(&self, info: &AggContext, ctx: &mut WinAggResultContext<'_>) -> Result<ExprRef, CodegenError> {
        let start = ctx.frame_start().clone();
        value_at(info, ctx, &start)
    }
}

impl AggImplementor for LastValueImpl {
    fn name(&self) -> &'static str { "last_value" }

    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
        Ok((single_type(self.name(), arg_types)?, true))
    }

    fn state_types(&self, info: &AggContext) -> Vec<DataType> { value_state(info) }

    fn implement_reset(&self, _info: &AggContext, ctx: &mut dyn ResetContext) -> Result<(), CodegenError> {
        reset_value(ctx)
    }

    fn implement_add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let v = single_argument(info.name(), ctx.arguments())?.clone();
        ctx.block().assign(acc.slot(0)?, v);
        ctx.block().assign(acc.slot(1)?, Expr::bool(true));
        Ok(())
    }

    fn implement_result(&self, _info: &AggContext, ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError> {
        Ok(ctx.accumulator().get(0)?.clone())
    }
}

impl WinAggImplementor for LastValueImpl {
    fn implement_win_add(&self, _info: &AggContext, _ctx: &mut WinAggAddContext<'_>) -> Result<(), CodegenError> {
        Ok(())
    }

    fn implement_win_result(&self, info: &AggContext, ctx: &mut WinAggResultContext<'_>) -> Result<ExprRef, CodegenError> {
        let end = ctx.frame_end().clone();
        value_at(info, ctx, &end)
    }
}
