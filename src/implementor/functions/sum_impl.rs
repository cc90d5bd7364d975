use crate::{
    codegen::CodegenError,
    context::{AddContext, AggContext, MergeContext, ResetContext, ResultContext},
    expression::{BinaryOp, BlockBuilder, DataType, Expr, ExprRef, Slot},
    implementor::{single_argument, single_type, AggImplementor, WinAggImplementor},
};

pub struct SumImpl;

impl SumImpl {
    // acc = CASE WHEN acc IS NULL THEN v ELSE acc + v END, skipping NULL inputs
    pub(crate) fn emit_accumulate(block: &mut BlockBuilder, acc: &Slot, v: &ExprRef) -> Result<(), CodegenError> {
        let next = Expr::conditional(
            Expr::is_null(acc.expr().clone()),
            v.clone(),
            Expr::binary(BinaryOp::Add, acc.expr().clone(), v.clone()),
        );
        block.if_then(Expr::is_not_null(v.clone()), |b| {
            b.assign(acc, next);
            Ok(())
        })
    }
}

impl AggImplementor for SumImpl {
    fn name(&self) -> &'static str { "sum" }

    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
        match single_type(self.name(), arg_types)? {
            DataType::Int => Ok((DataType::Int, true)),
            DataType::Float => Ok((DataType::Float, true)),
            other => Err(CodegenError::FunctionArgMismatch {
                name: self.name().into(),
                expected: "numeric".into(),
                got: vec![other],
            }),
        }
    }

    fn state_types(&self, info: &AggContext) -> Vec<DataType> { vec![info.return_type()] }

    fn implement_reset(&self, _info: &AggContext, ctx: &mut dyn ResetContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        // SQL SUM over no rows (or only NULLs) is NULL
        ctx.block().assign(acc.slot(0)?, Expr::null());
        Ok(())
    }

    fn implement_add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let v = single_argument(info.name(), ctx.arguments())?.clone();
        Self::emit_accumulate(ctx.block(), acc.slot(0)?, &v)
    }

    fn implement_merge(&self, _info: &AggContext, ctx: &mut dyn MergeContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let other = ctx.other().get(0)?.clone();
        Self::emit_accumulate(ctx.block(), acc.slot(0)?, &other)
    }

    fn implement_result(&self, _info: &AggContext, ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError> {
        Ok(ctx.accumulator().get(0)?.clone())
    }
}

impl WinAggImplementor for SumImpl {}
