use crate::{
    codegen::CodegenError,
    context::{AddContext, AggContext, MergeContext, ResetContext, ResultContext},
    expression::{BinaryOp, BlockBuilder, DataType, Expr, ExprRef, Slot},
    implementor::{single_argument, single_type, AggImplementor, WinAggImplementor},
};

pub struct MinImpl;
pub struct MaxImpl;

#[derive(Clone, Copy)]
enum Mode { Min, Max }

impl Mode {
    fn name(&self) -> &'static str {
        match self {
            Mode::Min => "min",
            Mode::Max => "max",
        }
    }

    // Candidate `v` replaces the current extremum.
    fn better(&self, v: ExprRef, cur: ExprRef) -> ExprRef {
        match self {
            Mode::Min => Expr::binary(BinaryOp::Lt, v, cur),
            Mode::Max => Expr::binary(BinaryOp::Gt, v, cur),
        }
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
        match single_type(self.name(), arg_types)? {
            DataType::Array => Err(CodegenError::FunctionArgMismatch {
                name: self.name().into(),
                expected: "comparable".into(),
                got: vec![DataType::Array],
            }),
            t => Ok((t, true)),
        }
    }

    // Nulls are ignored; the first non-null value seeds the slot.
    fn emit_accumulate(&self, block: &mut BlockBuilder, acc: &Slot, v: &ExprRef) -> Result<(), CodegenError> {
        let replace = Expr::binary(
            BinaryOp::Or,
            Expr::is_null(acc.expr().clone()),
            self.better(v.clone(), acc.expr().clone()),
        );
        block.if_then(Expr::is_not_null(v.clone()), |b| {
            b.if_then(replace, |b| {
                b.assign(acc, v.clone());
                Ok(())
            })
        })
    }

    fn reset(&self, ctx: &mut dyn ResetContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        ctx.block().assign(acc.slot(0)?, Expr::null());
        Ok(())
    }

    fn add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let v = single_argument(info.name(), ctx.arguments())?.clone();
        self.emit_accumulate(ctx.block(), acc.slot(0)?, &v)
    }

    fn merge(&self, ctx: &mut dyn MergeContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let other = ctx.other().get(0)?.clone();
        self.emit_accumulate(ctx.block(), acc.slot(0)?, &other)
    }
}

impl AggImplementor for MinImpl {
    fn name(&self) -> &'static str { Mode::Min.name() }
    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> { Mode::Min.return_type(arg_types) }
    fn state_types(&self, info: &AggContext) -> Vec<DataType> { vec![info.return_type()] }
    fn implement_reset(&self, _info: &AggContext, ctx: &mut dyn ResetContext) -> Result<(), CodegenError> { Mode::Min.reset(ctx) }
    fn implement_add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError> { Mode::Min.add(info, ctx) }
    fn implement_merge(&self, _info: &AggContext, ctx: &mut dyn MergeContext) -> Result<(), CodegenError> { Mode::Min.merge(ctx) }
    fn implement_result(&self, _info: &AggContext, ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError> {
        Ok(ctx.accumulator().get(0)?.clone())
    }
}

impl AggImplementor for MaxImpl {
    fn name(&self) -> &'static str { Mode::Max.name() }
    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> { Mode::Max.return_type(arg_types) }
    fn state_types(&self, info: &AggContext) -> Vec<DataType> { vec![info.return_type()] }
    fn implement_reset(&self, _info: &AggContext, ctx: &mut dyn ResetContext) -> Result<(), CodegenError> { Mode::Max.reset(ctx) }
    fn implement_add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError> { Mode::Max.add(info, ctx) }
    fn implement_merge(&self, _info: &AggContext, ctx: &mut dyn MergeContext) -> Result<(), CodegenError> { Mode::Max.merge(ctx) }
    fn implement_result(&self, _info: &AggContext, ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError> {
        Ok(ctx.accumulator().get(0)?.clone())
    }
}

impl WinAggImplementor for MinImpl {}
impl WinAggImplementor for MaxImpl {}
