use crate::{
    codegen::CodegenError,
    context::{AddContext, AggContext, MergeContext, ResetContext, ResultContext},
    expression::{BinaryOp, DataType, Expr, ExprRef},
    implementor::{single_argument, single_type, AggImplementor, WinAggImplementor},
};

pub struct AvgImpl;

impl AggImplementor for AvgImpl {
    fn name(&self) -> &'static str { "avg" }

    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
        match single_type(self.name(), arg_types)? {
            DataType::Int | DataType::Float => Ok((DataType::Float, true)),
            other => Err(CodegenError::FunctionArgMismatch {
                name: self.name().into(),
                expected: "numeric".into(),
                got: vec![other],
            }),
        }
    }

    // [sum, count]
    fn state_types(&self, _info: &AggContext) -> Vec<DataType> { vec![DataType::Float, DataType::Int] }

    fn implement_reset(&self, _info: &AggContext, ctx: &mut dyn ResetContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        ctx.block().assign(acc.slot(0)?, Expr::float(0.0));
        ctx.block().assign(acc.slot(1)?, Expr::int(0));
        Ok(())
    }

    fn implement_add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let (sum, cnt) = (acc.slot(0)?, acc.slot(1)?);
        let v = single_argument(info.name(), ctx.arguments())?.clone();
        ctx.block().if_then(Expr::is_not_null(v.clone()), |b| {
            b.assign(sum, Expr::binary(BinaryOp::Add, sum.expr().clone(), v));
            b.assign(cnt, Expr::binary(BinaryOp::Add, cnt.expr().clone(), Expr::int(1)));
            Ok(())
        })
    }

    fn implement_merge(&self, _info: &AggContext, ctx: &mut dyn MergeContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let other = ctx.other();
        let (sum, cnt) = (acc.slot(0)?, acc.slot(1)?);
        ctx.block().assign(sum, Expr::binary(BinaryOp::Add, sum.expr().clone(), other.get(0)?.clone()));
        ctx.block().assign(cnt, Expr::binary(BinaryOp::Add, cnt.expr().clone(), other.get(1)?.clone()));
        Ok(())
    }

    fn implement_result(&self, _info: &AggContext, ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError> {
        let acc = ctx.accumulator();
        let (sum, cnt) = (acc.get(0)?.clone(), acc.get(1)?.clone());
        Ok(Expr::conditional(
            Expr::binary(BinaryOp::Eq, cnt.clone(), Expr::int(0)),
            Expr::null(),
            Expr::binary(BinaryOp::Div, sum, cnt),
        ))
    }
}

impl WinAggImplementor for AvgImpl {}
