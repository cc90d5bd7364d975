use crate::{
    codegen::CodegenError,
    context::{AddContext, AggContext, MergeContext, ResetContext, ResultContext},
    expression::{BinaryOp, DataType, Expr, ExprRef},
    implementor::{AggImplementor, WinAggImplementor},
};

pub struct CountImpl;

impl AggImplementor for CountImpl {
    fn name(&self) -> &'static str { "count" }

    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
        // COUNT(*) | COUNT(expr) -> Int, non-nullable
        if arg_types.len() <= 1 {
            Ok((DataType::Int, false))
        } else {
            Err(CodegenError::FunctionArgMismatch {
                name: self.name().into(),
                expected: "COUNT(*|expr)".into(),
                got: arg_types.to_vec(),
            })
        }
    }

    fn state_types(&self, _info: &AggContext) -> Vec<DataType> { vec![DataType::Int] }

    fn implement_reset(&self, _info: &AggContext, ctx: &mut dyn ResetContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        ctx.block().assign(acc.slot(0)?, Expr::int(0));
        Ok(())
    }

    fn implement_add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let cnt = acc.slot(0)?;
        let incremented = Expr::binary(BinaryOp::Add, cnt.expr().clone(), Expr::int(1));
        let args = ctx.arguments().to_vec();
        match args.as_slice() {
            // COUNT(*)
            [] => {
                ctx.block().assign(cnt, incremented);
                Ok(())
            }
            // COUNT(expr): only non-null values count
            [v] => {
                let cond = Expr::is_not_null(v.clone());
                ctx.block().if_then(cond, |b| {
                    b.assign(cnt, incremented);
                    Ok(())
                })
            }
            _ => Err(CodegenError::ArgumentArity { name: info.name().into(), expected: info.arity(), got: args.len() }),
        }
    }

    fn implement_merge(&self, _info: &AggContext, ctx: &mut dyn MergeContext) -> Result<(), CodegenError> {
        let acc = ctx.accumulator();
        let other = ctx.other();
        let cnt = acc.slot(0)?;
        let sum = Expr::binary(BinaryOp::Add, cnt.expr().clone(), other.get(0)?.clone());
        ctx.block().assign(cnt, sum);
        Ok(())
    }

    fn implement_result(&self, _info: &AggContext, ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError> {
        Ok(ctx.accumulator().get(0)?.clone())
    }
}

impl WinAggImplementor for CountImpl {}
