use crate::{
    codegen::CodegenError,
    context::{AddContext, AggContext, ResetContext, ResultContext, WinAggAddContext, WinAggResetContext, WinAggResultContext, WindowFrame, WindowFrameResult},
    expression::{BinaryOp, DataType, Expr, ExprRef},
    implementor::{AggImplementor, WinAggImplementor},
};

/// LAG(expr [, offset]): value `offset` rows (default 1) before the current row.
pub struct LagImpl;

/// LEAD(expr [, offset]): value `offset` rows after the current row.
pub struct LeadImpl;

#[derive(Clone, Copy)]
enum Direction { Back, Forward }

impl Direction {
    fn name(&self) -> &'static str {
        match self {
            Direction::Back => "lag",
            Direction::Forward => "lead",
        }
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
        match arg_types {
            [t] | [t, DataType::Int] => Ok((*t, true)),
            _ => Err(CodegenError::FunctionArgMismatch {
                name: self.name().into(),
                expected: format!("{}(expr [, int])", self.name().to_ascii_uppercase()),
                got: arg_types.to_vec(),
            }),
        }
    }

    fn result(&self, info: &AggContext, ctx: &WinAggResultContext<'_>) -> Result<ExprRef, CodegenError> {
        let current = ctx.current_row().clone();
        let here = ctx.arguments_at(&current)?;
        let offset = here.get(1).cloned().unwrap_or_else(|| Expr::int(1));
        let op = match self {
            Direction::Back => BinaryOp::Sub,
            Direction::Forward => BinaryOp::Add,
        };
        let target = Expr::binary(op, current, offset);

        // The translation does not check partition membership; bound the target first.
        let in_partition = Expr::binary(
            BinaryOp::And,
            ctx.has_rows().clone(),
            Expr::binary(
                BinaryOp::And,
                Expr::binary(BinaryOp::GtEq, target.clone(), Expr::int(0)),
                Expr::binary(BinaryOp::Lt, target.clone(), ctx.partition_row_count().clone()),
            ),
        );
        let value = ctx
            .arguments_at(&target)?
            .into_iter()
            .next()
            .ok_or_else(|| CodegenError::ArgumentArity { name: info.name().into(), expected: info.arity(), got: 0 })?;
        Ok(Expr::conditional(in_partition, value, Expr::null()))
    }
}

macro_rules! offset_window_fn {
    ($ty:ident, $dir:expr) => {
        impl AggImplementor for $ty {
            fn name(&self) -> &'static str { $dir.name() }

            fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
                $dir.return_type(arg_types)
            }

            fn state_types(&self, _info: &AggContext) -> Vec<DataType> { Vec::new() }

            fn window_only(&self) -> bool { true }

            fn implement_reset(&self, info: &AggContext, _ctx: &mut dyn ResetContext) -> Result<(), CodegenError> {
                Err(CodegenError::WindowOnly(info.name().into()))
            }

            fn implement_add(&self, info: &AggContext, _ctx: &mut dyn AddContext) -> Result<(), CodegenError> {
                Err(CodegenError::WindowOnly(info.name().into()))
            }

            fn implement_result(&self, info: &AggContext, _ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError> {
                Err(CodegenError::WindowOnly(info.name().into()))
            }
        }

        impl WinAggImplementor for $ty {
            fn implement_win_reset(&self, _info: &AggContext, _ctx: &mut WinAggResetContext<'_>) -> Result<(), CodegenError> {
                Ok(())
            }

            fn implement_win_add(&self, _info: &AggContext, _ctx: &mut WinAggAddContext<'_>) -> Result<(), CodegenError> {
                Ok(())
            }

            fn implement_win_result(&self, info: &AggContext, ctx: &mut WinAggResultContext<'_>) -> Result<ExprRef, CodegenError> {
                $dir.result(info, ctx)
            }
        }
    };
}

offset_window_fn!(LagImpl, Direction::Back);
offset_window_fn!(LeadImpl, Direction::Forward);
