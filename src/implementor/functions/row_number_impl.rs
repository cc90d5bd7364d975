use crate::{
    codegen::CodegenError,
    context::{AddContext, AggContext, ResetContext, ResultContext, WinAggAddContext, WinAggResetContext, WinAggResultContext, WindowFrame},
    expression::{BinaryOp, DataType, Expr, ExprRef},
    implementor::{AggImplementor, WinAggImplementor},
};

/// ROW_NUMBER(): 1-based position of the current row in its partition.
pub struct RowNumberImpl;

impl AggImplementor for RowNumberImpl {
    fn name(&self) -> &'static str { "row_number" }

    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError> {
        if arg_types.is_empty() {
            Ok((DataType::Int, false))
        } else {
            Err(CodegenError::FunctionArgMismatch {
                name: self.name().into(),
                expected: "ROW_NUMBER()".into(),
                got: arg_types.to_vec(),
            })
        }
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

impl WinAggImplementor for RowNumberImpl {
    fn implement_win_reset(&self, _info: &AggContext, _ctx: &mut WinAggResetContext<'_>) -> Result<(), CodegenError> {
        Ok(())
    }

    fn implement_win_add(&self, _info: &AggContext, _ctx: &mut WinAggAddContext<'_>) -> Result<(), CodegenError> {
        Ok(())
    }

    fn implement_win_result(&self, _info: &AggContext, ctx: &mut WinAggResultContext<'_>) -> Result<ExprRef, CodegenError> {
        Ok(Expr::binary(BinaryOp::Add, ctx.current_row().clone(), Expr::int(1)))
    }
}
