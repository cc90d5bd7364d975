use crate::{
    codegen::CodegenError,
    context::{
        AddContext, AggContext, MergeContext, ResetContext, ResultContext, WinAggAddContext, WinAggResetContext,
        WinAggResultContext,
    },
    expression::{DataType, ExprRef},
};

/// Code generator for one aggregate function.
/// One instance is registered per function name; it is stateless and shared.
///
/// The engine drives each evaluation unit through
/// `reset -> add* -> merge? -> result*`; `result` may be requested again
/// without a new reset, so it must not write accumulator state.
pub trait AggImplementor: Send + Sync {
    /// Canonical lowercase function name ("count", "sum", ...).
    fn name(&self) -> &'static str;

    /// Return type and nullability for the given argument types.
    fn return_type(&self, arg_types: &[DataType]) -> Result<(DataType, bool), CodegenError>;

    /// Accumulator layout; one slot per entry, fixed for the unit's lifetime.
    fn state_types(&self, info: &AggContext) -> Vec<DataType>;

    /// True for functions that only make sense over a window frame.
    fn window_only(&self) -> bool { false }

    fn implement_reset(&self, info: &AggContext, ctx: &mut dyn ResetContext) -> Result<(), CodegenError>;

    fn implement_add(&self, info: &AggContext, ctx: &mut dyn AddContext) -> Result<(), CodegenError>;

    fn implement_merge(&self, info: &AggContext, _ctx: &mut dyn MergeContext) -> Result<(), CodegenError> {
        Err(CodegenError::Unsupported { name: info.name().to_string(), phase: "merge" })
    }

    /// Expression yielding the aggregate's value.
    fn implement_result(&self, info: &AggContext, ctx: &mut dyn ResultContext) -> Result<ExprRef, CodegenError>;
}

/// Windowed flavour of [`AggImplementor`]. The defaults hand the windowed
/// context to the regular phase, so aggregates that ignore the frame need no
/// extra code.
pub trait WinAggImplementor: AggImplementor {
    fn implement_win_reset(&self, info: &AggContext, ctx: &mut WinAggResetContext<'_>) -> Result<(), CodegenError> {
        self.implement_reset(info, ctx)
    }

    fn implement_win_add(&self, info: &AggContext, ctx: &mut WinAggAddContext<'_>) -> Result<(), CodegenError> {
        self.implement_add(info, ctx)
    }

    fn implement_win_result(&self, info: &AggContext, ctx: &mut WinAggResultContext<'_>) -> Result<ExprRef, CodegenError> {
        self.implement_result(info, ctx)
    }
}

/// `[arg]` or an arity error in the style of the function's signature.
pub(crate) fn single_argument<'a>(name: &str, args: &'a [ExprRef]) -> Result<&'a ExprRef, CodegenError> {
    match args {
        [v] => Ok(v),
        _ => Err(CodegenError::ArgumentArity { name: name.to_string(), expected: 1, got: args.len() }),
    }
}

pub(crate) fn single_type(name: &str, arg_types: &[DataType]) -> Result<DataType, CodegenError> {
    match arg_types {
        [t] => Ok(*t),
        _ => Err(CodegenError::FunctionArgMismatch {
            name: name.to_string(),
            expected: format!("{}(expr)", name.to_ascii_uppercase()),
            got: arg_types.to_vec(),
        }),
    }
}
