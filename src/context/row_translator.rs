use crate::{
    codegen::CodegenError,
    expression::{Expr, ExprRef},
};

/// Translates the aggregate's argument expressions to another row.
/// Supplied by the row-iteration engine.
pub trait RowTranslator {
    fn translate_arguments(&self, row: &ExprRef) -> Vec<ExprRef>;
}

impl<F> RowTranslator for F
where
    F: Fn(&ExprRef) -> Vec<ExprRef>,
{
    fn translate_arguments(&self, row: &ExprRef) -> Vec<ExprRef> {
        self(row)
    }
}

/// Translator producing `Expr::Argument` reads against the partition.
#[derive(Debug, Clone, Copy)]
pub struct PartitionArguments {
    arity: usize,
}

impl PartitionArguments {
    pub fn new(arity: usize) -> Self { Self { arity } }
}

impl RowTranslator for PartitionArguments {
    fn translate_arguments(&self, row: &ExprRef) -> Vec<ExprRef> {
        (0..self.arity).map(|i| Expr::argument(i, row.clone())).collect()
    }
}

/// Forwards to `translator` and enforces the declared arity.
pub(crate) fn translate_checked(
    name: &str,
    arity: usize,
    translator: &dyn RowTranslator,
    row: &ExprRef,
) -> Result<Vec<ExprRef>, CodegenError> {
    let args = translator.translate_arguments(row);
    if args.len() != arity {
        return Err(CodegenError::ArgumentArity { name: name.to_string(), expected: arity, got: args.len() });
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_arguments_keep_arity_for_any_row() {
        let t = PartitionArguments::new(2);
        for row in [Expr::int(0), Expr::int(-4), Expr::int(1_000)] {
            let args = translate_checked("lag", 2, &t, &row).unwrap();
            assert_eq!(args.len(), 2);
            assert_eq!(*args[1], Expr::Argument { index: 1, row: row.clone() });
        }
    }

    #[test]
    fn short_translation_is_arity_error() {
        let t = |_: &ExprRef| Vec::<ExprRef>::new();
        let err = translate_checked("sum", 1, &t, &Expr::int(0)).unwrap_err();
        assert_eq!(err, CodegenError::ArgumentArity { name: "sum".into(), expected: 1, got: 0 });
    }
}
