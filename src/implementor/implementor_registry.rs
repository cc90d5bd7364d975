use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::{
    codegen::CodegenError,
    context::AggContext,
    expression::DataType,
    implementor::{
        ArrayAggImpl, AvgImpl, CountImpl, FirstValueImpl, LagImpl, LastValueImpl, LeadImpl, MaxImpl, MinImpl,
        RowNumberImpl, SumImpl, WinAggImplementor,
    },
};

/// Process-wide registry with the builtin implementors.
pub static DEFAULT_REGISTRY: Lazy<ImplementorRegistry> = Lazy::new(ImplementorRegistry::default_registry);

/// Case-insensitive registry of aggregate implementors.
#[derive(Default)]
pub struct ImplementorRegistry {
    by_name: IndexMap<String, Arc<dyn WinAggImplementor>>,
}

impl ImplementorRegistry {
    pub fn new() -> Self { Self { by_name: IndexMap::new() } }

    pub fn register<I: WinAggImplementor + 'static>(&mut self, imp: I) {
        self.by_name.insert(imp.name().to_string(), Arc::new(imp));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn WinAggImplementor>> {
        self.by_name.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Registered names in registration order.
    pub fn list(&self) -> Vec<String> {
        self.by_name.keys().cloned().collect()
    }

    /// Looks up `name` and types the call, yielding its aggregate context.
    pub fn resolve(
        &self,
        name: &str,
        arg_types: &[DataType],
        distinct: bool,
    ) -> Result<(AggContext, Arc<dyn WinAggImplementor>), CodegenError> {
        let imp = self.get(name).ok_or_else(|| CodegenError::FunctionNotFound(name.to_string()))?;
        let (return_type, nullable) = imp.return_type(arg_types)?;
        let info = AggContext::new(imp.name(), arg_types.to_vec(), return_type, nullable, distinct);
        Ok((info, imp))
    }

    pub fn default_registry() -> Self {
        let mut registry = Self::new();
        registry.register(CountImpl);
        registry.register(SumImpl);
        registry.register(AvgImpl);
        registry.register(MinImpl);
        registry.register(MaxImpl);
        registry.register(ArrayAggImpl);
        registry.register(FirstValueImpl);
        registry.register(LastValueImpl);
        registry.register(LagImpl);
        registry.register(LeadImpl);
        registry.register(RowNumberImpl);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_contains_all_and_lookup_is_case_insensitive() {
        let mut names = DEFAULT_REGISTRY.list();
        names.sort();
        assert_eq!(names, vec![
            "array_agg", "avg", "count", "first_value", "lag", "last_value", "lead", "max", "min",
            "row_number", "sum",
        ]);

        assert!(DEFAULT_REGISTRY.get("COUNT").is_some());
        assert!(DEFAULT_REGISTRY.get("First_Value").is_some());
        assert!(DEFAULT_REGISTRY.get("median").is_none());
    }

    #[test]
    fn resolve_types_the_call() {
        let r = ImplementorRegistry::default_registry();

        let (info, _) = r.resolve("COUNT", &[], false).unwrap();
        assert_eq!((info.return_type(), info.is_nullable()), (DataType::Int, false));
        assert_eq!(info.name(), "count");

        let (info, _) = r.resolve("sum", &[DataType::Float], true).unwrap();
        assert_eq!((info.return_type(), info.is_nullable()), (DataType::Float, true));
        assert!(info.is_distinct());
        assert_eq!(info.arity(), 1);

        let (info, _) = r.resolve("avg", &[DataType::Int], false).unwrap();
        assert_eq!(info.return_type(), DataType::Float);

        let (info, _) = r.resolve("lag", &[DataType::String, DataType::Int], false).unwrap();
        assert_eq!(info.return_type(), DataType::String);
    }

    #[test]
    fn resolve_rejects_unknown_and_mistyped_calls() {
        let r = ImplementorRegistry::default_registry();
        assert_eq!(
            r.resolve("median", &[DataType::Int], false).err(),
            Some(CodegenError::FunctionNotFound("median".into()))
        );
        assert!(matches!(
            r.resolve("sum", &[DataType::String], false),
            Err(CodegenError::FunctionArgMismatch { .. })
        ));
        assert!(matches!(
            r.resolve("lag", &[DataType::Int, DataType::String], false),
            Err(CodegenError::FunctionArgMismatch { .. })
        ));
        assert!(matches!(
            r.resolve("row_number", &[DataType::Int], false),
            Err(CodegenError::FunctionArgMismatch { .. })
        ));
    }
}
