use crate::expression::DataType;

/// Static signature of one aggregate call. Read-only; shared by regular and
/// windowed implementors alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggContext {
    name: String,
    arg_types: Vec<DataType>,
    return_type: DataType,
    nullable: bool,
    distinct: bool,
}

impl AggContext {
    pub fn new(name: &str, arg_types: Vec<DataType>, return_type: DataType, nullable: bool, distinct: bool) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            arg_types,
            return_type,
            nullable,
            distinct,
        }
    }

    /// Canonical lowercase function name.
    pub fn name(&self) -> &str { &self.name }
    pub fn arg_types(&self) -> &[DataType] { &self.arg_types }
    pub fn arity(&self) -> usize { self.arg_types.len() }
    pub fn return_type(&self) -> DataType { self.return_type }
    pub fn is_nullable(&self) -> bool { self.nullable }
    pub fn is_distinct(&self) -> bool { self.distinct }
}
