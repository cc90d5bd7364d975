use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse value type carried by aggregate signatures and accumulator slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Only NULL has been seen (e.g. an untyped NULL literal)
    Null,
    Bool,
    Int,
    Float,
    String,
    /// List of values; used by collecting aggregates
    Array,
    /// Accepts any type; used for slots mirroring an argument of unknown type
    Any,
}

impl DataType {
    /// Classify a serde_json `Value` into a `DataType`.
    pub fn of_value(v: &Value) -> DataType {
        match v {
            Value::Null => DataType::Null,
            Value::Bool(_) => DataType::Bool,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    DataType::Int
                } else {
                    DataType::Float
                }
            }
            Value::String(_) => DataType::String,
            Value::Array(_) => DataType::Array,
            Value::Object(_) => DataType::Any,
        }
    }

    /// Common type of two inputs. `Int` + `Float` promote to `Float`; `Null` yields to the
    /// other side; other mismatches widen to `Any`.
    pub fn promote(a: DataType, b: DataType) -> DataType {
        use DataType::*;
        if a == b { return a; }
        match (a, b) {
            (Int, Float) | (Float, Int) => Float,
            (Null, x) | (x, Null) => x,
            _ => Any,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn of_value_classifies_numbers() {
        assert_eq!(DataType::of_value(&json!(1)), DataType::Int);
        assert_eq!(DataType::of_value(&json!(1.5)), DataType::Float);
        assert_eq!(DataType::of_value(&json!([1, 2])), DataType::Array);
        assert_eq!(DataType::of_value(&Value::Null), DataType::Null);
    }

    #[test]
    fn promote_rules() {
        assert_eq!(DataType::promote(DataType::Int, DataType::Float), DataType::Float);
        assert_eq!(DataType::promote(DataType::Null, DataType::String), DataType::String);
        assert_eq!(DataType::promote(DataType::Bool, DataType::String), DataType::Any);
        assert_eq!(DataType::promote(DataType::Int, DataType::Int), DataType::Int);
    }
}
