use serde::Serialize;

pub type Value = serde_json::Value;

/// Conversion used to echo call inputs into an error record.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl<T> IntoValue for T
where
    T: Serialize,
{
    fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
