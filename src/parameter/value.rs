use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Type tag of a [`ParameterValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    NotSet,
    Bool,
    Integer,
    Double,
    String,
    ByteArray,
    BoolArray,
    IntegerArray,
    DoubleArray,
    StringArray,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::NotSet => "not set",
            ParameterType::Bool => "bool",
            ParameterType::Integer => "integer",
            ParameterType::Double => "double",
            ParameterType::String => "string",
            ParameterType::ByteArray => "byte_array",
            ParameterType::BoolArray => "bool_array",
            ParameterType::IntegerArray => "integer_array",
            ParameterType::DoubleArray => "double_array",
            ParameterType::StringArray => "string_array",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed value carried by a parameter descriptor.
///
/// Encoding on the wire belongs to the transport; serde derives are provided so
/// any transport can pick its own format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    #[default]
    NotSet,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    ByteArray(Vec<u8>),
    BoolArray(Vec<bool>),
    IntegerArray(Vec<i64>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
}

impl ParameterValue {
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            ParameterValue::NotSet => ParameterType::NotSet,
            ParameterValue::Bool(_) => ParameterType::Bool,
            ParameterValue::Integer(_) => ParameterType::Integer,
            ParameterValue::Double(_) => ParameterType::Double,
            ParameterValue::String(_) => ParameterType::String,
            ParameterValue::ByteArray(_) => ParameterType::ByteArray,
            ParameterValue::BoolArray(_) => ParameterType::BoolArray,
            ParameterValue::IntegerArray(_) => ParameterType::IntegerArray,
            ParameterValue::DoubleArray(_) => ParameterType::DoubleArray,
            ParameterValue::StringArray(_) => ParameterType::StringArray,
        }
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

impl fmt::Display for ParameterValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ParameterValue::NotSet => f.write_str("not set"),
            ParameterValue::Bool(v) => write!(f, "{v}"),
            ParameterValue::Integer(v) => write!(f, "{v}"),
            ParameterValue::Double(v) => write!(f, "{v}"),
            ParameterValue::String(v) => f.write_str(v),
            ParameterValue::ByteArray(v) => write_list(f, v),
            ParameterValue::BoolArray(v) => write_list(f, v),
            ParameterValue::IntegerArray(v) => write_list(f, v),
            ParameterValue::DoubleArray(v) => write_list(f, v),
            ParameterValue::StringArray(v) => write_list(f, v),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Integer(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Integer(v as i64)
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Double(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::String(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        ParameterValue::String(v)
    }
}

impl From<Vec<u8>> for ParameterValue {
    fn from(v: Vec<u8>) -> Self {
        ParameterValue::ByteArray(v)
    }
}

impl From<Vec<bool>> for ParameterValue {
    fn from(v: Vec<bool>) -> Self {
        ParameterValue::BoolArray(v)
    }
}

impl From<Vec<i64>> for ParameterValue {
    fn from(v: Vec<i64>) -> Self {
        ParameterValue::IntegerArray(v)
    }
}

impl From<Vec<f64>> for ParameterValue {
    fn from(v: Vec<f64>) -> Self {
        ParameterValue::DoubleArray(v)
    }
}

impl From<Vec<String>> for ParameterValue {
    fn from(v: Vec<String>) -> Self {
        ParameterValue::StringArray(v)
    }
}

/// Parameter descriptor as it appears inside a [`super::ParameterEvent`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterMsg {
    pub name: String,
    pub value: ParameterValue,
}

impl ParameterMsg {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named, typed parameter handed to parameter callbacks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameter {
    name: String,
    value: ParameterValue,
}

macro_rules! typed_accessor {
    ($fn_name:ident, $variant:ident, $ret:ty, $expected:expr) => {
        pub fn $fn_name(&self) -> Result<$ret> {
            match &self.value {
                ParameterValue::$variant(v) => Ok(v.clone()),
                other => Err(self.type_mismatch($expected, other)),
            }
        }
    };
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn from_parameter_msg(msg: &ParameterMsg) -> Self {
        Self {
            name: msg.name.clone(),
            value: msg.value.clone(),
        }
    }

    pub fn to_parameter_msg(&self) -> ParameterMsg {
        ParameterMsg {
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ParameterValue {
        &self.value
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.value.parameter_type()
    }

    pub fn type_name(&self) -> &'static str {
        self.parameter_type().as_str()
    }

    fn type_mismatch(
        &self,
        expected: ParameterType,
        actual: &ParameterValue,
    ) -> Error {
        Error::ParameterType {
            name: self.name.clone(),
            expected: expected.as_str(),
            actual: actual.parameter_type().as_str(),
        }
    }

    typed_accessor!(as_bool, Bool, bool, ParameterType::Bool);
    typed_accessor!(as_int, Integer, i64, ParameterType::Integer);
    typed_accessor!(as_double, Double, f64, ParameterType::Double);
    typed_accessor!(as_string, String, String, ParameterType::String);
    typed_accessor!(as_byte_array, ByteArray, Vec<u8>, ParameterType::ByteArray);
    typed_accessor!(as_bool_array, BoolArray, Vec<bool>, ParameterType::BoolArray);
    typed_accessor!(as_integer_array, IntegerArray, Vec<i64>, ParameterType::IntegerArray);
    typed_accessor!(as_double_array, DoubleArray, Vec<f64>, ParameterType::DoubleArray);
    typed_accessor!(as_string_array, StringArray, Vec<String>, ParameterType::StringArray);
}

impl fmt::Display for Parameter {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
