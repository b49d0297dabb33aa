use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// Value shape of a formatting option, and with it the parsing rule applied
/// to raw convention strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    /// Closed set of literals, matched ignoring ASCII case and stored in the
    /// spelling listed here.
    Enum(&'static [&'static str]),
    Int,
    String,
}

impl ValueType {
    /// Parse a raw convention value. `None` means the value is not valid for
    /// this type and the caller should keep whatever it already had.
    pub fn parse(&self, raw: &str) -> Option<OptionValue> {
        match self {
            ValueType::Bool => {
                if raw.eq_ignore_ascii_case("true") {
                    Some(OptionValue::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Some(OptionValue::Bool(false))
                } else {
                    None
                }
            }
            ValueType::Enum(literals) => literals
                .iter()
                .find(|literal| literal.eq_ignore_ascii_case(raw))
                .map(|literal| OptionValue::Enum(*literal)),
            ValueType::Int => raw.parse::<i64>().ok().map(OptionValue::Int),
            ValueType::String => {
                if raw.is_empty() {
                    None
                } else {
                    Some(OptionValue::String(Cow::Owned(raw.to_string())))
                }
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Enum(_) => "enum",
            ValueType::Int => "int",
            ValueType::String => "string",
        }
    }
}

/// Typed value held by a [`ResolvedOptionSet`](crate::ResolvedOptionSet).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Enum(&'static str),
    Int(i64),
    String(Cow<'static, str>),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&'static str> {
        match self {
            OptionValue::Enum(literal) => Some(*literal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(value) => Some(value.as_ref()),
            OptionValue::Enum(literal) => Some(*literal),
            _ => None,
        }
    }

    /// Whether this value has the shape `value_type` describes.
    pub fn matches(&self, value_type: &ValueType) -> bool {
        match (self, value_type) {
            (OptionValue::Bool(_), ValueType::Bool) => true,
            (OptionValue::Enum(literal), ValueType::Enum(literals)) => literals.contains(literal),
            (OptionValue::Int(_), ValueType::Int) => true,
            (OptionValue::String(_), ValueType::String) => true,
            _ => false,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{value}"),
            OptionValue::Enum(literal) => f.write_str(literal),
            OptionValue::Int(value) => write!(f, "{value}"),
            OptionValue::String(value) => f.write_str(value),
        }
    }
}

/// Static description of one configurable formatting option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub name: &'static str,
    pub value_type: ValueType,
    /// Per-language options are stored under the language of the document
    /// they were resolved for.
    pub is_per_language: bool,
    /// Key looked up in convention files. Options without one cannot be
    /// configured externally.
    pub convention_key: Option<&'static str>,
    pub default: OptionValue,
}

impl OptionDescriptor {
    /// Parse `raw` according to this option's value type.
    pub fn parse(&self, raw: &str) -> Option<OptionValue> {
        self.value_type.parse(raw)
    }
}
