//! Parameter values and caller-side variable binding.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::errors::BindingError;
use crate::graphql_parser::ast::ArgValue;

/// Value bound to a statement parameter.
///
/// `Variable` stays unresolved: the caller supplies the operation variables at execution
/// time (see [`bind_parameters`]).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    List(Vec<ParamValue>),
    Map(Vec<(String, ParamValue)>),
    Variable(String),
}

pub type ParameterMap = BTreeMap<String, ParamValue>;

impl From<&ArgValue> for ParamValue {
    fn from(value: &ArgValue) -> Self {
        match value {
            ArgValue::Null => ParamValue::Null,
            ArgValue::Int(i) => ParamValue::Int(*i),
            ArgValue::Float(f) => ParamValue::Float(*f),
            ArgValue::String(s) => ParamValue::String(s.clone()),
            ArgValue::Boolean(b) => ParamValue::Boolean(*b),
            // Enum values travel as their names
            ArgValue::Enum(e) => ParamValue::String(e.clone()),
            ArgValue::List(items) => ParamValue::List(items.iter().map(ParamValue::from).collect()),
            ArgValue::Object(fields) => ParamValue::Map(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), ParamValue::from(value)))
                    .collect(),
            ),
            ArgValue::Variable(name) => ParamValue::Variable(name.clone()),
        }
    }
}

impl ParamValue {
    /// Resolve into plain JSON, looking variables up in `variables` then `defaults`
    pub fn bind(
        &self,
        variables: &Map<String, Value>,
        defaults: &BTreeMap<String, ParamValue>,
    ) -> Result<Value, BindingError> {
        Ok(match self {
            ParamValue::Null => Value::Null,
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            ParamValue::String(s) => Value::String(s.clone()),
            ParamValue::Boolean(b) => Value::Bool(*b),
            ParamValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.bind(variables, defaults))
                    .collect::<Result<_, _>>()?,
            ),
            ParamValue::Map(fields) => {
                let mut map = Map::with_capacity(fields.len());
                for (key, value) in fields {
                    map.insert(key.clone(), value.bind(variables, defaults)?);
                }
                Value::Object(map)
            }
            ParamValue::Variable(name) => match variables.get(name) {
                Some(value) => value.clone(),
                None => match defaults.get(name) {
                    Some(default) => default.bind(variables, defaults)?,
                    None => {
                        return Err(BindingError::MissingVariable {
                            variable: name.clone(),
                        })
                    }
                },
            },
        })
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Null => serializer.serialize_none(),
            ParamValue::Int(i) => serializer.serialize_i64(*i),
            ParamValue::Float(f) => serializer.serialize_f64(*f),
            ParamValue::String(s) => serializer.serialize_str(s),
            ParamValue::Boolean(b) => serializer.serialize_bool(*b),
            ParamValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ParamValue::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            ParamValue::Variable(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$variable", name)?;
                map.end()
            }
        }
    }
}

/// Substitute operation variables into a parameter map
pub fn bind_parameters(
    parameters: &ParameterMap,
    variables: &Map<String, Value>,
    defaults: &BTreeMap<String, ParamValue>,
) -> Result<BTreeMap<String, Value>, BindingError> {
    parameters
        .iter()
        .map(|(name, value)| Ok((name.clone(), value.bind(variables, defaults)?)))
        .collect()
}
