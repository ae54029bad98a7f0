//! Method catalog parsing
//!
//! The vendor publishes a machine-readable catalog of every API method at
//! `{docs}/{version}/docs.json`. The catalog maps group names (e.g.
//! `Storm/Server`) to their methods and each method's input parameters.
//! Lookups are case-insensitive; the published casing is kept for display.

use crate::error::{Result, StormError};
use serde_json::{Map, Value};
use std::fmt;

/// Requirement classification for a single method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamRequirement {
    /// May be omitted
    Optional,
    /// Must always be supplied
    Required,
    /// Required only when the listed conditions hold.
    ///
    /// Each condition pairs a parameter name with the value that triggers
    /// the requirement; `None` means the trigger is a null value.
    RequiredIf(Vec<(String, Option<String>)>),
}

impl fmt::Display for ParamRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamRequirement::Optional => write!(f, "Optional"),
            ParamRequirement::Required => write!(f, "Required"),
            ParamRequirement::RequiredIf(conditions) => {
                let rendered: Vec<String> = conditions
                    .iter()
                    .map(|(name, value)| match value {
                        Some(v) => format!("{} = {}", name, v),
                        None => format!("{} = NULL", name),
                    })
                    .collect();
                write!(f, "Required if: [{}]", rendered.join(" , "))
            }
        }
    }
}

/// Parsed view of the published method catalog
#[derive(Debug, Clone)]
pub struct MethodCatalog {
    groups: Map<String, Value>,
}

impl MethodCatalog {
    /// Build a catalog from a decoded `docs.json` document
    pub fn from_value(docs: Value) -> Result<Self> {
        match docs {
            Value::Object(groups) => Ok(Self { groups }),
            other => Err(StormError::MalformedResponse(format!(
                "docs catalog must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse a catalog from raw JSON text
    pub fn from_json(raw: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// List every method, grouped by catalog group, in published order
    pub fn method_names(&self) -> Vec<(String, Vec<String>)> {
        self.groups
            .iter()
            .map(|(group, spec)| {
                let methods = spec
                    .get("__methods")
                    .and_then(Value::as_object)
                    .map(|methods| methods.keys().cloned().collect())
                    .unwrap_or_default();
                (group.clone(), methods)
            })
            .collect()
    }

    /// Total number of methods across all groups
    pub fn method_count(&self) -> usize {
        self.method_names()
            .iter()
            .map(|(_, methods)| methods.len())
            .sum()
    }

    /// Parameter requirements for a method given as `group/path/name`.
    ///
    /// The last path segment is the method name, everything before it the
    /// group. Matching ignores case on both.
    pub fn params_for(&self, method: &str) -> Result<Vec<(String, ParamRequirement)>> {
        let (group, name) = split_method(method)?;

        let group_spec = self
            .lookup_insensitive(&self.groups, &group)
            .ok_or_else(|| StormError::GroupNotFound(group.clone()))?;

        let methods = group_spec
            .get("__methods")
            .and_then(Value::as_object)
            .ok_or_else(|| StormError::GroupNotFound(group.clone()))?;

        let method_spec = self
            .lookup_insensitive(methods, &name)
            .ok_or_else(|| StormError::MethodNotFound(method.to_string()))?;

        let inputs = method_spec
            .get("__input")
            .and_then(Value::as_object)
            .ok_or_else(|| StormError::NoParams(method.to_string()))?;

        if inputs.is_empty() {
            return Err(StormError::NoParams(method.to_string()));
        }

        Ok(inputs
            .iter()
            .map(|(param, spec)| (param.clone(), classify(spec)))
            .collect())
    }

    fn lookup_insensitive<'a>(&self, map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
        let wanted = key.to_lowercase();
        map.iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v)
    }
}

/// Split `a/b/c` into group `a/b` and method `c`
fn split_method(method: &str) -> Result<(String, String)> {
    match method.rsplit_once('/') {
        Some((group, name)) if !group.is_empty() && !name.is_empty() => {
            Ok((group.to_string(), name.to_string()))
        }
        _ => Err(StormError::InvalidInput(format!(
            "method must be of the form 'group/name': {}",
            method
        ))),
    }
}

fn classify(spec: &Value) -> ParamRequirement {
    if spec
        .get("optional")
        .map(|v| v == &Value::from(1) || v == &Value::Bool(true))
        .unwrap_or(false)
    {
        return ParamRequirement::Optional;
    }

    if let Some(conditions) = spec.get("required_if").and_then(Value::as_object) {
        let conditions = conditions
            .iter()
            .map(|(name, value)| {
                let rendered = match value {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                };
                (name.clone(), rendered)
            })
            .collect();
        return ParamRequirement::RequiredIf(conditions);
    }

    ParamRequirement::Required
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
