//! Static parameter schemas and argument binding.

use std::fmt;

use serde_json::{json, Map, Number, Value};
use tracing::{debug, warn};

use crate::ToolDefinition;

use super::{ToolContext, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }

    /// Return `value` as this type, converting when the conversion is
    /// lossless. `None` when it cannot be represented.
    pub fn coerce(&self, value: Value) -> Option<Value> {
        match (self, value) {
            (ParamType::String, v @ Value::String(_)) => Some(v),
            (ParamType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            (ParamType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),

            (ParamType::Integer, Value::Number(n)) => {
                if n.is_i64() || n.is_u64() {
                    Some(Value::Number(n))
                } else {
                    let f = n.as_f64()?;
                    (f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .then(|| Value::Number(Number::from(f as i64)))
                }
            }
            (ParamType::Integer, Value::String(s)) => {
                s.trim().parse::<i64>().ok().map(|i| Value::Number(i.into()))
            }

            (ParamType::Number, v @ Value::Number(_)) => Some(v),
            (ParamType::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),

            (ParamType::Boolean, v @ Value::Bool(_)) => Some(v),
            (ParamType::Boolean, Value::String(s)) => match s.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },

            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// Injected from the request context; hidden from the model.
    Context,
    /// Supplied by the model and declared in its tool list.
    Model,
}

#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub source: ParamSource,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn context(name: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::String,
            source: ParamSource::Context,
            required: true,
            description: "",
        }
    }

    pub const fn model(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            source: ParamSource::Model,
            required: true,
            description,
        }
    }
}

/// Name, description and parameters of one tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl ToolSpec {
    /// The declaration shown to the model. Context parameters are left out.
    pub fn definition(&self) -> ToolDefinition {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in self.params.iter().filter(|p| p.source == ParamSource::Model) {
            properties.insert(
                param.name.to_string(),
                json!({ "type": param.ty.as_str(), "description": param.description }),
            );
            if param.required {
                required.push(Value::String(param.name.to_string()));
            }
        }

        let mut parameters = json!({ "type": "object", "properties": properties });
        if !required.is_empty() {
            parameters["required"] = Value::Array(required);
        }

        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            parameters,
        }
    }

    /// Merge context and model arguments, then check them against the
    /// schema.
    ///
    /// Context values always win over a model-supplied value for the same
    /// key. Required parameters must be present and coercible to their
    /// declared type. Keys the schema does not declare are dropped.
    pub fn bind(
        &self,
        ctx: &ToolContext,
        model_args: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ToolError> {
        let mut merged = model_args.clone();
        for (key, value) in ctx.fields() {
            if merged.get(key).is_some_and(|v| v != &value) {
                warn!(tool = self.name, key, "ignoring model-supplied value for context parameter");
            }
            merged.insert(key.to_string(), value);
        }

        let mut bound = Map::new();
        for param in &self.params {
            match merged.remove(param.name) {
                None | Some(Value::Null) => {
                    if param.required {
                        return Err(ToolError::MissingParameter(param.name.to_string()));
                    }
                }
                Some(value) => {
                    let coerced = param.ty.coerce(value).ok_or(ToolError::InvalidType {
                        name: param.name.to_string(),
                        expected: param.ty,
                    })?;
                    bound.insert(param.name.to_string(), coerced);
                }
            }
        }

        if !merged.is_empty() {
            let dropped: Vec<&str> = merged.keys().map(String::as_str).collect();
            debug!(tool = self.name, ?dropped, "dropping undeclared arguments");
        }

        Ok(bound)
    }
}
