//! Path template resolution.
//!
//! Walks the descriptor's tokenized template once, substituting each
//! placeholder with its encoded literal. Omitted optional placeholders
//! become empty; omitted required ones fall back to their declared default
//! or fail with [`ApiError::MissingPathParameter`]. The output never
//! contains placeholder braces.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::classify::value_text;
use crate::encode;
use crate::error::ApiError;
use crate::registry::{BoolParam, EndpointDescriptor, ParamSpec, StrParam};
use crate::template::Segment;

/// Build the request path (relative to the base URL) for `descriptor`.
pub fn resolve(
    descriptor: &EndpointDescriptor,
    path_args: &BTreeMap<&str, &Value>,
) -> Result<String, ApiError> {
    let mut path = String::with_capacity(descriptor.template().as_str().len());

    for segment in descriptor.template().segments() {
        match segment {
            Segment::Literal(text) => path.push_str(text),
            Segment::Placeholder(name) => {
                let spec = descriptor.path_param(name).ok_or_else(|| {
                    ApiError::InvalidRegistry(format!(
                        "endpoint {}: placeholder {{{name}}} has no path parameter spec",
                        descriptor.name()
                    ))
                })?;
                let supplied = path_args.get(name.as_str()).map(|v| value_text(v));
                let literal = match spec {
                    ParamSpec::Str(p) => str_literal(descriptor, name, p, supplied)?,
                    ParamSpec::Bool(p) => bool_literal(descriptor, name, p, supplied)?,
                };
                path.push_str(&literal);
            }
        }
    }

    Ok(path)
}

fn str_literal(
    descriptor: &EndpointDescriptor,
    name: &str,
    spec: &StrParam,
    supplied: Option<String>,
) -> Result<String, ApiError> {
    let value = match supplied.filter(|s| !s.is_empty()) {
        Some(value) => encode::path_value(&value),
        None if spec.required => match spec.default.as_deref().filter(|d| !d.is_empty()) {
            Some(default) => default.to_string(),
            None => return Err(missing(descriptor, name)),
        },
        None => return Ok(String::new()),
    };
    Ok(pad_slashes(value, spec.leading_slash, spec.trailing_slash))
}

fn bool_literal(
    descriptor: &EndpointDescriptor,
    name: &str,
    spec: &BoolParam,
    supplied: Option<String>,
) -> Result<String, ApiError> {
    let flag = match supplied {
        Some(text) => text.eq_ignore_ascii_case("true"),
        None if spec.required => spec.default.ok_or_else(|| missing(descriptor, name))?,
        None => return Ok(String::new()),
    };
    Ok(if flag {
        spec.true_str.clone()
    } else {
        spec.false_str.clone()
    })
}

fn pad_slashes(mut value: String, leading: bool, trailing: bool) -> String {
    if value.is_empty() {
        return value;
    }
    if leading && !value.starts_with('/') {
        value.insert(0, '/');
    }
    if trailing && !value.ends_with('/') {
        value.push('/');
    }
    value
}

fn missing(descriptor: &EndpointDescriptor, name: &str) -> ApiError {
    ApiError::MissingPathParameter {
        endpoint: descriptor.name().to_string(),
        parameter: name.to_string(),
    }
}
