//! Endpoint registry: the declarative table of URL templates and parameters.
//!
//! # Design
//! The registry is data, not code. It is read from a JSON document of the
//! form `{ "base_url": ..., "endpoints": { name: descriptor } }` and
//! validated once; afterwards it is immutable and can be shared freely. The
//! upstream API's full table ships embedded in the crate and is exposed
//! through [`Registry::builtin`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;
use crate::template::Template;

const BUILTIN_JSON: &str = include_str!("../registry/mlb.json");

static BUILTIN: LazyLock<Result<Arc<Registry>, String>> = LazyLock::new(|| {
    Registry::from_json(BUILTIN_JSON)
        .map(Arc::new)
        .map_err(|e| e.to_string())
});

/// How a single path parameter is encoded into the URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ParamSpec {
    #[serde(rename = "str")]
    Str(StrParam),
    #[serde(rename = "bool")]
    Bool(BoolParam),
}

/// A path parameter substituted as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StrParam {
    #[serde(default)]
    pub default: Option<String>,
    /// Prefix a non-empty value with `/` unless it already starts with one.
    #[serde(default)]
    pub leading_slash: bool,
    /// Suffix a non-empty value with `/` unless it already ends with one.
    #[serde(default)]
    pub trailing_slash: bool,
    #[serde(default)]
    pub required: bool,
}

/// A path parameter that selects one of two literal fragments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoolParam {
    #[serde(default)]
    pub default: Option<bool>,
    pub true_str: String,
    pub false_str: String,
    #[serde(default)]
    pub required: bool,
}

impl ParamSpec {
    pub fn is_required(&self) -> bool {
        match self {
            ParamSpec::Str(p) => p.required,
            ParamSpec::Bool(p) => p.required,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    url: String,
    #[serde(default, deserialize_with = "unique_keys")]
    path_params: BTreeMap<String, ParamSpec>,
    #[serde(default)]
    query_params: Vec<String>,
    #[serde(default)]
    required_params: Vec<Vec<String>>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRegistry {
    base_url: String,
    #[serde(deserialize_with = "unique_keys")]
    endpoints: BTreeMap<String, RawDescriptor>,
}

/// Static description of one logical endpoint.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    name: String,
    template: Template,
    path_params: BTreeMap<String, ParamSpec>,
    query_params: Vec<String>,
    required_params: Vec<Vec<String>>,
    note: Option<String>,
}

impl EndpointDescriptor {
    /// Build a descriptor, checking that template placeholders and path
    /// parameter specs correspond one to one.
    pub fn new(
        name: &str,
        url: &str,
        path_params: BTreeMap<String, ParamSpec>,
        query_params: Vec<String>,
        required_params: Vec<Vec<String>>,
        note: Option<String>,
    ) -> Result<Self, ApiError> {
        let template = Template::parse(url)
            .map_err(|e| ApiError::InvalidRegistry(format!("endpoint {name}: {e}")))?;

        for placeholder in template.placeholders() {
            if !path_params.contains_key(placeholder) {
                return Err(ApiError::InvalidRegistry(format!(
                    "endpoint {name}: placeholder {{{placeholder}}} has no path parameter spec"
                )));
            }
        }
        for param in path_params.keys() {
            if !template.placeholders().any(|p| p == param.as_str()) {
                return Err(ApiError::InvalidRegistry(format!(
                    "endpoint {name}: path parameter {param} does not appear in {url:?}"
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            template,
            path_params,
            query_params,
            required_params,
            note,
        })
    }

    fn from_raw(name: &str, raw: RawDescriptor) -> Result<Self, ApiError> {
        Self::new(
            name,
            &raw.url,
            raw.path_params,
            raw.query_params,
            raw.required_params,
            raw.note,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn path_params(&self) -> &BTreeMap<String, ParamSpec> {
        &self.path_params
    }

    pub fn path_param(&self, name: &str) -> Option<&ParamSpec> {
        self.path_params.get(name)
    }

    /// Accepted query parameter names, in query-string order.
    pub fn query_params(&self) -> &[String] {
        &self.query_params
    }

    pub fn accepts_query(&self, name: &str) -> bool {
        self.query_params.iter().any(|q| q == name)
    }

    pub fn required_params(&self) -> &[Vec<String>] {
        &self.required_params
    }

    /// Usage caveat for humans; never consulted when building requests.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// True when at least one required-parameter group is fully supplied.
    /// No groups, or a single empty group, means no constraint.
    pub fn requirements_met(&self, is_supplied: impl Fn(&str) -> bool) -> bool {
        self.unsatisfied_groups(is_supplied).is_empty()
    }

    /// The members each required-parameter group is still missing, in
    /// declaration order. Empty when some group is complete.
    pub fn unsatisfied_groups(&self, is_supplied: impl Fn(&str) -> bool) -> Vec<Vec<String>> {
        let missing: Vec<Vec<String>> = self
            .required_params
            .iter()
            .map(|group| {
                group
                    .iter()
                    .filter(|key| !is_supplied(key.as_str()))
                    .cloned()
                    .collect()
            })
            .collect();
        if missing.iter().any(Vec::is_empty) {
            Vec::new()
        } else {
            missing
        }
    }
}

/// Immutable mapping from endpoint name to descriptor.
#[derive(Debug, Clone)]
pub struct Registry {
    base_url: String,
    endpoints: BTreeMap<String, EndpointDescriptor>,
}

impl Registry {
    /// The embedded upstream registry, parsed once per process.
    pub fn builtin() -> Result<Arc<Registry>, ApiError> {
        BUILTIN
            .as_ref()
            .map(Arc::clone)
            .map_err(|e| ApiError::InvalidRegistry(e.clone()))
    }

    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        let raw: RawRegistry =
            serde_json::from_str(json).map_err(|e| ApiError::InvalidRegistry(e.to_string()))?;

        let mut endpoints = BTreeMap::new();
        for (name, descriptor) in raw.endpoints {
            let descriptor = EndpointDescriptor::from_raw(&name, descriptor)?;
            endpoints.insert(name, descriptor);
        }

        Ok(Self {
            base_url: raw.base_url,
            endpoints,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ApiError::InvalidRegistry(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn lookup(&self, name: &str) -> Result<&EndpointDescriptor, ApiError> {
        self.endpoints
            .get(name)
            .ok_or_else(|| ApiError::UnknownEndpoint(name.to_string()))
    }

    /// Default base URL that endpoint templates are relative to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.endpoints.values()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Deserialize a JSON object into a map, rejecting repeated keys instead of
/// letting the last one win.
fn unique_keys<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueKeys<V>(std::marker::PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
        type Value = BTreeMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = BTreeMap::new();
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                if map.contains_key(&key) {
                    return Err(serde::de::Error::custom(format!("duplicate key {key}")));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueKeys(std::marker::PhantomData))
}
