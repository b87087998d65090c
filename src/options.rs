//! Pipeline configuration.
//!
//! Everything here deserialises from the camelCase JSON accepted by
//! `--config`; missing keys take their defaults.
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

// ————————————————————————————————————————————————————————————————————————————
// VALUES
// ————————————————————————————————————————————————————————————————————————————

/// A user-supplied value for the generated code: either a constant, or the
/// name of something already in scope there (emitted verbatim).
///
/// In JSON a reference is written `{"ref": "name"}`; anything else is a
/// literal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ArgRepr<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub enum Arg<T> {
    Literal(T),
    Reference(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArgRepr<T> {
    Reference {
        #[serde(rename = "ref")]
        name: String,
    },
    Literal(T),
}

impl<T> From<ArgRepr<T>> for Arg<T> {
    fn from(repr: ArgRepr<T>) -> Self {
        match repr {
            ArgRepr::Reference { name } => Arg::Reference(name),
            ArgRepr::Literal(value) => Arg::Literal(value),
        }
    }
}

impl<T> Arg<T> {
    pub fn reference(name: impl Into<String>) -> Self {
        Arg::Reference(name.into())
    }
}

impl From<&str> for Arg<String> {
    fn from(value: &str) -> Self {
        Arg::Literal(value.to_string())
    }
}

/// `(key, value)` for headers, cookies and parameters.
pub type Pair = (Arg<String>, Arg<String>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl HttpMethod {
    /// Name of the request call in the generated chain.
    pub fn call_name(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Patch => "patch",
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// OPTIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestSpecification {
    pub accept: Option<Arg<String>>,
    pub body: Option<Arg<String>>,
    pub content_type: Option<Arg<String>>,
    pub port: Option<Arg<u16>>,
    pub method: Option<HttpMethod>,
    pub url: Option<Arg<String>>,
    #[serde(deserialize_with = "pairs")]
    pub cookies: Vec<Pair>,
    #[serde(deserialize_with = "pairs")]
    pub headers: Vec<Pair>,
    #[serde(deserialize_with = "pairs")]
    pub params: Vec<Pair>,
    #[serde(deserialize_with = "pairs")]
    pub query_params: Vec<Pair>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformerOptions {
    /// Fold an array's scalar children into one ordered check.
    pub simplify_arrays: bool,
    /// Assert that childless objects and arrays are empty.
    pub check_empty_containers: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorOptions {
    pub status_code: Option<u16>,
    /// One clause per indented line; `false` emits a single line.
    pub format: bool,
    /// Prepend the static imports the generated chain needs.
    pub include_dependencies: bool,
    pub request: RequestSpecification,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            status_code: None,
            format: true,
            include_dependencies: false,
            request: RequestSpecification::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(alias = "transformerOptions")]
    pub transformer: TransformerOptions,
    #[serde(alias = "generatorOptions")]
    pub generator: GeneratorOptions,
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Pairs may be written as `[[k, v], ...]` or, when every key is a literal,
/// as an object.
fn pairs<'de, D>(deserializer: D) -> Result<Vec<Pair>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PairsRepr {
        List(Vec<Pair>),
        Map(IndexMap<String, Arg<String>>),
    }

    Ok(match PairsRepr::deserialize(deserializer)? {
        PairsRepr::List(list) => list,
        PairsRepr::Map(map) => map
            .into_iter()
            .map(|(key, value)| (Arg::Literal(key), value))
            .collect(),
    })
}
