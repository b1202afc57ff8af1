//! Typed request builders.
//!
//! Requests are turned into a gh argv (REST) or a JSON body fed on stdin
//! (GraphQL). User-controlled values never pass through a shell or get
//! spliced into query text.

use serde_json::{Map, Value, json};
use std::fmt;

/// HTTP method for a REST call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A REST call made through `gh api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    /// HTTP method
    pub method: Method,
    /// Route relative to the API root, path segments already encoded
    pub path: String,
    /// String fields sent with `-f name=value`
    pub fields: Vec<(String, String)>,
    /// Follow pagination and emit one array element per line
    pub paginate: bool,
}

impl RestRequest {
    /// Create a request with no fields.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            fields: Vec::new(),
            paginate: false,
        }
    }

    /// GET `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// PATCH `path`.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// DELETE `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Add a raw string field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Walk every page of a list endpoint.
    #[must_use]
    pub fn paginated(mut self) -> Self {
        self.paginate = true;
        self
    }

    /// The argv passed to gh.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "api".to_string(),
            "--method".to_string(),
            self.method.to_string(),
            self.path.clone(),
        ];
        if self.paginate {
            // One compact JSON value per line regardless of page boundaries
            args.extend(["--paginate".to_string(), "--jq".to_string(), ".[]".to_string()]);
        }
        for (name, value) in &self.fields {
            args.push("-f".to_string());
            args.push(format!("{name}={value}"));
        }
        args
    }
}

/// A GraphQL operation sent as a JSON body to `gh api graphql --input -`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQlRequest {
    /// Static query or mutation text
    pub query: &'static str,
    /// Variables bound by the query
    pub variables: Map<String, Value>,
}

impl GraphQlRequest {
    /// Create a request for `query` with no variables bound yet.
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            variables: Map::new(),
        }
    }

    /// Bind a variable.
    #[must_use]
    pub fn var(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }

    /// The argv passed to gh.
    pub fn args() -> Vec<String> {
        ["api", "graphql", "--input", "-"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// The JSON document written to gh's stdin.
    pub fn body(&self) -> Vec<u8> {
        json!({ "query": self.query, "variables": self.variables })
            .to_string()
            .into_bytes()
    }
}

/// Encode one path segment of a REST route.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
