use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            other => Err(format!("unsupported method {}", other)),
        }
    }
}

/// Everything needed to issue one outbound call.
///
/// Descriptors are never mutated in place. [`RequestDescriptor::with_param`]
/// hands back a fresh copy, which is how pagination and prompted searches
/// vary a single field between calls.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub address: String,
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    #[serde(default)]
    pub form: BTreeMap<String, String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    pub fn get(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn post(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            method: Method::Post,
            ..Default::default()
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Copy of this descriptor with one parameter set. GET requests carry it in
    /// the query string, POST requests in the form body.
    pub fn with_param(&self, key: &str, value: impl Into<String>) -> Self {
        let next = self.clone();
        match self.method {
            Method::Get => next.query(key, value),
            Method::Post => next.form(key, value),
        }
    }
}

/// Splits a `KEY=VALUE` command line argument.
pub fn parse_pair(raw: &str) -> Result<(String, String)> {
    split_once(raw, '=')
}

/// Splits a `Name: value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = split_once(raw, ':')?;
    Ok((name, value.trim_start().to_string()))
}

fn split_once(raw: &str, sep: char) -> Result<(String, String)> {
    match raw.split_once(sep) {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::InvalidParam(raw.to_string())),
    }
}
