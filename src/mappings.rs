//! Builds a few configuration-like mappings in memory and prints them.

use std::io::Write;

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::structured::type_name;

#[derive(Debug, Serialize)]
struct Settings {
    debug: bool,
    max_connections: u32,
    timeout: f64,
    features: Vec<&'static str>,
}

/// The three mappings in print order, each with its label.
pub fn build() -> Result<Vec<(&'static str, Value)>> {
    let literal = json!({
        "debug": true,
        "max_connections": 100,
        "timeout": 30.5,
        "features": ["authentication", "logging", "caching"],
    });

    let constructed = serde_json::to_value(Settings {
        debug: true,
        max_connections: 100,
        timeout: 30.5,
        features: vec!["authentication", "logging", "caching"],
    })?;

    let user = json!({"name": "Reese", "role": "admin", "active": true});

    Ok(vec![("Config", literal), ("Config Dict", constructed), ("User", user)])
}

pub fn print(out: &mut dyn Write) -> Result<()> {
    for (label, value) in build()? {
        writeln!(out, "{} Type: {}", label, type_name(&value)).map_err(Error::Output)?;
        writeln!(out, "{} Content: {}", label, value).map_err(Error::Output)?;
    }
    Ok(())
}
