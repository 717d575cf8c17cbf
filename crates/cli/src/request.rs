use std::{fs, io::Read, path::Path};

use anyhow::{Context, Result, bail};
use serde_json::{Map as JsonMap, Value};

/// Read a request from `path`, or from stdin when no path is given.
pub fn read_request(path: Option<&Path>) -> Result<JsonMap<String, Value>> {
    let content = match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("read request {}", path.display()))?,
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content).context("read request from stdin")?;
            content
        }
    };
    parse_request(&content)
}

/// Parse a request document. JSON is tried first; anything else is read as YAML.
pub fn parse_request(content: &str) -> Result<JsonMap<String, Value>> {
    if content.trim().is_empty() {
        return Ok(JsonMap::new());
    }
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(json_error) => serde_yaml::from_str(content)
            .with_context(|| format!("request is neither JSON ({json_error}) nor YAML"))?,
    };
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(JsonMap::new()),
        other => bail!("request must be a mapping of attribute names to values, got {other}"),
    }
}

/// Load a store fixture file.
pub fn read_fixture(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).with_context(|| format!("read fixture {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse fixture {}", path.display()))
}
