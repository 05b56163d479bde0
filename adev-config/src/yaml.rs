//! Shared YAML file helpers.

use std::fmt;
use std::fs;
use std::path::Path;

use adev_core::error::{AdevError, Result};
use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Read and parse a YAML file. A missing or unparsable file is a configuration error.
pub fn read_yaml_file<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| AdevError::Config(format!("unable to read '{}': {}", path.display(), e)))?;

    parse_yaml_str(&content)
        .map_err(|e| AdevError::Config(format!("unable to parse '{}': {}", path.display(), e)))
}

/// Parse YAML content, treating an empty document as the type's default.
pub fn parse_yaml_str<T: DeserializeOwned + Default>(content: &str) -> Result<T> {
    if content.trim().trim_start_matches("---").trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_yaml_ng::from_str(content)?)
}

/// Serialize a value and write it to `path`, replacing any previous content.
pub fn write_yaml_file<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let body = serde_yaml_ng::to_string(data)?;
    let content = if body.starts_with("---") {
        body
    } else {
        format!("---\n{body}")
    };
    fs::write(path, content).map_err(|e| {
        AdevError::Io(std::io::Error::new(
            e.kind(),
            format!("unable to write '{}': {}", path.display(), e),
        ))
    })
}

/// Deserialize a sequence that may be written as `key:` with no value.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize an optional scalar as its source text, so `version: 1.10`
/// stays `1.10` instead of going through a float.
pub(crate) fn optional_scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(ScalarText)
}

struct ScalarText;

impl<'de> Visitor<'de> for ScalarText {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar value")
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }
}
