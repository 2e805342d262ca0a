//! Leading metadata block
//!
//! A document may open with a YAML block fenced by bare `---` lines. Only a
//! fence on the first non-blank line counts; otherwise the whole input is body.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::Value;

use crate::error::{Error, Result};

const DELIMITER: &str = "---";

/// Metadata parsed from the front-matter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    entries: BTreeMap<String, String>,
}

impl FrontMatter {
    /// Look up a key, falling back to a case-insensitive match
    /// (`title` finds `Title`).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn author(&self) -> Option<&str> {
        self.get("author")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|e| Error::FrontMatterUnparsable(e.to_string()))?;

        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(Error::FrontMatterUnparsable(format!(
                    "expected a mapping, found {}",
                    describe(&other)
                )));
            }
        };

        let mut entries = BTreeMap::new();
        for (key, value) in mapping {
            let key = scalar_to_string(&key).ok_or_else(|| {
                Error::FrontMatterUnparsable(format!("unsupported key {}", describe(&key)))
            })?;
            let value = scalar_to_string(&value).ok_or_else(|| {
                Error::FrontMatterUnparsable(format!(
                    "value of `{key}` must be a scalar, found {}",
                    describe(&value)
                ))
            })?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Split off the front matter, returning it with the index of the first
/// body line.
///
/// The scan stops at the first non-blank line when it is not a delimiter, so
/// a document without front matter is never read past its opening lines.
pub fn extract_front_matter<S: AsRef<str>>(lines: &[S]) -> Result<(FrontMatter, usize)> {
    let Some(open) = lines.iter().position(|line| !line.as_ref().is_empty()) else {
        return Ok((FrontMatter::default(), 0));
    };

    if lines[open].as_ref() != DELIMITER {
        return Ok((FrontMatter::default(), 0));
    }

    let close = lines[open + 1..]
        .iter()
        .position(|line| line.as_ref() == DELIMITER)
        .map(|offset| open + 1 + offset)
        .ok_or_else(|| {
            Error::FrontMatterUnparsable(format!(
                "block opened on line {} is never closed",
                open + 1
            ))
        })?;

    let header: Vec<&str> = lines[open + 1..close]
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| !line.is_empty())
        .collect();

    let front_matter = FrontMatter::parse(&header.join("\n"))?;
    Ok((front_matter, close + 1))
}
