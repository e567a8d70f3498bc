use std::collections::HashMap;

use anyhow::{anyhow, Result};

/// Free text plus `key:value` metadata, as typed on the add/edit line.
#[derive(Debug, PartialEq)]
pub struct TokenizedInput {
    pub title: String,
    pub metadata: HashMap<String, String>,
}

/// Splits raw tokens into the task title and `key:value` metadata. Tokens
/// without a `key:` prefix join the title in order.
pub fn parse_args(args: &[String]) -> TokenizedInput {
    let mut title_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        title_parts.push(arg.as_str());
    }

    TokenizedInput {
        title: title_parts.join(" "),
        metadata,
    }
}

/// Expands an abbreviated metadata key to its full form when the prefix is
/// unambiguous among `candidates`.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}
