//! Front matter: the `---` delimited `key: value` block at the top of a post.
//!
//! Only a small subset of YAML is understood. Each line is one key, values
//! may be quoted, and a bracketed value is read as a list of strings.

use std::{collections::BTreeMap, sync::OnceLock};

use regex::Regex;
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(text) => Some(text),
            MetaValue::List(_) => None,
        }
    }
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: BTreeMap<String, MetaValue>,
}

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(MetaValue::as_text)
            .filter(|text| !text.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.text("subtitle")
    }

    pub fn date(&self) -> Option<&str> {
        self.text("date")
    }

    pub fn excerpt(&self) -> Option<&str> {
        self.text("excerpt")
    }

    pub fn image(&self) -> Option<&str> {
        self.text("image")
    }

    /// Tags only count when written as a list.
    pub fn tags(&self) -> Vec<String> {
        match self.get("tags") {
            Some(MetaValue::List(tags)) => tags.clone(),
            _ => Vec::new(),
        }
    }

    /// Author supplied reading time; zero or garbage means "estimate it".
    pub fn minutes(&self) -> Option<u32> {
        self.text("minutes")
            .and_then(|text| text.parse::<f64>().ok())
            .filter(|minutes| minutes.is_finite() && *minutes >= 1.0)
            .map(|minutes| minutes.round() as u32)
    }
}

fn block_pattern() -> &'static Regex {
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    BLOCK.get_or_init(|| Regex::new(r"\A---\r?\n((?s:.*?))\r?\n---\s*").unwrap())
}

/// Splits `text` into its front matter and the markdown body that follows.
/// Text without a leading block comes back whole with empty meta.
pub fn parse_front_matter(text: &str) -> (FrontMatter, &str) {
    let Some(captures) = block_pattern().captures(text) else {
        return (FrontMatter::default(), text);
    };
    let (Some(block), Some(raw)) = (captures.get(0), captures.get(1)) else {
        return (FrontMatter::default(), text);
    };

    let mut meta = FrontMatter::default();
    for line in raw.as_str().split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        meta.fields.insert(key.to_string(), parse_value(value.trim()));
    }

    (meta, &text[block.end()..])
}

fn strip_quotes(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_value(value: &str) -> MetaValue {
    let value = strip_quotes(value);
    if value.starts_with('[') && value.ends_with(']') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(value) {
            return MetaValue::List(list);
        }
        let inner = &value[1..value.len() - 1];
        let list = inner
            .split(',')
            .map(|item| item.trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace()))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return MetaValue::List(list);
    }
    MetaValue::Text(value.to_string())
}
