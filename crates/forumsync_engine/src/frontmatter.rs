//! Front-matter block consumed by the static-site generator.
//!
//! Every string is written as a JSON string literal, which is also a valid
//! YAML double-quoted scalar. JSON leaves DEL and the C1 range raw while YAML
//! rejects them inside double quotes, so those are escaped as `\uXXXX` too.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub date: DateTime<Utc>,
    pub author: String,
    pub discourse: DiscourseMeta,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscourseMeta {
    pub url: String,
    pub id: u64,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrontMatterError {
    #[error("document does not start with a front-matter block")]
    Missing,
    #[error("front-matter block is not terminated")]
    Unterminated,
    #[error("malformed front-matter line: {0:?}")]
    MalformedLine(String),
    #[error("front-matter field `{0}` is missing")]
    MissingField(&'static str),
    #[error("front-matter field `{field}` is invalid: {message}")]
    InvalidField { field: &'static str, message: String },
}

impl FrontMatter {
    /// Renders the block, delimiters included, followed by a newline.
    pub fn to_block(&self) -> String {
        let date = self.date.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        format!(
            "---\n\
             title: {title}\n\
             date: {date}\n\
             author: {author}\n\
             discourse:\n  \
             url: {url}\n  \
             id: {id}\n  \
             views: {views}\n\
             tags: {tags}\n\
             categories: {categories}\n\
             ---\n",
            title = quote(&self.title),
            author = quote(&self.author),
            url = quote(&self.discourse.url),
            id = self.discourse.id,
            views = self.discourse.views,
            tags = quote_list(&self.tags),
            categories = quote_list(&self.categories),
        )
    }
}

fn quote(value: &str) -> String {
    escape_c1_controls(&Value::String(value.to_owned()).to_string())
}

fn quote_list(values: &[String]) -> String {
    escape_c1_controls(&Value::from(values.to_vec()).to_string())
}

fn escape_c1_controls(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        if ('\u{7f}'..='\u{9f}').contains(&ch) {
            out.push_str(&format!("\\u{:04x}", u32::from(ch)));
        } else {
            out.push(ch);
        }
    }
    out
}

/// Reads the front-matter block of a rendered document back into its fields.
pub fn parse_front_matter(document: &str) -> Result<FrontMatter, FrontMatterError> {
    let mut lines = document.lines();
    if lines.next() != Some("---") {
        return Err(FrontMatterError::Missing);
    }

    let mut fields = BTreeMap::new();
    let mut section: Option<&str> = None;
    let mut terminated = false;
    for line in lines {
        if line == "---" {
            terminated = true;
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let nested = line.starts_with(' ');
        let (key, value) = line
            .trim()
            .split_once(':')
            .ok_or_else(|| FrontMatterError::MalformedLine(line.to_string()))?;
        let value = value.trim();
        match (nested, section) {
            (false, _) if value.is_empty() => section = Some(key),
            (false, _) => {
                section = None;
                fields.insert(key.to_string(), value);
            }
            (true, Some(parent)) => {
                fields.insert(format!("{parent}.{key}"), value);
            }
            (true, None) => return Err(FrontMatterError::MalformedLine(line.to_string())),
        }
    }
    if !terminated {
        return Err(FrontMatterError::Unterminated);
    }

    let date_raw = field(&fields, "date")?;
    let date = DateTime::parse_from_rfc3339(date_raw)
        .map_err(|err| FrontMatterError::InvalidField {
            field: "date",
            message: err.to_string(),
        })?
        .with_timezone(&Utc);

    Ok(FrontMatter {
        title: json_field(&fields, "title")?,
        date,
        author: json_field(&fields, "author")?,
        discourse: DiscourseMeta {
            url: json_field(&fields, "discourse.url")?,
            id: json_field(&fields, "discourse.id")?,
            views: json_field(&fields, "discourse.views")?,
        },
        tags: json_field(&fields, "tags")?,
        categories: json_field(&fields, "categories")?,
    })
}

fn field<'a>(
    fields: &BTreeMap<String, &'a str>,
    name: &'static str,
) -> Result<&'a str, FrontMatterError> {
    fields
        .get(name)
        .copied()
        .ok_or(FrontMatterError::MissingField(name))
}

fn json_field<T: serde::de::DeserializeOwned>(
    fields: &BTreeMap<String, &str>,
    name: &'static str,
) -> Result<T, FrontMatterError> {
    serde_json::from_str(field(fields, name)?).map_err(|err| FrontMatterError::InvalidField {
        field: name,
        message: err.to_string(),
    })
}
