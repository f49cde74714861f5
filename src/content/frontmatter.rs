//! Front-matter parsing

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors produced while splitting and decoding front-matter
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file does not start with the opening `---` delimiter
    #[error("no frontmatter found")]
    MissingDelimiter,

    /// The opening delimiter is never closed
    #[error("invalid frontmatter format")]
    UnclosedDelimiter,

    /// The metadata block is not valid YAML
    #[error("error parsing frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post file
///
/// Every field is optional; missing keys default to their empty value and
/// unrecognized keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub slug: Option<String>,
}

impl FrontMatter {
    /// Split a post file into front-matter and body.
    ///
    /// The file must start with a `---` delimiter; the metadata block runs
    /// until the next occurrence of `---`. Only that first closing
    /// delimiter is consumed, so a `---` deeper in the body stays part of
    /// the body. Both segments are trimmed of surrounding whitespace.
    pub fn parse(content: &str) -> Result<(Self, &str), ParseError> {
        let rest = content
            .strip_prefix("---")
            .ok_or(ParseError::MissingDelimiter)?;

        let (meta, body) = rest
            .split_once("---")
            .ok_or(ParseError::UnclosedDelimiter)?;

        let meta = meta.trim();
        let body = body.trim();

        if meta.is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm = serde_yaml::from_str(meta)?;
        Ok((fm, body))
    }

    /// Parse the date string into a DateTime.
    ///
    /// Absent or unparseable dates yield `None`, never an error.
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Parse a date string, trying RFC 3339 first and a few naive formats after
fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(
                dt,
                *Local::now().offset(),
            ));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::from_naive_utc_and_offset(
                dt,
                *Local::now().offset(),
            ));
        }
    }

    None
}
