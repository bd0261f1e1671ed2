//! Naming template parsing.

use std::str::FromStr;
use std::sync::LazyLock;

use mediavault_common::{Error, Result};
use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(.+?)\}").unwrap());

/// A resolvable placeholder command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `{chars N}`
    Chars(usize),
    /// `{pick FILE}`
    Pick(String),
}

impl Placeholder {
    fn parse(body: &str) -> Result<Self> {
        let mut parts = body.split_whitespace();
        let name = parts.next().unwrap_or_default();

        match name {
            "chars" => parts
                .next()
                .and_then(|count| count.parse::<usize>().ok())
                .filter(|count| *count > 0)
                .map(Self::Chars)
                .ok_or_else(|| Error::template("invalid count for chars template")),
            "pick" => parts
                .next()
                .map(|file| Self::Pick(file.to_string()))
                .ok_or_else(|| Error::template("missing file for pick template")),
            other => Err(Error::template(format!("invalid command '{}'", other))),
        }
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A validated naming template.
///
/// ```
/// use mediavault::naming::{NameTemplate, Placeholder, Segment};
///
/// let template: NameTemplate = "img-{chars 4}".parse().unwrap();
/// assert_eq!(
///     template.segments(),
///     &[
///         Segment::Literal("img-".into()),
///         Segment::Placeholder(Placeholder::Chars(4)),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    segments: Vec<Segment>,
}

impl NameTemplate {
    /// Parse a template, validating every placeholder.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(source) {
            let (Some(whole), Some(body)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(source[last..whole.start()].to_string()));
            }
            segments.push(Segment::Placeholder(Placeholder::parse(body.as_str())?));
            last = whole.end();
        }

        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Ok(Self { segments })
    }

    /// The parsed segments in template order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of placeholders in the template.
    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder(_)))
            .count()
    }
}

impl FromStr for NameTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
