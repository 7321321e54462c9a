use std::{collections::BTreeMap, sync::OnceLock};

use regex::Regex;

/// A post split into its metadata block and the remaining body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ParsedDocument {
    pub attributes: BTreeMap<String, String>,
    pub body: String,
}

impl ParsedDocument {
    /// Serializes the attributes back into a `---` delimited block followed by the body.
    #[cfg(test)]
    pub fn to_front_matter(&self) -> String {
        let mut out = String::from("---\n");
        for (key, value) in &self.attributes {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push_str("---\n");
        out.push_str(&self.body);
        out
    }
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::RegexBuilder::new(r"\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)(.*)\z")
            .dot_matches_new_line(true)
            .build()
            .unwrap()
    })
}

// a value wrapped in one pair of matching quotes loses them
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parses a pandoc/jekyll-style metadata block at the very start of `content`.
///
/// Documents without such a block come back with no attributes and the input as body.
pub(crate) fn parse(content: &str) -> ParsedDocument {
    let Some(caps) = header_pattern().captures(content) else {
        return ParsedDocument {
            attributes: BTreeMap::new(),
            body: content.to_string(),
        };
    };

    let mut attributes = BTreeMap::new();
    for line in caps[1].lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        attributes.insert(name.to_string(), unquote(value.trim()).to_string());
    }

    ParsedDocument {
        attributes,
        body: caps[2].to_string(),
    }
}
