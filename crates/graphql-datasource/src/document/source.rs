use async_graphql_parser::types::{ServiceDocument, TypeSystemDefinition};
use async_graphql_parser::{Pos, parse_schema};
use tracing::trace;

use crate::error::SchemaError;

/// One schema fragment supplied by the caller.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Raw SDL text with an optional label used in error messages.
    Text {
        /// File path or other label; `None` for anonymous fragments.
        label: Option<String>,
        /// The SDL.
        sdl: String,
    },
    /// A document parsed elsewhere.
    Parsed(ServiceDocument),
}

impl DocumentSource {
    /// An anonymous SDL fragment.
    pub fn text(sdl: impl Into<String>) -> Self {
        Self::Text {
            label: None,
            sdl: sdl.into(),
        }
    }

    /// An SDL fragment labelled for error messages.
    pub fn labeled(label: impl Into<String>, sdl: impl Into<String>) -> Self {
        Self::Text {
            label: Some(label.into()),
            sdl: sdl.into(),
        }
    }

    /// Returns the fragment label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Text { label, .. } => label.as_deref(),
            Self::Parsed(_) => None,
        }
    }

    /// Parses the fragment. `index` names anonymous fragments in errors.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidDocument` if the SDL does not parse.
    pub fn parse(self, index: usize) -> Result<ServiceDocument, SchemaError> {
        match self {
            Self::Parsed(document) => Ok(document),
            Self::Text { sdl, .. } if sdl.trim().is_empty() => Ok(ServiceDocument {
                definitions: Vec::new(),
            }),
            Self::Text { label, sdl } => {
                let origin = label.unwrap_or_else(|| format!("fragment #{index}"));
                trace!(origin = %origin, bytes = sdl.len(), "Parsing schema fragment");
                let mut document = parse_schema(&sdl)
                    .map_err(|e| SchemaError::invalid_document(origin, e.to_string()))?;
                restore_repeatable(&sdl, &mut document);
                Ok(document)
            }
        }
    }
}

/// The parser marks every directive definition repeatable, so the keyword is
/// read back from the SDL text.
fn restore_repeatable(sdl: &str, document: &mut ServiceDocument) {
    for definition in &mut document.definitions {
        if let TypeSystemDefinition::Directive(directive) = definition {
            let start = line_offset(sdl, directive.pos);
            let name = directive.node.name.node.as_str();
            directive.node.is_repeatable = declares_repeatable(&sdl[start..], name);
        }
    }
}

/// Byte offset of the start of `pos`'s line.
fn line_offset(sdl: &str, pos: Pos) -> usize {
    sdl.split_inclusive('\n')
        .take(pos.line.saturating_sub(1))
        .map(str::len)
        .sum()
}

/// Whether the first `directive @name` in `text` carries `repeatable`.
fn declares_repeatable(text: &str, name: &str) -> bool {
    let mut tokens = Tokens { rest: text };
    let mut previous = ["", ""];
    loop {
        let Some(token) = tokens.next() else {
            return false;
        };
        if previous == ["directive", "@"] && token == name {
            break;
        }
        previous = [previous[1], token];
    }

    let mut next = tokens.next();
    if next == Some("(") {
        let mut depth = 1;
        for token in tokens.by_ref() {
            match token {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        next = tokens.next();
    }
    next == Some("repeatable")
}

/// Names and punctuators of SDL text. Strings, comments, whitespace and
/// commas are skipped.
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let text = self
                .rest
                .trim_start_matches(|c: char| c.is_whitespace() || c == ',' || c == '\u{feff}');
            if let Some(comment) = text.strip_prefix('#') {
                self.rest = comment.find('\n').map_or("", |i| &comment[i..]);
                continue;
            }
            if let Some(block) = text.strip_prefix("\"\"\"") {
                self.rest = block.find("\"\"\"").map_or("", |i| &block[i + 3..]);
                continue;
            }
            if let Some(string) = text.strip_prefix('"') {
                self.rest = skip_string(string);
                continue;
            }

            let first = text.chars().next()?;
            let len = if first.is_alphanumeric() || first == '_' {
                text.find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(text.len())
            } else {
                first.len_utf8()
            };
            let (token, rest) = text.split_at(len);
            self.rest = rest;
            return Some(token);
        }
    }
}

/// Returns the text after the closing quote of a string body.
fn skip_string(body: &str) -> &str {
    let mut escaped = false;
    for (index, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return &body[index + 1..],
            _ => {}
        }
    }
    ""
}

impl From<ServiceDocument> for DocumentSource {
    fn from(document: ServiceDocument) -> Self {
        Self::Parsed(document)
    }
}

impl From<&str> for DocumentSource {
    fn from(sdl: &str) -> Self {
        Self::text(sdl)
    }
}

impl From<String> for DocumentSource {
    fn from(sdl: String) -> Self {
        Self::text(sdl)
    }
}
