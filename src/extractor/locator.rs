//! Locating an unfenced trailing JSON object inside prose.
//!
//! The locator only decides *where* the candidate object sits. Screening,
//! parsing and excision happen in [`super::DirectiveExtractor`], so a
//! locator can be swapped without touching the rest of the pipeline.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Strategy for finding the byte span of a trailing object candidate.
pub trait PayloadLocator: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Byte range of the candidate object, or `None` when the text holds no
    /// brace to anchor on.
    fn locate(&self, text: &str) -> Option<Range<usize>>;
}

/// Takes everything from the last `{` to the end of the text.
///
/// Fails on nested payloads, since the last `{` then belongs to an inner
/// record, and on payloads followed by trailing commentary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastBraceLocator;

impl PayloadLocator for LastBraceLocator {
    fn name(&self) -> &'static str {
        "last_brace"
    }

    fn locate(&self, text: &str) -> Option<Range<usize>> {
        text.rfind('{').map(|start| start..text.len())
    }
}

/// Finds the complete top-level `{...}` object that ends the text.
///
/// Tracks nesting depth and JSON string/escape state, so braces within
/// strings do not count. Only trailing whitespace may follow the object;
/// commentary after it defeats extraction just as it does for
/// [`LastBraceLocator`]. Each `{` is tried as a start in text order, so a
/// stray quote inside an earlier prose brace cannot hide the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedBraceLocator;

impl PayloadLocator for BalancedBraceLocator {
    fn name(&self) -> &'static str {
        "balanced"
    }

    fn locate(&self, text: &str) -> Option<Range<usize>> {
        let body = text.trim_end();
        if !body.ends_with('}') {
            return None;
        }

        body.match_indices('{')
            .map(|(start, _)| start)
            .find(|&start| object_len(&body[start..]) == Some(body.len() - start))
            .map(|start| start..body.len())
    }
}

/// Byte length of the object opening at the start of `text`, or `None` when
/// it never closes.
fn object_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Locator selection, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    #[default]
    Balanced,
    LastBrace,
}

impl LocatorKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "balanced" => Some(Self::Balanced),
            "last_brace" | "last-brace" => Some(Self::LastBrace),
            _ => None,
        }
    }

    pub fn build(self) -> Box<dyn PayloadLocator> {
        match self {
            Self::Balanced => Box::new(BalancedBraceLocator),
            Self::LastBrace => Box::new(LastBraceLocator),
        }
    }
}
