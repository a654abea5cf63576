//! Directive extraction: splitting raw model text into prose and an optional
//! raw directive payload.
//!
//! Strategies run in a fixed order and stop at the first hit:
//!
//! 1. **Fenced block**: the first ```` ```json ```` block. Its content is the
//!    payload and the whole block is cut from the prose.
//! 2. **Trailing object**: the candidate object found by the configured
//!    [`PayloadLocator`]. It must mention both `"type"` and `"data"`, parse as
//!    JSON, and carry non-empty `type` and `data` attributes.
//! 3. **No directive**: the trimmed input is the prose.
//!
//! Extraction is pure and never fails; a candidate that does not parse just
//! falls through to the next strategy.

pub mod fenced;
pub mod locator;

use std::ops::Range;

use serde::Serialize;
use serde_json::Value;

pub use fenced::{find_fenced_json, FencedBlock};
pub use locator::{BalancedBraceLocator, LastBraceLocator, LocatorKind, PayloadLocator};

/// Field-name tokens a trailing candidate must contain before it is parsed.
const TYPE_TOKEN: &str = "\"type\"";
const DATA_TOKEN: &str = "\"data\"";

/// Which strategy produced the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    Fenced,
    TrailingObject,
}

/// Prose plus the raw payload cut out of it, if any.
///
/// `prose` never contains the payload text. Without a payload, `prose` is the
/// trimmed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub prose: String,
    pub raw_payload: Option<String>,
    pub strategy: Option<ExtractionStrategy>,
}

impl ExtractionResult {
    fn prose_only(text: &str) -> Self {
        Self {
            prose: text.trim().to_string(),
            raw_payload: None,
            strategy: None,
        }
    }

    fn with_payload(
        text: &str,
        cut: Range<usize>,
        payload: &str,
        strategy: ExtractionStrategy,
    ) -> Self {
        Self {
            prose: excise(text, cut),
            raw_payload: Some(payload.to_string()),
            strategy: Some(strategy),
        }
    }

    pub fn has_payload(&self) -> bool {
        self.raw_payload.is_some()
    }
}

/// Splits model text into prose and an optional payload.
#[derive(Debug)]
pub struct DirectiveExtractor {
    locator: Box<dyn PayloadLocator>,
}

impl Default for DirectiveExtractor {
    fn default() -> Self {
        Self::with_locator_kind(LocatorKind::default())
    }
}

impl DirectiveExtractor {
    pub fn new(locator: impl PayloadLocator + 'static) -> Self {
        Self {
            locator: Box::new(locator),
        }
    }

    pub fn with_locator_kind(kind: LocatorKind) -> Self {
        Self {
            locator: kind.build(),
        }
    }

    pub fn locator(&self) -> &dyn PayloadLocator {
        self.locator.as_ref()
    }

    /// Run the strategies in order on `text`.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        if text.trim().is_empty() {
            return ExtractionResult::prose_only("");
        }

        if let Some(block) = find_fenced_json(text) {
            log::debug!(
                "directive payload found in fenced block ({} bytes)",
                block.content.len()
            );
            return ExtractionResult::with_payload(
                text,
                block.block.clone(),
                block.content,
                ExtractionStrategy::Fenced,
            );
        }

        if let Some(span) = self.trailing_object(text) {
            let payload = text[span.clone()].trim();
            log::debug!(
                "directive payload found by {} locator ({} bytes)",
                self.locator.name(),
                payload.len()
            );
            return ExtractionResult::with_payload(
                text,
                span,
                payload,
                ExtractionStrategy::TrailingObject,
            );
        }

        ExtractionResult::prose_only(text)
    }

    fn trailing_object(&self, text: &str) -> Option<Range<usize>> {
        let span = self.locator.locate(text)?;
        let candidate = &text[span.clone()];
        if !passes_screen(candidate) {
            return None;
        }

        match serde_json::from_str::<Value>(candidate) {
            Ok(value) if has_type_and_data(&value) => Some(span),
            Ok(_) => {
                log::debug!("trailing object lacks non-empty `type` and `data`");
                None
            }
            Err(e) => {
                log::debug!("trailing object candidate did not parse: {}", e);
                None
            }
        }
    }
}

/// Substring check that avoids parsing prose such as "the set {a, b}".
fn passes_screen(candidate: &str) -> bool {
    candidate.contains(TYPE_TOKEN) && candidate.contains(DATA_TOKEN)
}

fn has_type_and_data(value: &Value) -> bool {
    is_populated(value.get("type")) && is_populated(value.get("data"))
}

fn is_populated(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => true,
    }
}

/// Remove `cut` from `text` and trim the rest.
fn excise(text: &str, cut: Range<usize>) -> String {
    let mut rest = String::with_capacity(text.len() - cut.len());
    rest.push_str(&text[..cut.start]);
    rest.push_str(&text[cut.end..]);
    rest.trim().to_string()
}
