//! Per-turn processing: extractor, then validator, then the final
//! prose/directive pair.
//!
//! ```text
//! raw model text
//!   → DirectiveExtractor   (prose + optional raw payload)
//!   → DirectiveValidator   (ChartDirective or Rejection)
//!   → AssistantTurn        (handed to the renderer and the transcript)
//! ```
//!
//! Nothing here fails: a missing or rejected directive only means the turn
//! has no chart.

use serde::Serialize;

use crate::config::{ConfigError, EngineConfig};
use crate::directive::{ChartDirective, DirectiveValidator, Rejection};
use crate::extractor::{DirectiveExtractor, ExtractionStrategy};

/// What happened to the directive of one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveOutcome {
    /// The text carried no payload.
    NoPayload,
    /// A payload was found and validated.
    Accepted(ExtractionStrategy),
    /// A payload was found but dropped.
    Rejected(Rejection),
}

/// Prose and optional directive for one assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantTurn {
    pub prose: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<ChartDirective>,
    #[serde(skip)]
    pub outcome: DirectiveOutcome,
}

impl AssistantTurn {
    pub fn has_chart(&self) -> bool {
        self.directive.is_some()
    }

    /// Reason the payload was dropped, if it was.
    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.outcome {
            DirectiveOutcome::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Stateless extractor + validator pair. Safe to share across threads.
#[derive(Debug, Default)]
pub struct DirectiveEngine {
    extractor: DirectiveExtractor,
    validator: DirectiveValidator,
}

impl DirectiveEngine {
    pub fn new(extractor: DirectiveExtractor, validator: DirectiveValidator) -> Self {
        Self {
            extractor,
            validator,
        }
    }

    /// Build an engine from validated configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let validator = DirectiveValidator::new()
            .with_palette(config.palette()?)
            .with_max_series_len(config.max_series_len);
        Ok(Self::new(
            DirectiveExtractor::with_locator_kind(config.locator),
            validator,
        ))
    }

    pub fn extractor(&self) -> &DirectiveExtractor {
        &self.extractor
    }

    pub fn validator(&self) -> &DirectiveValidator {
        &self.validator
    }

    /// Split `raw` into prose and an optional validated directive.
    ///
    /// On rejection the prose is the trimmed original text, payload included,
    /// so the answer is shown exactly as the model wrote it.
    pub fn process(&self, raw: &str) -> AssistantTurn {
        let extraction = self.extractor.extract(raw);
        let (Some(payload), Some(strategy)) = (extraction.raw_payload, extraction.strategy) else {
            return AssistantTurn {
                prose: extraction.prose,
                directive: None,
                outcome: DirectiveOutcome::NoPayload,
            };
        };

        match self.validator.validate(&payload) {
            Ok(directive) => {
                log::debug!(
                    "accepted {} directive with {} records",
                    directive.chart_type(),
                    directive.series().len()
                );
                AssistantTurn {
                    prose: extraction.prose,
                    directive: Some(directive),
                    outcome: DirectiveOutcome::Accepted(strategy),
                }
            }
            Err(reason) => {
                log::debug!("dropped directive payload: {}", reason);
                AssistantTurn {
                    prose: raw.trim().to_string(),
                    directive: None,
                    outcome: DirectiveOutcome::Rejected(reason),
                }
            }
        }
    }
}
