//! # Analyst Directives
//!
//! Splits the text an AI data assistant returns into human-readable prose and
//! an optional, validated chart directive.
//!
//! Model output is mixed prose and Markdown that may embed one JSON object
//! describing a chart, either in a ```` ```json ```` fence or as a raw
//! trailing object. The [`DirectiveEngine`] isolates that object, validates it
//! into a strongly-typed [`ChartDirective`], and degrades to "no chart" on any
//! problem, so the prose is always shown.
//!
//! ```
//! use analyst_directives::{ChartType, DirectiveEngine};
//!
//! let engine = DirectiveEngine::default();
//! let turn = engine.process(
//!     "Revenue by region:\n```json\n{\"type\": \"bar\", \"data\": [{\"region\": \"EU\", \"revenue\": 120}], \"xAxisKey\": \"region\", \"yAxisKey\": \"revenue\"}\n```",
//! );
//! assert_eq!(turn.prose, "Revenue by region:");
//! assert_eq!(turn.directive.unwrap().chart_type(), ChartType::Bar);
//! ```

pub mod config;
pub mod directive;
pub mod extractor;
pub mod pipeline;
pub mod transcript;

pub use config::{ConfigError, EngineConfig};
pub use directive::{ChartDirective, ChartSpec, ChartType, DirectiveValidator, Palette, Rejection};
pub use extractor::{
    DirectiveExtractor, ExtractionResult, ExtractionStrategy, LocatorKind, PayloadLocator,
};
pub use pipeline::{AssistantTurn, DirectiveEngine, DirectiveOutcome};
pub use transcript::{HistoryRecord, Transcript, TranscriptEntry, TranscriptError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
