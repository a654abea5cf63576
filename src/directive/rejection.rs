//! Reasons a directive payload was dropped.
//!
//! A rejection is never surfaced to the end user. The prose is still shown
//! and the chart is simply omitted; these variants exist so callers and
//! tests can tell *why*.

use thiserror::Error;

/// An enumerated, non-fatal reason a payload did not become a directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Payload text is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),

    /// Payload decoded to a scalar or an array instead of an object.
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload has no `type` attribute")]
    MissingType,

    /// `type` is present but names no supported chart.
    #[error("unsupported chart type: {0}")]
    UnknownChartType(String),

    #[error("payload has no `data` attribute")]
    MissingData,

    #[error("`data` is not an array")]
    DataNotArray,

    #[error("`data` is empty")]
    EmptyData,

    #[error("`data[{index}]` is not an object")]
    RecordNotObject { index: usize },

    /// A record field holds a boolean, array or object.
    #[error("`data[{index}].{field}` is not a string, number or null")]
    NonScalarField { index: usize, field: String },

    #[error("series has {len} records, limit is {limit}")]
    SeriesTooLong { len: usize, limit: usize },

    /// A named attribute has the wrong JSON type (e.g. a numeric `title`).
    #[error("`{0}` has an invalid value")]
    InvalidAttribute(&'static str),

    #[error("{chart_type} chart requires a value key")]
    MissingValueKey { chart_type: &'static str },

    #[error("{chart_type} chart requires a category key")]
    MissingCategoryKey { chart_type: &'static str },

    /// A key named by the directive appears in none of the records.
    #[error("key `{0}` does not appear in any data record")]
    KeyNotInSeries(String),

    #[error("`colors` must be a non-empty list of strings")]
    InvalidPalette,
}
