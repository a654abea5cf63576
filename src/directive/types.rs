//! Typed chart directive produced by the validator.
//!
//! A [`ChartDirective`] can only be constructed by
//! [`super::validator::DirectiveValidator`]; once built it is never mutated.
//! It serializes to the wire shape the rendering collaborator consumes:
//!
//! ```json
//! {
//!   "type": "bar",
//!   "title": "Revenue by region",
//!   "data": [{ "region": "EU", "revenue": 120 }],
//!   "xAxisKey": "region",
//!   "yAxisKey": "revenue",
//!   "colors": ["#0088FE", "#00C49F"]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use super::palette::Palette;

// ============================================================================
// ChartType
// ============================================================================

/// The four chart kinds the renderer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Area,
    Pie,
}

impl ChartType {
    /// Case-insensitive lookup of a chart type name.
    ///
    /// Surrounding whitespace is ignored; anything other than
    /// `bar`, `line`, `area` or `pie` yields `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "area" => Some(Self::Area),
            "pie" => Some(Self::Pie),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Area => "area",
            Self::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Series records
// ============================================================================

/// A single cell of a series record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Number(Number),
    Text(String),
}

impl Scalar {
    /// Convert a JSON value into a scalar, or `None` for booleans,
    /// arrays and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// One row of chart data: field name to scalar value.
///
/// Records in the same series need not share identical keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataRecord(BTreeMap<String, Scalar>);

impl DataRecord {
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Scalar)> for DataRecord {
    fn from_iter<I: IntoIterator<Item = (String, Scalar)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// ChartSpec
// ============================================================================

/// Axes for bar, line and area charts. Both keys are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartesianAxes {
    /// Field plotted along the x-axis.
    pub category_key: String,
    /// Field plotted along the y-axis.
    pub value_key: String,
}

/// Axes for pie charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieAxes {
    /// Field used to label slices, if the directive named one.
    pub label_key: Option<String>,
    /// Field holding slice sizes; `"value"` when the directive omitted it.
    pub value_key: String,
}

/// Chart kind together with the axis fields that kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartSpec {
    Bar(CartesianAxes),
    Line(CartesianAxes),
    Area(CartesianAxes),
    Pie(PieAxes),
}

impl ChartSpec {
    pub fn chart_type(&self) -> ChartType {
        match self {
            Self::Bar(_) => ChartType::Bar,
            Self::Line(_) => ChartType::Line,
            Self::Area(_) => ChartType::Area,
            Self::Pie(_) => ChartType::Pie,
        }
    }

    /// Category (x-axis or slice label) field, if any.
    pub fn category_key(&self) -> Option<&str> {
        match self {
            Self::Bar(axes) | Self::Line(axes) | Self::Area(axes) => {
                Some(axes.category_key.as_str())
            }
            Self::Pie(axes) => axes.label_key.as_deref(),
        }
    }

    /// Measured value field.
    pub fn value_key(&self) -> &str {
        match self {
            Self::Bar(axes) | Self::Line(axes) | Self::Area(axes) => axes.value_key.as_str(),
            Self::Pie(axes) => axes.value_key.as_str(),
        }
    }
}

// ============================================================================
// ChartDirective
// ============================================================================

/// A fully validated chart description, ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDirective {
    spec: ChartSpec,
    series: Vec<DataRecord>,
    title: Option<String>,
    palette: Palette,
}

impl ChartDirective {
    /// Only the validator builds directives, after every check has passed.
    pub(crate) fn new(
        spec: ChartSpec,
        series: Vec<DataRecord>,
        title: Option<String>,
        palette: Palette,
    ) -> Self {
        Self {
            spec,
            series,
            title,
            palette,
        }
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn chart_type(&self) -> ChartType {
        self.spec.chart_type()
    }

    pub fn category_key(&self) -> Option<&str> {
        self.spec.category_key()
    }

    pub fn value_key(&self) -> &str {
        self.spec.value_key()
    }

    pub fn series(&self) -> &[DataRecord] {
        &self.series
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Colour assigned to the record at `index`.
    pub fn color_for(&self, index: usize) -> &str {
        self.palette.color_for(index)
    }

    /// Each record paired with its assigned colour, in series order.
    pub fn colored_series(&self) -> impl Iterator<Item = (&DataRecord, &str)> {
        self.series
            .iter()
            .enumerate()
            .map(move |(i, record)| (record, self.palette.color_for(i)))
    }
}

/// Wire shape handed to the rendering collaborator.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderPayload<'a> {
    #[serde(rename = "type")]
    chart_type: ChartType,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    data: &'a [DataRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    x_axis_key: Option<&'a str>,
    y_axis_key: &'a str,
    colors: &'a [String],
}

impl Serialize for ChartDirective {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RenderPayload {
            chart_type: self.chart_type(),
            title: self.title(),
            data: &self.series,
            x_axis_key: self.category_key(),
            y_axis_key: self.value_key(),
            colors: self.palette.colors(),
        }
        .serialize(serializer)
    }
}
