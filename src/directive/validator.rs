//! Directive validation and normalization.
//!
//! Turns a raw payload string into a [`ChartDirective`] or a [`Rejection`].
//! Every check is a hard precondition: nothing is guessed, and a payload that
//! fails any step never reaches the renderer.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::palette::Palette;
use super::rejection::Rejection;
use super::types::{
    CartesianAxes, ChartDirective, ChartSpec, ChartType, DataRecord, PieAxes, Scalar,
};

/// Value key used by pie charts that do not name one.
pub const PIE_DEFAULT_VALUE_KEY: &str = "value";

/// Loosely-typed view of the payload object.
///
/// Fields are kept as raw JSON so each one can be rejected with its own
/// reason instead of a generic decode error. Accepts both the renderer's
/// attribute names (`xAxisKey`, `yAxisKey`, `colors`) and their descriptive
/// aliases.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDirective {
    #[serde(rename = "type", default)]
    chart_type: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default, alias = "categoryKey")]
    x_axis_key: Option<Value>,
    #[serde(default, alias = "valueKey")]
    y_axis_key: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default, alias = "palette")]
    colors: Option<Value>,
}

/// Builds [`ChartDirective`]s from raw payload text.
#[derive(Debug, Clone, Default)]
pub struct DirectiveValidator {
    default_palette: Palette,
    max_series_len: Option<usize>,
}

impl DirectiveValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette used when the payload carries no `colors`.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.default_palette = palette;
        self
    }

    /// Reject series longer than `limit` records.
    pub fn with_max_series_len(mut self, limit: Option<usize>) -> Self {
        self.max_series_len = limit;
        self
    }

    /// Decode `payload` as JSON and validate it.
    pub fn validate(&self, payload: &str) -> Result<ChartDirective, Rejection> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| Rejection::Malformed(e.to_string()))?;
        self.validate_value(&value)
    }

    /// Validate an already-decoded payload.
    pub fn validate_value(&self, value: &Value) -> Result<ChartDirective, Rejection> {
        if !value.is_object() {
            return Err(Rejection::NotAnObject);
        }
        let raw =
            RawDirective::deserialize(value).map_err(|e| Rejection::Malformed(e.to_string()))?;

        let chart_type = decode_chart_type(raw.chart_type)?;
        let series = self.decode_series(raw.data)?;

        let category_key = optional_text(raw.x_axis_key, "xAxisKey")?;
        let value_key = optional_text(raw.y_axis_key, "yAxisKey")?;
        let title = optional_text(raw.title, "title")?;

        let spec = build_spec(chart_type, category_key, value_key)?;
        require_key_in_series(spec.value_key(), &series)?;
        if let Some(key) = spec.category_key() {
            require_key_in_series(key, &series)?;
        }

        let palette = match raw.colors {
            None | Some(Value::Null) => self.default_palette.clone(),
            Some(colors) => decode_palette(colors)?,
        };

        Ok(ChartDirective::new(spec, series, title, palette))
    }

    fn decode_series(&self, data: Option<Value>) -> Result<Vec<DataRecord>, Rejection> {
        let items = match data {
            None | Some(Value::Null) => return Err(Rejection::MissingData),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(Rejection::DataNotArray),
        };
        if items.is_empty() {
            return Err(Rejection::EmptyData);
        }
        if let Some(limit) = self.max_series_len {
            if items.len() > limit {
                return Err(Rejection::SeriesTooLong {
                    len: items.len(),
                    limit,
                });
            }
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => decode_record(index, fields),
                _ => Err(Rejection::RecordNotObject { index }),
            })
            .collect()
    }
}

fn decode_chart_type(value: Option<Value>) -> Result<ChartType, Rejection> {
    match value {
        None | Some(Value::Null) => Err(Rejection::MissingType),
        Some(Value::String(name)) => {
            ChartType::parse(&name).ok_or(Rejection::UnknownChartType(name))
        }
        Some(other) => Err(Rejection::UnknownChartType(other.to_string())),
    }
}

fn decode_record(index: usize, fields: &Map<String, Value>) -> Result<DataRecord, Rejection> {
    fields
        .iter()
        .map(|(name, value)| {
            Scalar::from_value(value)
                .map(|scalar| (name.clone(), scalar))
                .ok_or_else(|| Rejection::NonScalarField {
                    index,
                    field: name.clone(),
                })
        })
        .collect()
}

/// Blank strings count as absent, matching the renderer's own fallback.
fn optional_text(
    value: Option<Value>,
    attribute: &'static str,
) -> Result<Option<String>, Rejection> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(Rejection::InvalidAttribute(attribute)),
    }
}

fn build_spec(
    chart_type: ChartType,
    category_key: Option<String>,
    value_key: Option<String>,
) -> Result<ChartSpec, Rejection> {
    let variant: fn(CartesianAxes) -> ChartSpec = match chart_type {
        ChartType::Bar => ChartSpec::Bar,
        ChartType::Line => ChartSpec::Line,
        ChartType::Area => ChartSpec::Area,
        ChartType::Pie => {
            return Ok(ChartSpec::Pie(PieAxes {
                label_key: category_key,
                value_key: value_key.unwrap_or_else(|| PIE_DEFAULT_VALUE_KEY.to_string()),
            }));
        }
    };

    let value_key = value_key.ok_or(Rejection::MissingValueKey {
        chart_type: chart_type.as_str(),
    })?;
    let category_key = category_key.ok_or(Rejection::MissingCategoryKey {
        chart_type: chart_type.as_str(),
    })?;
    Ok(variant(CartesianAxes {
        category_key,
        value_key,
    }))
}

fn require_key_in_series(key: &str, series: &[DataRecord]) -> Result<(), Rejection> {
    if series.iter().any(|record| record.contains_key(key)) {
        Ok(())
    } else {
        Err(Rejection::KeyNotInSeries(key.to_string()))
    }
}

fn decode_palette(value: Value) -> Result<Palette, Rejection> {
    let Value::Array(items) = value else {
        return Err(Rejection::InvalidPalette);
    };
    let colors = items
        .into_iter()
        .map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(Rejection::InvalidPalette),
        })
        .collect::<Result<Vec<String>, Rejection>>()?;
    Palette::new(colors).map_err(|_| Rejection::InvalidPalette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(value: Value) -> Result<ChartDirective, Rejection> {
        DirectiveValidator::new().validate_value(&value)
    }

    #[test]
    fn test_valid_bar_directive() {
        let directive = validate(json!({
            "type": "Bar",
            "title": "Revenue",
            "data": [{"region": "EU", "revenue": 120}, {"region": "US", "revenue": 80}],
            "xAxisKey": "region",
            "yAxisKey": "revenue"
        }))
        .unwrap();

        assert_eq!(directive.chart_type(), ChartType::Bar);
        assert_eq!(directive.category_key(), Some("region"));
        assert_eq!(directive.value_key(), "revenue");
        assert_eq!(directive.title(), Some("Revenue"));
        assert_eq!(directive.series().len(), 2);
        assert_eq!(directive.palette(), &Palette::default());
    }

    #[test]
    fn test_pie_defaults_value_key() {
        let directive = validate(json!({
            "type": "pie",
            "data": [{"name": "A", "value": 10}, {"name": "B", "value": 20}]
        }))
        .unwrap();

        assert_eq!(directive.chart_type(), ChartType::Pie);
        assert_eq!(directive.value_key(), "value");
        assert_eq!(directive.category_key(), None);
    }

    #[test]
    fn test_missing_value_key_on_bar_rejected() {
        let result = validate(json!({"type": "bar", "data": [{"x": 1}]}));
        assert_eq!(result, Err(Rejection::MissingValueKey { chart_type: "bar" }));
    }

    #[test]
    fn test_missing_category_key_on_line_rejected() {
        let result = validate(json!({"type": "line", "data": [{"y": 1}], "yAxisKey": "y"}));
        assert_eq!(result, Err(Rejection::MissingCategoryKey { chart_type: "line" }));
    }

    #[test]
    fn test_descriptive_aliases_accepted() {
        let directive = validate(json!({
            "type": "area",
            "data": [{"day": "Mon", "visits": 3}],
            "categoryKey": "day",
            "valueKey": "visits",
            "palette": ["red", "blue"]
        }))
        .unwrap();

        assert_eq!(directive.chart_type(), ChartType::Area);
        assert_eq!(directive.category_key(), Some("day"));
        assert_eq!(directive.value_key(), "visits");
        assert_eq!(directive.palette().colors(), &["red".to_string(), "blue".to_string()]);
    }

    #[test]
    fn test_non_object_payloads_rejected() {
        assert_eq!(validate(json!([1, 2])), Err(Rejection::NotAnObject));
        assert_eq!(validate(json!("bar")), Err(Rejection::NotAnObject));
        assert_eq!(validate(json!(3)), Err(Rejection::NotAnObject));
    }

    #[test]
    fn test_malformed_text_rejected() {
        let result = DirectiveValidator::new().validate("{\"type\": \"bar\",");
        assert!(matches!(result, Err(Rejection::Malformed(_))));
    }

    #[test]
    fn test_unknown_chart_type_rejected() {
        let result = validate(json!({"type": "scatter", "data": [{"value": 1}]}));
        assert_eq!(result, Err(Rejection::UnknownChartType("scatter".into())));

        let result = validate(json!({"type": 7, "data": [{"value": 1}]}));
        assert_eq!(result, Err(Rejection::UnknownChartType("7".into())));
    }

    #[test]
    fn test_type_checked_before_data() {
        assert_eq!(validate(json!({"data": []})), Err(Rejection::MissingType));
    }

    #[test]
    fn test_data_shape_rejections() {
        assert_eq!(validate(json!({"type": "pie"})), Err(Rejection::MissingData));
        assert_eq!(validate(json!({"type": "pie", "data": {}})), Err(Rejection::DataNotArray));
        assert_eq!(validate(json!({"type": "pie", "data": []})), Err(Rejection::EmptyData));
        assert_eq!(
            validate(json!({"type": "pie", "data": [{"value": 1}, 2]})),
            Err(Rejection::RecordNotObject { index: 1 })
        );
        assert_eq!(
            validate(json!({"type": "pie", "data": [{"value": [1, 2]}]})),
            Err(Rejection::NonScalarField {
                index: 0,
                field: "value".into()
            })
        );
    }

    #[test]
    fn test_key_must_appear_in_some_record() {
        let result = validate(json!({
            "type": "bar",
            "data": [{"a": 1, "b": 2}],
            "xAxisKey": "a",
            "yAxisKey": "c"
        }));
        assert_eq!(result, Err(Rejection::KeyNotInSeries("c".into())));

        // Records need not share keys; presence in one is enough.
        let directive = validate(json!({
            "type": "bar",
            "data": [{"a": "x"}, {"a": "y", "b": 2}],
            "xAxisKey": "a",
            "yAxisKey": "b"
        }))
        .unwrap();
        assert_eq!(directive.series().len(), 2);
    }

    #[test]
    fn test_pie_default_key_must_exist() {
        let result = validate(json!({"type": "pie", "data": [{"name": "A", "count": 1}]}));
        assert_eq!(result, Err(Rejection::KeyNotInSeries("value".into())));
    }

    #[test]
    fn test_palette_rejections() {
        let base = |colors: Value| {
            validate(json!({"type": "pie", "data": [{"value": 1}], "colors": colors}))
        };
        assert_eq!(base(json!([])), Err(Rejection::InvalidPalette));
        assert_eq!(base(json!("red")), Err(Rejection::InvalidPalette));
        assert_eq!(base(json!(["red", 3])), Err(Rejection::InvalidPalette));
        assert!(base(json!(null)).is_ok());
    }

    #[test]
    fn test_custom_default_palette_and_limit() {
        let validator = DirectiveValidator::new()
            .with_palette(Palette::new(["#000"]).unwrap())
            .with_max_series_len(Some(2));

        let ok = validator
            .validate_value(&json!({"type": "pie", "data": [{"value": 1}]}))
            .unwrap();
        assert_eq!(ok.color_for(4), "#000");

        let too_long = validator.validate_value(&json!({
            "type": "pie",
            "data": [{"value": 1}, {"value": 2}, {"value": 3}]
        }));
        assert_eq!(too_long, Err(Rejection::SeriesTooLong { len: 3, limit: 2 }));
    }

    #[test]
    fn test_non_string_title_rejected() {
        let result = validate(json!({"type": "pie", "data": [{"value": 1}], "title": 5}));
        assert_eq!(result, Err(Rejection::InvalidAttribute("title")));
    }

    #[test]
    fn test_duplicate_aliases_rejected() {
        let result = validate(json!({
            "type": "pie",
            "data": [{"value": 1}],
            "yAxisKey": "value",
            "valueKey": "value"
        }));
        assert!(matches!(result, Err(Rejection::Malformed(_))));
    }
}
