use plotters::style::RGBColor;
use serde_json::{Map, Value};

use crate::error::ChartError;

use super::buckets::MAX_BUCKETS;
use super::color::parse_color;
use super::limits::check_plottable;

const DEFAULT_BUCKETS: i64 = 7;
const DEFAULT_BAR_COLOR: &str = "m";
const DEFAULT_HORIZONTAL_COLOR: &str = "r";

/// Which pipeline a request body is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    DateBar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartRequest {
    Bar(BarRequest),
    DateBar(DateBarRequest),
}

/// Categorical bar chart: one bar per `(xdata[i], ydata[i])` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRequest {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub grid: bool,
    pub color: RGBColor,
    pub xdata: Vec<String>,
    pub ydata: Vec<f64>,
}

impl BarRequest {
    /// Pairs labels with values; extra entries on the longer side are ignored.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.xdata
            .iter()
            .map(String::as_str)
            .zip(self.ydata.iter().copied())
    }
}

/// One submitted `{x, y}` entry, timestamp still unparsed.
#[derive(Debug, Clone, PartialEq)]
pub struct DatePoint {
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateBarRequest {
    pub data: Vec<DatePoint>,
    pub buckets: i64,
    pub style: DateBarStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateBarStyle {
    pub color: RGBColor,
    pub horizontal_color: RGBColor,
    /// Threshold line height; values `<= 0` draw no line.
    pub horizontal: f64,
}

impl DateBarStyle {
    #[must_use]
    pub fn threshold(&self) -> Option<f64> {
        (self.horizontal > 0.0).then_some(self.horizontal)
    }
}

/// Decodes and validates a request body for the given chart kind.
///
/// # Errors
///
/// Returns [`ChartError::MalformedRequest`] when the body is not UTF-8 JSON,
/// [`ChartError::InvalidShape`] when the JSON does not match the expected
/// object, and [`ChartError::InvalidBucketCount`] for an out-of-range
/// `buckets` value.
pub fn parse_request(kind: ChartKind, body: &[u8]) -> Result<ChartRequest, ChartError> {
    let text = std::str::from_utf8(body)
        .map_err(|err| ChartError::malformed(format!("body is not UTF-8: {}", err)))?;
    let value: Value = serde_json::from_str(text)
        .map_err(|err| ChartError::malformed(format!("body is not valid JSON: {}", err)))?;
    let Value::Object(object) = value else {
        return Err(ChartError::shape("top-level JSON value must be an object"));
    };

    match kind {
        ChartKind::Bar => parse_bar(&object).map(ChartRequest::Bar),
        ChartKind::DateBar => parse_date_bar(&object).map(ChartRequest::DateBar),
    }
}

fn parse_bar(object: &Map<String, Value>) -> Result<BarRequest, ChartError> {
    let xdata = required_array(object, "xdata")?
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::String(label) => Ok(label.clone()),
            Value::Number(number) => Ok(number.to_string()),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(
                ChartError::shape(format!("xdata[{}] must be a string or a number", index)),
            ),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let ydata = required_array(object, "ydata")?
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .as_f64()
                .ok_or_else(|| ChartError::shape(format!("ydata[{}] must be a number", index)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let request = BarRequest {
        title: string_field(object, "title")?.unwrap_or_default(),
        xlabel: string_field(object, "xlabel")?.unwrap_or_default(),
        ylabel: string_field(object, "ylabel")?.unwrap_or_default(),
        grid: bool_field(object, "grid")?.unwrap_or(true),
        color: color_field(object, "color", DEFAULT_BAR_COLOR)?,
        xdata,
        ydata,
    };
    check_plottable(request.pairs().map(|(_, value)| value), "ydata")?;
    Ok(request)
}

fn parse_date_bar(object: &Map<String, Value>) -> Result<DateBarRequest, ChartError> {
    let data = match field(object, "data") {
        None => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_date_point(index, entry))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(ChartError::shape("data must be an array")),
    };

    let buckets = match field(object, "buckets") {
        None => DEFAULT_BUCKETS,
        Some(value) => value
            .as_i64()
            .ok_or_else(|| ChartError::shape("buckets must be an integer"))?,
    };
    if buckets > MAX_BUCKETS {
        return Err(ChartError::InvalidBucketCount {
            value: buckets,
            max: MAX_BUCKETS,
        });
    }

    let horizontal = match field(object, "horizontal") {
        None => 0.0,
        Some(value) => value
            .as_f64()
            .ok_or_else(|| ChartError::shape("horizontal must be a number"))?,
    };

    Ok(DateBarRequest {
        data,
        buckets,
        style: DateBarStyle {
            color: color_field(object, "color", DEFAULT_BAR_COLOR)?,
            horizontal_color: color_field(object, "horizontal_color", DEFAULT_HORIZONTAL_COLOR)?,
            horizontal,
        },
    })
}

fn parse_date_point(index: usize, entry: &Value) -> Result<DatePoint, ChartError> {
    let Value::Object(point) = entry else {
        return Err(ChartError::shape(format!("data[{}] must be an object", index)));
    };
    let x = match point.get("x") {
        Some(Value::String(x)) => x.clone(),
        _ => {
            return Err(ChartError::shape(format!(
                "data[{}].x must be a date-time string",
                index
            )));
        }
    };
    let y = point
        .get("y")
        .and_then(Value::as_f64)
        .ok_or_else(|| ChartError::shape(format!("data[{}].y must be a number", index)))?;
    Ok(DatePoint { x, y })
}

/// Looks up an optional field; an explicit `null` counts as absent.
fn field<'obj>(object: &'obj Map<String, Value>, key: &str) -> Option<&'obj Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn required_array<'obj>(
    object: &'obj Map<String, Value>,
    key: &'static str,
) -> Result<&'obj Vec<Value>, ChartError> {
    match object.get(key) {
        Some(Value::Array(values)) => Ok(values),
        Some(_) => Err(ChartError::shape(format!("{} must be an array", key))),
        None => Err(ChartError::shape(format!("missing required field '{}'", key))),
    }
}

fn string_field(
    object: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, ChartError> {
    match field(object, key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ChartError::shape(format!("{} must be a string", key))),
    }
}

fn bool_field(
    object: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<bool>, ChartError> {
    match field(object, key) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(ChartError::shape(format!("{} must be a boolean", key))),
    }
}

fn color_field(
    object: &Map<String, Value>,
    key: &'static str,
    default: &str,
) -> Result<RGBColor, ChartError> {
    let value = string_field(object, key)?;
    parse_color(value.as_deref().unwrap_or(default))
        .map_err(|err| ChartError::shape(format!("{}: {}", key, err)))
}
