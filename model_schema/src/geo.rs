//! Geographic input handling
//!
//! Coordinates arrive loosely typed (numbers or numeric strings, `[lat, lng]` order) and
//! leave as PostGIS constructor calls with `lng` first. Parsed values are plain `f64`s,
//! so they are rendered inline rather than bound.

use std::fmt;

/// One raw coordinate as supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// Parse leniently: leading whitespace is skipped and the longest numeric prefix is
    /// used, so `"35.6abc"` reads as `35.6`. Non-finite results are refused.
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(n) => *n,
            Coordinate::Text(s) => parse_float_prefix(s)?,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Number(n) => write!(f, "{}", n),
            Coordinate::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate::Number(value)
    }
}

impl From<i32> for Coordinate {
    fn from(value: i32) -> Self {
        Coordinate::Number(value as f64)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_string())
    }
}

impl From<String> for Coordinate {
    fn from(value: String) -> Self {
        Coordinate::Text(value)
    }
}

/// An unvalidated `[lat, lng]` pair
#[derive(Debug, Clone, PartialEq)]
pub struct GeoInput {
    pub lat: Coordinate,
    pub lng: Coordinate,
}

impl GeoInput {
    pub fn new(lat: impl Into<Coordinate>, lng: impl Into<Coordinate>) -> Self {
        Self {
            lat: lat.into(),
            lng: lng.into(),
        }
    }
}

impl From<(f64, f64)> for GeoInput {
    fn from((lat, lng): (f64, f64)) -> Self {
        GeoInput::new(lat, lng)
    }
}

impl From<[f64; 2]> for GeoInput {
    fn from([lat, lng]: [f64; 2]) -> Self {
        GeoInput::new(lat, lng)
    }
}

impl fmt::Display for GeoInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A parsed, accepted coordinate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Validate raw input. With `reject_zero` a zero on either axis counts as invalid.
    pub(crate) fn from_input(input: &GeoInput, reject_zero: bool) -> Option<Self> {
        let lat = input.lat.parse()?;
        let lng = input.lng.parse()?;
        if reject_zero && (lat == 0.0 || lng == 0.0) {
            return None;
        }
        Some(Self { lat, lng })
    }

    fn make_point(&self) -> String {
        format!("ST_MakePoint({},{})", self.lng, self.lat)
    }
}

pub(crate) fn point_sql(point: LatLng, srid: i32) -> String {
    format!("ST_SetSRID({},{})", point.make_point(), srid)
}

pub(crate) fn polyline_sql(points: &[LatLng], srid: i32) -> String {
    let points = points
        .iter()
        .map(LatLng::make_point)
        .collect::<Vec<_>>()
        .join(",");
    format!("ST_SetSRID(ST_MakeLine(ARRAY[{}]),{})", points, srid)
}

fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
