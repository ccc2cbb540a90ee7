//! Coordinate text codec.
//!
//! The bound form input stores locations as plain text:
//!
//! - a point is `"<lat>,<lng>"`
//! - a polygon is its vertices in path order, each in point form, joined by a
//!   single space (`"1,2 3,4 5,6"`)
//!
//! Numbers are written with Rust's shortest round-trip float representation,
//! so `parse_point(&format_point(c))` reproduces `c` exactly.

use std::fmt;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range, inclusive.
pub const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
/// Valid longitude range, inclusive.
pub const LNG_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Why a piece of coordinate text was rejected.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum CoordError {
    #[error("expected `lat,lng`, got {0:?}")]
    #[diagnostic(code(mapfield::coords::malformed))]
    Malformed(String),

    #[error("coordinate component is not a finite number: {0:?}")]
    #[diagnostic(code(mapfield::coords::non_finite))]
    NonFinite(String),

    #[error("coordinate {lat},{lng} is outside the valid latitude/longitude range")]
    #[diagnostic(code(mapfield::coords::out_of_range))]
    OutOfRange { lat: f64, lng: f64 },

    #[error("polygon vertex {index} is invalid")]
    #[diagnostic(code(mapfield::coords::vertex))]
    Vertex {
        index: usize,
        #[source]
        source: Box<CoordError>,
    },
}

impl CoordError {
    /// True when the text was well-formed but the values fell outside the
    /// latitude/longitude range.
    pub fn is_out_of_range(&self) -> bool {
        match self {
            CoordError::OutOfRange { .. } => true,
            CoordError::Vertex { source, .. } => source.is_out_of_range(),
            _ => false,
        }
    }
}

/// A latitude/longitude pair in degrees.
///
/// Both components are always finite and within range; construct through
/// [`Coordinate::new`] or [`parse_point`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    /// Create a coordinate, validating finiteness and range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordError> {
        if !lat.is_finite() {
            return Err(CoordError::NonFinite(lat.to_string()));
        }
        if !lng.is_finite() {
            return Err(CoordError::NonFinite(lng.to_string()));
        }
        if !LAT_RANGE.contains(&lat) || !LNG_RANGE.contains(&lng) {
            return Err(CoordError::OutOfRange { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Construct from constants already known to be in range.
    pub(crate) const fn from_valid(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Equality within `epsilon` degrees on both axes.
    pub fn approx_eq(&self, other: &Coordinate, epsilon: f64) -> bool {
        (self.lat - other.lat).abs() <= epsilon && (self.lng - other.lng).abs() <= epsilon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_point(s)
    }
}

fn parse_component(token: &str) -> Result<f64, CoordError> {
    let token = token.trim();
    let value: f64 = token
        .parse()
        .map_err(|_| CoordError::NonFinite(token.to_string()))?;
    // `f64::from_str` accepts "inf" and "NaN".
    if !value.is_finite() {
        return Err(CoordError::NonFinite(token.to_string()));
    }
    Ok(value)
}

/// Parse `"<lat>,<lng>"` into a [`Coordinate`].
pub fn parse_point(text: &str) -> Result<Coordinate, CoordError> {
    let mut parts = text.split(',');
    let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CoordError::Malformed(text.to_string()));
    };
    Coordinate::new(parse_component(lat)?, parse_component(lng)?)
}

/// Render a coordinate as `"<lat>,<lng>"`.
pub fn format_point(coordinate: &Coordinate) -> String {
    coordinate.to_string()
}

/// Parse a space-separated vertex list.
///
/// Empty or whitespace-only text is an empty polygon, not an error.
pub fn parse_polygon(text: &str) -> Result<Vec<Coordinate>, CoordError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(' ')
        .enumerate()
        .map(|(index, token)| {
            parse_point(token.trim()).map_err(|source| CoordError::Vertex {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

/// Render vertices as `"lat,lng lat,lng ..."`. No vertices renders as `""`.
pub fn format_polygon(vertices: &[Coordinate]) -> String {
    let mut out = String::new();
    for (i, vertex) in vertices.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format_point(vertex));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("-34.397,150.644").unwrap(), c(-34.397, 150.644));
        assert_eq!(parse_point("1,2").unwrap(), c(1.0, 2.0));
        // Whitespace around the components is tolerated.
        assert_eq!(parse_point(" 1 , 2 ").unwrap(), c(1.0, 2.0));
    }

    #[test]
    fn test_parse_point_rejects_malformed() {
        assert!(matches!(parse_point(""), Err(CoordError::Malformed(_))));
        assert!(matches!(parse_point("1"), Err(CoordError::Malformed(_))));
        assert!(matches!(parse_point("1,2,3"), Err(CoordError::Malformed(_))));
        assert!(matches!(parse_point("not,valid"), Err(CoordError::NonFinite(_))));
        assert!(matches!(parse_point("1,"), Err(CoordError::NonFinite(_))));
        assert!(matches!(parse_point("NaN,2"), Err(CoordError::NonFinite(_))));
        assert!(matches!(parse_point("1,inf"), Err(CoordError::NonFinite(_))));
    }

    #[test]
    fn test_parse_point_out_of_range() {
        let err = parse_point("91,0").unwrap_err();
        assert!(err.is_out_of_range());
        assert!(parse_point("0,-180.5").unwrap_err().is_out_of_range());
        // Bounds are inclusive.
        assert_eq!(parse_point("-90,180").unwrap(), c(-90.0, 180.0));
    }

    #[test]
    fn test_format_point_native_decimal() {
        assert_eq!(format_point(&c(1.0, 2.0)), "1,2");
        assert_eq!(format_point(&c(-34.397, 150.644)), "-34.397,150.644");
        assert_eq!(
            format_point(&c(40.712775897, -74.005973)),
            "40.712775897,-74.005973"
        );
    }

    #[test]
    fn test_point_round_trip() {
        let samples = [
            c(0.0, 0.0),
            c(-89.999999, 179.123456789),
            c(12.3456789012345, -0.000001),
            c(0.1 + 0.2, 1.0 / 3.0),
        ];
        for sample in samples {
            let back = parse_point(&format_point(&sample)).unwrap();
            assert!(back.approx_eq(&sample, 1e-12), "{sample} -> {back}");
        }
    }

    #[test]
    fn test_parse_polygon() {
        assert_eq!(
            parse_polygon("1,2 3,4 5,6").unwrap(),
            vec![c(1.0, 2.0), c(3.0, 4.0), c(5.0, 6.0)]
        );
        // Boundary whitespace is trimmed.
        assert_eq!(parse_polygon(" 1,2 3,4 ").unwrap(), vec![c(1.0, 2.0), c(3.0, 4.0)]);
    }

    #[test]
    fn test_parse_polygon_empty() {
        assert_eq!(parse_polygon("").unwrap(), Vec::<Coordinate>::new());
        assert_eq!(parse_polygon("   ").unwrap(), Vec::<Coordinate>::new());
    }

    #[test]
    fn test_parse_polygon_bad_vertex() {
        match parse_polygon("1,2 oops 5,6") {
            Err(CoordError::Vertex { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected vertex error, got {other:?}"),
        }
        // A doubled separator yields an empty token.
        assert!(parse_polygon("1,2  3,4").is_err());
        assert!(parse_polygon("1,2 95,4").unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_format_polygon() {
        assert_eq!(format_polygon(&[]), "");
        assert_eq!(format_polygon(&[c(1.0, 2.0)]), "1,2");
        assert_eq!(format_polygon(&[c(1.0, 2.0), c(3.0, 4.0)]), "1,2 3,4");
    }

    #[test]
    fn test_polygon_round_trip() {
        let vertices = vec![c(51.5, -0.12), c(48.8566, 2.3522), c(52.52, 13.405), c(-1.5, 0.25)];
        assert_eq!(parse_polygon(&format_polygon(&vertices)).unwrap(), vertices);
        assert_eq!(parse_polygon(&format_polygon(&[])).unwrap(), Vec::<Coordinate>::new());
    }

    #[test]
    fn test_coordinate_serde_validates() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat":1.5,"lng":2}"#).unwrap();
        assert_eq!(ok, c(1.5, 2.0));
        assert!(serde_json::from_str::<Coordinate>(r#"{"lat":100,"lng":2}"#).is_err());
    }
}
