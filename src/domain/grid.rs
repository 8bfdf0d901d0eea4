//! Maidenhead grid square codec.
//!
//! A grid token is made of a field pair (`A`-`R`, 20°×10°), a square pair
//! (`0`-`9`, 2°×1°) and an optional subsquare pair (`A`-`X`, 5'×2.5').
//! Only the 4 and 6 character forms are accepted.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use super::errors::DomainError;
use super::models::GeoBounds;

const FIELD_LON_DEGREES: f64 = 20.0;
const FIELD_LAT_DEGREES: f64 = 10.0;
const SQUARE_LON_DEGREES: f64 = 2.0;
const SQUARE_LAT_DEGREES: f64 = 1.0;
const SUBSQUARE_LON_DEGREES: f64 = 2.0 / 24.0;
const SUBSQUARE_LAT_DEGREES: f64 = 1.0 / 24.0;

/// A validated, uppercase Maidenhead grid square.
///
/// Values can only be built through [`GridSquare::parse`] or [`FromStr`], so
/// every instance decodes to a bounding box.
///
/// # Examples
///
/// ```
/// use maidenhead_map::domain::GridSquare;
///
/// let grid = GridSquare::parse("fn20").unwrap();
/// assert_eq!(grid.as_str(), "FN20");
/// assert_eq!(grid.field(), "FN");
/// assert!(GridSquare::parse("FN2A").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridSquare(String);

impl GridSquare {
    /// Normalises `token` (trim, uppercase) and returns it if it is a valid
    /// 4 or 6 character grid square.
    pub fn parse(token: &str) -> Option<Self> {
        let normalized = token.trim().to_ascii_uppercase();
        if is_valid_normalized(normalized.as_bytes()) {
            Some(Self(normalized))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the 6 character subsquare form.
    pub fn has_subsquare(&self) -> bool {
        self.0.len() == 6
    }

    /// The two-letter field prefix, e.g. `"FN"`.
    pub fn field(&self) -> &str {
        &self.0[..2]
    }

    /// The 4 character square containing this grid square.
    pub fn square(&self) -> GridSquare {
        Self(self.0[..4].to_string())
    }

    /// Centre of the enclosing field as `(lon, lat)`.
    pub fn field_center(&self) -> (f64, f64) {
        let bytes = self.0.as_bytes();
        let lon = f64::from(bytes[0] - b'A') * FIELD_LON_DEGREES - 180.0 + FIELD_LON_DEGREES / 2.0;
        let lat = f64::from(bytes[1] - b'A') * FIELD_LAT_DEGREES - 90.0 + FIELD_LAT_DEGREES / 2.0;
        (lon, lat)
    }

    /// Decodes the square into its geographic cell.
    pub fn bounds(&self) -> GeoBounds {
        let bytes = self.0.as_bytes();

        let mut lon = f64::from(bytes[0] - b'A') * FIELD_LON_DEGREES - 180.0;
        let mut lat = f64::from(bytes[1] - b'A') * FIELD_LAT_DEGREES - 90.0;
        lon += f64::from(bytes[2] - b'0') * SQUARE_LON_DEGREES;
        lat += f64::from(bytes[3] - b'0') * SQUARE_LAT_DEGREES;

        if self.has_subsquare() {
            lon += f64::from(bytes[4] - b'A') * SUBSQUARE_LON_DEGREES;
            lat += f64::from(bytes[5] - b'A') * SUBSQUARE_LAT_DEGREES;
            GeoBounds {
                lat_min: lat,
                lat_max: lat + SUBSQUARE_LAT_DEGREES,
                lon_min: lon,
                lon_max: lon + SUBSQUARE_LON_DEGREES,
            }
        } else {
            GeoBounds {
                lat_min: lat,
                lat_max: lat + SQUARE_LAT_DEGREES,
                lon_min: lon,
                lon_max: lon + SQUARE_LON_DEGREES,
            }
        }
    }
}

impl fmt::Display for GridSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GridSquare {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::InvalidGrid(s.to_string()))
    }
}

impl TryFrom<String> for GridSquare {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GridSquare> for String {
    fn from(grid: GridSquare) -> Self {
        grid.0
    }
}

/// Returns true if `token` is a 4 or 6 character Maidenhead grid square.
///
/// The check is case-insensitive and ignores surrounding whitespace.
///
/// # Examples
///
/// ```
/// use maidenhead_map::domain::is_valid;
///
/// assert!(is_valid("FN20"));
/// assert!(is_valid("fn20xr"));
/// assert!(!is_valid("FN2"));
/// assert!(!is_valid(""));
/// ```
pub fn is_valid(token: &str) -> bool {
    let trimmed = token.trim();
    let upper: Vec<u8> = trimmed.bytes().map(|b| b.to_ascii_uppercase()).collect();
    is_valid_normalized(&upper)
}

/// Decodes `token` into its bounding box, or `None` if it is not a grid square.
///
/// # Examples
///
/// ```
/// use maidenhead_map::domain::to_bounds;
///
/// let bounds = to_bounds("FN20").unwrap();
/// assert_eq!((bounds.lat_min, bounds.lat_max), (40.0, 41.0));
/// assert_eq!((bounds.lon_min, bounds.lon_max), (-76.0, -74.0));
/// assert!(to_bounds("FN20X").is_none());
/// ```
pub fn to_bounds(token: &str) -> Option<GeoBounds> {
    GridSquare::parse(token).map(|grid| grid.bounds())
}

fn is_valid_normalized(bytes: &[u8]) -> bool {
    let base = match bytes.len() {
        4 | 6 => {
            matches!(bytes[0], b'A'..=b'R')
                && matches!(bytes[1], b'A'..=b'R')
                && bytes[2].is_ascii_digit()
                && bytes[3].is_ascii_digit()
        }
        _ => return false,
    };

    if bytes.len() == 6 {
        base && matches!(bytes[4], b'A'..=b'X') && matches!(bytes[5], b'A'..=b'X')
    } else {
        base
    }
}
