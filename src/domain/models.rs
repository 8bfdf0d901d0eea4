use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use super::errors::DomainError;
use super::grid::GridSquare;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBounds {
    /// Returns the centroid as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    pub fn contains(&self, other: &GeoBounds) -> bool {
        self.lat_min <= other.lat_min
            && other.lat_max <= self.lat_max
            && self.lon_min <= other.lon_min
            && other.lon_max <= self.lon_max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Band(String);

impl Band {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continent {
    NorthAmerica,
    SouthAmerica,
    Europe,
    Africa,
    Asia,
    Oceania,
    Other,
}

impl Continent {
    /// The continents that can be requested explicitly; `Other` is only ever assigned.
    pub const SELECTABLE: [Continent; 6] = [
        Continent::NorthAmerica,
        Continent::SouthAmerica,
        Continent::Europe,
        Continent::Africa,
        Continent::Asia,
        Continent::Oceania,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::NorthAmerica => "north_america",
            Continent::SouthAmerica => "south_america",
            Continent::Europe => "europe",
            Continent::Africa => "africa",
            Continent::Asia => "asia",
            Continent::Oceania => "oceania",
            Continent::Other => "other",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Continent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::SELECTABLE
            .into_iter()
            .chain(std::iter::once(Continent::Other))
            .find(|c| c.as_str() == name)
            .ok_or_else(|| DomainError::UnknownContinent(s.to_string()))
    }
}

pub type ContinentSelection = BTreeSet<Continent>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub band: Band,
    pub grid: GridSquare,
}

impl ContactRecord {
    pub fn new(band: Band, grid: GridSquare) -> Self {
        Self { band, grid }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLog {
    pub callsign: String,
    pub records: Vec<ContactRecord>,
}

impl Default for ParsedLog {
    fn default() -> Self {
        Self {
            callsign: Self::UNKNOWN_CALLSIGN.to_string(),
            records: Vec::new(),
        }
    }
}

impl ParsedLog {
    pub const UNKNOWN_CALLSIGN: &'static str = "Unknown";

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Contact count per grid square, scoped to a single band.
pub type AggregatedGrid = BTreeMap<GridSquare, u32>;

/// Display bounds in `(lon_min, lon_max, lat_min, lat_max)` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapExtent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl MapExtent {
    pub const GLOBE: MapExtent = MapExtent {
        lon_min: -180.0,
        lon_max: 180.0,
        lat_min: -90.0,
        lat_max: 90.0,
    };

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.lon_min <= lon && lon <= self.lon_max && self.lat_min <= lat && lat <= self.lat_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continent_round_trips_through_name() {
        for continent in Continent::SELECTABLE {
            assert_eq!(continent.as_str().parse::<Continent>().unwrap(), continent);
        }
        assert_eq!("Europe".parse::<Continent>().unwrap(), Continent::Europe);
        assert!("atlantis".parse::<Continent>().is_err());
    }

    #[test]
    fn test_parsed_log_defaults_to_unknown_callsign() {
        let log = ParsedLog::default();
        assert_eq!(log.callsign, "Unknown");
        assert!(log.is_empty());
    }

    #[test]
    fn test_geo_bounds_center() {
        let bounds = GeoBounds { lat_min: 40.0, lat_max: 41.0, lon_min: -76.0, lon_max: -74.0 };
        assert_eq!(bounds.center(), (40.5, -75.0));
    }

    #[test]
    fn test_globe_extent_contains_everything() {
        assert!(MapExtent::GLOBE.contains(-180.0, -90.0));
        assert!(MapExtent::GLOBE.contains(179.9, 89.9));
        assert!(!MapExtent::GLOBE.contains(181.0, 0.0));
    }
}
