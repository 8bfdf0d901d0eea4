//! Approximate continent lookup for grid squares.
//!
//! The rectangles are coarse and overlap in places; a grid square is
//! assigned to the first rectangle, in table order, that contains the centre
//! of its cell.

use serde::{Deserialize, Serialize};
use super::grid::GridSquare;
use super::models::{Continent, ContinentSelection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentRegion {
    pub continent: Continent,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl ContinentRegion {
    fn new(continent: Continent, lat: (f64, f64), lon: (f64, f64)) -> Self {
        Self {
            continent,
            lat_min: lat.0,
            lat_max: lat.1,
            lon_min: lon.0,
            lon_max: lon.1,
        }
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lat_min <= lat && lat <= self.lat_max && self.lon_min <= lon && lon <= self.lon_max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinentTable {
    regions: Vec<ContinentRegion>,
}

impl Default for ContinentTable {
    fn default() -> Self {
        Self {
            regions: vec![
                ContinentRegion::new(Continent::NorthAmerica, (10.0, 85.0), (-180.0, -30.0)),
                ContinentRegion::new(Continent::SouthAmerica, (-60.0, 15.0), (-90.0, -30.0)),
                ContinentRegion::new(Continent::Europe, (35.0, 75.0), (-15.0, 45.0)),
                ContinentRegion::new(Continent::Africa, (-40.0, 40.0), (-20.0, 55.0)),
                ContinentRegion::new(Continent::Asia, (5.0, 80.0), (25.0, 180.0)),
                ContinentRegion::new(Continent::Oceania, (-50.0, 0.0), (110.0, 180.0)),
            ],
        }
    }
}

impl ContinentTable {
    pub fn new(regions: Vec<ContinentRegion>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[ContinentRegion] {
        &self.regions
    }

    /// First region containing the point, or [`Continent::Other`].
    pub fn locate(&self, lat: f64, lon: f64) -> Continent {
        self.regions
            .iter()
            .find(|region| region.contains(lat, lon))
            .map(|region| region.continent)
            .unwrap_or(Continent::Other)
    }
}

/// Assigns grid squares to continents using a [`ContinentTable`].
///
/// # Examples
///
/// ```
/// use maidenhead_map::domain::{Continent, ContinentClassifier};
///
/// let continents = ContinentClassifier::default();
/// assert_eq!(continents.classify("FN20"), Some(Continent::NorthAmerica));
/// assert_eq!(continents.classify("JO01"), Some(Continent::Europe));
/// assert_eq!(continents.classify("not a grid"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContinentClassifier {
    table: ContinentTable,
}

impl ContinentClassifier {
    pub fn new(table: ContinentTable) -> Self {
        Self { table }
    }

    /// Classifies a raw token; `None` when it is not a grid square.
    pub fn classify(&self, token: &str) -> Option<Continent> {
        GridSquare::parse(token).map(|grid| self.classify_grid(&grid))
    }

    pub fn classify_grid(&self, grid: &GridSquare) -> Continent {
        let (lat, lon) = grid.bounds().center();
        self.table.locate(lat, lon)
    }

    /// Distinct continents observed among `grids`, `Other` included.
    pub fn auto_select<'a, I>(&self, grids: I) -> ContinentSelection
    where
        I: IntoIterator<Item = &'a GridSquare>,
    {
        grids.into_iter().map(|grid| self.classify_grid(grid)).collect()
    }
}
