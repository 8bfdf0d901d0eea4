//! Contact aggregation services for the grid map pipeline.
//!
//! This module turns parsed contact records into per-band grid counts,
//! narrows them to a continent selection, and works out the map extent and
//! region name each band is drawn with.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use super::continent::ContinentClassifier;
use super::grid::GridSquare;
use super::models::{AggregatedGrid, Band, ContactRecord, ContinentSelection, MapExtent};

/// Padding applied around the data when computing a map extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPadding {
    /// Fraction of the data span added on each side
    pub fraction: f64,
    /// Minimum latitude padding in degrees
    pub lat_floor: f64,
    /// Minimum longitude padding in degrees
    pub lon_floor: f64,
}

impl Default for DisplayPadding {
    fn default() -> Self {
        Self {
            fraction: 0.15,
            lat_floor: 2.0,
            lon_floor: 3.0,
        }
    }
}

/// Everything needed to draw one band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPlot {
    pub band: Band,
    pub grid: AggregatedGrid,
    pub extent: MapExtent,
    pub region: String,
}

impl BandPlot {
    pub fn unique_squares(&self) -> usize {
        self.grid.len()
    }

    pub fn total_contacts(&self) -> u64 {
        self.grid.values().map(|&count| u64::from(count)).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.grid.values().copied().max().unwrap_or(0)
    }
}

/// Result of preparing a band for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum BandOutcome {
    /// At least one grid square survived filtering
    Ready(BandPlot),
    /// Nothing left to draw; the band should be skipped
    NoData { band: Band },
}

/// Aggregates contacts into grid counts and derives display parameters.
///
/// The aggregator owns its continent table and padding settings; every
/// operation is a pure function of its arguments and that configuration.
///
/// # Examples
///
/// ```
/// use maidenhead_map::domain::{Band, ContactAggregator, ContactRecord, GridSquare};
///
/// let grid = |s: &str| GridSquare::parse(s).unwrap();
/// let records = vec![
///     ContactRecord::new(Band::new("20m"), grid("FN20")),
///     ContactRecord::new(Band::new("20m"), grid("FN20")),
///     ContactRecord::new(Band::new("20m"), grid("FN31")),
/// ];
///
/// let by_band = ContactAggregator::aggregate(&records);
/// let counts = &by_band[&Band::new("20m")];
/// assert_eq!(counts[&grid("FN20")], 2);
/// assert_eq!(counts[&grid("FN31")], 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContactAggregator {
    continents: ContinentClassifier,
    padding: DisplayPadding,
}

impl ContactAggregator {
    /// Creates an aggregator with the given continent classifier and padding.
    ///
    /// # Arguments
    ///
    /// * `continents` - Classifier used for filtering and region naming
    /// * `padding` - Padding rules for [`ContactAggregator::compute_display_bounds`]
    pub fn new(continents: ContinentClassifier, padding: DisplayPadding) -> Self {
        Self { continents, padding }
    }

    pub fn continents(&self) -> &ContinentClassifier {
        &self.continents
    }

    /// Counts records per band and grid square.
    ///
    /// Counting is exact and independent of record order.
    pub fn aggregate<'a, I>(records: I) -> BTreeMap<Band, AggregatedGrid>
    where
        I: IntoIterator<Item = &'a ContactRecord>,
    {
        let mut by_band: BTreeMap<Band, AggregatedGrid> = BTreeMap::new();
        for record in records {
            *by_band
                .entry(record.band.clone())
                .or_default()
                .entry(record.grid.clone())
                .or_insert(0) += 1;
        }
        by_band
    }

    /// Counts occurrences of each grid square in a single band.
    pub fn count<'a, I>(grids: I) -> AggregatedGrid
    where
        I: IntoIterator<Item = &'a GridSquare>,
    {
        let mut counts = AggregatedGrid::new();
        for grid in grids {
            *counts.entry(grid.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Keeps only grid squares whose continent is in `selection`.
    ///
    /// An empty selection returns the input unchanged. Non-matching squares
    /// are dropped silently.
    ///
    /// # Arguments
    ///
    /// * `aggregated` - Grid counts for one band
    /// * `selection` - Continents to keep
    ///
    /// # Examples
    ///
    /// ```
    /// use maidenhead_map::domain::{ContactAggregator, Continent, ContinentSelection, GridSquare};
    ///
    /// let aggregator = ContactAggregator::default();
    /// let grids = vec![GridSquare::parse("FN20").unwrap(), GridSquare::parse("JO01").unwrap()];
    /// let counts = ContactAggregator::count(&grids);
    ///
    /// let europe: ContinentSelection = [Continent::Europe].into_iter().collect();
    /// let filtered = aggregator.filter_by_continents(&counts, &europe);
    /// assert_eq!(filtered.len(), 1);
    /// assert!(filtered.contains_key(&GridSquare::parse("JO01").unwrap()));
    /// ```
    pub fn filter_by_continents(
        &self,
        aggregated: &AggregatedGrid,
        selection: &ContinentSelection,
    ) -> AggregatedGrid {
        if selection.is_empty() {
            return aggregated.clone();
        }

        aggregated
            .iter()
            .filter(|(grid, _)| selection.contains(&self.continents.classify_grid(grid)))
            .map(|(grid, &count)| (grid.clone(), count))
            .collect()
    }

    /// Computes the map extent covering every grid square plus padding.
    ///
    /// Padding on each axis is `max(span * fraction, floor)`. With no grid
    /// squares the whole globe is returned. Counts play no part, only the set
    /// of squares.
    ///
    /// # Examples
    ///
    /// ```
    /// use maidenhead_map::domain::{ContactAggregator, GridSquare, MapExtent};
    ///
    /// let aggregator = ContactAggregator::default();
    /// let extent = aggregator.compute_display_bounds(&[GridSquare::parse("FN20").unwrap()]);
    /// assert_eq!(extent, MapExtent { lon_min: -79.0, lon_max: -71.0, lat_min: 38.0, lat_max: 43.0 });
    ///
    /// let empty: [GridSquare; 0] = [];
    /// assert_eq!(aggregator.compute_display_bounds(&empty), MapExtent::GLOBE);
    /// ```
    pub fn compute_display_bounds<'a, I>(&self, grids: I) -> MapExtent
    where
        I: IntoIterator<Item = &'a GridSquare>,
    {
        let mut corners: Option<MapExtent> = None;
        for grid in grids {
            let bounds = grid.bounds();
            corners = Some(match corners {
                None => MapExtent {
                    lon_min: bounds.lon_min,
                    lon_max: bounds.lon_max,
                    lat_min: bounds.lat_min,
                    lat_max: bounds.lat_max,
                },
                Some(extent) => MapExtent {
                    lon_min: extent.lon_min.min(bounds.lon_min),
                    lon_max: extent.lon_max.max(bounds.lon_max),
                    lat_min: extent.lat_min.min(bounds.lat_min),
                    lat_max: extent.lat_max.max(bounds.lat_max),
                },
            });
        }

        let Some(extent) = corners else {
            return MapExtent::GLOBE;
        };

        let lat_padding = ((extent.lat_max - extent.lat_min) * self.padding.fraction).max(self.padding.lat_floor);
        let lon_padding = ((extent.lon_max - extent.lon_min) * self.padding.fraction).max(self.padding.lon_floor);

        MapExtent {
            lon_min: extent.lon_min - lon_padding,
            lon_max: extent.lon_max + lon_padding,
            lat_min: extent.lat_min - lat_padding,
            lat_max: extent.lat_max + lat_padding,
        }
    }

    /// Names the area a map covers, e.g. `"northeastern_north_america"`.
    ///
    /// Extents inside North America or Europe get a compass sub-region.
    /// Anything wider is named after the continents its squares fall in,
    /// or `"regional"` when there are none.
    pub fn region_name(&self, extent: &MapExtent, grid: &AggregatedGrid) -> String {
        if let Some(name) = north_american_region(extent).or_else(|| european_region(extent)) {
            return name.to_string();
        }

        let continents = self.continents.auto_select(grid.keys());
        if continents.is_empty() {
            "regional".to_string()
        } else {
            continents
                .iter()
                .map(|continent| continent.as_str())
                .collect::<Vec<_>>()
                .join("_")
        }
    }

    /// Filters a band's counts and computes everything needed to draw it.
    ///
    /// # Arguments
    ///
    /// * `band` - Band the counts belong to
    /// * `aggregated` - Grid counts for that band
    /// * `selection` - Continents to keep; empty keeps everything
    ///
    /// # Returns
    ///
    /// [`BandOutcome::NoData`] when no grid square survives filtering,
    /// otherwise the ready-to-draw [`BandPlot`].
    pub fn prepare_band(
        &self,
        band: &Band,
        aggregated: &AggregatedGrid,
        selection: &ContinentSelection,
    ) -> BandOutcome {
        let grid = self.filter_by_continents(aggregated, selection);
        if grid.is_empty() {
            return BandOutcome::NoData { band: band.clone() };
        }

        let extent = self.compute_display_bounds(grid.keys());
        let region = self.region_name(&extent, &grid);
        BandOutcome::Ready(BandPlot {
            band: band.clone(),
            grid,
            extent,
            region,
        })
    }
}

/// Turns a region slug into a display title, `"central_europe"` -> `"Central Europe"`.
pub fn region_title(region: &str) -> String {
    region
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn north_american_region(e: &MapExtent) -> Option<&'static str> {
    if !(-170.0 <= e.lon_min && e.lon_max <= -30.0 && 10.0 <= e.lat_min && e.lat_max <= 85.0) {
        return None;
    }

    let name = if e.lon_min >= -100.0 && e.lat_min >= 35.0 {
        "northeastern_north_america"
    } else if e.lon_min >= -100.0 && e.lat_max <= 45.0 {
        "southeastern_north_america"
    } else if e.lon_max <= -95.0 && e.lat_min >= 35.0 {
        "northwestern_north_america"
    } else if e.lon_max <= -95.0 && e.lat_max <= 45.0 {
        "southwestern_north_america"
    } else if e.lat_min >= 45.0 {
        "northern_north_america"
    } else if e.lat_max <= 35.0 {
        "southern_north_america"
    } else if e.lon_min >= -100.0 {
        "eastern_north_america"
    } else if e.lon_max <= -95.0 {
        "western_north_america"
    } else {
        "central_north_america"
    };
    Some(name)
}

fn european_region(e: &MapExtent) -> Option<&'static str> {
    if !(-15.0 <= e.lon_min && e.lon_max <= 45.0 && 35.0 <= e.lat_min && e.lat_max <= 75.0) {
        return None;
    }

    let name = if e.lat_min >= 55.0 {
        "northern_europe"
    } else if e.lat_max <= 50.0 {
        "southern_europe"
    } else if e.lon_min >= 15.0 {
        "eastern_europe"
    } else if e.lon_max <= 5.0 {
        "western_europe"
    } else {
        "central_europe"
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Continent;

    fn grid(token: &str) -> GridSquare {
        GridSquare::parse(token).unwrap()
    }

    fn record(band: &str, token: &str) -> ContactRecord {
        ContactRecord::new(Band::new(band), grid(token))
    }

    fn selection(continents: &[Continent]) -> ContinentSelection {
        continents.iter().copied().collect()
    }

    #[test]
    fn test_aggregate_counts_per_band() {
        let records = vec![
            record("20m", "FN20"),
            record("20m", "FN20"),
            record("20m", "FN31"),
        ];

        let by_band = ContactAggregator::aggregate(&records);
        assert_eq!(by_band.len(), 1);

        let expected: AggregatedGrid = [(grid("FN20"), 2), (grid("FN31"), 1)].into_iter().collect();
        assert_eq!(by_band[&Band::new("20m")], expected);
    }

    #[test]
    fn test_aggregate_separates_bands() {
        let records = vec![
            record("20m", "FN20"),
            record("40m", "FN20"),
            record("40m", "JO01"),
        ];

        let by_band = ContactAggregator::aggregate(&records);
        assert_eq!(by_band[&Band::new("20m")].len(), 1);
        assert_eq!(by_band[&Band::new("40m")].len(), 2);
        assert_eq!(by_band[&Band::new("40m")][&grid("FN20")], 1);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let mut records = vec![
            record("20m", "FN20"),
            record("40m", "JO01"),
            record("20m", "FN31"),
            record("20m", "FN20"),
            record("40m", "JO01"),
        ];
        let forward = ContactAggregator::aggregate(&records);
        records.reverse();
        let backward = ContactAggregator::aggregate(&records);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_aggregate_of_nothing_is_empty() {
        let records: Vec<ContactRecord> = Vec::new();
        assert!(ContactAggregator::aggregate(&records).is_empty());
    }

    #[test]
    fn test_count_merges_case_variants() {
        let grids = vec![grid("fn20"), grid("FN20"), grid("FN20xr")];
        let counts = ContactAggregator::count(&grids);
        assert_eq!(counts[&grid("FN20")], 2);
        assert_eq!(counts[&grid("FN20XR")], 1);
    }

    #[test]
    fn test_filter_with_empty_selection_is_identity() {
        let aggregator = ContactAggregator::default();
        let counts = ContactAggregator::count(&[grid("FN20"), grid("JO01"), grid("BG00")]);
        assert_eq!(aggregator.filter_by_continents(&counts, &ContinentSelection::new()), counts);
    }

    #[test]
    fn test_filter_drops_other_continents() {
        let aggregator = ContactAggregator::default();
        let counts = ContactAggregator::count(&[grid("FN20"), grid("FN31"), grid("CM87")]);

        let filtered = aggregator.filter_by_continents(&counts, &selection(&[Continent::Europe]));
        assert!(filtered.is_empty());

        let filtered = aggregator.filter_by_continents(&counts, &selection(&[Continent::NorthAmerica]));
        assert_eq!(filtered, counts);
    }

    #[test]
    fn test_filter_keeps_counts() {
        let aggregator = ContactAggregator::default();
        let counts = ContactAggregator::count(&[grid("FN20"), grid("JO01"), grid("JO01")]);
        let filtered = aggregator.filter_by_continents(&counts, &selection(&[Continent::Europe]));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[&grid("JO01")], 2);
    }

    #[test]
    fn test_display_bounds_single_square_uses_floors() {
        let aggregator = ContactAggregator::default();
        let extent = aggregator.compute_display_bounds(&[grid("FN20")]);
        // FN20 spans lat 40..41, lon -76..-74.
        assert_eq!(extent.lat_min, 38.0);
        assert_eq!(extent.lat_max, 43.0);
        assert_eq!(extent.lon_min, -79.0);
        assert_eq!(extent.lon_max, -71.0);
    }

    #[test]
    fn test_display_bounds_subsquare_still_uses_floors() {
        let aggregator = ContactAggregator::default();
        let extent = aggregator.compute_display_bounds(&[grid("FN20xr")]);
        let bounds = grid("FN20xr").bounds();
        assert!(bounds.lat_min - extent.lat_min >= 2.0);
        assert!(extent.lat_max - bounds.lat_max >= 2.0);
        assert!(bounds.lon_min - extent.lon_min >= 3.0);
        assert!(extent.lon_max - bounds.lon_max >= 3.0);
    }

    #[test]
    fn test_display_bounds_scale_with_span() {
        let aggregator = ContactAggregator::default();
        // CM87 lon -124..-122, lat 37..38; FN20 lon -76..-74, lat 40..41.
        let extent = aggregator.compute_display_bounds(&[grid("CM87"), grid("FN20")]);
        let lon_span = -74.0 - -124.0;
        let lat_span = 41.0 - 37.0;
        assert!((extent.lon_min - (-124.0 - lon_span * 0.15)).abs() < 1e-9);
        assert!((extent.lon_max - (-74.0 + lon_span * 0.15)).abs() < 1e-9);
        // Latitude span is small, so the floor wins.
        assert_eq!(extent.lat_min, 37.0 - 2.0);
        assert_eq!(extent.lat_max, 41.0 + 2.0);
        assert!(lat_span * 0.15 < 2.0);
    }

    #[test]
    fn test_display_bounds_empty_is_globe() {
        let aggregator = ContactAggregator::default();
        let empty: Vec<GridSquare> = Vec::new();
        assert_eq!(aggregator.compute_display_bounds(&empty), MapExtent::GLOBE);
    }

    #[test]
    fn test_display_bounds_ignore_counts() {
        let aggregator = ContactAggregator::default();
        let once = ContactAggregator::count(&[grid("FN20"), grid("JO01")]);
        let many = ContactAggregator::count(&[grid("FN20"), grid("JO01"), grid("JO01"), grid("JO01")]);
        assert_eq!(
            aggregator.compute_display_bounds(once.keys()),
            aggregator.compute_display_bounds(many.keys())
        );
    }

    #[test]
    fn test_custom_padding() {
        let aggregator = ContactAggregator::new(
            ContinentClassifier::default(),
            DisplayPadding { fraction: 0.0, lat_floor: 0.5, lon_floor: 1.0 },
        );
        let extent = aggregator.compute_display_bounds(&[grid("FN20")]);
        assert_eq!(extent, MapExtent { lon_min: -77.0, lon_max: -73.0, lat_min: 39.5, lat_max: 41.5 });
    }

    #[test]
    fn test_region_name_north_america() {
        let aggregator = ContactAggregator::default();
        let counts = ContactAggregator::count(&[grid("FN20")]);
        let extent = aggregator.compute_display_bounds(counts.keys());
        assert_eq!(aggregator.region_name(&extent, &counts), "northeastern_north_america");

        let counts = ContactAggregator::count(&[grid("CM87")]);
        let extent = aggregator.compute_display_bounds(counts.keys());
        assert_eq!(aggregator.region_name(&extent, &counts), "northwestern_north_america");

        let counts = ContactAggregator::count(&[grid("EL29")]);
        let extent = aggregator.compute_display_bounds(counts.keys());
        assert_eq!(aggregator.region_name(&extent, &counts), "southeastern_north_america");
    }

    #[test]
    fn test_region_name_europe() {
        let aggregator = ContactAggregator::default();
        let counts = ContactAggregator::count(&[grid("JO01")]);
        let extent = aggregator.compute_display_bounds(counts.keys());
        assert_eq!(aggregator.region_name(&extent, &counts), "western_europe");

        let counts = ContactAggregator::count(&[grid("KP20")]);
        let extent = aggregator.compute_display_bounds(counts.keys());
        assert_eq!(aggregator.region_name(&extent, &counts), "northern_europe");
    }

    #[test]
    fn test_region_name_falls_back_to_continents() {
        let aggregator = ContactAggregator::default();
        let counts = ContactAggregator::count(&[grid("FN20"), grid("JO01")]);
        let extent = aggregator.compute_display_bounds(counts.keys());
        assert_eq!(aggregator.region_name(&extent, &counts), "north_america_europe");

        let counts = ContactAggregator::count(&[grid("QF56")]);
        let extent = aggregator.compute_display_bounds(counts.keys());
        assert_eq!(aggregator.region_name(&extent, &counts), "oceania");

        assert_eq!(aggregator.region_name(&MapExtent::GLOBE, &AggregatedGrid::new()), "regional");
    }

    #[test]
    fn test_region_title() {
        assert_eq!(region_title("northeastern_north_america"), "Northeastern North America");
        assert_eq!(region_title("regional"), "Regional");
        assert_eq!(region_title(""), "");
    }

    #[test]
    fn test_prepare_band_ready() {
        let aggregator = ContactAggregator::default();
        let counts = ContactAggregator::count(&[grid("FN20"), grid("FN20"), grid("FN31")]);
        let band = Band::new("20m");

        match aggregator.prepare_band(&band, &counts, &ContinentSelection::new()) {
            BandOutcome::Ready(plot) => {
                assert_eq!(plot.band, band);
                assert_eq!(plot.unique_squares(), 2);
                assert_eq!(plot.total_contacts(), 3);
                assert_eq!(plot.max_count(), 2);
                assert_eq!(plot.region, "northeastern_north_america");
            }
            BandOutcome::NoData { .. } => panic!("expected plot data"),
        }
    }

    #[test]
    fn test_prepare_band_no_data_after_filtering() {
        let aggregator = ContactAggregator::default();
        let counts = ContactAggregator::count(&[grid("FN20")]);
        let band = Band::new("20m");

        let outcome = aggregator.prepare_band(&band, &counts, &selection(&[Continent::Asia]));
        assert_eq!(outcome, BandOutcome::NoData { band });
    }

    #[test]
    fn test_prepare_band_no_data_when_empty() {
        let aggregator = ContactAggregator::default();
        let band = Band::new("6m");
        let outcome = aggregator.prepare_band(&band, &AggregatedGrid::new(), &ContinentSelection::new());
        assert_eq!(outcome, BandOutcome::NoData { band });
    }
}
