//! PNG map rendering with [`plotters`].
//!
//! Maps are drawn on a plain longitude/latitude grid: faint continent
//! outlines for orientation, one shaded rectangle per grid square, bold field
//! labels and a colour bar. Colours follow a red ramp where the busiest
//! square is darkest.

use std::collections::BTreeMap;
use std::path::Path;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use crate::application::{MapRenderer, RenderError, RenderResult};
use crate::domain::{region_title, BandPlot, ContinentTable, MapExtent};
use crate::infrastructure::RenderOptions;

const LEGEND_WIDTH: u32 = 170;
const COLORBAR_STEPS: usize = 120;

/// Sample points of the red colour ramp, light to dark.
const REDS: [(f64, (u8, u8, u8)); 9] = [
    (0.0, (255, 245, 240)),
    (0.125, (254, 224, 210)),
    (0.25, (252, 187, 161)),
    (0.375, (252, 146, 114)),
    (0.5, (251, 106, 74)),
    (0.625, (239, 59, 44)),
    (0.75, (203, 24, 29)),
    (0.875, (165, 15, 21)),
    (1.0, (103, 0, 13)),
];

/// Samples the red ramp at `t` in `0.0..=1.0`; values outside are clamped.
pub fn reds(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    for window in REDS.windows(2) {
        let (t0, c0) = window[0];
        let (t1, c1) = window[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            return RGBColor(lerp(c0.0, c1.0, f), lerp(c0.1, c1.1, f), lerp(c0.2, c1.2, f));
        }
    }
    let (_, (r, g, b)) = REDS[REDS.len() - 1];
    RGBColor(r, g, b)
}

fn lerp(a: u8, b: u8, f: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8
}

/// Fill colour for a square with `count` contacts, the lightest shade
/// starting at 30% of the ramp so single contacts stay visible.
pub fn contact_color(count: u32, max_count: u32) -> RGBColor {
    let intensity = if max_count == 0 {
        0.0
    } else {
        f64::from(count) / f64::from(max_count)
    };
    reds(0.3 + 0.7 * intensity)
}

/// Intersects a lon/lat rectangle with the extent, `None` if nothing is visible.
pub fn clip_to_extent(
    extent: &MapExtent,
    lon: (f64, f64),
    lat: (f64, f64),
) -> Option<[(f64, f64); 2]> {
    let lon_min = lon.0.max(extent.lon_min);
    let lon_max = lon.1.min(extent.lon_max);
    let lat_min = lat.0.max(extent.lat_min);
    let lat_max = lat.1.min(extent.lat_max);

    if lon_min >= lon_max || lat_min >= lat_max {
        None
    } else {
        Some([(lon_min, lat_min), (lon_max, lat_max)])
    }
}

pub fn map_title(callsign: &str, plot: &BandPlot) -> String {
    format!(
        "{callsign} - {} Band - Maidenhead Grid Squares ({})",
        plot.band,
        region_title(&plot.region)
    )
}

/// Field labels whose field centre lies inside the extent, keyed by field.
pub fn visible_fields(plot: &BandPlot) -> BTreeMap<String, (f64, f64)> {
    let mut fields = BTreeMap::new();
    for grid in plot.grid.keys() {
        let (lon, lat) = grid.field_center();
        if plot.extent.contains(lon, lat) {
            fields.entry(grid.field().to_string()).or_insert((lon, lat));
        }
    }
    fields
}

/// Renders band maps as PNG files.
#[derive(Debug, Clone)]
pub struct PngMapRenderer {
    options: RenderOptions,
    continents: ContinentTable,
}

impl PngMapRenderer {
    pub fn new(options: RenderOptions, continents: ContinentTable) -> Self {
        Self { options, continents }
    }

    fn draw_map<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        plot: &BandPlot,
        callsign: &str,
    ) -> RenderResult<()> {
        let extent = plot.extent;
        let mut chart = ChartBuilder::on(area)
            .caption(map_title(callsign, plot), ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(extent.lon_min..extent.lon_max, extent.lat_min..extent.lat_max)
            .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .x_label_formatter(&|lon| format!("{lon:.0}°"))
            .y_label_formatter(&|lat| format!("{lat:.0}°"))
            .light_line_style(RGBColor(235, 235, 235).stroke_width(1))
            .label_style(("sans-serif", 16))
            .draw()
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        chart
            .draw_series(self.continents.regions().iter().filter_map(|region| {
                clip_to_extent(&extent, (region.lon_min, region.lon_max), (region.lat_min, region.lat_max))
                    .map(|corners| Rectangle::new(corners, RGBColor(170, 170, 170).stroke_width(1)))
            }))
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        let max_count = plot.max_count();
        let cells: Vec<([(f64, f64); 2], RGBColor)> = plot
            .grid
            .iter()
            .filter_map(|(grid, &count)| {
                let bounds = grid.bounds();
                clip_to_extent(&extent, (bounds.lon_min, bounds.lon_max), (bounds.lat_min, bounds.lat_max))
                    .map(|corners| (corners, contact_color(count, max_count)))
            })
            .collect();

        chart
            .draw_series(
                cells
                    .iter()
                    .map(|(corners, color)| Rectangle::new(*corners, color.mix(0.8).filled())),
            )
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        chart
            .draw_series(
                cells
                    .iter()
                    .map(|(corners, _)| Rectangle::new(*corners, BLACK.stroke_width(1))),
            )
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        let label_style = ("sans-serif", 22)
            .into_font()
            .style(FontStyle::Bold)
            .color(&BLUE)
            .pos(Pos::new(HPos::Center, VPos::Center));

        chart
            .draw_series(
                visible_fields(plot)
                    .into_iter()
                    .map(|(field, center)| Text::new(field, center, label_style.clone())),
            )
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        Ok(())
    }

    fn draw_colorbar<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        max_count: u32,
    ) -> RenderResult<()> {
        let upper = f64::from(max_count.max(2));

        let mut chart = ChartBuilder::on(area)
            .margin_top(90)
            .margin_bottom(80)
            .margin_left(10)
            .margin_right(30)
            .y_label_area_size(80)
            .build_cartesian_2d(0.0..1.0, 1.0..upper)
            .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(0)
            .y_desc("Number of Contacts")
            .y_label_formatter(&|count| format!("{count:.0}"))
            .label_style(("sans-serif", 16))
            .draw()
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        let step = (upper - 1.0) / COLORBAR_STEPS as f64;
        chart
            .draw_series((0..COLORBAR_STEPS).map(|i| {
                let low = 1.0 + step * i as f64;
                let high = low + step;
                let intensity = (low + high) / 2.0 / upper;
                Rectangle::new([(0.0, low), (1.0, high)], reds(0.3 + 0.7 * intensity).filled())
            }))
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        Ok(())
    }
}

impl MapRenderer for PngMapRenderer {
    fn render(&self, plot: &BandPlot, callsign: &str, output: &Path) -> RenderResult<()> {
        if plot.grid.is_empty() {
            return Err(RenderError::InvalidData("no grid squares to draw".to_string()));
        }

        let RenderOptions { width, height } = self.options;
        if width <= LEGEND_WIDTH * 2 || height == 0 {
            return Err(RenderError::InvalidData(format!(
                "image size {width}x{height} is too small"
            )));
        }

        let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::DrawingArea(e.to_string()))?;

        let (map_area, legend_area) = root.split_horizontally(width - LEGEND_WIDTH);
        self.draw_map(&map_area, plot, callsign)?;
        self.draw_colorbar(&legend_area, plot.max_count())?;

        root.present()
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        Ok(())
    }
}
