//! Per-file orchestration: read a log, aggregate it by band, render each band.
//!
//! Each step depends on the complete output of the previous one, so a run is
//! strictly sequential. Problems with a single band are reported and the run
//! moves on to the next band.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use crate::domain::{
    AggregatedGrid, Band, BandClassifier, BandOutcome, ContactAggregator, ContinentClassifier,
    ContinentSelection,
};
use crate::infrastructure::{ExchangeScan, LogError, LogFormat, LogReader, MapConfig};
use super::renderer::MapRenderer;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Log(#[from] LogError),
}

/// What to process and where to put the results.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRequest {
    /// Contest log to read
    pub input: PathBuf,
    /// Continents to keep; `None` auto-selects per band
    pub continents: Option<ContinentSelection>,
    /// Directory the map images are written to
    pub output_dir: PathBuf,
}

impl MapRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            continents: None,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Outcome of one band within a run.
#[derive(Debug, Clone, PartialEq)]
pub enum BandReport {
    Rendered {
        band: Band,
        path: PathBuf,
        unique_squares: usize,
        contacts: u64,
    },
    Skipped {
        band: Band,
    },
    Failed {
        band: Band,
        reason: String,
    },
}

impl BandReport {
    pub fn band(&self) -> &Band {
        match self {
            BandReport::Rendered { band, .. }
            | BandReport::Skipped { band }
            | BandReport::Failed { band, .. } => band,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub callsign: String,
    pub format: LogFormat,
    pub bands: Vec<BandReport>,
}

impl RunReport {
    /// False when the log held no grid squares at all.
    pub fn found_grids(&self) -> bool {
        !self.bands.is_empty()
    }
}

/// Builds `{callsign}_{band}_{region}_maidenhead_map.png`.
///
/// Characters that are unsafe in file names, such as the `/` in portable
/// callsigns, are replaced with `-`.
///
/// # Examples
///
/// ```
/// use maidenhead_map::application::output_file_name;
/// use maidenhead_map::domain::Band;
///
/// assert_eq!(
///     output_file_name("K1ABC/P", &Band::new("20m"), "central_europe"),
///     "K1ABC-P_20m_central_europe_maidenhead_map.png"
/// );
/// ```
pub fn output_file_name(callsign: &str, band: &Band, region: &str) -> String {
    format!(
        "{}_{}_{}_maidenhead_map.png",
        sanitize(callsign),
        sanitize(band.as_str()),
        sanitize(region)
    )
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '-' })
        .collect()
}

fn describe_selection(selection: &ContinentSelection) -> String {
    selection
        .iter()
        .map(|continent| continent.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs one log file through parsing, aggregation and rendering.
///
/// # Examples
///
/// ```no_run
/// use maidenhead_map::application::{GridMapPipeline, MapRequest};
/// use maidenhead_map::infrastructure::{ExchangeScan, MapConfig};
/// use maidenhead_map::presentation::PngMapRenderer;
///
/// let config = MapConfig::default();
/// let renderer = PngMapRenderer::new(config.render, config.continents.clone());
/// let pipeline = GridMapPipeline::from_config(&config, ExchangeScan::default(), renderer);
/// let report = pipeline.run(&MapRequest::new("contest.cbr")).unwrap();
/// println!("{} bands", report.bands.len());
/// ```
pub struct GridMapPipeline<R> {
    reader: LogReader,
    aggregator: ContactAggregator,
    renderer: R,
}

impl<R: MapRenderer> GridMapPipeline<R> {
    pub fn new(reader: LogReader, aggregator: ContactAggregator, renderer: R) -> Self {
        Self { reader, aggregator, renderer }
    }

    /// Builds the reader and aggregator from the configured tables.
    pub fn from_config(config: &MapConfig, exchange: ExchangeScan, renderer: R) -> Self {
        let reader = LogReader::new(
            BandClassifier::new(config.band_plan.clone()),
            config.columns.clone(),
            exchange,
        );
        let aggregator = ContactAggregator::new(
            ContinentClassifier::new(config.continents.clone()),
            config.padding,
        );
        Self::new(reader, aggregator, renderer)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Processes `request` end to end.
    ///
    /// # Errors
    ///
    /// Returns an error only when the input has an unsupported extension or
    /// does not exist. Everything else is reported per band in the
    /// [`RunReport`].
    pub fn run(&self, request: &MapRequest) -> Result<RunReport, PipelineError> {
        let format = LogFormat::from_path(&request.input)?;
        let log = self.reader.read(&request.input)?;
        println!("Parsed {} file: {}", format.name(), request.input.display());

        let mut report = RunReport {
            callsign: log.callsign.clone(),
            format,
            bands: Vec::new(),
        };

        if log.is_empty() {
            println!("No Maidenhead grid squares found in file");
            return Ok(report);
        }

        for (band, grid) in ContactAggregator::aggregate(&log.records) {
            let band_report = self.process_band(&log.callsign, &band, &grid, request);
            report.bands.push(band_report);
        }

        info!(
            callsign = %report.callsign,
            bands = report.bands.len(),
            "finished processing {}",
            request.input.display()
        );
        Ok(report)
    }

    fn process_band(
        &self,
        callsign: &str,
        band: &Band,
        grid: &AggregatedGrid,
        request: &MapRequest,
    ) -> BandReport {
        let selection = match &request.continents {
            Some(selection) => selection.clone(),
            None => {
                let selection = self.aggregator.continents().auto_select(grid.keys());
                println!("Auto-selected continents: {}", describe_selection(&selection));
                selection
            }
        };

        let plot = match self.aggregator.prepare_band(band, grid, &selection) {
            BandOutcome::Ready(plot) => plot,
            BandOutcome::NoData { band } => {
                println!("No valid grid squares found for {band} in selected continents");
                return BandReport::Skipped { band };
            }
        };

        let path = output_path(&request.output_dir, callsign, &plot.band, &plot.region);

        match self.renderer.render(&plot, callsign, &path) {
            Ok(()) => {
                println!("Map saved as {}", path.display());
                println!(
                    "{}: {} unique grid squares, {} contacts",
                    plot.band,
                    plot.unique_squares(),
                    plot.total_contacts()
                );
                BandReport::Rendered {
                    band: plot.band.clone(),
                    path,
                    unique_squares: plot.unique_squares(),
                    contacts: plot.total_contacts(),
                }
            }
            Err(err) => {
                warn!(band = %plot.band, path = %path.display(), error = %err, "failed to render map");
                BandReport::Failed {
                    band: plot.band,
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Joins [`output_file_name`] onto `output_dir`.
pub fn output_path(output_dir: &Path, callsign: &str, band: &Band, region: &str) -> PathBuf {
    output_dir.join(output_file_name(callsign, band, region))
}
