//! Export sinks for the dashboard's loaded data.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use county_atlas_geography::{BoundaryError, BoundaryStore};
use county_atlas_statistics::{StatsError, write_records_csv};
use county_atlas_statistics_models::StatRecord;
use thiserror::Error;

/// File name for exported statistics.
pub const STATS_FILE_NAME: &str = "county_stats.csv";

/// File name for exported boundaries.
pub const BOUNDARIES_FILE_NAME: &str = "county_boundaries.geojson";

/// Errors raised by an [`ExportSink`].
#[derive(Debug, Error)]
pub enum ExportError {
    /// Creating or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Statistics could not be serialized.
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Boundaries could not be serialized.
    #[error("Boundary error: {0}")]
    Boundary(#[from] BoundaryError),
}

/// Destination for the dashboard's statistics table and boundaries.
///
/// The dashboard hands data over unmodified; the sink decides the format.
pub trait ExportSink {
    /// Receives every statistics row, ordered by state, county, date.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the rows cannot be written.
    fn write_table(&mut self, records: &[StatRecord]) -> Result<(), ExportError>;

    /// Receives the loaded boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the boundaries cannot be written.
    fn write_geometry(&mut self, store: &BoundaryStore) -> Result<(), ExportError>;
}

/// Writes [`STATS_FILE_NAME`] and [`BOUNDARIES_FILE_NAME`] into a
/// directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink targeting `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the statistics CSV.
    #[must_use]
    pub fn stats_path(&self) -> PathBuf {
        self.dir.join(STATS_FILE_NAME)
    }

    /// Path of the boundaries `GeoJSON`.
    #[must_use]
    pub fn boundaries_path(&self) -> PathBuf {
        self.dir.join(BOUNDARIES_FILE_NAME)
    }

    fn create(&self, path: &Path) -> Result<BufWriter<File>, ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(BufWriter::new(File::create(path)?))
    }
}

impl ExportSink for DirectorySink {
    fn write_table(&mut self, records: &[StatRecord]) -> Result<(), ExportError> {
        let path = self.stats_path();
        write_records_csv(records, self.create(&path)?)?;
        log::info!("Wrote {} rows to {}", records.len(), path.display());
        Ok(())
    }

    fn write_geometry(&mut self, store: &BoundaryStore) -> Result<(), ExportError> {
        let path = self.boundaries_path();
        store.write_geojson(self.create(&path)?)?;
        log::info!("Wrote {} boundaries to {}", store.len(), path.display());
        Ok(())
    }
}
