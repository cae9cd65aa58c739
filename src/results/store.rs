//! CSV files in a results directory

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analysis::AuthorWeekPerformance;
use crate::core::BuildRecord;
use crate::results::{local_now, Clock, ResultKind, ResultLocation, ResultsError, ResultsStore};

/// CSV results store
pub struct CsvResultsStore {
    dir: PathBuf,
    clock: Clock,
}

impl CsvResultsStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_clock(dir, local_now)
    }

    pub fn with_clock<P: Into<PathBuf>>(dir: P, clock: Clock) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn new_location(&self, kind: ResultKind) -> Result<ResultLocation, ResultsError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ResultsError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let timestamp = (self.clock)();
        let name = kind.file_name(timestamp);
        Ok(ResultLocation {
            kind,
            path: Some(self.dir.join(&name)),
            name,
            timestamp,
        })
    }

    fn write_rows<T: Serialize>(
        location: &ResultLocation,
        path: &Path,
        headers: &[&str],
        rows: &[T],
    ) -> Result<(), ResultsError> {
        let csv_err = |source| ResultsError::Csv {
            location: location.to_string(),
            source,
        };

        // Headers are written by hand so an empty report still has them
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(csv_err)?;
        writer.write_record(headers).map_err(csv_err)?;
        for row in rows {
            writer.serialize(row).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| ResultsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

/// Read a raw-data CSV written by `save_builds`
pub fn read_builds(path: &Path) -> Result<Vec<BuildRecord>, ResultsError> {
    let csv_err = |source| ResultsError::Csv {
        location: path.display().to_string(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let records = reader
        .deserialize::<BuildRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    debug!("Read {} build records from {}", records.len(), path.display());
    Ok(records)
}

impl ResultsStore for CsvResultsStore {
    fn save_builds(&self, records: &[BuildRecord]) -> Result<ResultLocation, ResultsError> {
        let location = self.new_location(ResultKind::WorkflowData)?;
        let path = self.dir.join(&location.name);
        Self::write_rows(&location, &path, &BuildRecord::HEADERS, records)?;
        Ok(location)
    }

    fn latest_builds(&self) -> Result<(ResultLocation, Vec<BuildRecord>), ResultsError> {
        let latest = self
            .list(ResultKind::WorkflowData)?
            .pop()
            .ok_or_else(|| ResultsError::NoBuildData(self.dir.display().to_string()))?;

        let path = self.dir.join(&latest.name);
        let records = read_builds(&path)?;
        Ok((latest, records))
    }

    fn save_performance(&self, rows: &[AuthorWeekPerformance]) -> Result<ResultLocation, ResultsError> {
        let location = self.new_location(ResultKind::Performance)?;
        let path = self.dir.join(&location.name);
        Self::write_rows(&location, &path, &AuthorWeekPerformance::HEADERS, rows)?;
        Ok(location)
    }

    fn list(&self, kind: ResultKind) -> Result<Vec<ResultLocation>, ResultsError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ResultsError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut locations: Vec<ResultLocation> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let timestamp = kind.parse_file_name(&name)?;
                Some(ResultLocation {
                    kind,
                    path: Some(entry.path()),
                    name,
                    timestamp,
                })
            })
            .collect();

        locations.sort_by_key(|l| l.timestamp);
        Ok(locations)
    }
}
