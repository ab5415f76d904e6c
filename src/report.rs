use std::any::TypeId;
use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::Path;

use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::error::SisError;
use crate::hashing::HashMap;
use crate::sweep::SweepOutcome;

/// A row type that can be written to its own CSV report.
pub trait Report: Serialize + 'static {}

/// Mean stationary prevalence of one sweep point.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PrevalenceRow {
    pub graph: String,
    pub mu: f64,
    pub beta: f64,
    pub prevalence: f64,
}

impl Report for PrevalenceRow {}

/// One time point of the illustrative series of a sweep point.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SeriesRow {
    pub graph: String,
    pub mu: f64,
    pub beta: f64,
    pub t: usize,
    pub prevalence: f64,
}

impl Report for SeriesRow {}

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist. Returns the file if successful. Called by `add_report`
fn generate_validate_filepath(path: &Path) -> Result<File, SisError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Ok(file)
        }
        _ => Err(SisError::ReportError(
            "Report output files must be CSVs at this time".to_string(),
        )),
    }
}

/// A set of CSV writers, one per report row type.
#[derive(Default)]
pub struct Reports {
    file_writers: HashMap<TypeId, Writer<File>>,
}

impl Reports {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `path` as the output of the report type `T`, replacing any previous output.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a `.csv` path or cannot be created.
    pub fn add_report<T: Report>(&mut self, path: &Path) -> Result<(), SisError> {
        let file = generate_validate_filepath(path)?;
        self.file_writers
            .insert(TypeId::of::<T>(), Writer::from_writer(file));
        Ok(())
    }

    /// Writes `report` as a new row of the report registered for its type.
    ///
    /// # Errors
    ///
    /// Returns an error if no report was added for `T` or writing fails.
    pub fn send_report<T: Report>(&mut self, report: &T) -> Result<(), SisError> {
        let writer = self
            .file_writers
            .get_mut(&TypeId::of::<T>())
            .ok_or_else(|| {
                SisError::ReportError(format!(
                    "No writer found for the report type {}",
                    std::any::type_name::<T>()
                ))
            })?;
        writer.serialize(report)?;
        Ok(())
    }

    /// Flushes every open report.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error encountered.
    pub fn flush(&mut self) -> Result<(), SisError> {
        for writer in self.file_writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Writes the curves and series of `outcome` to `<dir>/<stem>_prevalence.csv` and
/// `<dir>/<stem>_series.csv`.
///
/// # Errors
///
/// Returns an error if a file cannot be created or written.
pub fn write_sweep_reports(outcome: &SweepOutcome, dir: &Path, stem: &str) -> Result<(), SisError> {
    let mut reports = Reports::new();
    reports.add_report::<PrevalenceRow>(&dir.join(format!("{stem}_prevalence.csv")))?;
    reports.add_report::<SeriesRow>(&dir.join(format!("{stem}_series.csv")))?;

    for point in &outcome.points {
        reports.send_report(&PrevalenceRow {
            graph: outcome.graph.clone(),
            mu: point.mu,
            beta: point.beta,
            prevalence: point.mean_prevalence,
        })?;
    }
    for record in &outcome.series {
        for (t, &prevalence) in record.series.iter().enumerate() {
            reports.send_report(&SeriesRow {
                graph: outcome.graph.clone(),
                mu: record.mu,
                beta: record.beta,
                t,
                prevalence,
            })?;
        }
    }
    reports.flush()
}
