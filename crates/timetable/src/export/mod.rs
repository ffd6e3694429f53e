//! Export serializers for built grids.
//!
//! CSV output has a fixed layout (see [`csv`]). PDF output is a best-effort
//! picture of the on-screen grid without its interactive controls (see
//! [`pdf`]). Either way the result is an [`Artifact`], which can be streamed
//! to a client or persisted with [`write_artifact`].

pub mod csv;
pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{error, info};

use crate::grid::{Grid, View};
use crate::render::{Affordances, Snapshot};

/// Failure to produce an export artifact. No partial output is left behind.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write export to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported export format: {0:?}")]
    UnsupportedFormat(String),

    /// The background render task did not complete
    #[error("Export task failed: {message}")]
    Task { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// File name for an export of `view`, e.g. `timetable-Monday.csv`.
pub fn file_name(view: &View, format: ExportFormat) -> String {
    format!("{}.{}", view.file_stem(), format.extension())
}

/// A finished export, ready to be sent or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Serializes `grid` in `format`. PDF exports paint the grid with its
    /// controls hidden; `title` is only used there.
    pub fn render(grid: &Grid, format: ExportFormat, title: &str) -> Result<Self, ExportError> {
        let bytes = match format {
            ExportFormat::Csv => csv::export_csv(grid),
            ExportFormat::Pdf => {
                let snapshot = Snapshot::from_grid(grid, title, Affordances::Hidden);
                pdf::export_pdf(&snapshot)?
            }
        };

        Ok(Self {
            file_name: file_name(grid.view(), format),
            format,
            bytes,
        })
    }
}

/// Writes `artifact` into `dir`, returning the final path.
///
/// The bytes go to a hidden temporary file first and are renamed into place,
/// so the target either holds the complete artifact or is untouched. Each
/// call uses its own temporary file; concurrent saves of the same view
/// leave one of the complete artifacts behind.
pub fn write_artifact(dir: &Path, artifact: &Artifact) -> Result<PathBuf, ExportError> {
    let target = dir.join(&artifact.file_name);
    let temp = dir.join(format!(
        ".{}.{}.partial",
        artifact.file_name,
        uuid::Uuid::new_v4().simple()
    ));

    let persist_err = |path: &Path, source: std::io::Error| ExportError::Persist {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(|e| persist_err(dir, e))?;

    if let Err(e) = fs::write(&temp, &artifact.bytes) {
        let _ = fs::remove_file(&temp);
        error!("Failed to write export {}: {}", temp.display(), e);
        return Err(persist_err(&temp, e));
    }

    if let Err(e) = fs::rename(&temp, &target) {
        let _ = fs::remove_file(&temp);
        error!("Failed to move export into {}: {}", target.display(), e);
        return Err(persist_err(&target, e));
    }

    info!(
        "Saved {} ({} bytes) to {}",
        artifact.file_name,
        artifact.bytes.len(),
        target.display()
    );
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{build_grid, Axes, ClassScope, Day, DayScope};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    #[test]
    fn test_file_names() {
        let monday = View::Day(DayScope::Single(Day::Monday));
        assert_eq!(file_name(&monday, ExportFormat::Csv), "timetable-Monday.csv");
        assert_eq!(
            file_name(&View::Day(DayScope::All), ExportFormat::Pdf),
            "timetable-all-days.pdf"
        );
        assert_eq!(
            file_name(&View::Class(ClassScope::Single("BCA II".into())), ExportFormat::Csv),
            "timetable-BCA II.csv"
        );
        assert_eq!(
            file_name(&View::Class(ClassScope::All), ExportFormat::Csv),
            "complete-timetable-class-view.csv"
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_empty_grid_exports_in_both_formats() {
        let grid = build_grid(&[], &Axes::default(), &View::Class(ClassScope::All));

        let csv = Artifact::render(&grid, ExportFormat::Csv, "TT").unwrap();
        let text = String::from_utf8(csv.bytes).unwrap();
        assert_eq!(text.matches("\r\n").count(), 1 + 4 * 5);

        let pdf = Artifact::render(&grid, ExportFormat::Pdf, "TT").unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(pdf.file_name, "complete-timetable-class-view.pdf");
    }

    #[test]
    fn test_write_artifact_replaces_atomically() {
        let dir = temp_dir("timetable-export");
        let grid = build_grid(&[], &Axes::default(), &View::Day(DayScope::All));
        let artifact = Artifact::render(&grid, ExportFormat::Csv, "TT").unwrap();

        let path = write_artifact(&dir, &artifact).unwrap();
        assert_eq!(path, dir.join("timetable-all-days.csv"));
        assert_eq!(fs::read(&path).unwrap(), artifact.bytes);
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
            .collect();
        assert!(leftovers.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_concurrent_saves_of_one_view() {
        let dir = temp_dir("timetable-export-race");
        let large = Artifact {
            file_name: "timetable-Monday.csv".to_string(),
            format: ExportFormat::Csv,
            bytes: vec![b'a'; 4 * 1024 * 1024],
        };
        let small = Artifact {
            bytes: vec![b'b'; 1024],
            ..large.clone()
        };

        for _ in 0..20 {
            let handles: Vec<_> = [large.clone(), small.clone()]
                .into_iter()
                .map(|artifact| {
                    let dir = dir.clone();
                    std::thread::spawn(move || write_artifact(&dir, &artifact))
                })
                .collect();
            for handle in handles {
                handle.join().expect("writer thread").unwrap();
            }

            let saved = fs::read(dir.join("timetable-Monday.csv")).unwrap();
            assert!(saved == large.bytes || saved == small.bytes);
        }

        let names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["timetable-Monday.csv".to_string()]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_artifact_failure_leaves_nothing() {
        let dir = temp_dir("timetable-export-fail");
        // A regular file where the export directory should be
        let blocker = dir.join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let grid = build_grid(&[], &Axes::default(), &View::Day(DayScope::All));
        let artifact = Artifact::render(&grid, ExportFormat::Csv, "TT").unwrap();

        let err = write_artifact(&blocker, &artifact).unwrap_err();
        assert!(matches!(err, ExportError::Persist { .. }));
        assert!(!blocker.join("timetable-all-days.csv").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
