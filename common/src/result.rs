use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    name::parse_benchmark_name,
    util::{parse_flag, time_unit_to_ns},
};

const COL_NAME: &str = "name";
const COL_CPU_TIME: &str = "cpu_time";
const COL_TIME_UNIT: &str = "time_unit";
const COL_ERROR: &str = "error_occurred";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV file not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("Could not find the CSV header row starting with 'name,' in {}", .0.display())]
    MissingHeader(PathBuf),
    #[error("Column '{column}' missing from header in {}", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("No valid benchmark data found in {} after parsing and filtering", .0.display())]
    NoData(PathBuf),
    #[error("Read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Parse CSV {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    /// Conditions that end the run quietly instead of failing it
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LoadError::Io { .. } | LoadError::Csv { .. })
    }
}

/// One measurement row of a Google Benchmark CSV
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    pub name: String,
    pub variant: String,
    pub size: Option<u64>,
    pub threads: Option<u64>,
    pub cpu_time: f64,
    pub time_unit: String,
}

impl BenchmarkRecord {
    /// Unknown units are taken to already be nanoseconds
    pub fn cpu_time_ns(&self) -> f64 {
        self.cpu_time * time_unit_to_ns(&self.time_unit).unwrap_or(1.0)
    }
}

struct Columns {
    name: usize,
    cpu_time: usize,
    time_unit: usize,
    error: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord, path: &Path) -> Result<Self, LoadError> {
        let positions: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim(), i))
            .collect();
        let required = |column: &'static str| {
            positions
                .get(column)
                .copied()
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };
        Ok(Self {
            name: required(COL_NAME)?,
            cpu_time: required(COL_CPU_TIME)?,
            time_unit: required(COL_TIME_UNIT)?,
            error: positions.get(COL_ERROR).copied(),
        })
    }
}

/// Byte offset of the header row, skipping the context lines Google Benchmark
/// may print ahead of it
fn find_header(data: &str) -> Option<usize> {
    let header = Regex::new(r#"^\s*"?name"?,"#).ok()?;
    let mut offset = 0;
    for line in data.split_inclusive('\n') {
        if header.is_match(line) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

pub fn load_results(
    path: &Path,
    threaded_variant: &str,
) -> Result<Vec<BenchmarkRecord>, LoadError> {
    let data = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let records = parse_results(&data, path, threaded_variant)?;
    if records.is_empty() {
        return Err(LoadError::NoData(path.to_path_buf()));
    }
    Ok(records)
}

/// `path` is only used for error reporting
pub fn parse_results(
    data: &str,
    path: &Path,
    threaded_variant: &str,
) -> Result<Vec<BenchmarkRecord>, LoadError> {
    let start = find_header(data).ok_or_else(|| LoadError::MissingHeader(path.to_path_buf()))?;
    debug!("Header found at byte {start} of {}", path.display());

    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(data[start..].as_bytes());
    let columns = Columns::from_header(reader.headers().map_err(csv_err)?, path)?;

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.map_err(csv_err)?;
        if let Some(record) = parse_row(&row, &columns, threaded_variant) {
            records.push(record);
        } else {
            debug!(
                "Skipping row {} of {}: {:?}",
                line + 1,
                path.display(),
                row.get(columns.name)
            );
        }
    }
    Ok(records)
}

fn parse_row(
    row: &StringRecord,
    columns: &Columns,
    threaded_variant: &str,
) -> Option<BenchmarkRecord> {
    let time_unit = row.get(columns.time_unit).map(str::trim).unwrap_or_default();
    if time_unit.is_empty() {
        return None;
    }
    if columns
        .error
        .and_then(|i| row.get(i))
        .is_some_and(parse_flag)
    {
        return None;
    }

    let name = row.get(columns.name)?.trim();
    let parsed = parse_benchmark_name(name, threaded_variant);
    if parsed.size.is_none() {
        return None;
    }

    let cpu_time = match row.get(columns.cpu_time)?.trim().parse::<f64>() {
        Ok(t) => t,
        Err(_) => {
            warn!("Unreadable cpu_time for {name}");
            return None;
        }
    };

    Some(BenchmarkRecord {
        name: name.to_owned(),
        variant: parsed.variant,
        size: parsed.size,
        threads: parsed.threads,
        cpu_time,
        time_unit: time_unit.to_owned(),
    })
}
