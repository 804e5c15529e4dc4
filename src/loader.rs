use polars::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::DTError;
use crate::record::{CellValue, Dataset, Record};

#[derive(Debug, PartialEq)]
enum FileType {
    JSON,
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
pub struct FileInfo {
    pub path: PathBuf,
    pub file_size: u64,
    file_type: FileType,
}

impl FileInfo {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string()
    }
}

/// A dataset read from disk. `records` is `None` for a JSON `null` document.
pub struct LoadedDataset {
    pub info: FileInfo,
    pub records: Option<Dataset>,
}

struct Column {
    name: String,
    data: Vec<CellValue>,
}

pub fn expand_path(raw: &str) -> Result<PathBuf, DTError> {
    shellexpand::full(raw)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| DTError::LoadingFailed(e.to_string()))
}

pub fn load_data_file(path: PathBuf) -> Result<LoadedDataset, DTError> {
    let info = get_file_info(path)?;
    let start_time = Instant::now();

    let records = match info.file_type {
        FileType::JSON => load_json(&info.path)?,
        FileType::CSV => Some(load_frame(load_csv(&info.path)?)?),
        FileType::PARQUET => Some(load_frame(load_parquet(&info.path)?)?),
        FileType::ARROW => Some(load_frame(load_arrow(&info.path)?)?),
    };

    let data_loading_duration = start_time.elapsed().as_millis();
    info!(
        "Loaded {} records from {} ({} bytes) in {data_loading_duration}ms",
        records.as_ref().map_or(0, Vec::len),
        info.path.display(),
        info.file_size,
    );
    Ok(LoadedDataset { info, records })
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, DTError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DTError::FileNotFound,
        ErrorKind::PermissionDenied => DTError::PermissionDenied,
        _ => DTError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(DTError::LoadingFailed("Not a file!".into()));
    }

    let file_size = metadata.len();
    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size,
        file_type,
    })
}

fn detect_file_type(path: &Path) -> Result<FileType, DTError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("JSON") => Ok(FileType::JSON),
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(DTError::UnknownFileType),
    }
}

fn load_json(path: &Path) -> Result<Option<Dataset>, DTError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

/// Convert a frame to records. Each column is converted in its own rayon task.
fn load_frame(frame: LazyFrame) -> Result<Dataset, DTError> {
    let df = frame.collect()?;
    let columns = df
        .get_column_names()
        .par_iter()
        .map(|name| load_column(&df, name))
        .collect::<Result<Vec<Column>, PolarsError>>()?;

    for c in columns.iter() {
        debug!("Column \"{}\": {} values", c.name, c.data.len());
    }

    let records = (0..df.height())
        .map(|row| {
            columns
                .iter()
                .map(|c| (c.name.clone(), c.data[row].clone()))
                .collect::<Record>()
        })
        .collect();
    Ok(records)
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<Column, PolarsError> {
    let dtype = df.column(col_name)?.dtype().clone();
    let col = df.column(col_name)?.cast(&DataType::String)?;
    let series = col.str()?;

    let data = series
        .into_iter()
        .map(|value| match value {
            Some(s) => typed_value(&dtype, s),
            None => CellValue::Null,
        })
        .collect();

    Ok(Column {
        name: col_name.to_string(),
        data,
    })
}

fn typed_value(dtype: &DataType, s: &str) -> CellValue {
    let parsed = if is_integer_type(dtype) {
        s.parse::<i64>().ok().map(CellValue::Int)
    } else if matches!(dtype, DataType::Float32 | DataType::Float64) {
        s.parse::<f64>().ok().map(CellValue::Float)
    } else if matches!(dtype, DataType::Boolean) {
        s.parse::<bool>().ok().map(CellValue::Bool)
    } else {
        None
    };
    parsed.unwrap_or_else(|| CellValue::Text(s.to_string()))
}

fn is_integer_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}
