use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, BooleanBuilder, Float32Array, Float64Array, Float64Builder,
    Int32Array, Int64Array, Int64Builder, LargeListArray, LargeStringArray, ListArray, ListBuilder,
    StringArray, StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use serde_json::Value as JsonValue;

use super::model::{MetadataValue, SpectralDataset, Spectrum};

/// Metadata column holding the spectrum identifier.
pub const NAME_COLUMN: &str = "name";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a spectral dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – Parquet file with `x` and `y` list columns (recommended)
/// * `.json`    – `[{ "x": [...], "y": [...], ...meta }, ...]`
/// * `.csv`     – columns `x` and `y` containing semicolon-separated floats,
///   or a single spectrum as two numeric columns (axis, intensity)
///
/// Axes stored high → low are reversed to ascending order.
pub fn load_file(path: &Path) -> Result<SpectralDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "loaded {} spectra from {} (columns {:?})",
        dataset.len(),
        path.display(),
        dataset.column_names
    );
    Ok(dataset)
}

/// Turn one loaded row into a [`Spectrum`], pulling the name out of the
/// metadata.
fn build_spectrum(
    x: Vec<f64>,
    y: Vec<f64>,
    mut metadata: BTreeMap<String, MetadataValue>,
    row: usize,
) -> Result<Spectrum> {
    let name = match metadata.remove(NAME_COLUMN) {
        Some(MetadataValue::Null) | None => format!("spectrum {row}"),
        Some(value) => value.to_string(),
    };
    let spectrum = Spectrum::from_samples(x, y).with_context(|| format!("Row {row}"))?;
    Ok(spectrum.with_name(name).with_metadata(metadata))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "x": [4000.0, 3999.0, ...],
///     "y": [0.12,   0.14,  ...],
///     "name": "bottle-17",
///     "line": 2
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<SpectralDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut spectra = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let x = json_array_to_f64(obj.get("x"), i, "x")?;
        let y = json_array_to_f64(obj.get("y"), i, "y")?;

        let metadata = obj
            .iter()
            .filter(|(key, _)| key.as_str() != "x" && key.as_str() != "y")
            .map(|(key, val)| (key.clone(), json_to_metadata(val)))
            .collect();

        spectra.push(build_spectrum(x, y, metadata, i)?);
    }

    Ok(SpectralDataset::from_spectra(spectra))
}

fn json_array_to_f64(val: Option<&JsonValue>, row: usize, col: &str) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .with_context(|| format!("Row {row}: missing or invalid '{col}' array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .with_context(|| format!("Row {row}, {col}[{j}]: not a number"))
        })
        .collect()
}

fn json_to_metadata(val: &JsonValue) -> MetadataValue {
    match val {
        JsonValue::String(s) => MetadataValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                MetadataValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                MetadataValue::Float(f)
            } else {
                MetadataValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => MetadataValue::Bool(*b),
        JsonValue::Null => MetadataValue::Null,
        other => MetadataValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names.
/// `x` and `y` columns contain semicolon-separated floats:
///   `"4000.0;3999.0;3998.0"`, `"0.12;0.14;0.11"`
/// All other columns are treated as metadata.
///
/// A file without `x`/`y` columns but exactly two columns is read as one
/// spectrum sampled row by row, named after the file stem.
fn load_csv(path: &Path) -> Result<SpectralDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let x_idx = headers.iter().position(|h| h == "x");
    let y_idx = headers.iter().position(|h| h == "y");

    let (x_idx, y_idx) = match (x_idx, y_idx) {
        (Some(x), Some(y)) => (x, y),
        _ if headers.len() == 2 => return load_csv_series(path, reader),
        (None, _) => bail!("CSV missing 'x' column"),
        (_, None) => bail!("CSV missing 'y' column"),
    };

    let mut spectra = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let x = parse_semicolon_floats(record.get(x_idx).unwrap_or(""), row_no, "x")?;
        let y = parse_semicolon_floats(record.get(y_idx).unwrap_or(""), row_no, "y")?;

        let metadata = record
            .iter()
            .enumerate()
            .filter(|(col_idx, _)| *col_idx != x_idx && *col_idx != y_idx)
            .map(|(col_idx, value)| (headers[col_idx].clone(), guess_metadata_type(value)))
            .collect();

        spectra.push(build_spectrum(x, y, metadata, row_no)?);
    }

    Ok(SpectralDataset::from_spectra(spectra))
}

fn load_csv_series(path: &Path, mut reader: csv::Reader<std::fs::File>) -> Result<SpectralDataset> {
    let mut x = Vec::new();
    let mut y = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |idx: usize| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("").trim();
            raw.parse::<f64>()
                .with_context(|| format!("Row {row_no}, column {idx}: '{raw}' is not a number"))
        };
        x.push(field(0)?);
        y.push(field(1)?);
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spectrum 0")
        .to_string();
    let spectrum = Spectrum::from_samples(x, y)
        .context("CSV series")?
        .with_name(name);
    Ok(SpectralDataset::from_spectra(vec![spectrum]))
}

fn parse_semicolon_floats(s: &str, row: usize, col: &str) -> Result<Vec<f64>> {
    s.split(';')
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<f64>()
                .with_context(|| format!("Row {row}, {col}[{j}]: '{tok}' is not a number"))
        })
        .collect()
}

fn guess_metadata_type(s: &str) -> MetadataValue {
    if s.is_empty() {
        return MetadataValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return MetadataValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return MetadataValue::Float(f);
    }
    if s == "true" || s == "false" {
        return MetadataValue::Bool(s == "true");
    }
    MetadataValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing spectral data.
///
/// Expected schema:
/// - `x`: List<Float64> or LargeList<Float64> – wavenumber arrays
/// - `y`: List<Float64> or LargeList<Float64> – absorbance arrays
/// - Any other columns are treated as metadata (strings, ints, floats, bools)
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SpectralDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut spectra = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let x_idx = schema
            .index_of("x")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'x' column"))?;
        let y_idx = schema
            .index_of("y")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'y' column"))?;

        let x_col = batch.column(x_idx);
        let y_col = batch.column(y_idx);

        let meta_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != x_idx && *i != y_idx)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..batch.num_rows() {
            let global_row = spectra.len();
            let x = extract_f64_list(x_col, row)
                .with_context(|| format!("Row {global_row}: failed to read 'x'"))?;
            let y = extract_f64_list(y_col, row)
                .with_context(|| format!("Row {global_row}: failed to read 'y'"))?;

            let metadata = meta_cols
                .iter()
                .map(|(col_idx, col_name)| {
                    (col_name.clone(), extract_metadata_value(batch.column(*col_idx), row))
                })
                .collect();

            spectra.push(build_spectrum(x, y, metadata, global_row)?);
        }
    }

    Ok(SpectralDataset::from_spectra(spectra))
}

// -- Parquet / Arrow helpers --

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &ArrayRef, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values_array = match col.data_type() {
        DataType::List(_) => col
            .as_any()
            .downcast_ref::<ListArray>()
            .context("expected ListArray")?
            .value(row),
        DataType::LargeList(_) => col
            .as_any()
            .downcast_ref::<LargeListArray>()
            .context("expected LargeListArray")?
            .value(row),
        other => bail!("Expected List or LargeList column, got {other:?}"),
    };

    // The inner array can be Float64 or Float32
    if let Some(f64_arr) = values_array.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = values_array.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.iter().map(|v| v.map_or(f64::NAN, f64::from)).collect())
    } else {
        bail!(
            "List inner type is {:?}, expected Float64 or Float32",
            values_array.data_type()
        )
    }
}

/// Extract a single metadata value from an Arrow column at a given row.
fn extract_metadata_value(col: &ArrayRef, row: usize) -> MetadataValue {
    if col.is_null(row) {
        return MetadataValue::Null;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| MetadataValue::String(a.value(row).to_string())),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| MetadataValue::String(a.value(row).to_string())),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| MetadataValue::Integer(i64::from(a.value(row)))),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| MetadataValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| MetadataValue::Float(f64::from(a.value(row)))),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| MetadataValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| MetadataValue::Bool(a.value(row))),
        _ => None,
    };
    value.unwrap_or_else(|| MetadataValue::String(format!("{:?}", col.data_type())))
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

/// Write `dataset` in the layout [`load_file`] reads back: `x`/`y` list
/// columns, a `name` column and one column per metadata key. A metadata
/// column whose values mix types is stored as text.
pub fn write_parquet(dataset: &SpectralDataset, path: &Path) -> Result<()> {
    let list_field = || Arc::new(Field::new("item", DataType::Float64, true));

    let mut x_builder = ListBuilder::new(Float64Builder::new());
    let mut y_builder = ListBuilder::new(Float64Builder::new());
    let mut name_builder = StringBuilder::new();
    for sp in &dataset.spectra {
        x_builder.values().append_slice(sp.axis());
        x_builder.append(true);
        y_builder.values().append_slice(sp.intensity());
        y_builder.append(true);
        name_builder.append_option(sp.name());
    }

    let mut fields = vec![
        Field::new("x", DataType::List(list_field()), false),
        Field::new("y", DataType::List(list_field()), false),
        Field::new(NAME_COLUMN, DataType::Utf8, true),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(x_builder.finish()),
        Arc::new(y_builder.finish()),
        Arc::new(name_builder.finish()),
    ];

    for column in &dataset.column_names {
        let values: Vec<&MetadataValue> = dataset
            .spectra
            .iter()
            .map(|sp| sp.metadata().get(column).unwrap_or(&MetadataValue::Null))
            .collect();
        let (data_type, array) = metadata_column(&values);
        fields.push(Field::new(column, data_type, true));
        columns.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn metadata_column(values: &[&MetadataValue]) -> (DataType, ArrayRef) {
    let mut kinds = values.iter().filter_map(|v| match v {
        MetadataValue::Null => None,
        MetadataValue::Integer(_) => Some(DataType::Int64),
        MetadataValue::Float(_) => Some(DataType::Float64),
        MetadataValue::Bool(_) => Some(DataType::Boolean),
        MetadataValue::String(_) => Some(DataType::Utf8),
    });
    let first = kinds.next().unwrap_or(DataType::Utf8);
    let data_type = if kinds.all(|k| k == first) {
        first
    } else {
        DataType::Utf8
    };

    let array: ArrayRef = match data_type {
        DataType::Int64 => {
            let mut b = Int64Builder::new();
            for v in values {
                match v {
                    MetadataValue::Integer(i) => b.append_value(*i),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        DataType::Float64 => {
            let mut b = Float64Builder::new();
            for v in values {
                match v {
                    MetadataValue::Float(f) => b.append_value(*f),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        DataType::Boolean => {
            let mut b = BooleanBuilder::new();
            for v in values {
                match v {
                    MetadataValue::Bool(flag) => b.append_value(*flag),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        _ => {
            let mut b = StringBuilder::new();
            for v in values {
                match v {
                    MetadataValue::Null => b.append_null(),
                    other => b.append_value(other.to_string()),
                }
            }
            Arc::new(b.finish())
        }
    };
    (data_type, array)
}
