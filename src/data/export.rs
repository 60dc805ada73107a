use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Value as JsonValue};

use super::model::{MonthlySeries, YearMonth, YearSeries};
use super::table::YearTable;

// ---------------------------------------------------------------------------
// ExportFrame – what the writers consume
// ---------------------------------------------------------------------------

/// Row labels of an exported frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RowIndex<'a> {
    /// Integer `year` column.
    Year(Cow<'a, [i32]>),
    /// `date` column formatted `YYYY-MM`.
    Date(Vec<YearMonth>),
}

impl RowIndex<'_> {
    fn name(&self) -> &'static str {
        match self {
            RowIndex::Year(_) => "year",
            RowIndex::Date(_) => "date",
        }
    }

    fn len(&self) -> usize {
        match self {
            RowIndex::Year(years) => years.len(),
            RowIndex::Date(dates) => dates.len(),
        }
    }

    fn label(&self, row: usize) -> String {
        match self {
            RowIndex::Year(years) => years[row].to_string(),
            RowIndex::Date(dates) => dates[row].to_string(),
        }
    }

    fn json(&self, row: usize) -> JsonValue {
        match self {
            RowIndex::Year(years) => JsonValue::from(years[row]),
            RowIndex::Date(dates) => JsonValue::from(dates[row].to_string()),
        }
    }

    fn arrow(&self) -> (Field, ArrayRef) {
        match self {
            RowIndex::Year(years) => (
                Field::new(self.name(), DataType::Int32, false),
                Arc::new(Int32Array::from(years.to_vec())),
            ),
            RowIndex::Date(dates) => (
                Field::new(self.name(), DataType::Utf8, false),
                Arc::new(StringArray::from(
                    dates.iter().map(ToString::to_string).collect::<Vec<_>>(),
                )),
            ),
        }
    }
}

/// A row index plus named float columns of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFrame<'a> {
    index: RowIndex<'a>,
    columns: Vec<(Cow<'a, str>, Cow<'a, [f64]>)>,
}

impl ExportFrame<'_> {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn header(&self) -> Vec<&str> {
        std::iter::once(self.index.name())
            .chain(self.columns.iter().map(|(name, _)| &**name))
            .collect()
    }
}

impl<'a> From<&'a YearTable> for ExportFrame<'a> {
    fn from(table: &'a YearTable) -> Self {
        ExportFrame {
            index: RowIndex::Year(Cow::Borrowed(table.years())),
            columns: table
                .columns()
                .map(|(name, values)| (Cow::Borrowed(name), Cow::Borrowed(values)))
                .collect(),
        }
    }
}

impl From<&YearSeries> for ExportFrame<'static> {
    fn from(series: &YearSeries) -> Self {
        ExportFrame {
            index: RowIndex::Year(Cow::Owned(series.years().collect())),
            columns: vec![(Cow::Borrowed("value"), Cow::Owned(series.values().collect()))],
        }
    }
}

/// `date,value` rows.
impl From<&MonthlySeries> for ExportFrame<'static> {
    fn from(series: &MonthlySeries) -> Self {
        ExportFrame {
            index: RowIndex::Date(series.dates().collect()),
            columns: vec![(Cow::Borrowed("value"), Cow::Owned(series.values().collect()))],
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Output formats, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Parquet,
}

impl ExportFormat {
    /// Supported extensions:
    /// * `.csv`             – header row, one line per row
    /// * `.json`            – `[{ "year": 2000, "col": 1.0, ... }, ...]`
    /// * `.parquet` / `.pq` – the index column plus one Float64 column per value column
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "parquet" | "pq" => Ok(ExportFormat::Parquet),
            other => bail!("Unsupported export extension: .{other}"),
        }
    }
}

/// Write `data` to `path` in the format implied by its extension.
pub fn export_path<'a>(data: impl Into<ExportFrame<'a>>, path: &Path) -> Result<()> {
    let frame = data.into();
    let format = ExportFormat::from_path(path)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;

    let written = match format {
        ExportFormat::Csv => write_csv(frame.clone(), BufWriter::new(file)),
        ExportFormat::Json => write_json(frame.clone(), BufWriter::new(file)),
        ExportFormat::Parquet => write_parquet(frame.clone(), file),
    };
    written.with_context(|| format!("writing {}", path.display()))?;

    log::info!("Wrote {} rows to {}", frame.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Header row `<index>,<column>,...` followed by one record per row.
pub fn write_csv<'a, W: Write>(data: impl Into<ExportFrame<'a>>, writer: W) -> Result<()> {
    let frame = data.into();
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(&frame.header()).context("writing CSV header")?;

    for row in 0..frame.len() {
        let record = std::iter::once(frame.index.label(row))
            .chain(frame.columns.iter().map(|(_, values)| values[row].to_string()));
        out.write_record(record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    out.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON writer
// ---------------------------------------------------------------------------

/// Records-oriented array, one object per row. Non-finite values become `null`.
pub fn write_json<'a, W: Write>(data: impl Into<ExportFrame<'a>>, mut writer: W) -> Result<()> {
    let frame = data.into();
    let records: Vec<JsonValue> = (0..frame.len())
        .map(|row| {
            let mut obj = Map::new();
            obj.insert(frame.index.name().to_string(), frame.index.json(row));
            for (name, values) in &frame.columns {
                obj.insert(name.to_string(), JsonValue::from(values[row]));
            }
            JsonValue::Object(obj)
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &records).context("serializing JSON")?;
    writer.flush().context("flushing JSON")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

/// Single record batch: the index column, then one Float64 column per value column.
pub fn write_parquet<'a, W: Write + Send>(data: impl Into<ExportFrame<'a>>, writer: W) -> Result<()> {
    let batch = to_record_batch(&data.into())?;
    let mut out = ArrowWriter::try_new(writer, batch.schema(), None)
        .context("creating parquet writer")?;
    out.write(&batch).context("writing parquet record batch")?;
    out.close().context("closing parquet writer")?;
    Ok(())
}

fn to_record_batch(frame: &ExportFrame<'_>) -> Result<RecordBatch> {
    let (index_field, index_array) = frame.index.arrow();
    let mut fields = vec![index_field];
    let mut arrays = vec![index_array];

    for (name, values) in &frame.columns {
        fields.push(Field::new(name.to_string(), DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(values.to_vec())) as ArrayRef);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building record batch")
}
