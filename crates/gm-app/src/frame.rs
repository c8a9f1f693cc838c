//! Loading CSV files into data frames

use anyhow::{Context, Result};
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

/// Rows sampled for schema inference
const INFER_RECORDS: usize = 1000;

/// Read a CSV file with a header row into a single frame
pub fn load_csv(path: &Path) -> Result<RecordBatch> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let format = Format::default().with_header(true);
    let (schema, _) = format
        .infer_schema(&mut file, Some(INFER_RECORDS))
        .with_context(|| format!("Failed to infer schema of {}", path.display()))?;
    file.seek(SeekFrom::Start(0))?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(file)?;
    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let frame = concat_batches(&schema, &batches)?;

    tracing::info!(
        "Loaded {} rows, {} columns from {}",
        frame.num_rows(),
        frame.num_columns(),
        path.display()
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Float64Array};
    use std::io::Write;

    #[test]
    fn test_load_csv_infers_numbers() {
        let path = std::env::temp_dir().join(format!("geomap-frame-{}.csv", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "src_lat,src_lot,dst_lat,dst_lot,carrier").unwrap();
        writeln!(file, "10,100,15,105,north").unwrap();
        writeln!(file, "20.5,110,25,115,south").unwrap();
        drop(file);

        let frame = load_csv(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(frame.num_rows(), 2);
        let src_lat = frame
            .column(0)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(src_lat.value(1), 20.5);
        assert_eq!(frame.schema().field(4).name(), "carrier");
    }
}
