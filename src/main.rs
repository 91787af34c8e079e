use std::fs::{self, File};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, bail};
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use log::info;
use table_caster::cast::{DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT};
use table_caster::utils::logging::{print_batch_summary, print_schema_info};
use table_caster::{CastPolicy, Metadata, cast_table_to_schema};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(data_path), Some(metadata_path)) = (args.next(), args.next()) else {
        bail!("usage: table-caster <data.csv> <metadata.json>");
    };

    let metadata_json = fs::read_to_string(&metadata_path)
        .with_context(|| format!("reading metadata from {metadata_path}"))?;
    let metadata = Metadata::from_json_str(&metadata_json)
        .with_context(|| format!("parsing metadata from {metadata_path}"))?;

    // Read every column as a string and let the caster decide the types
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(File::open(&data_path)?, Some(0))
        .with_context(|| format!("reading header of {data_path}"))?;
    let schema = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(File::open(&data_path)?)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;
    info!("Read {} rows from {data_path}", batch.num_rows());

    let start = Instant::now();
    let cast = cast_table_to_schema(&batch, &metadata, &CastPolicy::default())
        .with_context(|| format!("casting {data_path}"))?;
    print_batch_summary(&cast, start.elapsed());
    print_schema_info(&cast);

    let mut writer = WriterBuilder::new()
        .with_header(true)
        .with_date_format(DEFAULT_DATE_FORMAT.to_string())
        .with_timestamp_format(DEFAULT_DATETIME_FORMAT.to_string())
        .build(std::io::stdout().lock());
    writer.write(&cast)?;

    Ok(())
}
