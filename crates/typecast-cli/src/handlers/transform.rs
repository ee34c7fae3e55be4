//! Transform command handler

use super::utils::{load_columns, load_records, save_document};
use crate::cli::TransformArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use serde_json::{Map, Value};
use typecast_core::{transform_rows, BatchOptions, Dialect, TransformationEngine};

/// Handle the transform command
///
/// Command-line flags win over the configuration file. Per-value failures
/// are reported with the rows and then surface as [`Error::BatchFailures`].
pub fn handle_transform(args: TransformArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let columns = load_columns(&args.schema)?;
    let records = load_records(&args.input)?;

    let dialect = args
        .dialect
        .as_deref()
        .map(Dialect::from_tag)
        .unwrap_or(config.default_dialect);
    let table = args.table.clone().unwrap_or_else(|| config.default_table.clone());
    let options = BatchOptions {
        fail_fast: args.fail_fast || config.fail_fast,
    };

    output.info(&format!(
        "Transforming {} record(s) into {} column(s) of {} ({})",
        records.len(),
        columns.len(),
        table,
        dialect
    ))?;

    let engine = TransformationEngine::with_config(&config.engine);
    tracing::debug!(stats = ?engine.registry_stats(), "Engine ready");

    let spinner = output.spinner(&format!("Transforming {} records...", records.len()));
    let result = {
        let _timer = Timer::with_details("transform_rows", &table);
        transform_rows(&engine, &records, &columns, &table, dialect, &options)
    };
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let batch = result?;

    if let Some(path) = &args.save_to {
        let values: Vec<Map<String, Value>> = batch.rows.iter().map(|row| row.values.clone()).collect();
        save_document(path, &values)?;
        output.success(&format!("✓ Saved {} row(s) to {}", values.len(), path.display()))?;
    }

    if args.report_only || args.save_to.is_some() {
        output.batch_report(&batch.report)?;
    } else {
        output.batch_output(&batch)?;
    }

    let failed = batch.report.failures();
    if failed > 0 {
        return Err(Error::BatchFailures {
            failed,
            total: batch.report.values,
        });
    }
    Ok(())
}
