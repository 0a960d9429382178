//! `vincheck batch`: resolve and compare every VIN in a reference dataset.
//!
//! Strictly sequential: one VIN is resolved and compared before the next
//! starts, with a courtesy delay in between.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use serde::Serialize;
use vincheck_config::Settings;
use vincheck_core::VehicleRecord;
use vincheck_decode::{resolve, RawRemoteRecord};
use vincheck_recon::{
    compare, compute_summary, load_reference_file, BatchSummary, ComparisonVerdict, MatchConfig,
    ReconError,
};

use crate::exit_codes::{
    EXIT_CONFIG_INVALID, EXIT_DATASET_EMPTY, EXIT_DATASET_INVALID, EXIT_DATASET_READ,
    EXIT_OUTPUT_DIR,
};
use crate::report::render_report;
use crate::CliError;

pub const API_RESULTS_FILE: &str = "api_parsed_results.json";
pub const COMPARISON_FILE: &str = "comparison_results.json";
pub const REPORT_FILE: &str = "vin_decoding_report.txt";

pub struct BatchArgs {
    pub reference: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub json: bool,
    pub limit: Option<usize>,
}

/// Per-VIN entry of `api_parsed_results.json`.
#[derive(Serialize)]
struct ApiResult {
    raw_api_data: Option<RawRemoteRecord>,
    mapped_api_data: Option<VehicleRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    summary: &'a BatchSummary,
    verdicts: &'a [ComparisonVerdict],
}

pub fn cmd_batch(args: BatchArgs, settings: &Settings) -> Result<(), CliError> {
    if args.limit == Some(0) {
        return Err(CliError::args("--limit must be at least 1"));
    }

    let dataset = load_reference_file(&args.reference).map_err(dataset_err)?;
    for skipped in &dataset.skipped {
        eprintln!("warning: skipping {}: {}", skipped.vin, skipped.reason);
    }
    if dataset.is_empty() {
        return Err(CliError::new(
            EXIT_DATASET_EMPTY,
            format!("no usable reference records in {}", args.reference.display()),
        )
        .with_hint("each entry needs Manufacturer/Make, Year, Model, Engine and Transmission"));
    }

    let match_config = MatchConfig::new(settings.matching.displacement_tolerance_l)
        .map_err(|e| CliError::new(EXIT_CONFIG_INVALID, e.to_string()))?;
    let resolver = crate::remote_resolver(settings)?;

    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| settings.batch.output_dir.clone());
    fs::create_dir_all(&out_dir).map_err(|e| {
        CliError::new(
            EXIT_OUTPUT_DIR,
            format!("cannot create output directory {}: {e}", out_dir.display()),
        )
    })?;

    let total = args.limit.map_or(dataset.len(), |n| n.min(dataset.len()));
    eprintln!("loaded {} reference record(s), processing {}", dataset.len(), total);

    let mut api_results: BTreeMap<String, ApiResult> = BTreeMap::new();
    let mut verdicts: Vec<ComparisonVerdict> = Vec::with_capacity(total);

    for (idx, (vin, reference)) in dataset.records.iter().take(total).enumerate() {
        eprintln!("[{}/{}] {}", idx + 1, total, vin);

        let resolution = resolve(vin, &resolver);
        let verdict = compare(reference, resolution.record.as_ref(), vin, &match_config);
        eprintln!(
            "  {} ({}): {}",
            if verdict.overall_match { "match" } else { "no match" },
            verdict.match_source,
            verdict.explanation
        );
        if let Some(detail) = verdict.engine_detail() {
            eprintln!("  engine: {}", detail.reason);
        }

        api_results.insert(
            vin.clone(),
            ApiResult {
                raw_api_data: resolution.raw,
                mapped_api_data: resolution.record,
                error: resolution.error,
            },
        );
        verdicts.push(verdict);

        if idx + 1 < total {
            thread::sleep(settings.batch.inter_vin_delay());
        }
    }

    let summary = compute_summary(&verdicts);
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let report = render_report(
        &summary,
        &verdicts,
        match_config.displacement_tolerance_l,
        &generated_at,
    );

    let by_vin: BTreeMap<&str, &ComparisonVerdict> =
        verdicts.iter().map(|v| (v.vin.as_str(), v)).collect();
    write_output(&out_dir, API_RESULTS_FILE, || to_json(&api_results));
    write_output(&out_dir, COMPARISON_FILE, || to_json(&by_vin));
    write_output(&out_dir, REPORT_FILE, || Ok(report.clone()));

    if args.json {
        let output = BatchOutput {
            summary: &summary,
            verdicts: &verdicts,
        };
        println!("{}", to_json(&output).map_err(CliError::io)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn dataset_err(err: ReconError) -> CliError {
    match err {
        ReconError::Io(_) => CliError::new(EXIT_DATASET_READ, err.to_string()),
        other => CliError::new(EXIT_DATASET_INVALID, other.to_string())
            .with_hint("expected a JSON object keyed by VIN"),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization error: {e}"))
}

/// Write one result file. Failures are reported and do not stop the others.
fn write_output(dir: &Path, name: &str, render: impl FnOnce() -> Result<String, String>) {
    let path = dir.join(name);
    let result = render().and_then(|text| fs::write(&path, text).map_err(|e| e.to_string()));
    match result {
        Ok(()) => eprintln!("wrote {}", path.display()),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "cannot write output");
            eprintln!("error: cannot write {}: {e}", path.display());
        }
    }
}
