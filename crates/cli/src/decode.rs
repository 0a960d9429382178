//! `vincheck decode`: resolve a single VIN.

use std::io::{self, BufRead, Write};

use vincheck_config::Settings;
use vincheck_core::{decode_structural, VehicleRecord};
use vincheck_decode::{resolve, VehicleResolution};

use crate::CliError;

const PROMPT: &str = "Please enter a 17-character VIN: ";
const RULE: &str = "==================================================";

pub fn cmd_decode(vin: Option<String>, json: bool, settings: &Settings) -> Result<(), CliError> {
    let input = match vin {
        Some(vin) => vin,
        None => prompt_vin()?,
    };

    let resolver = crate::remote_resolver(settings)?;
    let resolution = resolve(&input, &resolver);

    let output = if json {
        serde_json::to_string_pretty(&resolution)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?
    } else {
        render_resolution(&input, &resolution)
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", output).map_err(|e| CliError::io(e.to_string()))?;
    Ok(())
}

fn prompt_vin() -> Result<String, CliError> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", PROMPT)
        .and_then(|_| stdout.flush())
        .map_err(|e| CliError::io(e.to_string()))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::io(format!("cannot read VIN from stdin: {e}")))?;
    Ok(line.trim().to_string())
}

/// Framed text rendering of a resolution.
pub fn render_resolution(input: &str, resolution: &VehicleResolution) -> String {
    match (&resolution.record, resolution.success) {
        (Some(record), true) => render_success(record, resolution.error.as_deref()),
        (record, _) => render_failure(input, record.as_ref(), resolution.error.as_deref()),
    }
}

fn render_success(record: &VehicleRecord, note: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push_str("\n VIN Decode Result\n");
    out.push_str(RULE);
    out.push('\n');
    push_record(&mut out, record);
    if let Some(note) = note {
        out.push_str(&format!(" {:<14}{}\n", "Note:", note));
    }
    out.push_str(RULE);
    out
}

fn render_failure(input: &str, record: Option<&VehicleRecord>, reason: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push_str("\n VIN Decode Failed\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(" {:<14}{}\n", "Input:", input.trim()));
    out.push_str(&format!(" {:<14}{}\n", "Reason:", reason.unwrap_or("unknown")));
    if let Some(record) = record {
        let status = decode_structural(&record.vin).status;
        out.push_str(&format!(" {:<14}{}\n", "Structural:", status));
        push_record(&mut out, record);
    }
    out.push_str(RULE);
    out
}

fn push_record(out: &mut String, record: &VehicleRecord) {
    let rows = [
        ("VIN:", record.vin.to_string()),
        ("Manufacturer:", record.manufacturer.to_string()),
        ("Year:", record.year.to_string()),
        ("Model:", record.model.to_string()),
        ("Engine:", record.engine.to_string()),
        ("Transmission:", record.transmission.to_string()),
        ("Data source:", record.data_source.to_string()),
    ];
    for (label, value) in rows {
        out.push_str(&format!(" {:<14}{}\n", label, value));
    }
}
