//! Plain-text batch report. Formatting only; every number comes from
//! `BatchSummary`.

use std::fmt::Write;

use vincheck_recon::{BatchSummary, ComparableField, ComparisonVerdict, EngineMatchDetail};

pub fn render_report(
    summary: &BatchSummary,
    verdicts: &[ComparisonVerdict],
    tolerance_l: f64,
    generated_at: &str,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, summary, verdicts, tolerance_l, generated_at);
    out
}

fn write_report(
    out: &mut String,
    s: &BatchSummary,
    verdicts: &[ComparisonVerdict],
    tolerance_l: f64,
    generated_at: &str,
) -> std::fmt::Result {
    writeln!(out, "# VIN Decoding Accuracy Report")?;
    writeln!(out, "Generated: {generated_at}")?;
    writeln!(out)?;

    if s.valid == 0 {
        writeln!(out, "No valid comparison results ({} VIN(s) processed).", s.total)?;
        write_errors(out, verdicts)?;
        return Ok(());
    }

    // ── Overall ──
    writeln!(out, "## 1. Overall")?;
    writeln!(out, "- VINs tested: {}", s.total)?;
    writeln!(out, "- Valid comparisons: {}", s.valid)?;
    writeln!(
        out,
        "- Fully matched: {} (via structural fallback: {})",
        s.fully_matched, s.structural_matched
    )?;
    writeln!(out, "- Overall accuracy: {:.2}%", s.accuracy)?;
    writeln!(out, "- Average field match rate: {:.2}%", s.average_match_rate)?;
    writeln!(out, "- Engine core fields:")?;
    writeln!(
        out,
        "  - Fuel type: {:.2}% ({}/{})",
        s.engine.fuel_rate, s.engine.fuel_matched, s.valid
    )?;
    writeln!(
        out,
        "  - Displacement: {:.2}% ({}/{})",
        s.engine.displacement_rate, s.engine.displacement_matched, s.valid
    )?;
    writeln!(
        out,
        "  - Both: {:.2}% ({}/{})",
        s.engine.both_rate, s.engine.both_matched, s.valid
    )?;
    writeln!(out)?;

    // ── Rules ──
    writeln!(out, "## 2. Matching rules")?;
    writeln!(out, "- Overall match: at least 4 of 5 fields match, Engine included")?;
    writeln!(
        out,
        "- Engine: fuel type must agree (not enforced for hybrids) and displacement within ±{tolerance_l:.1}L"
    )?;
    writeln!(out)?;

    // ── Fields ──
    writeln!(out, "## 3. Per-field match rates")?;
    writeln!(out, "| {:<20} | {:>7} | {:>5} | {:>8} | {:>9} |", "Field", "Matched", "Total", "Rate", "Mismatch")?;
    writeln!(out, "|{:-<22}|{:-<9}|{:-<7}|{:-<10}|{:-<11}|", "", "", "", "", "")?;
    for f in &s.fields {
        writeln!(
            out,
            "| {:<20} | {:>7} | {:>5} | {:>7.2}% | {:>8.2}% |",
            f.field.label(),
            f.matched,
            f.total,
            f.rate,
            100.0 - f.rate
        )?;
    }
    writeln!(out)?;

    // ── Manufacturers ──
    writeln!(out, "## 4. Per-manufacturer results")?;
    for (name, m) in &s.manufacturers {
        writeln!(
            out,
            "- {name}: {} tested, overall {:.2}%, engine {:.2}%, fuel type {:.2}%, displacement {:.2}%",
            m.total, m.accuracy, m.engine_rate, m.fuel_rate, m.displacement_rate
        )?;
    }
    writeln!(out)?;

    // ── Mismatches ──
    writeln!(out, "## 5. Mismatched VINs ({})", s.mismatched.len())?;
    if s.mismatched.is_empty() {
        writeln!(out, "  All VINs matched.")?;
    }
    for vin in &s.mismatched {
        let Some(v) = verdicts.iter().find(|v| &v.vin == vin) else {
            continue;
        };
        writeln!(out)?;
        writeln!(out, "### VIN: {vin}")?;
        writeln!(
            out,
            "  Source: {} | Match rate: {:.2}% | {}",
            v.match_source, v.match_rate, v.explanation
        )?;
        for field in v.fields.iter().filter(|f| !f.matched) {
            writeln!(out, "  - {}:", field.field)?;
            writeln!(out, "      reference: {}", or_empty(&field.reference_value))?;
            writeln!(out, "      resolved:  {}", or_empty(&field.resolved_value))?;
            if let Some(reason) = &field.mismatch_reason {
                writeln!(out, "      reason:    {reason}")?;
            }
            if field.field == ComparableField::Engine {
                if let Some(detail) = &field.engine {
                    write_engine_detail(out, detail)?;
                }
            }
        }
    }

    write_errors(out, verdicts)
}

fn write_engine_detail(out: &mut String, d: &EngineMatchDetail) -> std::fmt::Result {
    writeln!(
        out,
        "      fuel type:    reference={}, resolved={}, matched: {} ({})",
        d.local_fuel.as_deref().unwrap_or("none"),
        d.remote_fuel.as_deref().unwrap_or("none"),
        yes_no(d.fuel_type_match),
        if d.hybrid_override { "hybrid, not enforced" } else { "standard check" }
    )?;
    writeln!(
        out,
        "      displacement: reference={}, resolved={}, error={}, matched: {}",
        d.local_displacement_label(),
        d.remote_displacement_label(),
        d.displacement_error_label(),
        yes_no(d.displacement_match)
    )
}

fn write_errors(out: &mut String, verdicts: &[ComparisonVerdict]) -> std::fmt::Result {
    let errors: Vec<_> = verdicts.iter().filter(|v| v.is_error()).collect();
    if errors.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "## Errors ({})", errors.len())?;
    for v in errors {
        writeln!(out, "- {}: {}", v.vin, v.explanation)?;
    }
    Ok(())
}

fn or_empty(s: &str) -> &str {
    if s.trim().is_empty() {
        "(empty)"
    } else {
        s
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
