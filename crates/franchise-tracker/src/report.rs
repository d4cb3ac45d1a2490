//! Plain-text rendering of pipeline results.

use std::fmt::Write as _;

use tracker_core::formatting::{format_count, format_score, format_share};
use tracker_core::models::LocationSummary;
use tracker_core::sentiment::SentimentClass;
use tracker_data::analysis::{BusinessDrillDown, PipelineResult, PipelineStatus};
use tracker_data::views::{postal_code_options, SentimentHistogram};

/// Widest histogram bar, in characters.
const BAR_WIDTH: usize = 40;

// ── Public API ────────────────────────────────────────────────────────────────

/// Render the full text report for one result.
pub fn render_text(result: &PipelineResult) -> String {
    let mut out = String::new();
    let req = &result.request;

    let _ = writeln!(
        out,
        "{} / {}: {} of {} reviews matched, {} businesses, {} franchise candidates",
        req.city,
        req.category,
        format_count(result.metadata.rows_matched),
        format_count(result.metadata.rows_scanned),
        format_count(result.business_counts.len()),
        format_count(result.candidates.len()),
    );

    match result.status {
        PipelineStatus::NoResults => {
            let _ = writeln!(
                out,
                "\nWARNING: no reviews found for businesses in {} matching category '{}'",
                req.city, req.category
            );
            return out;
        }
        PipelineStatus::NoFranchises => {
            let _ = writeln!(
                out,
                "\nWARNING: no franchises with more than {} locations",
                req.threshold
            );
        }
        PipelineStatus::Ready => {}
    }

    out.push_str("\nLocations per business\n");
    let rows: Vec<Vec<String>> = result
        .business_counts
        .iter()
        .map(|c| vec![c.name.clone(), format_count(c.franchisee_count)])
        .collect();
    out.push_str(&render_table(&["Business", "Locations"], &rows));

    if !result.candidates.is_empty() {
        let _ = writeln!(out, "\nFranchise candidates: {}", result.candidates.join(", "));
    }

    if let Some(drill) = &result.drill_down {
        render_drill_down(&mut out, drill);
    }

    out
}

/// One city per line.
pub fn render_cities(cities: &[&str]) -> String {
    let mut out = String::new();
    for city in cities {
        out.push_str(city);
        out.push('\n');
    }
    out
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn render_drill_down(out: &mut String, drill: &BusinessDrillDown) {
    let _ = writeln!(
        out,
        "\n{}: {} locations (map center {:.4}, {:.4})",
        drill.business,
        drill.locations.len(),
        drill.map.center.latitude,
        drill.map.center.longitude,
    );

    let class_headers: Vec<String> = SentimentClass::ALL
        .iter()
        .map(|c| capitalize(c.label()))
        .collect();
    let mut headers: Vec<&str> = vec!["Location", "Postal", "Address"];
    headers.extend(class_headers.iter().map(String::as_str));
    headers.extend(["Mean", "Total"]);

    let rows: Vec<Vec<String>> = drill.locations.iter().map(location_row).collect();
    out.push_str(&render_table(&headers, &rows));
    let _ = writeln!(
        out,
        "Postal codes: {}",
        postal_code_options(&drill.locations).join(", ")
    );

    out.push_str("\nSentiment distribution\n");
    out.push_str(&render_histogram(&drill.distribution));

    if drill.selected.is_empty() {
        out.push_str("\nNo location matches the selection\n");
        return;
    }
    for detail in &drill.selected {
        let s = &detail.summary;
        let _ = writeln!(
            out,
            "\n{} ({}) {}: mean {} ({}), {} reviews",
            s.name,
            s.postal_code,
            s.address,
            format_score(s.mean_sentiment),
            s.mean_class(),
            format_count(s.total),
        );
        out.push_str(&render_histogram(&detail.distribution));
    }
}

/// Identity columns, one share per class in `SentimentClass::ALL` order, then
/// mean and total.
fn location_row(s: &LocationSummary) -> Vec<String> {
    let mut row = vec![
        s.business_id.clone(),
        s.postal_code.clone(),
        s.address.clone(),
    ];
    row.extend(
        SentimentClass::ALL
            .iter()
            .map(|c| format_share(s.count_for(*c), s.total)),
    );
    row.push(format_score(s.mean_sentiment));
    row.push(format_count(s.total));
    row
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Non-empty bins as horizontal bars scaled to the fullest bin.
fn render_histogram(hist: &SentimentHistogram) -> String {
    let max = hist.max_count();
    if max == 0 {
        return "  (no reviews)\n".to_string();
    }
    let mut out = String::new();
    for bin in hist.bins.iter().filter(|b| b.count() > 0) {
        let len = (bin.count() * BAR_WIDTH).div_ceil(max);
        let _ = writeln!(
            out,
            "  [{:>5.2}, {:>5.2}) {:<width$} {}",
            bin.lower,
            bin.upper,
            "#".repeat(len),
            bin.count(),
            width = BAR_WIDTH,
        );
    }
    out
}

/// Left-aligned columns separated by two spaces.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

// ── Tests ─────────────────────────────────────────────────────────────────────
