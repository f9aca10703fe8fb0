//! Presentation of comparison reports as a terminal table or JSON.

use analytics::MetricValue;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use comparison::{AssetComparison, ComparisonReport};
use configuration::EtfEntry;
use core_types::Period;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{json, Value};

/// Shown in place of a metric that could not be computed.
pub const NOT_AVAILABLE: &str = "N/A";

fn two_places(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a metric to two decimal places, or `N/A`.
pub fn format_metric(value: &MetricValue) -> String {
    match value {
        Ok(v) => format!("{:.2}", two_places(*v)),
        Err(_) => NOT_AVAILABLE.to_string(),
    }
}

/// Renders the report as a table followed by a header line and any notes
/// explaining unavailable values.
pub fn render_table(report: &ComparisonReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "ETF",
            "Symbol",
            "Return %",
            "Volatility",
            "Beta",
            "Max Drawdown %",
            "Alpha",
            "Final Value",
        ]);

    for asset in &report.assets {
        let m = &asset.metrics;
        let numbers = [
            &m.return_pct,
            &m.volatility_annualized,
            &m.beta,
            &m.max_drawdown_pct,
            &m.alpha,
            &asset.final_value,
        ];

        let mut row = vec![Cell::new(&asset.name), Cell::new(&asset.symbol)];
        row.extend(
            numbers
                .iter()
                .map(|v| Cell::new(format_metric(v)).set_alignment(CellAlignment::Right)),
        );
        table.add_row(row);
    }

    let benchmark = match &report.benchmark {
        Ok(span) => format!(
            "{} ({} sessions, {} to {})",
            report.benchmark_symbol, span.observations, span.first_date, span.last_date
        ),
        Err(reason) => format!("{} unavailable: {}", report.benchmark_symbol, reason),
    };

    let mut out = format!(
        "Period: {} | Initial investment: {:.2} | Risk-free rate: {:.2}% | Benchmark: {}\n{}",
        report.period.label(),
        two_places(report.initial_investment),
        two_places(report.risk_free_rate_pct),
        benchmark,
        table
    );

    let notes: Vec<String> = report.assets.iter().flat_map(unavailable_notes).collect();
    if !notes.is_empty() {
        out.push_str("\nNotes:");
        for note in notes {
            out.push_str("\n  - ");
            out.push_str(&note);
        }
    }

    out
}

/// One line per distinct reason, naming the metrics it affected.
fn unavailable_notes(asset: &AssetComparison) -> Vec<String> {
    let mut grouped: Vec<(String, Vec<&'static str>)> = Vec::new();
    for (name, value) in asset.metrics.metrics() {
        if let Err(reason) = value {
            let reason = reason.to_string();
            match grouped.iter_mut().find(|(r, _)| *r == reason) {
                Some((_, names)) => names.push(name),
                None => grouped.push((reason, vec![name])),
            }
        }
    }

    grouped
        .into_iter()
        .map(|(reason, names)| format!("{} [{}]: {}", asset.symbol, names.join(", "), reason))
        .collect()
}

/// A JSON number rounded to two places.
fn number(value: Decimal) -> Value {
    json!(two_places(value).to_f64())
}

fn metric_json(value: &MetricValue) -> Value {
    match value {
        Ok(v) => json!({ "value": number(*v), "unavailable": null }),
        Err(reason) => json!({
            "value": null,
            "unavailable": { "kind": reason.kind(), "reason": reason.to_string() },
        }),
    }
}

/// Renders the report as a JSON document.
pub fn render_json(report: &ComparisonReport) -> Value {
    let assets: Vec<Value> = report
        .assets
        .iter()
        .map(|a| {
            json!({
                "name": a.name,
                "symbol": a.symbol,
                "observations": a.span.map(|s| s.observations),
                "first_date": a.span.map(|s| s.first_date.to_string()),
                "last_date": a.span.map(|s| s.last_date.to_string()),
                "return_pct": metric_json(&a.metrics.return_pct),
                "volatility_annualized": metric_json(&a.metrics.volatility_annualized),
                "beta": metric_json(&a.metrics.beta),
                "max_drawdown_pct": metric_json(&a.metrics.max_drawdown_pct),
                "alpha": metric_json(&a.metrics.alpha),
                "final_value": metric_json(&a.final_value),
            })
        })
        .collect();

    json!({
        "period": report.period.code(),
        "initial_investment": number(report.initial_investment),
        "risk_free_rate_pct": number(report.risk_free_rate_pct),
        "benchmark": {
            "symbol": report.benchmark_symbol,
            "observations": report.benchmark.as_ref().ok().map(|s| s.observations),
            "unavailable": report.benchmark.as_ref().err().map(|e| e.to_string()),
        },
        "assets": assets,
    })
}

/// Renders the ETF catalog and the selectable periods.
pub fn render_catalog(etfs: &[EtfEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ETF", "Symbol"]);
    for etf in etfs {
        table.add_row(vec![&etf.name, &etf.symbol]);
    }

    let periods: Vec<String> = Period::ALL
        .iter()
        .map(|p| format!("{} ({})", p.code(), p.label()))
        .collect();

    format!("{}\nPeriods: {}", table, periods.join(", "))
}
