//! Plain-text views of calculations.

use std::fmt::{Display, Write};

use chrono::TimeZone;
use tax_core::TaxCalculation;
use tax_core::calculations::common::{format_brl, format_rate};

/// How many tax names a history card shows before `+N more`.
pub const CARD_PREVIEW_TAXES: usize = 4;

const TABLE_HEADER: [&str; 6] = ["Tax", "Category", "Rate", "Estimated (R$)", "Due", "Observations"];

/// Column-aligned table of line items followed by the total and summary.
pub fn calculation_report(calculation: &TaxCalculation) -> String {
    let rows: Vec<[String; 6]> = calculation
        .line_items
        .iter()
        .map(|item| {
            [
                item.name.clone(),
                item.category.label().to_string(),
                format!("{}%", format_rate(item.rate)),
                format_brl(item.estimated_value),
                item.due_date.to_string(),
                item.observations.clone(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADER.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &TABLE_HEADER.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").trim_end());
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    let _ = writeln!(out, "\nTotal: R$ {}", format_brl(calculation.total_estimated));
    out.push_str(&calculation.summary);
    out.push('\n');
    out
}

// The value column is right-aligned, everything else left-aligned.
fn push_row(
    out: &mut String,
    cells: &[String; 6],
    widths: &[usize; 6],
) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (cell, width))| {
            if index == 3 {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// One entry of the history list.
pub fn history_card<Tz>(
    calculation: &TaxCalculation,
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let client = &calculation.client;
    let calculated_at = calculation
        .calculated_at
        .with_timezone(tz)
        .format("%d/%m/%Y %H:%M");

    let mut taxes = calculation.leading_tax_names(CARD_PREVIEW_TAXES).join(", ");
    let hidden = calculation.line_items.len().saturating_sub(CARD_PREVIEW_TAXES);
    if hidden > 0 {
        let _ = write!(taxes, " +{hidden} more");
    }
    if taxes.is_empty() {
        taxes.push_str("none");
    }

    format!(
        "{}  [{}]\n  {} • {} • {} • {}\n  Revenue: R$ {}  Total: R$ {}\n  Taxes: {}\n",
        client.name,
        calculation.id,
        client.company_type.label(),
        client.sector.label(),
        client.state,
        calculated_at,
        format_brl(client.annual_revenue),
        format_brl(calculation.total_estimated),
        taxes
    )
}

/// Client details followed by the full report.
pub fn calculation_detail<Tz>(
    calculation: &TaxCalculation,
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let client = &calculation.client;
    let mut out = String::new();

    let _ = writeln!(out, "Calculation {}", calculation.id);
    let _ = writeln!(
        out,
        "Calculated at:   {}",
        calculation.calculated_at.with_timezone(tz).format("%d/%m/%Y %H:%M")
    );
    let _ = writeln!(out, "Client:          {}", client.name);
    let _ = writeln!(out, "Regime:          {}", client.company_type.label());
    let _ = writeln!(out, "Sector:          {}", client.sector.label());
    let _ = writeln!(out, "State:           {}", client.state);
    let _ = writeln!(out, "Annual revenue:  R$ {}", format_brl(client.annual_revenue));
    let _ = writeln!(out, "Reference month: {}", client.reference_date);
    out.push('\n');
    out.push_str(&calculation_report(calculation));
    out
}
