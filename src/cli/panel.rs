//! Renders a dashboard snapshot for the terminal.

use super::{chart, ui};
use crate::core::Conversion;
use crate::dashboard::{CatalogState, Dashboard, HistoryState, RateState};
use std::fmt::Write;

const CHART_WIDTH: usize = 60;

fn currency_label(dashboard: &Dashboard, code: &str) -> String {
    match dashboard.catalog() {
        CatalogState::Ready(catalog) => match catalog.name(code) {
            Some(name) => format!("{code} - {name}"),
            None => code.to_string(),
        },
        _ => code.to_string(),
    }
}

/// Conversion result text. Pending and failed rates render differently.
pub fn conversion_text(dashboard: &Dashboard) -> String {
    match dashboard.view().conversion {
        Conversion::Converted(value) => ui::format_amount(value),
        Conversion::InvalidAmount => "Invalid amount".to_string(),
        Conversion::RateUnavailable => match dashboard.rate() {
            RateState::Pending => "...".to_string(),
            _ => "N/A".to_string(),
        },
    }
}

pub fn render(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    match dashboard.catalog() {
        CatalogState::Loading => {
            out.push_str(&ui::style_text(
                "Loading currency list...",
                ui::StyleType::Subtle,
            ));
            return out;
        }
        CatalogState::Failed(e) => {
            out.push_str(&ui::style_text(
                &format!("Currency list unavailable: {e}"),
                ui::StyleType::Error,
            ));
            return out;
        }
        CatalogState::Ready(_) => {}
    }

    let selection = dashboard.selection();
    let view = dashboard.view();
    let (source, target) = (&selection.source, &selection.target);

    let _ = writeln!(
        out,
        "{}",
        ui::style_text(
            &format!(
                "{} -> {}",
                currency_label(dashboard, source),
                currency_label(dashboard, target)
            ),
            ui::StyleType::Title
        )
    );

    let amount = match selection.amount.value() {
        Some(v) => ui::format_amount(v),
        None => selection.amount.text().to_string(),
    };
    let _ = writeln!(
        out,
        "{} {amount} {source}",
        ui::style_text("Amount:   ", ui::StyleType::Label)
    );

    let converted_style = if view.conversion.value().is_some() {
        ui::StyleType::Value
    } else {
        ui::StyleType::Error
    };
    let _ = writeln!(
        out,
        "{} {} {target}",
        ui::style_text("Converted:", ui::StyleType::Label),
        ui::style_text(&conversion_text(dashboard), converted_style)
    );

    let unit_rate = match view.unit_rate {
        Some(rate) => ui::format_unit_rate(source, rate, target),
        None => format!("1 {source} = ... {target}"),
    };
    let _ = writeln!(out, "{}", ui::style_text(&unit_rate, ui::StyleType::Subtle));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!("Trend ({})", selection.period)),
        ui::header_cell("High"),
        ui::header_cell("Low"),
        ui::header_cell("Average"),
        ui::header_cell("Change"),
    ]);
    let stats = view.stats;
    table.add_row(vec![
        comfy_table::Cell::new(format!("{source}/{target}")),
        ui::format_optional_cell(stats.map(|s| s.high), |v| format!("{v:.2}")),
        ui::format_optional_cell(stats.map(|s| s.low), |v| format!("{v:.2}")),
        ui::format_optional_cell(stats.map(|s| s.average), |v| format!("{v:.2}")),
        ui::change_cell(stats.and_then(|s| s.change_percent)),
    ]);
    let _ = writeln!(out, "{table}");

    match (dashboard.history(), &view.chart) {
        (_, Some(series)) => {
            let _ = writeln!(out, "{}", chart::render(series, CHART_WIDTH));
        }
        (HistoryState::Pending, _) => {
            let _ = writeln!(
                out,
                "{}",
                ui::style_text("Loading history...", ui::StyleType::Subtle)
            );
        }
        (HistoryState::SamePair, _) => {
            let _ = writeln!(
                out,
                "{}",
                ui::style_text("Same currency, no trend to show", ui::StyleType::Subtle)
            );
        }
        _ => {
            let _ = writeln!(
                out,
                "{}",
                ui::style_text("History unavailable", ui::StyleType::Error)
            );
        }
    }

    out
}
