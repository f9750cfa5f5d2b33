use crate::sheet::{BudgetSheet, CategoryTree, SheetReport, Side};
use crate::time::{Clock, Month};

const LABEL_WIDTH: usize = 22;
const CELL_WIDTH: usize = 11;

/// Renders the editable rows and every derived row as padded text lines.
///
/// Values are read from the sheet's last computed report; callers flush first
/// when they need it current.
pub fn render_sheet<C: Clock>(sheet: &BudgetSheet<C>) -> Vec<String> {
    let report = sheet.report();
    let months = report.range.months();
    let mut lines = Vec::new();

    let mut header = format!("{:<width$}", "Category", width = LABEL_WIDTH);
    for month in months {
        header.push_str(&format!("{:>width$}", month.label(), width = CELL_WIDTH));
    }
    let width = header.chars().count();
    lines.push(header);
    lines.push("-".repeat(width));

    for side in Side::ALL {
        render_side(&mut lines, sheet.tree(side), report, months);
        let totals = &report.side(side).month_totals;
        lines.push(row(
            &format!("Total {side}"),
            months.iter().map(|month| totals.get(*month)),
        ));
        lines.push(String::new());
    }

    lines.push(row(
        "Profit/Loss",
        months.iter().map(|month| report.profit_loss.get(*month)),
    ));
    lines.push(row(
        "Opening balance",
        months.iter().map(|month| report.balances.get(*month).opening),
    ));
    lines.push(row(
        "Closing balance",
        months.iter().map(|month| report.balances.get(*month).closing),
    ));
    lines
}

fn render_side(lines: &mut Vec<String>, tree: &CategoryTree, report: &SheetReport, months: &[Month]) {
    lines.push(tree.side().as_str().to_uppercase());
    let sub_totals = &report.side(tree.side()).sub_totals;
    for parent in tree.parents() {
        lines.push(row(
            &parent.label,
            months
                .iter()
                .map(|month| sub_totals.get(&parent.label, *month)),
        ));
        for (index, child) in parent.children.iter().enumerate() {
            let mut line = format!(
                "{:<width$}",
                truncate(&format!("  [{index}] {}", child.label)),
                width = LABEL_WIDTH
            );
            for month in months {
                let cell = child
                    .value_at(*month)
                    .map(format_amount)
                    .unwrap_or_else(|| "-".to_string());
                line.push_str(&format!("{:>width$}", cell, width = CELL_WIDTH));
            }
            lines.push(line);
        }
    }
}

fn row(label: &str, values: impl Iterator<Item = f64>) -> String {
    let mut line = format!("{:<width$}", truncate(label), width = LABEL_WIDTH);
    for value in values {
        line.push_str(&format!("{:>width$}", format_amount(value), width = CELL_WIDTH));
    }
    line
}

fn truncate(label: &str) -> String {
    if label.chars().count() < LABEL_WIDTH {
        return label.to_string();
    }
    let mut short: String = label.chars().take(LABEL_WIDTH - 2).collect();
    short.push('~');
    short
}

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}
