//! Markdown run report.

use tradebook_core::aggregate::{MonthlySummary, SymbolHitStats, TypeDistribution};

use crate::runner::AnalysisResult;

/// Generate the Markdown report for one run.
///
/// `charts` is embedded verbatim in a code block when present.
pub fn generate_report(analysis: &AnalysisResult, charts: Option<&str>) -> String {
    let mut md = String::with_capacity(4096);
    let ledger = analysis.ledger();

    md.push_str("# Trade Log Report\n\n");

    md.push_str("## Overview\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Input | {} |\n", analysis.input.display()));
    md.push_str(&format!("| Input Hash | {} |\n", analysis.input_hash));
    md.push_str(&format!("| Trades | {} |\n", ledger.len()));
    md.push_str(&format!(
        "| Initial Balance | {:.2} |\n",
        ledger.initial_balance
    ));
    md.push_str(&format!("| Final Balance | {:.2} |\n", ledger.final_balance));
    md.push_str(&format!("| Net P/L | {:.2} |\n", ledger.total_net_pl()));
    md.push_str(&format!(
        "| Commission | {:.2} |\n",
        ledger.total_commission()
    ));
    md.push_str(&format!(
        "| Total Return | {:.2}% |\n",
        ledger.total_return_pct()
    ));
    md.push('\n');

    md.push_str(&monthly_table(&analysis.aggregates.months));
    md.push_str(&type_table(&analysis.aggregates.types));
    md.push_str(&symbol_table(&analysis.aggregates.symbols));

    if let Some(charts) = charts {
        md.push_str("## Charts\n\n```text\n");
        md.push_str(charts);
        if !charts.ends_with('\n') {
            md.push('\n');
        }
        md.push_str("```\n");
    }

    md
}

fn monthly_table(months: &[MonthlySummary]) -> String {
    let mut md = String::from("## Monthly Summary\n\n");
    md.push_str(
        "| Month | Profits | Losses | Positions | Hit % | Commission | Neto | Gross | Yield % |\n",
    );
    md.push_str("| ---: | ---: | ---: | ---: | ---: | ---: | ---: | ---: | ---: |\n");
    for m in months {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            m.month,
            m.profit_count,
            m.loss_count,
            m.positions,
            m.hit_percentage,
            m.commission_total,
            m.net_total,
            m.gross_balance,
            m.yield_percentage
        ));
    }
    md.push('\n');
    md
}

fn type_table(dist: &TypeDistribution) -> String {
    let mut md = String::from("## Type Distribution\n\n");
    if dist.rows.is_empty() {
        md.push_str("No trades.\n\n");
        return md;
    }
    md.push_str("| Type |");
    for outcome in &dist.outcomes {
        md.push_str(&format!(" {outcome} |"));
    }
    md.push_str("\n| --- |");
    md.push_str(&" ---: |".repeat(dist.outcomes.len()));
    md.push('\n');
    for row in &dist.rows {
        md.push_str(&format!("| {} |", row.trade_type));
        for count in &row.counts {
            md.push_str(&format!(" {count} |"));
        }
        md.push('\n');
    }
    md.push('\n');
    md
}

fn symbol_table(stats: &[SymbolHitStats]) -> String {
    let mut md = String::from("## Hit By Symbol\n\n");
    md.push_str("| Symbol | Profits | Losses | Total | Hit % |\n");
    md.push_str("| --- | ---: | ---: | ---: | ---: |\n");
    for s in stats {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {:.1}% |\n",
            s.symbol,
            s.profits,
            s.losses,
            s.total,
            s.hit_ratio * 100.0
        ));
    }
    md.push('\n');
    md
}
