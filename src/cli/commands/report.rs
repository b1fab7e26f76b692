use chrono::Utc;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output::{self, money, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::{ProjectionService, SummaryService};

const BALANCE_TAIL: usize = 5;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Totals, balance and spending by category",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "forecast",
            "Monthly rates and goal outlook",
            "forecast",
            cmd_forecast,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = context.workspace.transactions().as_slice();
    let summary = context.workspace.summary();
    output_section("Summary");
    output::info(format!("  Income   : {}", money(summary.total_income)));
    output::info(format!("  Expenses : {}", money(summary.total_expense)));
    output::info(format!("  Balance  : {}", money(summary.balance)));
    output::info(format!(
        "  Status   : {}",
        summary.status.as_str().to_uppercase()
    ));

    let by_category = SummaryService::expense_by_category(transactions);
    if !by_category.is_empty() {
        output_section("Spending by category");
        for entry in by_category {
            output::info(format!("  {:<16} {}", entry.category, money(entry.amount)));
        }
    }

    let series = SummaryService::running_balance(transactions);
    if !series.is_empty() {
        output_section("Recent balance");
        let skip = series.len().saturating_sub(BALANCE_TAIL);
        for point in series.iter().skip(skip) {
            output::info(format!(
                "  {}  {:>12}  {}",
                point.date.format("%Y-%m-%d"),
                money(point.amount),
                money(point.balance)
            ));
        }
    }
    Ok(())
}

fn cmd_forecast(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = context.workspace.transactions().as_slice();
    let projection = context.workspace.projection();
    output_section("Forecast");
    output::info(format!(
        "  Months of history : {:.1}",
        ProjectionService::months_span(transactions)
    ));
    output::info(format!(
        "  Avg monthly income: {}",
        money(projection.avg_monthly_income)
    ));
    output::info(format!(
        "  Burn rate         : {}/month",
        money(ProjectionService::burn_rate(transactions))
    ));
    output::info(format!(
        "  Monthly surplus   : {}",
        money(projection.monthly_surplus)
    ));

    let overview = context.workspace.goal_overview(Utc::now());
    if overview.is_empty() {
        return Ok(());
    }
    let achievable = overview
        .iter()
        .filter(|status| status.report.is_achievable)
        .count();
    output::info(format!(
        "  {}: {} of {} on track",
        context.workspace.mode().goals_heading(),
        achievable,
        overview.len()
    ));
    Ok(())
}
