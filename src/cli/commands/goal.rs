use std::str::FromStr;

use chrono::Utc;

use crate::advisor::goal_key;
use crate::cli::core::{
    option, parse_amount, parse_date, split_options, usage_error, CommandError, CommandResult,
    ShellContext,
};
use crate::cli::output::{self, money, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::{short_id, GoalService, GoalStatus, ProjectionService};
use crate::domain::{Goal, GoalKind, GoalPriority};

pub(crate) const SUBCOMMANDS: &[&str] = &["add", "advise", "list", "remove"];

const ADD_USAGE: &str = "goal add <type> <target> <YYYY-MM-DD> <title...> [--priority low|medium|high] [--category name]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "goal",
        "Track goals and their feasibility",
        "goal add <type> <target> <YYYY-MM-DD> <title...> [--priority low|medium|high] [--category name]\ngoal list\ngoal remove <id>\ngoal advise <id|all>",
        cmd_goal,
    )]
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None => handle_list(context),
        Some((sub, rest)) => match sub.to_ascii_lowercase().as_str() {
            "add" => handle_add(context, rest),
            "list" => handle_list(context),
            "remove" | "rm" => handle_remove(context, rest),
            "advise" => handle_advise(context, rest),
            other => Err(CommandError::InvalidArguments(format!(
                "unknown goal subcommand `{}`",
                other
            ))),
        },
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["priority", "category"])?;
    let [kind, target, deadline, title @ ..] = positional.as_slice() else {
        return Err(usage_error(ADD_USAGE));
    };
    if title.is_empty() {
        return Err(usage_error(ADD_USAGE));
    }
    let kind = GoalKind::from_str(kind).map_err(|err| {
        let known: Vec<&str> = GoalKind::ALL.iter().map(|kind| kind.as_str()).collect();
        CommandError::InvalidArguments(format!("{} (expected one of {})", err, known.join(", ")))
    })?;
    let target = parse_amount(target)?;
    let deadline = parse_date(deadline)?;
    let mode = context.workspace.mode();

    let mut goal = Goal::new(mode, kind, title.join(" "), target, deadline);
    if let Some(priority) = option(&options, "priority") {
        goal = goal.with_priority(
            GoalPriority::from_str(priority)
                .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
        );
    }
    if let Some(category) = option(&options, "category") {
        goal = goal.with_category(category);
    }

    let title = goal.title.clone();
    let id = context.workspace.add_goal(goal)?;
    output::success(format!(
        "Goal `{}` set: {} by {} [{}].",
        title,
        money(target),
        deadline,
        short_id(id)
    ));
    Ok(())
}

fn print_status(status: &GoalStatus<'_>, mode_label: &str) {
    let goal = status.goal;
    let report = &status.report;
    output::info(format!(
        "  [{}] {}  ({}, {} priority)",
        short_id(goal.id),
        goal.title,
        mode_label,
        goal.priority
    ));
    output::info(format!(
        "      Target {} by {}  |  {:.1} months left",
        money(goal.target_amount),
        goal.deadline,
        report.months_left
    ));
    output::info(format!(
        "      Need {}/month, surplus {}/month",
        money(report.required_per_month),
        money(report.monthly_surplus)
    ));
    if report.is_achievable {
        output::success(report.verdict_label());
    } else {
        output::warning(format!(
            "{} (short by {}/month)",
            report.verdict_label(),
            money(report.gap)
        ));
    }
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let mode = context.workspace.mode();
    let overview = context.workspace.goal_overview(Utc::now());
    output_section(mode.goals_heading());
    if overview.is_empty() {
        output::info("No goals yet. Add one with `goal add`.");
        return Ok(());
    }
    output::info(format!(
        "  Current burn rate: {}/month",
        money(ProjectionService::burn_rate(
            context.workspace.transactions().as_slice()
        ))
    ));
    for status in &overview {
        print_status(status, status.goal.kind.describe(mode));
    }
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle] = args else {
        return Err(usage_error("goal remove <id>"));
    };
    let id = GoalService::resolve(context.workspace.goals(), needle)?;
    let title = context
        .workspace
        .goals()
        .get(id)
        .map(|goal| goal.title.clone())
        .unwrap_or_default();
    if !context.confirm(&format!("Delete goal `{}`?", title))? {
        output::info("Kept.");
        return Ok(());
    }
    context.workspace.remove_goal(id)?;
    output::success(format!("Goal `{}` deleted.", title));
    Ok(())
}

fn handle_advise(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target] = args else {
        return Err(usage_error("goal advise <id|all>"));
    };
    let mode = context.workspace.mode();
    let goals: Vec<&Goal> = if target.eq_ignore_ascii_case("all") {
        context.workspace.goals().for_mode(mode).collect()
    } else {
        let id = GoalService::resolve(context.workspace.goals(), target)?;
        context.workspace.goals().get(id).into_iter().collect()
    };
    if goals.is_empty() {
        output::info("No goals to analyze in this mode.");
        return Ok(());
    }
    if !context.advisor.is_configured() {
        context.print_hint("Advisor offline. Set GEMINI_API_KEY for live analysis.");
    }

    let results = context.advisor.advise_goals(
        &goals,
        context.workspace.transactions().as_slice(),
        mode,
        &context.advice,
    );
    for goal in &goals {
        output_section(format!("Buddy on `{}`", goal.title));
        match results.iter().find(|(id, _)| *id == goal.id) {
            Some((_, advice)) => output::info(advice),
            None => output::warning(format!(
                "Analysis for {} was superseded.",
                goal_key(goal.id)
            )),
        }
    }
    Ok(())
}
