use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, money, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;

pub(crate) const SUBCOMMANDS: &[&str] = &["add", "list"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "List or extend transaction categories",
        "category list\ncategory add <name...>",
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None => handle_list(context),
        Some((sub, rest)) => match sub.to_ascii_lowercase().as_str() {
            "list" => handle_list(context),
            "add" => handle_add(context, rest),
            other => Err(CommandError::InvalidArguments(format!(
                "unknown category subcommand `{}`",
                other
            ))),
        },
    }
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let spent = SummaryService::expense_by_category(context.workspace.transactions().as_slice());
    output_section("Categories");
    for name in &context.workspace.preferences().categories {
        let total = spent
            .iter()
            .find(|entry| entry.category.eq_ignore_ascii_case(name))
            .map(|entry| format!("  spent {}", money(entry.amount)))
            .unwrap_or_default();
        output::info(format!("  {}{}", name, total));
    }
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error("category add <name...>"));
    }
    let name = args.join(" ");
    if context.workspace.add_category(&name)? {
        output::success(format!("Category `{}` added.", name.trim()));
    } else {
        output::info(format!("Category `{}` already exists.", name.trim()));
    }
    Ok(())
}
