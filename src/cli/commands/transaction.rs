use std::str::FromStr;

use crate::cli::core::{
    option, parse_amount, parse_occurrence, split_options, usage_error, CommandError,
    CommandResult, ShellContext,
};
use crate::cli::output::{self, money, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::{short_id, CategoryService, TransactionService};
use crate::domain::{Transaction, TransactionKind};

pub(crate) const SUBCOMMANDS: &[&str] = &["add", "list", "remove"];

const ADD_USAGE: &str =
    "transaction add <income|expense> <amount> <category> [description...] [--date YYYY-MM-DD]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "transaction",
        "Record, list or delete transactions",
        "transaction add <income|expense> <amount> <category> [description...] [--date YYYY-MM-DD]\ntransaction list\ntransaction remove <id>",
        cmd_transaction,
    )]
}

fn cmd_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(usage_error("transaction <add|list|remove>"));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => handle_add(context, rest),
        "list" => handle_list(context),
        "remove" | "rm" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown transaction subcommand `{}`",
            other
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["date"])?;
    let [kind, amount, category, description @ ..] = positional.as_slice() else {
        return Err(usage_error(ADD_USAGE));
    };
    let kind = TransactionKind::from_str(kind)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    let amount = parse_amount(amount)?;
    let date = parse_occurrence(option(&options, "date"))?;
    let category = CategoryService::canonical(&context.workspace.preferences().categories, category);

    let transaction =
        Transaction::new(kind, amount, category, description.join(" "), date);
    let label = format!("{} {} ({})", kind, money(amount), transaction.category);
    let id = context.workspace.add_transaction(transaction)?;
    output::success(format!("Recorded {} [{}].", label, short_id(id)));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let transactions = TransactionService::list(context.workspace.transactions());
    if transactions.is_empty() {
        output::info("No transactions recorded yet.");
        return Ok(());
    }
    output_section("Transactions");
    for txn in transactions {
        let amount = match txn.kind {
            TransactionKind::Income => format!("+{}", money(txn.amount)),
            TransactionKind::Expense => format!("-{}", money(txn.amount)),
        };
        output::info(format!(
            "  {}  {}  {:>12}  {:<14} {}",
            short_id(txn.id),
            txn.date.format("%Y-%m-%d"),
            amount,
            txn.category,
            txn.description
        ));
    }
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle] = args else {
        return Err(usage_error("transaction remove <id>"));
    };
    let id = TransactionService::resolve(context.workspace.transactions(), needle)?;
    let summary = context
        .workspace
        .transactions()
        .get(id)
        .map(|txn| format!("{} {} ({})", txn.kind, money(txn.amount), txn.category))
        .unwrap_or_default();
    if !context.confirm(&format!("Delete {}?", summary))? {
        output::info("Kept.");
        return Ok(());
    }
    context.workspace.remove_transaction(id)?;
    output::success(format!("Deleted {} [{}].", summary, short_id(id)));
    Ok(())
}
