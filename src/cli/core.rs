//! Core CLI dispatch, error types, and shell context helpers.

use std::io;

use chrono::{DateTime, NaiveDate, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    advisor::{Advisor, RequestTracker, ShoppingCart},
    core::{services::ServiceError, FinanceWorkspace},
    domain::common::start_of_day,
    errors::LedgerError,
    storage::JsonStorage,
};

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    /// Opens the workspace under the default data directory and wires the
    /// advisor from the environment.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let storage = JsonStorage::new_default()?;
        let workspace = FinanceWorkspace::open(Box::new(storage));
        Ok(Self::with_workspace(mode, workspace, Advisor::from_env()))
    }

    pub fn with_workspace(mode: CliMode, workspace: FinanceWorkspace, advisor: Advisor) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = ShellContext {
            mode,
            registry,
            workspace,
            advisor,
            advice: RequestTracker::new(),
            last_shopping: None,
            cart: ShoppingCart::default(),
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        };
        context.report_load();
        context
    }

    fn report_load(&self) {
        for warning in self.workspace.load_warnings() {
            output::warning(warning);
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("shandu [{}]> ", self.workspace.mode())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let input = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Asks before a destructive step. Script mode accepts automatically.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        ask_yes_no(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        ask_yes_no(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        output::error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        output::hint(message);
    }
}

fn ask_yes_no(theme: &ColorfulTheme, prompt: &str, default: bool) -> Result<bool, CommandError> {
    Ok(Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let cleaned = input.trim().trim_start_matches(['R', 'r']);
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(CommandError::InvalidArguments(format!(
            "invalid amount `{}` (use a non-negative number)",
            input
        ))),
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// `--date` value as a timestamp, defaulting to the current instant.
pub(crate) fn parse_occurrence(input: Option<&str>) -> Result<DateTime<Utc>, CommandError> {
    match input {
        Some(raw) => parse_date(raw).map(start_of_day),
        None => Ok(Utc::now()),
    }
}

/// Parses a 1-based position into a list of `len` entries.
pub(crate) fn parse_position(input: &str, len: usize) -> Result<usize, CommandError> {
    match input.trim().parse::<usize>() {
        Ok(value) if value >= 1 && value <= len => Ok(value - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` is not between 1 and {}",
            input, len
        ))),
    }
}

/// Splits `--name value` options from positional arguments.
pub(crate) fn split_options<'a>(
    args: &[&'a str],
    known: &[&str],
) -> Result<(Vec<&'a str>, Vec<(String, &'a str)>), CommandError> {
    let mut positional = Vec::new();
    let mut options = Vec::new();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        let Some(name) = arg.strip_prefix("--") else {
            positional.push(arg);
            continue;
        };
        if !known.contains(&name) {
            return Err(CommandError::InvalidArguments(format!(
                "unknown option `--{}`",
                name
            )));
        }
        let value = iter.next().ok_or_else(|| {
            CommandError::InvalidArguments(format!("option `--{}` needs a value", name))
        })?;
        options.push((name.to_string(), value));
    }
    Ok((positional, options))
}

pub(crate) fn option<'a>(options: &[(String, &'a str)], name: &str) -> Option<&'a str> {
    options
        .iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| *value)
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {}", usage))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ledger(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

/// User-facing shell error.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    context: &mut ShellContext,
    lines: &[&str],
) -> Result<(), CommandError> {
    for line in lines {
        match context.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OperatingMode, TransactionKind};
    use crate::storage::MemoryStorage;

    fn script_context() -> ShellContext {
        let workspace = FinanceWorkspace::open(Box::new(MemoryStorage::new()));
        ShellContext::with_workspace(CliMode::Script, workspace, Advisor::offline())
    }

    #[test]
    fn transaction_commands_update_workspace() {
        let mut ctx = script_context();
        process_script(
            &mut ctx,
            &[
                "transaction add income 6000 Salary \"March pay\" --date 2024-03-01",
                "transaction add expense 250 Transport --date 2024-03-05",
            ],
        )
        .unwrap();
        let txns = ctx.workspace.transactions();
        assert_eq!(txns.len(), 2);
        let first = txns.iter().next().unwrap();
        assert_eq!(first.kind, TransactionKind::Income);
        assert_eq!(first.description, "March pay");
        assert_eq!(first.date.date_naive(), parse_date("2024-03-01").unwrap());
    }

    #[test]
    fn remove_by_id_prefix() {
        let mut ctx = script_context();
        ctx.process_line("transaction add expense 40 Groceries").unwrap();
        let id = ctx.workspace.transactions().iter().next().unwrap().id;
        let prefix = &id.simple().to_string()[..6];
        ctx.process_line(&format!("transaction remove {prefix}")).unwrap();
        assert!(ctx.workspace.transactions().is_empty());
    }

    #[test]
    fn invalid_amount_is_reported_as_argument_error() {
        let mut ctx = script_context();
        let err = ctx
            .process_line("transaction add expense -5 Groceries")
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }

    #[test]
    fn goals_follow_active_mode() {
        let mut ctx = script_context();
        process_script(
            &mut ctx,
            &[
                "goal add save 4000 2030-01-01 New laptop --priority high",
                "mode business",
                "goal add profit_increase 9000 2030-06-01 Grow margin",
            ],
        )
        .unwrap();
        assert_eq!(ctx.workspace.mode(), OperatingMode::Business);
        assert_eq!(ctx.workspace.goals().len(), 2);
        assert_eq!(ctx.workspace.goal_overview(Utc::now()).len(), 1);
    }

    #[test]
    fn exit_stops_processing() {
        let mut ctx = script_context();
        process_script(&mut ctx, &["exit", "transaction add income 1 Gift"]).unwrap();
        assert!(ctx.workspace.transactions().is_empty());
    }

    #[test]
    fn unknown_command_is_not_an_error() {
        let mut ctx = script_context();
        assert_eq!(ctx.process_line("sumary").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn split_options_extracts_flags() {
        let args = ["save", "100", "--priority", "high", "Trip"];
        let (positional, options) = split_options(&args, &["priority"]).unwrap();
        assert_eq!(positional, vec!["save", "100", "Trip"]);
        assert_eq!(option(&options, "priority"), Some("high"));
        assert!(split_options(&["--bogus", "1"], &["priority"]).is_err());
        assert!(split_options(&["--priority"], &["priority"]).is_err());
    }

    #[test]
    fn parse_position_is_one_based() {
        assert_eq!(parse_position("1", 3).unwrap(), 0);
        assert!(parse_position("0", 3).is_err());
        assert!(parse_position("4", 3).is_err());
    }
}
