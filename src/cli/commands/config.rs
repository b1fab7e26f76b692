use std::str::FromStr;

use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::{theme_name, THEMES};
use crate::domain::OperatingMode;

pub(crate) const MODES: &[&str] = &["personal", "business"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "mode",
            "Show or switch the operating mode",
            "mode [personal|business]",
            cmd_mode,
        ),
        CommandEntry::new("theme", "Show or pick the theme", "theme [id]", cmd_theme),
    ]
}

fn cmd_mode(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::info(format!("Current mode: {}", context.workspace.mode()));
            Ok(())
        }
        [value] => {
            let mode = OperatingMode::from_str(value)
                .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
            if mode == context.workspace.mode() {
                output::info(format!("Already in {} mode.", mode));
                return Ok(());
            }
            context.workspace.set_mode(mode)?;
            output::success(format!("Switched to {} mode. {}.", mode, mode.goals_heading()));
            Ok(())
        }
        _ => Err(usage_error("mode [personal|business]")),
    }
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let current = context.workspace.preferences().theme.clone();
            for (id, name) in THEMES {
                let marker = if id == current { "*" } else { " " };
                output::info(format!(" {} {:<10} {}", marker, id, name));
            }
            Ok(())
        }
        [value] => {
            context.workspace.set_theme(value)?;
            let id = &context.workspace.preferences().theme;
            output::success(format!(
                "Theme set to {}.",
                theme_name(id).unwrap_or(id.as_str())
            ));
            Ok(())
        }
        _ => Err(usage_error("theme [id]")),
    }
}
