use dialoguer::theme::ColorfulTheme;

use crate::{
    advisor::{Advisor, RequestTracker, ShoppingCart, ShoppingInsight},
    core::FinanceWorkspace,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub workspace: FinanceWorkspace,
    pub advisor: Advisor,
    pub advice: RequestTracker<String>,
    pub last_shopping: Option<ShoppingInsight>,
    pub cart: ShoppingCart,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}
