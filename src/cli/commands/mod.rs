pub mod advisor;
pub mod category;
pub mod config;
pub mod goal;
pub mod report;
pub mod system;
pub mod transaction;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        system::definitions(),
        report::definitions(),
        transaction::definitions(),
        goal::definitions(),
        category::definitions(),
        config::definitions(),
        advisor::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

/// Second-word keywords accepted by a command, for completion.
pub(crate) fn subcommands(command: &str) -> &'static [&'static str] {
    match command {
        "transaction" => transaction::SUBCOMMANDS,
        "goal" => goal::SUBCOMMANDS,
        "category" => category::SUBCOMMANDS,
        "cart" => advisor::CART_SUBCOMMANDS,
        "mode" => config::MODES,
        _ => &[],
    }
}
