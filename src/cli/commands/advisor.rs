use chrono::Utc;

use crate::advisor::{Citation, ShoppingItem};
use crate::cli::core::{parse_position, usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, money, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::short_id;

pub(crate) const CART_SUBCOMMANDS: &[&str] = &["add", "list", "remove"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "ask",
            "Ask Buddy about your finances",
            "ask <question...>",
            cmd_ask,
        ),
        CommandEntry::new(
            "search",
            "Look up a product price and cheaper alternatives",
            "search <product...>",
            cmd_search,
        ),
        CommandEntry::new(
            "shop",
            "Get cheapest, healthier and sale picks for a product",
            "shop <product...>",
            cmd_shop,
        ),
        CommandEntry::new(
            "buy",
            "Record a pick from the last `shop` result as an expense",
            "buy <n>",
            cmd_buy,
        ),
        CommandEntry::new(
            "cart",
            "Collect picks from `shop` and see the estimated total",
            "cart [list]\ncart add <n>\ncart remove <n>",
            cmd_cart,
        ),
    ]
}

fn print_sources(sources: &[Citation]) {
    if sources.is_empty() {
        return;
    }
    output::info("Sources:");
    for source in sources {
        let title = if source.title.is_empty() {
            source.uri.as_str()
        } else {
            source.title.as_str()
        };
        output::info(format!("  - {} <{}>", title, source.uri));
    }
}

fn print_item(position: usize, item: &ShoppingItem) {
    output::info(format!(
        "  {}. [{}] {} {}  {} at {}  ({})",
        position,
        item.kind.to_string().to_uppercase(),
        item.brand,
        item.name,
        money(item.price),
        item.store,
        item.category
    ));
    if !item.reason.is_empty() {
        output::info(format!("     {}", item.reason));
    }
}

fn cmd_ask(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error("ask <question...>"));
    }
    let question = args.join(" ");
    // Blocks the shell until the reply arrives; only one chat request is ever in flight.
    let answer = context.advisor.financial_advice(
        context.workspace.transactions().as_slice(),
        context.workspace.mode(),
        &question,
    );
    output_section("Buddy");
    output::info(answer);
    Ok(())
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error("search <product...>"));
    }
    let query = args.join(" ");
    let insight = context
        .advisor
        .product_search(&query, context.workspace.mode());
    output_section(format!("Market check: {}", query));
    output::info(&insight.text);
    print_sources(&insight.sources);
    Ok(())
}

fn cmd_shop(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error("shop <product...>"));
    }
    let query = args.join(" ");
    let insight = context.advisor.shopping_insights(&query);
    output_section(format!("Smart shopping: {}", query));
    if !insight.narrative.is_empty() {
        output::info(&insight.narrative);
    }
    if insight.items.is_empty() {
        output::warning("No picks found.");
    } else {
        for (index, item) in insight.items.iter().enumerate() {
            print_item(index + 1, item);
        }
        context.print_hint("Use `buy <n>` to record a pick or `cart add <n>` to keep it.");
    }
    print_sources(&insight.sources);
    context.last_shopping = Some(insight);
    Ok(())
}

fn last_pick(context: &ShellContext, position: &str) -> Result<ShoppingItem, CommandError> {
    let items = context
        .last_shopping
        .as_ref()
        .map(|insight| insight.items.as_slice())
        .unwrap_or_default();
    if items.is_empty() {
        return Err(CommandError::InvalidArguments(
            "no shopping picks yet; run `shop <product>` first".into(),
        ));
    }
    let index = parse_position(position, items.len())?;
    Ok(items[index].clone())
}

fn cmd_buy(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [position] = args else {
        return Err(usage_error("buy <n>"));
    };
    let item = last_pick(context, position)?;
    let transaction = item.to_expense(Utc::now());
    let description = transaction.description.clone();
    let id = context.workspace.add_transaction(transaction)?;
    output::success(format!(
        "Bought {} for {} [{}].",
        description,
        money(item.price),
        short_id(id)
    ));
    Ok(())
}

fn cmd_cart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => list_cart(context),
        [sub] if sub.eq_ignore_ascii_case("list") => list_cart(context),
        [sub, position] if sub.eq_ignore_ascii_case("add") => {
            let item = last_pick(context, position)?;
            let label = format!("{} {}", item.brand, item.name);
            if context.cart.add(item) {
                output::success(format!("Added {} to the cart.", label));
            } else {
                output::info(format!("{} is already in the cart.", label));
            }
            Ok(())
        }
        [sub, position] if sub.eq_ignore_ascii_case("remove") => {
            let index = parse_position(position, context.cart.items().len())?;
            let id = context.cart.items()[index].id;
            if let Some(item) = context.cart.remove(id) {
                output::success(format!("Removed {} {} from the cart.", item.brand, item.name));
            }
            Ok(())
        }
        _ => Err(usage_error("cart [list] | cart add <n> | cart remove <n>")),
    }
}

fn list_cart(context: &mut ShellContext) -> CommandResult {
    let items = context.cart.items();
    if items.is_empty() {
        output::info("Cart is empty.");
        return Ok(());
    }
    output_section("Cart");
    for (index, item) in items.iter().enumerate() {
        print_item(index + 1, item);
    }
    output::info(format!(
        "  Estimated total: {}",
        money(context.cart.total_estimated())
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{
        AdviceBackend, AdviceRequest, AdviceResponse, Advisor, AdvisorError,
    };
    use crate::cli::core::{process_script, CliMode};
    use crate::core::FinanceWorkspace;
    use crate::domain::TransactionKind;
    use crate::storage::MemoryStorage;

    struct CannedShop;

    impl AdviceBackend for CannedShop {
        fn generate(&self, _request: &AdviceRequest) -> Result<AdviceResponse, AdvisorError> {
            Ok(AdviceResponse {
                text: "Two picks.\n___DATA_START___\n<item type=\"cheapest\" name=\"Rice 2kg\" brand=\"Tastic\" price=\"R39.99\" store=\"Shoprite\" category=\"Groceries\" imageUrl=\"\" reason=\"Lowest price\" />\n<item type=\"sale\" name=\"Rice 5kg\" brand=\"\" price=\"89\" store=\"Checkers\" category=\"\" imageUrl=\"\" reason=\"Bulk special\" />\n___DATA_END___".into(),
                citations: Vec::new(),
            })
        }
    }

    fn context() -> ShellContext {
        let workspace = FinanceWorkspace::open(Box::new(MemoryStorage::new()));
        ShellContext::with_workspace(
            CliMode::Script,
            workspace,
            Advisor::new(Box::new(CannedShop)),
        )
    }

    #[test]
    fn buy_records_pick_as_expense() {
        let mut ctx = context();
        process_script(&mut ctx, &["shop rice", "buy 2"]).unwrap();
        let txn = ctx.workspace.transactions().iter().next().unwrap().clone();
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(txn.amount, 89.0);
        assert_eq!(txn.category, "Groceries");
        assert_eq!(txn.description, "Generic Rice 5kg (Checkers)");
    }

    #[test]
    fn ask_replies_synchronously_without_tracking() {
        let mut ctx = context();
        process_script(&mut ctx, &["ask \"is rice cheaper in bulk?\""]).unwrap();
        assert!(!ctx.advice.is_pending("chat"));
        assert!(ctx.advice.result("chat").is_none());
        assert!(ctx.workspace.transactions().is_empty());

        let err = process_script(&mut ctx, &["ask"]).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }

    #[test]
    fn buy_without_shopping_result_fails() {
        let mut ctx = context();
        let err = process_script(&mut ctx, &["buy 1"]).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }

    #[test]
    fn cart_collects_unique_picks() {
        let mut ctx = context();
        process_script(&mut ctx, &["shop rice", "cart add 1", "cart add 1", "cart add 2"])
            .unwrap();
        assert_eq!(ctx.cart.items().len(), 2);
        assert!((ctx.cart.total_estimated() - 128.99).abs() < 1e-9);
        process_script(&mut ctx, &["cart remove 1"]).unwrap();
        assert_eq!(ctx.cart.items()[0].name, "Rice 5kg");
        assert!(ctx.workspace.transactions().is_empty());
    }
}
