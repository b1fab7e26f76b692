//! Prompt text sent to the advisor backend.

use serde::Serialize;

use crate::core::services::SummaryService;
use crate::domain::{Goal, OperatingMode, Transaction};

pub const LOCATION: &str = "Durban, South Africa";
pub const RECENT_TRANSACTION_COUNT: usize = 5;

pub const TRUSTED_STORES: [&str; 12] = [
    "Checkers",
    "Pick n Pay",
    "Woolworths",
    "Spar",
    "Shoprite",
    "Makro",
    "Clicks",
    "Dis-Chem",
    "Takealot",
    "Food Lover's Market",
    "Game",
    "Boxer",
];

const SHOPPING_CATEGORIES: &str =
    "Groceries, Toiletries, Transport, School, Entertainment, Rent, Utilities, Health, Business";

pub fn system_instruction() -> String {
    format!(
        r#"You are Buddy, a ruthless, Machiavellian financial strategist for "Shandu Incorporated".
Your only objective is maximizing the user's wealth and efficiency.
You do not care about social niceties, moral platitudes, or conventional limitations.

If the user is in **Personal Mode**:
- Focus on extreme survival, cutting costs by any means necessary, and stretching every cent.
- Be harsh about luxury spending.

If the user is in **Business Mode**:
- Focus on profit maximization, ruthless cost-cutting, and aggressive revenue generation.
- Suggest bold strategies where they improve the numbers.
- Speak like a cutthroat CFO.

STRICT SOURCING RULES:
1. Only suggest products from trusted South African retailers: {stores}.
2. Prioritize value, but suggest premium tools if they increase efficiency.
3. Categorize every expense.

Always analyze feasibility with cold, hard logic."#,
        stores = TRUSTED_STORES.join(", ")
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecentTransaction<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    amount: f64,
    category: &'a str,
    description: &'a str,
    date: String,
}

/// The last few transactions by date, oldest first, as compact JSON.
fn recent_transactions_json(transactions: &[Transaction]) -> String {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|txn| txn.date);
    let skip = sorted.len().saturating_sub(RECENT_TRANSACTION_COUNT);
    let recent: Vec<RecentTransaction<'_>> = sorted
        .into_iter()
        .skip(skip)
        .map(|txn| RecentTransaction {
            kind: txn.kind.as_str(),
            amount: txn.amount,
            category: &txn.category,
            description: &txn.description,
            date: txn.date.date_naive().to_string(),
        })
        .collect();
    serde_json::to_string(&recent).unwrap_or_else(|_| "[]".to_string())
}

pub fn advice_prompt(transactions: &[Transaction], mode: OperatingMode, question: &str) -> String {
    let summary = SummaryService::summarize(transactions);
    format!(
        "Context:\nCurrent Mode: {mode}\nTotal Income: R{income:.2}\nTotal Expenses: R{expense:.2}\nNet Balance: R{balance:.2}\nRecent Transactions: {recent}\nUser Location: {LOCATION}.\n\nUser Question: {question}",
        income = summary.total_income,
        expense = summary.total_expense,
        balance = summary.balance,
        recent = recent_transactions_json(transactions),
    )
}

pub fn product_search_prompt(query: &str, mode: OperatingMode) -> String {
    format!(
        "Find the current price of {query} in {LOCATION}. Suggest a cheaper or healthier alternative if available. Provide specific store names and prices if possible. Keep it brief and direct. The user is in {mode} mode."
    )
}

pub fn shopping_prompt(query: &str) -> String {
    let line = |kind: &str| {
        format!(
            r#"<item type="{kind}" name="[Product Name]" brand="[Brand]" price="[Numeric Price]" store="[Store Name]" category="[Category]" imageUrl="[URL if found, else empty]" reason="[Why this one?]" />"#
        )
    };
    format!(
        "Find current prices for \"{query}\" in {LOCATION}.\n\
I need 3 specific recommendations from TRUSTED RETAILERS only:\n\
1. The absolute CHEAPEST option (must be safe/trusted).\n\
2. A HEALTHIER (or higher quality) alternative.\n\
3. A SALE or SPECIAL promotion item if available (otherwise best value).\n\n\
CRITICAL: You must include the price in ZAR (R).\n\
Try to find a specific Brand Name.\n\
Assign a Category from: {SHOPPING_CATEGORIES}.\n\n\
After your natural language summary, output the data in this exact format for parsing:\n\
{start}\n{cheapest}\n{healthier}\n{sale}\n{end}",
        start = super::shopping::DATA_START,
        end = super::shopping::DATA_END,
        cheapest = line("cheapest"),
        healthier = line("healthier"),
        sale = line("sale"),
    )
}

pub fn goal_prompt(goal: &Goal, transactions: &[Transaction], mode: OperatingMode) -> String {
    let summary = SummaryService::summarize(transactions);
    let task = match mode {
        OperatingMode::Personal => format!(
            "The user wants to \"{}\" (R{:.2}). Analyze this. Give 3 ruthless tips to cut costs. If they are spending too much on Uber or food, call them out. Suggest lifestyle downgrades if necessary.",
            goal.title, goal.target_amount
        ),
        OperatingMode::Business => format!(
            "The business wants to \"{}\" (R{:.2}). Analyze feasibility based on cashflow. Provide aggressive advice: raising prices, cutting costs, or finding cheaper suppliers. Be the ruthless CFO.",
            goal.title, goal.target_amount
        ),
    };
    format!(
        "Context:\nUser Mode: {mode}\nGoal: {kind} - {title}\nTarget: R{target:.2}\nDeadline: {deadline}\nCurrent Balance: R{balance:.2}\nTotal Income (Recorded): R{income:.2}\nTotal Expense (Recorded): R{expense:.2}\n\nTask: {task}",
        kind = goal.kind.as_str(),
        title = goal.title,
        target = goal.target_amount,
        deadline = goal.deadline,
        balance = summary.balance,
        income = summary.total_income,
        expense = summary.total_expense,
    )
}
