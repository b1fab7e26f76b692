//! Advisory overlay: prompt construction, the text-generation port and the
//! parsing of structured shopping replies. Every public operation is total;
//! backend failures turn into short in-character fallback messages.

pub mod gemini;
pub mod prompt;
pub mod shopping;
pub mod tracker;

use std::thread;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Goal, OperatingMode, Transaction};

pub use gemini::{GeminiBackend, OfflineBackend};
pub use shopping::{
    parse_shopping_block, SearchInsight, ShoppingCart, ShoppingInsight, ShoppingItem, ShoppingKind,
};
pub use tracker::{RequestTicket, RequestTracker};

pub const ADVICE_FALLBACK: &str = "Connection error. Focus on your spreadsheet for now.";
pub const ADVICE_EMPTY: &str = "I couldn't analyze that right now. Check your inputs.";
pub const SEARCH_FALLBACK: &str = "I couldn't access the live market data. Stick to the budget.";
pub const SEARCH_EMPTY: &str = "No product data found.";
pub const SHOPPING_FALLBACK: &str = "Market data unavailable. Check internet connection.";
pub const GOAL_FALLBACK: &str = "I can't analyze this goal right now. Do the math manually.";
pub const GOAL_EMPTY: &str = "Goal analysis unavailable.";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor API key is not configured (set GEMINI_API_KEY)")]
    NotConfigured,
    #[error("advisor request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("advisor service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Web source backing a grounded reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceRequest {
    pub prompt: String,
    pub system_instruction: String,
    pub use_search: bool,
}

impl AdviceRequest {
    pub fn new(prompt: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: system_instruction.into(),
            use_search: false,
        }
    }

    pub fn with_search(mut self) -> Self {
        self.use_search = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdviceResponse {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Port to an external text-generation service.
pub trait AdviceBackend: Send + Sync {
    fn generate(&self, request: &AdviceRequest) -> Result<AdviceResponse, AdvisorError>;

    fn is_configured(&self) -> bool {
        true
    }
}

/// Tracker key for advice about one goal.
pub fn goal_key(id: Uuid) -> String {
    format!("goal:{}", id.simple())
}

pub struct Advisor {
    backend: Box<dyn AdviceBackend>,
    system_instruction: String,
}

impl Advisor {
    pub fn new(backend: Box<dyn AdviceBackend>) -> Self {
        Self {
            backend,
            system_instruction: prompt::system_instruction(),
        }
    }

    pub fn offline() -> Self {
        Self::new(Box::new(OfflineBackend))
    }

    /// Uses the hosted backend when an API key is present in the environment.
    pub fn from_env() -> Self {
        match GeminiBackend::from_env() {
            Some(Ok(backend)) => Self::new(Box::new(backend)),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "advisor client could not be built, running offline");
                Self::offline()
            }
            None => {
                tracing::info!("no advisor API key found, running offline");
                Self::offline()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    pub fn financial_advice(
        &self,
        transactions: &[Transaction],
        mode: OperatingMode,
        question: &str,
    ) -> String {
        let request = self.request(prompt::advice_prompt(transactions, mode, question));
        match self.backend.generate(&request) {
            Ok(response) => non_empty_or(response.text, ADVICE_EMPTY),
            Err(err) => {
                tracing::error!(error = %err, "financial advice request failed");
                ADVICE_FALLBACK.to_string()
            }
        }
    }

    pub fn product_search(&self, query: &str, mode: OperatingMode) -> SearchInsight {
        let request = self
            .request(prompt::product_search_prompt(query, mode))
            .with_search();
        match self.backend.generate(&request) {
            Ok(response) => SearchInsight {
                text: non_empty_or(response.text, SEARCH_EMPTY),
                sources: response.citations,
            },
            Err(err) => {
                tracing::error!(error = %err, query, "product search failed");
                SearchInsight {
                    text: SEARCH_FALLBACK.to_string(),
                    sources: Vec::new(),
                }
            }
        }
    }

    pub fn shopping_insights(&self, query: &str) -> ShoppingInsight {
        let request = self.request(prompt::shopping_prompt(query)).with_search();
        match self.backend.generate(&request) {
            Ok(response) => {
                let (items, narrative) = parse_shopping_block(&response.text);
                tracing::info!(query, items = items.len(), "shopping insights received");
                ShoppingInsight {
                    items,
                    narrative,
                    sources: response.citations,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, query, "shopping insights failed");
                ShoppingInsight {
                    narrative: SHOPPING_FALLBACK.to_string(),
                    ..ShoppingInsight::default()
                }
            }
        }
    }

    pub fn goal_advice(
        &self,
        goal: &Goal,
        transactions: &[Transaction],
        mode: OperatingMode,
    ) -> String {
        let request = self.request(prompt::goal_prompt(goal, transactions, mode));
        match self.backend.generate(&request) {
            Ok(response) => non_empty_or(response.text, GOAL_EMPTY),
            Err(err) => {
                tracing::error!(error = %err, goal = %goal.id, "goal advice request failed");
                GOAL_FALLBACK.to_string()
            }
        }
    }

    /// Requests advice for several goals in parallel. Each answer lands in
    /// `tracker` under [`goal_key`]; the answers that were still current are
    /// returned in the order of `goals`.
    pub fn advise_goals(
        &self,
        goals: &[&Goal],
        transactions: &[Transaction],
        mode: OperatingMode,
        tracker: &RequestTracker<String>,
    ) -> Vec<(Uuid, String)> {
        thread::scope(|scope| {
            for goal in goals {
                let ticket = tracker.issue(goal_key(goal.id));
                scope.spawn(move || {
                    let advice = self.goal_advice(goal, transactions, mode);
                    tracker.complete(ticket, advice);
                });
            }
        });
        goals
            .iter()
            .filter_map(|goal| {
                tracker
                    .take(&goal_key(goal.id))
                    .map(|advice| (goal.id, advice))
            })
            .collect()
    }

    fn request(&self, prompt: String) -> AdviceRequest {
        AdviceRequest::new(prompt, self.system_instruction.clone())
    }
}

fn non_empty_or(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted {
        reply: Result<String, u16>,
        seen: Mutex<Vec<AdviceRequest>>,
    }

    impl Scripted {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl AdviceBackend for Scripted {
        fn generate(&self, request: &AdviceRequest) -> Result<AdviceResponse, AdvisorError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(AdviceResponse {
                    text: text.clone(),
                    citations: Vec::new(),
                }),
                Err(status) => Err(AdvisorError::Status {
                    status: *status,
                    body: String::new(),
                }),
            }
        }
    }

    #[test]
    fn offline_advisor_falls_back() {
        let advisor = Advisor::offline();
        assert!(!advisor.is_configured());
        assert_eq!(
            advisor.financial_advice(&[], OperatingMode::Personal, "hi"),
            ADVICE_FALLBACK
        );
        let insight = advisor.shopping_insights("bread");
        assert!(insight.items.is_empty());
        assert_eq!(insight.narrative, SHOPPING_FALLBACK);
        assert_eq!(
            advisor.product_search("bread", OperatingMode::Business).text,
            SEARCH_FALLBACK
        );
    }

    #[test]
    fn empty_reply_uses_empty_message() {
        let advisor = Advisor::new(Box::new(Scripted::ok("   ")));
        assert_eq!(
            advisor.financial_advice(&[], OperatingMode::Personal, "hi"),
            ADVICE_EMPTY
        );
        assert_eq!(
            advisor.product_search("milk", OperatingMode::Personal).text,
            SEARCH_EMPTY
        );
    }

    #[test]
    fn status_error_uses_goal_fallback() {
        let backend = Scripted {
            reply: Err(503),
            seen: Mutex::new(Vec::new()),
        };
        let advisor = Advisor::new(Box::new(backend));
        let goal = Goal::new(
            OperatingMode::Personal,
            crate::domain::GoalKind::Save,
            "Laptop",
            8000.0,
            chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        );
        assert_eq!(
            advisor.goal_advice(&goal, &[], OperatingMode::Personal),
            GOAL_FALLBACK
        );
    }

    #[test]
    fn search_operations_request_grounding() {
        let backend = std::sync::Arc::new(Scripted::ok("R20"));
        struct Shared(std::sync::Arc<Scripted>);
        impl AdviceBackend for Shared {
            fn generate(&self, request: &AdviceRequest) -> Result<AdviceResponse, AdvisorError> {
                self.0.generate(request)
            }
        }
        let advisor = Advisor::new(Box::new(Shared(backend.clone())));
        advisor.financial_advice(&[], OperatingMode::Personal, "hi");
        advisor.product_search("milk", OperatingMode::Personal);
        advisor.shopping_insights("milk");
        let seen = backend.seen.lock().unwrap();
        let flags: Vec<bool> = seen.iter().map(|req| req.use_search).collect();
        assert_eq!(flags, vec![false, true, true]);
        assert!(seen[0].system_instruction.contains("Buddy"));
    }
}
