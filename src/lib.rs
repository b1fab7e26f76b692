#![doc(test(attr(deny(warnings))))]

//! Shandu Core tracks income, expenses and savings goals, projects the ledger
//! into monthly rates, and judges whether each goal is reachable before its
//! deadline. An advisor overlay and a command shell sit on top.

pub mod advisor;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Shandu Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
