pub mod services;
pub mod utils;
pub mod workspace;

pub use workspace::FinanceWorkspace;
