//! migration-harness - suite-scoped database migration lifecycle hook
//!
//! Runs a web application's schema migrations around an integration test
//! suite: "up" before the first test, "down" after the last one, with the
//! migration engine's console output suppressed so it does not pollute
//! test logs. The engine itself is supplied by the host application through
//! the [`MigrationEngine`] trait; this crate owns only the orchestration:
//! - target resolution and path-alias validation
//! - per-run construction and teardown of a mocked application context
//! - scoped output suppression around the delegated engine call

// Enforce error handling best practices
#![cfg_attr(
    not(test),
    warn(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
    )
)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used,))]

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod hook;
pub mod output;

// Re-export main types for public API
pub use config::{MigrationHookConfig, OneOrMany, TargetSpec};
pub use context::{AppConfig, ApplicationContext, ServerVars, Session};
pub use engine::{MigrationCommand, MigrationDirective, MigrationEngine, MigrationTarget};
pub use error::{Error, Result};
pub use hook::MigrationHook;
pub use output::{OutputStream, OutputWriter, SuppressGuard};
