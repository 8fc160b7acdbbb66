use crate::context::ApplicationContext;
use crate::error::Result;
use crate::output::OutputWriter;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

/// Migration command (up or down)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    /// Apply all pending migrations
    Up,
    /// Revert the most recently applied batch
    Down,
}

impl MigrationCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationCommand::Up => "up",
            MigrationCommand::Down => "down",
        }
    }
}

impl fmt::Display for MigrationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the engine should look for migrations in one invocation
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationTarget {
    /// A single validated filesystem path
    Path(PathBuf),
    /// A namespace set, resolved by the engine itself
    Namespaces(Vec<String>),
}

impl fmt::Display for MigrationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationTarget::Path(path) => write!(f, "{}", path.display()),
            MigrationTarget::Namespaces(namespaces) => write!(f, "{}", namespaces.join(", ")),
        }
    }
}

/// One unit of work handed to the migration engine
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationDirective {
    pub target: MigrationTarget,
    pub command: MigrationCommand,
}

impl MigrationDirective {
    pub fn new(target: MigrationTarget, command: MigrationCommand) -> Self {
        Self { target, command }
    }
}

/// The delegation seam to the wrapped migration engine
///
/// Implementations own the actual migration semantics (pending-migration
/// discovery, history tracking, rollback). The harness constructs the
/// application context, hands it in by reference, and suppresses whatever
/// the engine writes to `output` — engines must emit progress there, never
/// directly to stdout.
#[async_trait]
pub trait MigrationEngine: Send {
    /// Run one directive against a freshly mocked application context
    ///
    /// Errors are propagated to the harness caller unchanged; the harness
    /// performs no retry.
    async fn apply(
        &mut self,
        context: &ApplicationContext,
        directive: &MigrationDirective,
        output: &mut OutputWriter,
    ) -> Result<()>;
}
