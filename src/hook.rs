//! Suite lifecycle orchestration
//!
//! [`MigrationHook`] binds a test harness's before-suite / after-suite
//! events to the wrapped migration engine: apply pending migrations on
//! suite start, revert them on suite end, each engine invocation running
//! against a freshly mocked application context with its output suppressed.

use crate::config::{MigrationHookConfig, TargetSpec};
use crate::context::ApplicationContext;
use crate::engine::{MigrationCommand, MigrationDirective, MigrationEngine, MigrationTarget};
use crate::error::Result;
use crate::output::OutputStream;

pub struct MigrationHook<E> {
    config: MigrationHookConfig,
    engine: E,
    output: OutputStream,
}

impl<E: MigrationEngine> MigrationHook<E> {
    /// Create a hook writing engine output to the process's stdout
    /// (suppressed for the duration of every engine invocation)
    pub fn new(config: MigrationHookConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            output: OutputStream::stdout(),
        }
    }

    /// Replace the output stream; primarily for tests
    pub fn with_output(mut self, output: OutputStream) -> Self {
        self.output = output;
        self
    }

    pub fn config(&self) -> &MigrationHookConfig {
        &self.config
    }

    /// Suite-start event: apply all pending migrations
    ///
    /// Always completes (or fails) before any test in the suite runs.
    pub async fn on_suite_start(&mut self) -> Result<()> {
        log::info!("Applying migrations before suite");
        self.run(MigrationCommand::Up).await
    }

    /// Suite-end event: revert the migrations applied during this run
    ///
    /// Runs after all tests in the suite, regardless of their outcome.
    /// Skipped entirely when `cleanup` is disabled.
    pub async fn on_suite_end(&mut self) -> Result<()> {
        if !self.config.cleanup {
            log::warn!("Migration cleanup disabled, leaving schema in place after suite");
            return Ok(());
        }
        log::info!("Reverting migrations after suite");
        self.run(MigrationCommand::Down).await
    }

    async fn run(&mut self, command: MigrationCommand) -> Result<()> {
        match self.config.resolve_targets()? {
            TargetSpec::Paths(paths) => {
                // Validate every path before any context is constructed,
                // so a bad entry anywhere aborts with no partial side effects
                let mut resolved = Vec::with_capacity(paths.len());
                for path in &paths {
                    resolved.push(self.config.validate_path(path)?);
                }

                for path in resolved {
                    self.run_one(MigrationTarget::Path(path), command).await?;
                }
                Ok(())
            }
            // Namespace resolution is deferred to the engine; the whole set
            // is one combined invocation
            TargetSpec::Namespaces(namespaces) => {
                self.run_one(MigrationTarget::Namespaces(namespaces), command)
                    .await
            }
        }
    }

    /// Run one directive: mock context, suppress output, delegate, restore,
    /// tear down. Teardown and stream restoration happen on the error path
    /// too; the engine result surfaces unchanged afterwards.
    async fn run_one(&mut self, target: MigrationTarget, command: MigrationCommand) -> Result<()> {
        let context = ApplicationContext::mock(&self.config)?;
        let directive = MigrationDirective::new(target, command);
        log::info!("Running migration {} for: {}", directive.command, directive.target);

        let result = {
            let _guard = self.output.suppress();
            let mut writer = self.output.writer();
            self.engine.apply(&context, &directive, &mut writer).await
        };

        context.destroy().await;
        result
    }
}
