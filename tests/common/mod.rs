//! Shared fixtures for the integration tests: a recording fake migration
//! engine, an in-memory output sink, and a scratch project layout.

// Each test binary uses its own subset of these helpers
#![allow(dead_code)]

use async_trait::async_trait;
use migration_harness::{
    ApplicationContext, Error, MigrationCommand, MigrationDirective, MigrationEngine,
    MigrationHookConfig, OutputStream, OutputWriter, Result,
};
use sqlx::sqlite::SqlitePool;
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Capture log output inside the test harness instead of stderr
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One recorded engine invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: MigrationCommand,
    pub target: String,
}

#[derive(Default)]
pub struct EngineState {
    pub invocations: Vec<Invocation>,
    /// Fake migration history: up pushes one entry per invocation, down
    /// pops it, so an up/down round trip leaves this empty
    pub history: Vec<String>,
    /// Database pools observed on the contexts handed in, cloned so the
    /// tests can check they were closed during teardown
    pub pools: Vec<SqlitePool>,
    /// Bytes of progress output the engine emitted
    pub bytes_emitted: usize,
    /// When set, every invocation fails with this message
    pub fail_with: Option<String>,
}

/// Fake migration engine that records every invocation and emits noisy
/// progress output the way a real engine would
#[derive(Clone, Default)]
pub struct RecordingEngine {
    state: Arc<Mutex<EngineState>>,
}

impl RecordingEngine {
    pub fn failing(message: &str) -> Self {
        let engine = Self::default();
        engine.state.lock().unwrap().fail_with = Some(message.to_string());
        engine
    }

    pub fn state(&self) -> Arc<Mutex<EngineState>> {
        Arc::clone(&self.state)
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.lock().unwrap().invocations.clone()
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().unwrap().history.len()
    }
}

#[async_trait]
impl MigrationEngine for RecordingEngine {
    async fn apply(
        &mut self,
        context: &ApplicationContext,
        directive: &MigrationDirective,
        output: &mut OutputWriter,
    ) -> Result<()> {
        assert!(
            context.session().is_open(),
            "engine must be handed a live application context"
        );

        let mut state = self.state.lock().unwrap();

        if let Some(pool) = context.database() {
            assert!(!pool.is_closed(), "context database must be open during the run");
            state.pools.push(pool.clone());
        }

        if let Some(message) = state.fail_with.clone() {
            return Err(Error::engine(message));
        }

        let line = format!(
            "*** applying migrations ({}) for {}\n",
            directive.command, directive.target
        );
        output.write_all(line.as_bytes())?;
        state.bytes_emitted += line.len();

        match directive.command {
            MigrationCommand::Up => state.history.push(directive.target.to_string()),
            MigrationCommand::Down => {
                state.history.pop();
            }
        }

        state.invocations.push(Invocation {
            command: directive.command,
            target: directive.target.to_string(),
        });

        Ok(())
    }
}

/// In-memory stand-in for the process's standard output
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }

    pub fn stream(&self) -> OutputStream {
        OutputStream::new(Box::new(self.clone()))
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Scratch project with a migrations directory and an application config
/// declaring an in-memory sqlite database
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new(migration_dirs: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        for sub in migration_dirs {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        fs::write(
            dir.path().join("app.toml"),
            "[database]\nurl = \"sqlite::memory:\"\n",
        )
        .unwrap();
        Self { dir }
    }

    /// Hook config rooted at this project, pointing at its app config
    pub fn config(&self) -> MigrationHookConfig {
        MigrationHookConfig {
            config_file: Some("app.toml".to_string()),
            root_dir: self.dir.path().to_path_buf(),
            entry_url: "http://localhost/index.php".to_string(),
            ..Default::default()
        }
    }
}
