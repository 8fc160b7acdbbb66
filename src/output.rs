//! Scoped suppression of migration engine output
//!
//! Migration engines print progress lines ("Applying migration X...") that
//! have no place in test logs. [`OutputStream`] is the shared handle engines
//! write through; [`OutputStream::suppress`] diverts everything written into
//! a buffer that is discarded when the returned guard drops, restoring
//! pass-through on both the success and error paths.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

struct StreamState {
    target: Box<dyn Write + Send>,
    /// When set, written bytes are diverted here instead of the target
    diverted: Option<Vec<u8>>,
}

/// Shared handle to the stream migration engines emit progress on
///
/// Defaults to the process's standard output; tests point it at an
/// in-memory sink.
#[derive(Clone)]
pub struct OutputStream {
    inner: Arc<Mutex<StreamState>>,
}

impl OutputStream {
    /// Stream backed by the process's standard output
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Stream backed by an arbitrary writer
    pub fn new(target: Box<dyn Write + Send>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StreamState {
                target,
                diverted: None,
            })),
        }
    }

    /// Begin suppressing output until the returned guard drops
    ///
    /// Everything written through [`OutputStream::writer`] while the guard
    /// is alive is buffered and discarded on release.
    pub fn suppress(&self) -> SuppressGuard {
        self.lock().diverted = Some(Vec::new());
        SuppressGuard {
            stream: self.clone(),
        }
    }

    /// A [`Write`] front onto this stream
    pub fn writer(&self) -> OutputWriter {
        OutputWriter {
            stream: self.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StreamState> {
        // A panicked engine must not wedge the stream
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Writer handle passed to migration engines
pub struct OutputWriter {
    stream: OutputStream,
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.stream.lock();
        match &mut state.diverted {
            Some(buffer) => {
                buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            None => state.target.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.stream.lock();
        match state.diverted {
            Some(_) => Ok(()),
            None => state.target.flush(),
        }
    }
}

/// RAII guard holding the stream in suppressed state
///
/// Dropping the guard discards the buffered bytes and restores
/// pass-through, even when the delegated engine call failed or panicked.
pub struct SuppressGuard {
    stream: OutputStream,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        let mut state = self.stream.lock();
        if let Some(buffer) = state.diverted.take() {
            log::debug!("Discarded {} bytes of migration engine output", buffer.len());
        }
    }
}
