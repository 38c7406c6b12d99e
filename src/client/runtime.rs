//! The client's execution context.
//!
//! # Responsibilities
//! - Own a dedicated tokio runtime for handlers and stream pumps
//! - Spawn dispatch tasks onto it
//! - Release it on close (idempotent) or drop
//!
//! # Design Decisions
//! - `shutdown_background` never blocks, so closing from inside an async
//!   test is allowed
//! - Each client owns its own runtime; closing one never affects another

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Runtime owned by one client.
#[derive(Debug)]
pub struct ExecutionContext {
    runtime: Mutex<Option<Runtime>>,
}

impl ExecutionContext {
    /// Start the runtime described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .thread_name(config.thread_name.clone())
            .enable_all()
            .build()?;

        tracing::debug!(
            worker_threads = config.worker_threads,
            thread_name = %config.thread_name,
            "Mock client runtime started"
        );

        Ok(Self {
            runtime: Mutex::new(Some(runtime)),
        })
    }

    /// Spawn a task, failing with [`Error::Closed`] after close.
    pub fn spawn<F>(&self, task: F) -> Result<JoinHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let guard = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(runtime) => Ok(runtime.spawn(task)),
            None => Err(Error::Closed),
        }
    }

    /// Shut the runtime down. Returns false if it was already closed.
    pub fn close(&self) -> bool {
        let runtime = self
            .runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match runtime {
            Some(runtime) => {
                runtime.shutdown_background();
                tracing::debug!("Mock client runtime released");
                true
            }
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        self.close();
    }
}
