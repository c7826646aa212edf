//! Background task runtime for store I/O and subscriptions.
//!
//! # Responsibility
//! - Resolve a tokio runtime for callers that are not inside one.
//! - Spawn fire-and-forget tasks whose errors end up in the log.
//!
//! # Invariants
//! - The fallback runtime is built at most once per process.
//! - Detached task failures are logged, never propagated or panicked on.

use log::{debug, error};
use once_cell::sync::OnceCell;
use std::fmt::Display;
use std::future::Future;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

const FALLBACK_WORKER_THREADS: usize = 2;

static FALLBACK_RUNTIME: OnceCell<Runtime> = OnceCell::new();

/// Returns the caller's runtime, or the process-wide fallback runtime.
///
/// # Errors
/// - Returns an I/O error when the fallback runtime cannot be built.
pub fn runtime_handle() -> std::io::Result<Handle> {
    if let Ok(handle) = Handle::try_current() {
        return Ok(handle);
    }

    let runtime = FALLBACK_RUNTIME.get_or_try_init(|| {
        debug!("event=runtime_init module=worker status=start");
        Builder::new_multi_thread()
            .worker_threads(FALLBACK_WORKER_THREADS)
            .thread_name("contacts-worker")
            .enable_all()
            .build()
    })?;
    Ok(runtime.handle().clone())
}

/// Spawns `task` with no join, logging its error when it fails.
///
/// Returns `None` when no runtime is available; that failure is logged too.
/// The returned handle is only useful to tests and shutdown paths.
pub fn spawn_detached<F, E>(task: &'static str, fut: F) -> Option<JoinHandle<()>>
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let handle = match runtime_handle() {
        Ok(handle) => handle,
        Err(err) => {
            error!(
                "event=task_spawn module=worker status=error task={task} error_code=runtime_unavailable error={err}"
            );
            return None;
        }
    };

    Some(handle.spawn(async move {
        match fut.await {
            Ok(()) => debug!("event=task_done module=worker status=ok task={task}"),
            Err(err) => error!("event=task_done module=worker status=error task={task} error={err}"),
        }
    }))
}
