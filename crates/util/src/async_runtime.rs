//! Bridge from synchronous callers into async I/O.
//!
//! The lookup pipeline is synchronous while the HTTP stack is async; this is
//! the single place where the two meet.

use anyhow::anyhow;
use std::future::Future;
use std::thread;
use tokio::{
    runtime::{Builder, Handle, RuntimeFlavor},
    task,
};

/// Drive `future` to completion from synchronous code.
///
/// Reuses the ambient runtime when called from inside a multi-threaded one.
/// A current-thread runtime cannot block in place, so the future then runs on
/// a scoped helper thread with a runtime of its own. Outside any runtime a
/// single-threaded runtime lives only for this call. Dropping the runtime
/// cancels anything the future left behind.
pub fn block_on_future<F, T>(future: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            task::block_in_place(|| handle.block_on(future))
        }
        Ok(_) => thread::scope(|scope| {
            scope
                .spawn(|| run_on_own_runtime(future))
                .join()
                .unwrap_or_else(|_| Err(anyhow!("async runtime thread panicked")))
        }),
        Err(_) => run_on_own_runtime(future),
    }
}

fn run_on_own_runtime<F, T>(future: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| anyhow!("failed to start async runtime: {error}"))?
        .block_on(future)
}
