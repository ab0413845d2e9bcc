use std::future::Future;
use std::panic;
use std::thread;

use tokio::runtime::Handle;

use crate::rfs::error::{FsTreeError, Result};

/// Drives `future` to completion on a fresh current-thread runtime.
///
/// A thread that already runs a tokio runtime cannot start another one, so in
/// that case the future runs on a scoped helper thread with its own runtime.
pub(crate) fn block_on<F>(future: F) -> Result<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    if Handle::try_current().is_err() {
        return run(future);
    }

    thread::scope(|scope| scope.spawn(move || run(future)).join())
        .unwrap_or_else(|payload| panic::resume_unwind(payload))
}

fn run<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(FsTreeError::Runtime)?;

    Ok(runtime.block_on(future))
}
