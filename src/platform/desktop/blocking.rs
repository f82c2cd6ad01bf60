use anyhow::{Context, Result};

/// Runs `f` on tokio's blocking pool so SQLite and blocking HTTP calls never
/// stall the webview's event loop.
pub async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("background task did not finish")
}
