use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod domain;
mod infra;
mod messages;
mod platform;
mod ui;
mod usecase;

#[cfg(test)]
mod test_support;

use crate::config::{default_db_path, project_dirs, AppConfig, BackendConfig};
use crate::infra::http::client::HttpApi;
use crate::infra::sqlite::repo::SqliteApi;
use crate::platform::desktop::dialogs::show_error;
use crate::ui::state::app_state::Backend;
use crate::usecase::ports::api::AdminApi;

fn main() {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    init_tracing(&config.log_filter);
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "falling back to default settings");
    }

    let backend = match build_api(&config) {
        Ok(api) => Backend {
            api,
            config: Arc::new(config),
        },
        Err(err) => fail("Could not open the backend", &err),
    };
    let webview_data_dir = match default_webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => fail("Could not prepare the webview data directory", &err),
    };

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Portal Admin"))
                .with_data_directory(webview_data_dir),
        )
        .with_context(backend)
        .launch(app::App);
}

fn fail(title: &str, err: &anyhow::Error) -> ! {
    tracing::error!(error = %format!("{err:#}"), "{title}");
    show_error(title, &format!("{err:#}"));
    std::process::exit(1);
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn build_api(config: &AppConfig) -> Result<Arc<dyn AdminApi>> {
    match &config.backend {
        BackendConfig::Local { db_path } => {
            let db_path = match db_path {
                Some(path) => path.clone(),
                None => default_db_path()?,
            };
            tracing::info!(path = %db_path.display(), "using local database");
            let api = if config.seed_demo_data {
                SqliteApi::open_seeded(db_path)?
            } else {
                SqliteApi::open(db_path)?
            };
            Ok(Arc::new(api))
        }
        BackendConfig::Remote { base_url, token } => {
            tracing::info!(%base_url, "using remote backend");
            Ok(Arc::new(HttpApi::new(base_url, token.clone())?))
        }
    }
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
