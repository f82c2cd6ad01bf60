use std::sync::Arc;

use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::ui::route::Route;
use crate::usecase::ports::api::AdminApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Backend and settings handed to the UI at launch.
#[derive(Clone)]
pub struct Backend {
    pub api: Arc<dyn AdminApi>,
    pub config: Arc<AppConfig>,
}

/// Shared by every page through the context API.
#[derive(Clone, Copy)]
pub struct AppState {
    pub route: Signal<Route>,
    pub notice: Signal<Option<Notice>>,
}

impl AppState {
    pub fn new(initial: Route) -> Self {
        Self {
            route: use_signal(move || initial),
            notice: use_signal(|| None::<Notice>),
        }
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(path = %route.path(), "navigate");
        self.notice.set(None);
        self.route.set(route);
    }

    /// Follows a rendered action path; unknown paths only log.
    pub fn navigate_path(&mut self, path: &str) {
        match Route::parse(path) {
            Some(route) => self.navigate(route),
            None => tracing::warn!(%path, "no screen for path"),
        }
    }

    /// Navigation that keeps the current notice, e.g. "Saved" after a form submit.
    pub fn redirect(&mut self, route: Route) {
        self.route.set(route);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.notice.set(Some(Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notice.set(Some(Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }));
    }
}

pub fn use_app_state() -> AppState {
    use_context::<AppState>()
}

pub fn use_backend() -> Backend {
    use_context::<Backend>()
}
