//! Application state shared across handlers.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::supabase::SupabaseClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    supabase: SupabaseClient,
    catalog: Catalog,
    /// Session ids with a submission currently in flight.
    submissions: Mutex<HashSet<String>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, supabase: SupabaseClient, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                supabase,
                catalog,
                submissions: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Supabase REST client.
    #[must_use]
    pub fn supabase(&self) -> &SupabaseClient {
        &self.inner.supabase
    }

    /// Get a reference to the startup-loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Mark a submission as in flight for the given session.
    ///
    /// Returns `None` when one is already running, in which case the caller
    /// must not start another. The returned guard releases the mark on drop,
    /// including when the submission future is cancelled.
    #[must_use]
    pub fn try_begin_submission(&self, session_id: &str) -> Option<SubmissionGuard> {
        let mut in_flight = self
            .inner
            .submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(session_id.to_string()) {
            return None;
        }
        Some(SubmissionGuard {
            state: self.clone(),
            session_id: session_id.to_string(),
        })
    }
}

/// RAII marker for one in-flight order submission.
pub struct SubmissionGuard {
    state: AppState,
    session_id: String,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.state
            .inner
            .submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session_id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    use crate::config::SupabaseConfig;

    fn state() -> AppState {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            supabase: SupabaseConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: SecretString::from("kJ8#mQ2$xR5!vT9@wZ3^bN6&pL1*sD4%"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        let supabase = SupabaseClient::new(&config.supabase);
        AppState::new(config, supabase, Catalog::default())
    }

    #[test]
    fn test_submission_guard_blocks_same_session() {
        let state = state();
        let guard = state.try_begin_submission("sess-1");
        assert!(guard.is_some());
        assert!(state.try_begin_submission("sess-1").is_none());
        assert!(state.try_begin_submission("sess-2").is_some());
    }

    #[test]
    fn test_submission_guard_releases_on_drop() {
        let state = state();
        drop(state.try_begin_submission("sess-1"));
        assert!(state.try_begin_submission("sess-1").is_some());
    }
}
