use std::sync::Arc;

use giftdraw_db::Database;
use giftdraw_types::{DrawPolicy, RandomSource};
use tracing::error;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub rng: Arc<dyn RandomSource>,
    pub policy: DrawPolicy,
    /// When set, admin routes require `Authorization: Bearer <token>`.
    pub admin_token: Option<String>,
}

impl AppStateInner {
    pub fn new(db: Database, rng: Arc<dyn RandomSource>, policy: DrawPolicy) -> Self {
        Self {
            db,
            rng,
            policy,
            admin_token: None,
        }
    }

    pub fn with_admin_token(mut self, token: Option<String>) -> Self {
        self.admin_token = token.filter(|t| !t.is_empty());
        self
    }
}

/// Run blocking DB work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
}
