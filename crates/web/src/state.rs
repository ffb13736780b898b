use std::sync::Arc;

use storage::Store;
use storage::services::policy::ScoringPolicy;

use crate::middleware::auth::TokenKeys;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub policy: ScoringPolicy,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, policy: ScoringPolicy, tokens: TokenKeys) -> Self {
        Self {
            store,
            policy,
            tokens,
        }
    }
}
