//! Request context carrying the acting user.

use serde::{Deserialize, Serialize};

use cardvault_core::types::UserId;

/// Context for one service invocation.
///
/// Every mutating operation receives the acting user explicitly; nothing
/// is read from ambient state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
}

impl RequestContext {
    /// Creates a context for the given acting user.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
