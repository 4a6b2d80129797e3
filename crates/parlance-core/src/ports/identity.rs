//! Identity port: who is using the session.

/// Supplies the current session's user identifier.
///
/// The identifier is used verbatim as the preference record key.
pub trait IdentityProvider: Send + Sync {
    /// Current user id, or `None` when nobody is signed in.
    fn current_user_id(&self) -> Option<String>;
}

/// Identity fixed at construction (CLI flags, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user_id: Option<String>,
}

impl StaticIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    /// Identity with no signed-in user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}
