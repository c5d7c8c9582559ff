//! Authenticated caller identity.

/// The identity an operation runs on behalf of.
///
/// Produced by the transport after verifying the caller's token. Operations
/// take `Option<&Caller>`; `None` means the request carried no valid identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
    /// Stable user id from the identity store.
    pub user_id: String,
}

impl Caller {
    /// Create a caller from a verified user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
