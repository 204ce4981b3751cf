//! Authentication session state.

/// The single admin session for a running instance.
///
/// Owned by the app state and passed by reference to whatever needs it,
/// with its lifecycle tied to login/logout. Holding a token implies
/// `logged_in`: the only way to set one is [`Session::set_token`], which
/// also sets the flag, and [`Session::clear`] resets both.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    logged_in: bool,
}

impl Session {
    /// Create an empty, logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the access token obtained from login and mark the session
    /// as logged in.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
        self.logged_in = true;
    }

    /// Reset to the logged-out state.
    pub fn clear(&mut self) {
        self.token = None;
        self.logged_in = false;
    }

    /// Current access token, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_logged_out() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_set_token_marks_logged_in() {
        let mut session = Session::new();
        session.set_token("abc123");
        assert!(session.is_logged_in());
        assert_eq!(session.token(), Some("abc123"));
    }

    #[test]
    fn test_clear_resets_both_fields() {
        let mut session = Session::new();
        session.set_token("abc123");
        session.clear();
        assert!(!session.is_logged_in());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut session = Session::new();
        session.clear();
        session.clear();
        assert!(!session.is_logged_in());
    }
}
