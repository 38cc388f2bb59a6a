use std::fmt;

/// HTTP identity attached to outgoing requests.
///
/// Starts `Anonymous` and is upgraded at most once, by a successful login. The
/// authenticated agent owns the cookie jar the login established.
#[derive(Clone, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(ureq::Agent),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Anonymous => f.write_str("Session::Anonymous"),
            Session::Authenticated(_) => f.write_str("Session::Authenticated"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    AwaitingCredentials,
    Authenticated,
    LoginFailed,
}
