use super::client::{normalize_email, Client};

/// Access mode of the current session.
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    /// Classification has not finished yet.
    Loading,
    Admin,
    Client(Box<Client>),
    Unauthorized,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Loading => "loading",
            Role::Admin => "admin",
            Role::Client(_) => "client",
            Role::Unauthorized => "unauthorized",
        }
    }
}

/// Sign-in/sign-out transitions reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { email: String },
    SignedOut,
}

impl AuthEvent {
    pub fn email(&self) -> Option<&str> {
        match self {
            AuthEvent::SignedIn { email } => Some(email),
            AuthEvent::SignedOut => None,
        }
    }
}

/// Lower-cased admin allow-list.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList(Vec<String>);

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            emails
                .into_iter()
                .map(|e| normalize_email(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.0.iter().any(|e| *e == email)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
