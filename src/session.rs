//! Session
//!
//! Who is signed in, and with which backend token. The token is kept in its
//! own storage slot so a signed-in admin survives a restart; everything that
//! needs to know "is someone logged in" asks the [`Session`] instead of
//! reading storage directly.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::storage::Persister;

/// Errors raised while building session values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The backend returned an empty token.
    #[error("auth token cannot be empty")]
    EmptyToken,

    /// The username was empty.
    #[error("username cannot be empty")]
    EmptyUsername,
}

/// Reasons an [`Access`] check fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Nobody is signed in.
    #[error("not logged in")]
    NotLoggedIn,

    /// Signed in, but without the required role.
    #[error("insufficient permissions")]
    Forbidden,
}

/// Role of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office administrator.
    Admin,

    /// Regular shopper.
    Customer,
}

/// Access level a view requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any signed-in user.
    Authenticated,

    /// Administrators only.
    AdminOnly,
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    username: String,
    role: Role,
}

impl SessionUser {
    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyUsername`] for blank usernames.
    pub fn new(username: impl AsRef<str>, role: Role) -> Result<Self, SessionError> {
        let username = username.as_ref().trim();

        if username.is_empty() {
            return Err(SessionError::EmptyUsername);
        }

        Ok(Self {
            username: username.to_string(),
            role,
        })
    }

    /// Username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Bearer token issued by the backend. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyToken`] for blank tokens.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = Zeroizing::new(token.into());

        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }

        Ok(Self(token))
    }

    /// The raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for AuthToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("AuthToken(..)")
    }
}

#[derive(Serialize)]
struct StoredSessionRef<'a> {
    token: &'a str,
    username: &'a str,
    role: Role,
}

#[derive(Deserialize)]
struct StoredSession {
    token: String,
    username: String,
    role: Role,
}

impl StoredSession {
    fn into_parts(self) -> Result<(AuthToken, SessionUser), SessionError> {
        Ok((
            AuthToken::new(self.token)?,
            SessionUser::new(self.username, self.role)?,
        ))
    }
}

/// The current login, mirrored to a storage slot.
#[derive(Debug)]
pub struct Session<P> {
    persister: P,
    slot: String,
    current: Option<(AuthToken, SessionUser)>,
}

impl<P: Persister> Session<P> {
    /// Slot used by [`Session::open`].
    pub const DEFAULT_SLOT: &'static str = "session";

    /// Restore the session from the default slot.
    ///
    /// Missing or unreadable data yields a logged-out session.
    pub fn open(persister: P) -> Self {
        Self::open_slot(persister, Self::DEFAULT_SLOT)
    }

    /// Restore the session from `slot`.
    pub fn open_slot(persister: P, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let current = load(&persister, &slot);

        Self {
            persister,
            slot,
            current,
        }
    }

    /// Record a successful login.
    pub fn login(&mut self, token: AuthToken, user: SessionUser) {
        let stored = StoredSessionRef {
            token: token.expose(),
            username: user.username(),
            role: user.role(),
        };

        match serde_json::to_string(&stored) {
            Ok(encoded) => {
                let encoded = Zeroizing::new(encoded);

                if let Err(error) = self.persister.put(&self.slot, &encoded) {
                    warn!(slot = %self.slot, %error, "failed to persist session");
                }
            }
            Err(error) => warn!(slot = %self.slot, %error, "failed to encode session"),
        }

        info!(username = user.username(), role = ?user.role(), "logged in");

        self.current = Some((token, user));
    }

    /// Forget the login and delete the slot.
    pub fn logout(&mut self) {
        if let Some((_, user)) = self.current.take() {
            info!(username = user.username(), "logged out");
        }

        if let Err(error) = self.persister.delete(&self.slot) {
            warn!(slot = %self.slot, %error, "failed to delete session");
        }
    }

    /// The signed-in user.
    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current.as_ref().map(|(_, user)| user)
    }

    /// The backend token of the signed-in user.
    pub fn token(&self) -> Option<&AuthToken> {
        self.current.as_ref().map(|(token, _)| token)
    }

    /// Whether anyone is signed in.
    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Whether an administrator is signed in.
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(SessionUser::is_admin)
    }

    /// `Authorization` header value for backend calls.
    pub fn bearer_header(&self) -> Option<Zeroizing<String>> {
        self.token()
            .map(|token| Zeroizing::new(format!("Bearer {}", token.expose())))
    }

    /// Check the signed-in user against a required access level.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotLoggedIn`]: nobody is signed in.
    /// - [`AccessError::Forbidden`]: the user lacks the admin role.
    pub fn authorize(&self, access: Access) -> Result<&SessionUser, AccessError> {
        let user = self.current_user().ok_or(AccessError::NotLoggedIn)?;

        match access {
            Access::Authenticated => Ok(user),
            Access::AdminOnly if user.is_admin() => Ok(user),
            Access::AdminOnly => Err(AccessError::Forbidden),
        }
    }
}

fn load<P: Persister>(persister: &P, slot: &str) -> Option<(AuthToken, SessionUser)> {
    let stored = match persister.get(slot) {
        Ok(stored) => Zeroizing::new(stored?),
        Err(error) => {
            warn!(slot, %error, "failed to read session, starting logged out");
            return None;
        }
    };

    let parsed = serde_json::from_str::<StoredSession>(&stored)
        .map_err(|error| error.to_string())
        .and_then(|session| session.into_parts().map_err(|error| error.to_string()));

    match parsed {
        Ok(current) => Some(current),
        Err(error) => {
            warn!(slot, %error, "discarding invalid session");
            None
        }
    }
}
