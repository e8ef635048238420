use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::Mirror;
use crate::slices::RequestId;
use crate::User;

#[derive(Debug, Clone)]
pub enum AuthAction {
    /// A register, login or federated login call was issued.
    Pending(RequestId),
    Fulfilled(RequestId, User),
    /// The provider rejected the call; carries its message verbatim.
    Rejected(RequestId, String),
    LogoutPending(RequestId),
    /// Sign-out settled. The session is cleared either way; a provider error
    /// is kept for display.
    LoggedOut(RequestId, Option<String>),
    ClearError,
}

/// Where the session stands, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    SignedOut,
    Pending,
    SignedIn,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
    pub is_authenticated: bool,
    #[serde(skip)]
    latest_request: Option<RequestId>,
}

/// The only part of the session that is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl AuthState {
    pub const STORAGE_KEY: &'static str = "auth";

    pub fn rehydrate(mirror: &Mirror) -> Self {
        let snapshot: AuthSnapshot = mirror.load(Self::STORAGE_KEY, AuthSnapshot::default());
        Self {
            is_authenticated: snapshot.is_authenticated && snapshot.user.is_some(),
            user: snapshot.user,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated,
        }
    }

    pub fn apply(&mut self, action: &AuthAction) {
        match action {
            AuthAction::Pending(id) | AuthAction::LogoutPending(id) => {
                self.latest_request = Some(*id);
                self.loading = true;
                self.error = None;
            }
            AuthAction::Fulfilled(id, user) => {
                if self.accept(*id) {
                    self.user = Some(user.clone());
                    self.is_authenticated = true;
                    self.error = None;
                    self.loading = false;
                }
            }
            AuthAction::Rejected(id, message) => {
                if self.accept(*id) {
                    self.user = None;
                    self.is_authenticated = false;
                    self.error = Some(message.clone());
                    self.loading = false;
                }
            }
            AuthAction::LoggedOut(id, error) => {
                if self.accept(*id) {
                    self.user = None;
                    self.is_authenticated = false;
                    self.error = error.clone();
                    self.loading = false;
                }
            }
            AuthAction::ClearError => self.error = None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.loading {
            SessionStatus::Pending
        } else if self.is_authenticated && self.user.is_some() {
            SessionStatus::SignedIn
        } else if self.error.is_some() {
            SessionStatus::Failed
        } else {
            SessionStatus::SignedOut
        }
    }

    fn accept(&self, id: RequestId) -> bool {
        let latest = self.latest_request == Some(id);
        if !latest {
            debug!("Discarding stale auth settlement {:?}", id);
        }
        latest
    }
}
