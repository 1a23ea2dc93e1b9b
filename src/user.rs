//! User context and per-user dashboard sessions.
//!
//! The current user id is persisted in the blob store under
//! [`CURRENT_USER_KEY`]. A [`DashboardSession`] owns exactly one
//! [`WidgetStore`], for the current user; switching user tears that store
//! down and opens the new user's.

use crate::store::{BlobStore, WidgetStore};
use std::fmt;
use std::sync::Arc;

/// User selected when nothing is saved.
pub const DEFAULT_USER_ID: &str = "user1";

/// Blob key holding the current user id.
pub const CURRENT_USER_KEY: &str = "currentUserId";

/// Role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full access.
    Admin,
    /// Team manager.
    Manager,
    /// Read-only guest.
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Viewer => "viewer",
        };
        write!(f, "{}", s)
    }
}

/// A known user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserInfo {
    /// User id, also the storage scope.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Contact address.
    pub email: &'static str,
    /// Role.
    pub role: Role,
}

/// The user directory.
pub const USERS: [UserInfo; 3] = [
    UserInfo {
        id: "user1",
        name: "John Doe",
        email: "john@example.com",
        role: Role::Admin,
    },
    UserInfo {
        id: "user2",
        name: "Jane Smith",
        email: "jane@example.com",
        role: Role::Manager,
    },
    UserInfo {
        id: "user3",
        name: "Guest User",
        email: "guest@example.com",
        role: Role::Viewer,
    },
];

/// Looks up a user by id.
pub fn find_user(id: &str) -> Option<&'static UserInfo> {
    USERS.iter().find(|u| u.id == id)
}

/// Tracks the current user and persists the choice.
pub struct UserContext {
    blobs: Arc<dyn BlobStore>,
    current: String,
}

impl fmt::Debug for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserContext")
            .field("current", &self.current)
            .finish()
    }
}

impl UserContext {
    /// Loads the saved current user, falling back to [`DEFAULT_USER_ID`].
    pub fn load(blobs: Arc<dyn BlobStore>) -> Self {
        let current = match blobs.read(CURRENT_USER_KEY) {
            Ok(Some(id)) if find_user(id.trim()).is_some() => id.trim().to_string(),
            Ok(Some(id)) => {
                tracing::warn!("unknown saved user {:?}, using {}", id, DEFAULT_USER_ID);
                DEFAULT_USER_ID.to_string()
            }
            Ok(None) => DEFAULT_USER_ID.to_string(),
            Err(e) => {
                tracing::warn!("failed to read current user: {}", e);
                DEFAULT_USER_ID.to_string()
            }
        };
        Self { blobs, current }
    }

    /// Id of the current user.
    pub fn current_user_id(&self) -> &str {
        &self.current
    }

    /// Directory entry of the current user.
    pub fn user_info(&self) -> Option<&'static UserInfo> {
        find_user(&self.current)
    }

    /// Makes `id` the current user and saves it.
    ///
    /// Unknown ids are rejected and return `false`.
    pub fn set_current_user_id(&mut self, id: &str) -> bool {
        if find_user(id).is_none() {
            tracing::debug!("refusing to switch to unknown user {}", id);
            return false;
        }
        self.current = id.to_string();
        if let Err(e) = self.blobs.write(CURRENT_USER_KEY, id) {
            tracing::warn!("failed to save current user: {}", e);
        }
        true
    }
}

/// The current user together with their widget store.
pub struct DashboardSession {
    blobs: Arc<dyn BlobStore>,
    users: UserContext,
    store: WidgetStore,
}

impl fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardSession")
            .field("users", &self.users)
            .field("store", &self.store)
            .finish()
    }
}

impl DashboardSession {
    /// Opens the session of the saved current user.
    ///
    /// `user` overrides the saved choice for this session only when it names
    /// a known user; unknown overrides are ignored.
    pub fn open(blobs: Arc<dyn BlobStore>, user: Option<&str>) -> Self {
        let users = UserContext::load(Arc::clone(&blobs));
        let user_id = match user {
            Some(id) if find_user(id).is_some() => id.to_string(),
            Some(id) => {
                tracing::warn!("unknown user {}, using {}", id, users.current_user_id());
                users.current_user_id().to_string()
            }
            None => users.current_user_id().to_string(),
        };
        let store = WidgetStore::open(user_id, Arc::clone(&blobs));
        Self {
            blobs,
            users,
            store,
        }
    }

    /// User context.
    pub fn users(&self) -> &UserContext {
        &self.users
    }

    /// Directory entry of the user whose store is open.
    pub fn user_info(&self) -> Option<&'static UserInfo> {
        find_user(self.store.user_id())
    }

    /// Store of the current user.
    pub fn store(&self) -> &WidgetStore {
        &self.store
    }

    /// Mutable store of the current user.
    pub fn store_mut(&mut self) -> &mut WidgetStore {
        &mut self.store
    }

    /// Switches to user `id`, replacing the store instance.
    ///
    /// Returns `false` for unknown users. Switching to the user already open
    /// still saves the choice but keeps the store.
    pub fn switch_user(&mut self, id: &str) -> bool {
        if !self.users.set_current_user_id(id) {
            return false;
        }
        if self.store.user_id() != id {
            tracing::info!("switching dashboard from {} to {}", self.store.user_id(), id);
            self.store = WidgetStore::open(id, Arc::clone(&self.blobs));
        }
        true
    }
}
