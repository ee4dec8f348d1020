//! # Users, Roles and the Action Policy
//!
//! The shop has two fixed accounts. There is no authentication server:
//! [`authenticate`] is a plain credential check.
//!
//! ## Role Matrix
//! ```text
//! ┌──────────────────┬────────┬─────────┐
//! │ Action           │ admin  │ cashier │
//! ├──────────────────┼────────┼─────────┤
//! │ Dashboard        │   ✓    │    ✓    │
//! │ Sales            │   ✓    │    ✓    │
//! │ Inventory        │   ✓    │    ✓    │
//! │ Purchase         │   ✓    │         │
//! │ Report           │   ✓    │         │
//! │ DataManagement   │   ✓    │         │
//! └──────────────────┴────────┴─────────┘
//! ```
//!
//! The view layer asks [`is_allowed`] before showing a menu entry. The data
//! store does not check roles.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Admin,
    /// Older sessions stored this role as "kasir".
    #[serde(alias = "kasir")]
    Cashier,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Cashier => write!(f, "cashier"),
        }
    }
}

/// A gated area of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Action {
    Dashboard,
    Sales,
    Purchase,
    Inventory,
    Report,
    DataManagement,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Dashboard,
        Action::Sales,
        Action::Purchase,
        Action::Inventory,
        Action::Report,
        Action::DataManagement,
    ];
}

/// The single authorization policy, keyed by `(role, action)`.
pub fn is_allowed(role: Role, action: Action) -> bool {
    match role {
        Role::Admin => true,
        Role::Cashier => matches!(
            action,
            Action::Dashboard | Action::Sales | Action::Inventory
        ),
    }
}

/// Actions visible to `role`, in menu order.
pub fn allowed_actions(role: Role) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|action| is_allowed(role, *action))
        .collect()
}

/// A logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub email: String,
}

impl User {
    pub fn can(&self, action: Action) -> bool {
        is_allowed(self.role, action)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}

struct Account {
    id: i64,
    username: &'static str,
    password: &'static str,
    name: &'static str,
    role: Role,
    email: &'static str,
}

const ACCOUNTS: [Account; 2] = [
    Account {
        id: 1,
        username: "admin",
        password: "admin123",
        name: "Administrator Warung Sayur",
        role: Role::Admin,
        email: "admin@warungsayur.com",
    },
    Account {
        id: 2,
        username: "kasir",
        password: "kasir123",
        name: "Kasir Warung Sayur",
        role: Role::Cashier,
        email: "kasir@warungsayur.com",
    },
];

/// Checks a username/password pair against the built-in accounts.
pub fn authenticate(username: &str, password: &str) -> Result<User, AuthError> {
    ACCOUNTS
        .iter()
        .find(|a| a.username == username && a.password == password)
        .map(|a| User {
            id: a.id,
            username: a.username.to_string(),
            name: a.name.to_string(),
            role: a.role,
            email: a.email.to_string(),
        })
        .ok_or(AuthError::InvalidCredentials)
}
