// ==========================================
// Campus Administration Platform - Domain Types
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// User role
// ==========================================
// Serialization format: SCREAMING_SNAKE_CASE (matches the database)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Faculty,
    Staff,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "STUDENT"),
            Role::Faculty => write!(f, "FACULTY"),
            Role::Staff => write!(f, "STAFF"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl Role {
    /// Parse a database role string. Unknown values map to Student,
    /// the only role the allocation engine ever touches.
    pub fn from_db_str(s: &str) -> Role {
        match s {
            "FACULTY" => Role::Faculty,
            "STAFF" => Role::Staff,
            "ADMIN" => Role::Admin,
            _ => Role::Student,
        }
    }
}
