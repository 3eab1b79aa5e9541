//! Request DTOs.
//!
//! Every field is optional so an absent field reaches the session manager,
//! which decides between `MissingField` and `Unauthorized`.

use serde::{Deserialize, Serialize};

use neoterik_auth::session::{LoginInput, RegisterInput};

/// Registration request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email.
    pub email: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Display name.
    pub name: Option<String>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            name: req.name,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email.
    pub email: Option<String>,
    /// Password.
    pub password: Option<String>,
}

impl From<LoginRequest> for LoginInput {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}
