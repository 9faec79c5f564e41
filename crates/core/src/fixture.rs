use serde::{Deserialize, Serialize};

/// A synthetic account created solely to drive the smoke suite.
///
/// Fixture users are static test input: the harness registers them against
/// the service but never persists them itself.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FixtureUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl FixtureUser {
    pub fn new(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}
