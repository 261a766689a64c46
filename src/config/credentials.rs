//! Registry credentials from the environment

use super::ConfigError;

/// Environment variable holding the registry username.
pub const AUTH_USER_VAR: &str = "LUNA_AUTH_USER";

/// Environment variable holding the registry password.
pub const AUTH_PASS_VAR: &str = "LUNA_AUTH_PASS";

/// Basic-auth credentials for the registry. Immutable once loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read `LUNA_AUTH_USER` and `LUNA_AUTH_PASS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    ///
    /// Empty values are treated as missing. The error names the first
    /// variable that could not be resolved.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = required(&lookup, AUTH_USER_VAR)?;
        let password = required(&lookup, AUTH_PASS_VAR)?;
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(var)),
    }
}
