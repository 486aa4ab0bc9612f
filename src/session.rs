// src/session.rs
use std::fmt;
use std::path::Path;

use crate::config::{Config, ConfigError};

/// Who is composing the workout and how requests are authorized.
/// Built once and passed down explicitly; nothing reads it from global state.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub teacher_id: String,
}

impl Session {
    pub fn new(token: impl Into<String>, teacher_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            teacher_id: teacher_id.into(),
        }
    }

    /// Builds a session from the loaded config. `config_path` is only used in error messages.
    pub fn from_config(config: &Config, config_path: &Path) -> Result<Self, ConfigError> {
        let token = config
            .auth_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingToken(config_path.to_path_buf()))?;
        let teacher_id = config
            .teacher_id
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingTeacherId(config_path.to_path_buf()))?;
        Ok(Self::new(token.trim(), teacher_id.trim()))
    }
}

// Keep the token out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("teacher_id", &self.teacher_id)
            .finish()
    }
}
