use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::IdentityConfig;

/// Opaque user id sent along with requests for personalization. Empty when
/// nothing is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity(String);

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn load(config: &IdentityConfig) -> Self {
        match resolve_identity_path(config) {
            Some(path) => Self::read(&path),
            None => Self::default(),
        }
    }

    pub fn read(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => Self::new(raw),
            Err(error) => {
                debug!("no user identity at {}: {error}", path.display());
                Self::default()
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn resolve_identity_path(config: &IdentityConfig) -> Option<PathBuf> {
    if let Some(path) = &config.path {
        return Some(path.clone());
    }

    if let Ok(path) = env::var("TYPEAHEAD_USER_ID_FILE") {
        return Some(PathBuf::from(path));
    }

    dirs::data_dir().map(|base| base.join("typeahead").join("user_id"))
}
