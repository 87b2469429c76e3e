use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebarCollapsed";

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("Preferences file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preferences file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// Small JSON key/value file for client-local flags. Every write rewrites the file.
pub struct LocalPreferences {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl LocalPreferences {
    /// A missing file starts out empty.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Map::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded {} local preferences from {}", values.len(), path.display());
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub async fn sidebar_collapsed(&self) -> bool {
        self.values
            .lock()
            .await
            .get(SIDEBAR_COLLAPSED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub async fn set_sidebar_collapsed(&self, collapsed: bool) -> Result<(), PreferencesError> {
        let mut values = self.values.lock().await;
        values.insert(SIDEBAR_COLLAPSED_KEY.to_string(), Value::Bool(collapsed));
        self.persist(&values).await
    }

    /// Flip the flag and return its new value.
    pub async fn toggle_sidebar(&self) -> Result<bool, PreferencesError> {
        let mut values = self.values.lock().await;
        let collapsed = !values
            .get(SIDEBAR_COLLAPSED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        values.insert(SIDEBAR_COLLAPSED_KEY.to_string(), Value::Bool(collapsed));
        self.persist(&values).await?;
        Ok(collapsed)
    }

    async fn persist(&self, values: &Map<String, Value>) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(values)?).await?;
        Ok(())
    }
}
