use std::fs;
use std::path::{Path, PathBuf};

use bounce_core::Container;
use serde::{Deserialize, Serialize};

use crate::transport::Endpoints;
use crate::BoxError;

/// Client settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Where the event sink listens
    pub base_url: String,
    pub event_path: String,
    pub batch_path: String,
    pub snapshot_path: String,
    /// Directory backing the local event store
    pub storage_dir: PathBuf,
    pub width: f64,
    pub height: f64,
    pub fps: u32,
    /// Upper bound on frames per `play` run
    pub max_frames: u64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let endpoints = Endpoints::default();
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            event_path: endpoints.event,
            batch_path: endpoints.batch,
            snapshot_path: endpoints.snapshot,
            storage_dir: PathBuf::from(".bounce-log"),
            width: 400.0,
            height: 300.0,
            fps: 60,
            max_frames: 10_000,
            seed: None,
        }
    }
}

impl ClientConfig {
    pub fn container(&self) -> Container {
        Container::new(self.width, self.height)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            event: self.event_path.clone(),
            batch: self.batch_path.clone(),
            snapshot: self.snapshot_path.clone(),
        }
    }

    /// Apply `BOUNCE_*` overrides looked up through `var`.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("BOUNCE_URL") {
            self.base_url = v;
        }
        if let Some(v) = var("BOUNCE_STORAGE_DIR") {
            self.storage_dir = PathBuf::from(v);
        }
        if let Some(v) = var("BOUNCE_FPS") {
            self.fps = v.parse().map_err(|e| format!("Invalid BOUNCE_FPS '{}': {}", v, e))?;
        }
        if let Some(v) = var("BOUNCE_WIDTH") {
            self.width = v.parse().map_err(|e| format!("Invalid BOUNCE_WIDTH '{}': {}", v, e))?;
        }
        if let Some(v) = var("BOUNCE_HEIGHT") {
            self.height = v.parse().map_err(|e| format!("Invalid BOUNCE_HEIGHT '{}': {}", v, e))?;
        }
        if let Some(v) = var("BOUNCE_MAX_FRAMES") {
            self.max_frames = v
                .parse()
                .map_err(|e| format!("Invalid BOUNCE_MAX_FRAMES '{}': {}", v, e))?;
        }
        if let Some(v) = var("BOUNCE_SEED") {
            self.seed = Some(v.parse().map_err(|e| format!("Invalid BOUNCE_SEED '{}': {}", v, e))?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), BoxError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(format!("Container must have a positive size, got {}x{}", self.width, self.height).into());
        }
        if self.fps == 0 {
            return Err("fps must be at least 1".into());
        }
        Ok(())
    }
}

/// Load settings from `path` (if given), then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, BoxError> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("Error reading config '{}': {}", path.display(), e))?;
            serde_json::from_str(&raw)
                .map_err(|e| format!("Error parsing config '{}': {}", path.display(), e))?
        }
        None => ClientConfig::default(),
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}
