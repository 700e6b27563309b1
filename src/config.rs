//! Extractor configuration sourced from the environment.
//!
//! Values are read from process environment variables, after an optional
//! `.env` file in the working directory has been loaded.

use std::path::PathBuf;

use log::debug;

use crate::clients::errors::{Error, Result};

/// Default location of the serialized playlist graph
pub const DEFAULT_GRAPH_FILE: &str = "wedding_playlist.rdf";

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "SPOTIFY_REDIRECT_URI";
pub const PLAYLIST_ID_VAR: &str = "SPOTIFY_PLAYLIST_ID";

/// Everything the extractor needs before it talks to Spotify
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub playlist_id: String,
    pub output: PathBuf,
}

pub struct SettingsBuilder {
    playlist_id: Option<String>,
    output: Option<PathBuf>,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            playlist_id: None,
            output: None,
        }
    }

    /// Takes precedence over `SPOTIFY_PLAYLIST_ID`
    #[must_use]
    pub fn playlist_id(mut self, playlist_id: Option<String>) -> Self {
        self.playlist_id = playlist_id;
        self
    }

    #[must_use]
    pub fn output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// Load `.env` if present, then read the process environment
    pub fn build(self) -> Result<Settings> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {path:?}"),
            Err(e) => debug!("No .env file loaded: {e}"),
        }
        self.build_with(|name| std::env::var(name).ok())
    }

    /// Resolve settings through `lookup`. All missing variables are reported at once.
    pub fn build_with<F>(self, lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| {
            let value = lookup(name).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let client_id = require(CLIENT_ID_VAR);
        let client_secret = require(CLIENT_SECRET_VAR);
        let redirect_uri = require(REDIRECT_URI_VAR);
        let playlist_id = match self.playlist_id {
            Some(id) => id,
            None => require(PLAYLIST_ID_VAR),
        };

        if !missing.is_empty() {
            return Err(Error::ConfigurationError(format!(
                "missing environment variables: {}. Set them in the environment or a .env file.",
                missing.join(", ")
            )));
        }

        Ok(Settings {
            client_id,
            client_secret,
            redirect_uri,
            playlist_id,
            output: self
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GRAPH_FILE)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn reads_all_four_variables() {
        let vars = env(&[
            (CLIENT_ID_VAR, "id"),
            (CLIENT_SECRET_VAR, "secret"),
            (REDIRECT_URI_VAR, "http://127.0.0.1:8888/callback"),
            (PLAYLIST_ID_VAR, "37i9dQZF1DXcBWIGoYBM5M"),
        ]);
        let settings = SettingsBuilder::new()
            .build_with(|name| vars.get(name).cloned())
            .unwrap();
        assert_eq!(settings.client_id, "id");
        assert_eq!(settings.playlist_id, "37i9dQZF1DXcBWIGoYBM5M");
        assert_eq!(settings.output, PathBuf::from(DEFAULT_GRAPH_FILE));
    }

    #[test]
    fn reports_every_missing_variable() {
        let vars = env(&[(CLIENT_ID_VAR, "id"), (CLIENT_SECRET_VAR, "  ")]);
        let err = SettingsBuilder::new()
            .build_with(|name| vars.get(name).cloned())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains(CLIENT_SECRET_VAR));
        assert!(message.contains(REDIRECT_URI_VAR));
        assert!(message.contains(PLAYLIST_ID_VAR));
        assert!(!message.contains(CLIENT_ID_VAR));
    }

    #[test]
    fn cli_overrides_playlist_and_output() {
        let vars = env(&[
            (CLIENT_ID_VAR, "id"),
            (CLIENT_SECRET_VAR, "secret"),
            (REDIRECT_URI_VAR, "http://127.0.0.1:8888/callback"),
        ]);
        let settings = SettingsBuilder::new()
            .playlist_id(Some("override".into()))
            .output(Some(PathBuf::from("out.ttl")))
            .build_with(|name| vars.get(name).cloned())
            .unwrap();
        assert_eq!(settings.playlist_id, "override");
        assert_eq!(settings.output, PathBuf::from("out.ttl"));
    }
}
