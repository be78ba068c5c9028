//! Generic async file-based config source with SHA-256 version hashing.
//!
//! [`FileSource`] implements [`ConfigSource`]
//! for any file format by accepting a deserialization function at
//! construction time. It reads the file asynchronously via Tokio,
//! validates the result, and computes a SHA-256 hash identifying the
//! loaded revision.

use std::path::PathBuf;

use async_trait::async_trait;

use super::sha256_hex;
use crate::config::model::Config;
use crate::config::validation::validate;
use crate::config::{ConfigSource, ConfigVersion};
use crate::error::TimegateError;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>,
}

impl FileSource {
    #[must_use]
    pub fn new(
        path: PathBuf,
        name: &'static str,
        deserialize: fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    async fn read_content(&self) -> Result<String, TimegateError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TimegateError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                TimegateError::Io(e)
            }
        })
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load(&self) -> Result<(Config, ConfigVersion), TimegateError> {
        let content = self.read_content().await?;

        let config = (self.deserialize)(&content).map_err(|e| TimegateError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })?;

        if let Err(errors) = validate(&config) {
            return Err(TimegateError::ConfigValidation { errors });
        }

        let hash = sha256_hex(content.as_bytes());
        Ok((config, ConfigVersion::Hash(hash)))
    }
}
