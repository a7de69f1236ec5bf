// Copyright 2025 The forgejo-mcp contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Forgejo MCP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub forge: ForgeConfig,
    #[serde(default)]
    pub server: TransportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForgeConfig {
    /// Forgejo instance root, e.g. "https://codeberg.org"
    pub url: String,

    /// API access token. May be empty for anonymous read access.
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// "stdio" or "http"
    #[serde(default = "default_transport")]
    pub transport: String,

    /// HTTP listen address, used only for the http transport
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_transport() -> String {
    "stdio".to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8719".to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            listen_addr: default_listen_addr(),
        }
    }
}

impl ServerConfig {
    pub fn new(url: &str, token: &str) -> Self {
        Self {
            forge: ForgeConfig {
                url: url.to_string(),
                token: token.to_string(),
            },
            server: TransportConfig::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: ServerConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// An unusable forge URL should fail startup, not the first tool call.
    pub fn validate(&self) -> Result<()> {
        let url = self.forge.url.trim();
        if url.is_empty() {
            bail!("forge URL must not be empty");
        }
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| anyhow::anyhow!("forge URL must start with http:// or https://"))?;
        if rest.trim_start_matches('/').is_empty() {
            bail!("forge URL must include a host");
        }
        match self.server.transport.as_str() {
            "stdio" | "http" => Ok(()),
            other => bail!("unknown transport {other:?}, expected \"stdio\" or \"http\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            [forge]
            url = "https://codeberg.org"
            "#,
        )
        .unwrap();
        assert_eq!(config.forge.token, "");
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.listen_addr, "127.0.0.1:8719");
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(ServerConfig::new("codeberg.org", "").validate().is_err());
        assert!(ServerConfig::new("https://", "").validate().is_err());
        assert!(ServerConfig::new("", "").validate().is_err());
        assert!(ServerConfig::new("http://localhost:3000", "")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_rejects_unknown_transport() {
        let mut config = ServerConfig::new("https://codeberg.org", "t");
        config.server.transport = "tcp".to_string();
        assert!(config.validate().is_err());
    }
}
