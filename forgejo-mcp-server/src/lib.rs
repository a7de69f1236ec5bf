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

//! MCP server exposing Forgejo operations as tools.
//!
//! The registry/dispatcher pair in here is transport-agnostic; the two
//! adapters under [`mcp`] and the CLI's direct invoker all drive the same
//! engine.

pub mod config;
pub mod dispatcher;
pub mod forge;
pub mod mcp;
pub mod registry;
pub mod tools;

use crate::config::ServerConfig;
use crate::forge::{ForgeApi, ForgeClient};
use crate::mcp::router::McpRouter;
use crate::registry::ToolRegistry;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logs go to stderr: with the stdio transport, stdout belongs to the
/// protocol.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forgejo_mcp_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build a registry with the full tool set wired to the given forge.
pub fn build_registry(forge: Arc<dyn ForgeApi>) -> Arc<ToolRegistry> {
    let registry = Arc::new(ToolRegistry::new());
    tools::register_all(&registry, forge);
    registry
}

/// Validate config, verify connectivity, then serve on the configured
/// transport until the peer disconnects or the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    config.validate()?;
    info!(url = %config.forge.url, transport = %config.server.transport, "starting forgejo-mcp");

    let forge = Arc::new(ForgeClient::new(&config.forge.url, &config.forge.token));

    match forge.verify_connection().await {
        Ok((user, meta)) => {
            let login = user.get("login").and_then(|v| v.as_str()).unwrap_or("?");
            let status = meta.map(|m| m.status);
            info!(login, ?status, "connected to Forgejo instance");
        }
        Err(e) => {
            error!(url = %config.forge.url, error = %e, "connection verification failed");
            return Err(e).context("failed to connect to Forgejo instance");
        }
    }

    let registry = build_registry(forge);
    info!(tools = registry.len(), "tool registry ready");

    let router = McpRouter::new(registry);
    match config.server.transport.as_str() {
        "http" => mcp::http::run_http(router, &config.server.listen_addr).await?,
        // validate() only admits stdio and http
        _ => mcp::stdio::run_stdio(router).await?,
    }
    Ok(())
}
