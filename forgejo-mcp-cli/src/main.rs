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

//! forgejo-mcp command line interface.
//!
//! `serve` runs the MCP server; `list`, `describe`, and `exec` drive the
//! tool engine directly, which makes one-off invocations scriptable without
//! a JSON-RPC client.

mod invoker;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forgejo_mcp_server::config::ServerConfig;
use forgejo_mcp_server::forge::ForgeClient;
use invoker::OutputMode;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "forgejo-mcp")]
#[command(about = "MCP server for Forgejo", long_about = None)]
struct Cli {
    /// Forgejo instance URL
    #[arg(long, env = "FORGEJO_URL", default_value = "https://codeberg.org")]
    url: String,

    /// Forgejo API token
    #[arg(long, env = "FORGEJO_ACCESS_TOKEN", default_value = "")]
    token: String,

    /// Configuration file (overrides --url/--token)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server
    Serve {
        /// Transport: "stdio" or "http"
        #[arg(long)]
        transport: Option<String>,

        /// HTTP listen address
        #[arg(long)]
        listen_addr: Option<String>,
    },

    /// List available tools
    List {
        /// Output as JSON (machine-readable)
        #[arg(long)]
        json: bool,
    },

    /// Show usage for one tool
    Describe {
        /// Tool name
        tool: String,
    },

    /// Execute one tool directly
    Exec {
        /// Tool name
        tool: String,

        /// Arguments as a JSON object; falls back to stdin, then to "{}"
        #[arg(long)]
        args: Option<String>,

        /// Output the full result envelope as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::new(&cli.url, &cli.token),
    };

    match cli.command {
        Commands::Serve {
            transport,
            listen_addr,
        } => {
            forgejo_mcp_server::init_tracing();
            if let Some(transport) = transport {
                config.server.transport = transport;
            }
            if let Some(listen_addr) = listen_addr {
                config.server.listen_addr = listen_addr;
            }
            forgejo_mcp_server::run_server(config).await
        }
        Commands::List { json } => {
            let registry = build_registry(&config);
            print!("{}", invoker::list(&registry, mode(json)));
            Ok(())
        }
        Commands::Describe { tool } => {
            let registry = build_registry(&config);
            match invoker::help(&registry, &tool) {
                Ok(text) => {
                    print!("{text}");
                    Ok(())
                }
                Err(e) => fail(&e.to_string()),
            }
        }
        Commands::Exec { tool, args, json } => {
            config.validate()?;
            let registry = build_registry(&config);
            let args_json = resolve_args(args)?;
            match invoker::exec(&registry, &tool, &args_json, mode(json)).await {
                Ok(outcome) if outcome.is_error => fail(&outcome.rendered),
                Ok(outcome) => {
                    println!("{}", outcome.rendered);
                    Ok(())
                }
                Err(e @ forgejo_mcp_core::ToolError::UnknownTool { .. }) => fail(&format!(
                    "{e}. Run 'forgejo-mcp list' to see available tools"
                )),
                Err(e) => fail(&e.to_string()),
            }
        }
    }
}

fn build_registry(config: &ServerConfig) -> Arc<forgejo_mcp_server::registry::ToolRegistry> {
    let forge = Arc::new(ForgeClient::new(&config.forge.url, &config.forge.token));
    forgejo_mcp_server::build_registry(forge)
}

fn mode(json: bool) -> OutputMode {
    if json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}

/// `--args` wins; otherwise piped stdin is read in full; a terminal stdin
/// means no arguments at all.
fn resolve_args(flag: Option<String>) -> Result<String> {
    let stdin = std::io::stdin();
    let piped = if flag.is_none() && !stdin.is_terminal() {
        let mut buffer = String::new();
        stdin
            .lock()
            .read_to_string(&mut buffer)
            .context("failed to read arguments from stdin")?;
        Some(buffer)
    } else {
        None
    };
    Ok(resolve_args_from(flag, piped))
}

fn resolve_args_from(flag: Option<String>, piped: Option<String>) -> String {
    if let Some(args) = flag {
        return args;
    }
    match piped {
        Some(buffer) if !buffer.trim().is_empty() => buffer,
        _ => "{}".to_string(),
    }
}

fn fail(message: &str) -> Result<()> {
    eprintln!("{message}");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_flag_wins_over_pipe() {
        let out = resolve_args_from(
            Some(r#"{"a":1}"#.to_string()),
            Some(r#"{"b":2}"#.to_string()),
        );
        assert_eq!(out, r#"{"a":1}"#);
    }

    #[test]
    fn test_piped_arguments_used_without_flag() {
        let out = resolve_args_from(None, Some(r#"{"b":2}"#.to_string()));
        assert_eq!(out, r#"{"b":2}"#);
    }

    #[test]
    fn test_blank_pipe_falls_back_to_empty_object() {
        assert_eq!(resolve_args_from(None, Some("  \n".to_string())), "{}");
        assert_eq!(resolve_args_from(None, None), "{}");
    }
}
