//! mcpcall CLI: call tools on a remote MCP server over HTTP.

mod args;
mod demo;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mcpcall_config::{CliOverrides, McpCallConfig};
use mcpcall_mcp::McpClient;
use mcpcall_types::ToolArguments;
use std::io;

#[derive(Parser)]
#[command(
    name = "mcpcall",
    version,
    about = "Call tools on a remote MCP server over JSON-RPC/HTTP"
)]
struct Cli {
    /// Endpoint URL (overrides MCP_URL and the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    /// API key (overrides MCP_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Named endpoint from ~/.mcpcall/config.toml
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in milliseconds (default: wait indefinitely)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Give each request its own id instead of reusing id 1
    #[arg(long, global = true)]
    sequential_ids: bool,

    /// Enable verbose/debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Call get_resume_info, then get_skills with min_weight=8 (default)
    Demo,

    /// Call any tool and print the JSON response
    Call {
        /// Tool name
        tool: String,

        /// Arguments as a JSON object
        #[arg(long = "args", value_name = "JSON")]
        json: Option<String>,

        /// A single argument; VALUE is parsed as JSON if possible
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
        pairs: Vec<String>,

        /// Print only the text content of the tool result
        #[arg(long)]
        text: bool,
    },

    /// List the tools the server exposes
    List,

    /// Send the initialize handshake and show server info
    Init,

    /// GET the endpoint and print the response
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = McpCallConfig::load(CliOverrides {
        url: cli.url,
        api_key: cli.api_key,
        endpoint: cli.endpoint,
        timeout_ms: cli.timeout_ms,
        sequential_ids: cli.sequential_ids,
    })?;

    tracing::debug!(
        endpoint = ?config.endpoint_name,
        url = %config.endpoint.url,
        "configuration resolved"
    );

    let client = McpClient::new(&config.endpoint).context("Failed to create MCP client")?;

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => demo::run_demo(&client, &mut io::stdout().lock()).await,
        Command::Call {
            tool,
            json,
            pairs,
            text,
        } => {
            let arguments = args::build_arguments(json.as_deref(), &pairs)
                .context("Invalid tool arguments")?;
            run_call(&client, &tool, arguments, text).await
        }
        Command::List => run_list(&client).await,
        Command::Init => run_init(&client).await,
        Command::Health => {
            let body = client.health().await?;
            print_json(&body)
        }
    }
}

async fn run_call(
    client: &McpClient,
    tool: &str,
    arguments: Option<ToolArguments>,
    text_only: bool,
) -> Result<()> {
    if !text_only {
        let result = client.call_tool(tool, arguments).await?;
        return print_json(&result);
    }

    let result = client.call_tool_checked(tool, arguments).await?;
    println!("{}", result.text());
    if result.is_error {
        bail!("tool '{tool}' reported an error");
    }
    Ok(())
}

async fn run_list(client: &McpClient) -> Result<()> {
    let tools = client.list_tools().await?;
    if tools.is_empty() {
        eprintln!("No tools exposed by {}", client.endpoint());
        return Ok(());
    }

    let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for tool in &tools {
        if tool.description.is_empty() {
            println!("{}", tool.name);
        } else {
            let summary = tool.description.lines().next().unwrap_or_default();
            println!("{:<width$}  {}", tool.name, summary);
        }
    }
    Ok(())
}

async fn run_init(client: &McpClient) -> Result<()> {
    let info = client.initialize().await?;
    println!("Protocol: {}", info.protocol_version);
    match (info.name, info.version) {
        (Some(name), Some(version)) => println!("Server:   {name} {version}"),
        (Some(name), None) => println!("Server:   {name}"),
        _ => println!("Server:   (unnamed)"),
    }
    if !info.capabilities.is_null() {
        println!("Capabilities: {}", info.capabilities);
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    demo::write_json(&mut io::stdout().lock(), value)
}
