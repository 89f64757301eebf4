use clap::{Parser, Subcommand};

use cadenza_mcp_runtime::{LogFormat, McpCommands, Settings, telemetry};

mod commands;
mod util;

#[derive(Parser)]
#[command(
    name = "cadenza",
    version,
    about = "Cadenza: Apple Music tools for agents, from the shell or over MCP"
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "CADENZA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch one JSON request envelope and print the response envelope
    Dispatch {
        /// Request file, or `-` for stdin
        #[arg(long, default_value = "-")]
        request: String,
    },
    /// Call a single tool with inline arguments
    Call {
        /// Tool name (see `cadenza tools --names`)
        tool: String,
        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
    /// Print the tool manifest
    Tools {
        /// Print tool names only
        #[arg(long)]
        names: bool,
    },
    /// Check local automation and catalog reachability
    Health,
    /// MCP server operations
    Mcp {
        #[command(subcommand)]
        command: McpCommands,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    telemetry::init(cli.log_format);

    let code = match cli.command {
        Commands::Dispatch { request } => {
            let dispatcher = util::dispatcher(&cli.settings);
            commands::call::dispatch(&dispatcher, &request).await
        }
        Commands::Call { tool, args } => {
            let dispatcher = util::dispatcher(&cli.settings);
            commands::call::call(&dispatcher, &tool, args.as_deref()).await
        }
        Commands::Tools { names } => match cadenza_core::tools::default_registry() {
            Ok(registry) => commands::tools::run(&registry, names),
            Err(err) => util::exit_error(&err.to_string(), None),
        },
        Commands::Health => {
            let dispatcher = util::dispatcher(&cli.settings);
            commands::health::run(&dispatcher).await
        }
        Commands::Mcp { command } => cadenza_mcp_runtime::run(&cli.settings, command).await,
    };
    std::process::exit(code);
}
