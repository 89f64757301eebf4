use clap::Parser;

use cadenza_mcp_runtime::{LogFormat, McpCommands, Settings, run as run_mcp, telemetry};

#[derive(Parser)]
#[command(
    name = "cadenza-mcp",
    version,
    about = "Cadenza MCP server: Apple Music tools over stdio"
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "CADENZA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: McpCommands,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    telemetry::init(cli.log_format);

    let code = run_mcp(&cli.settings, cli.command).await;
    std::process::exit(code);
}
