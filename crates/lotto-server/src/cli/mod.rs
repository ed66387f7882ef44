pub mod config_cmd;
pub mod draws;

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lotto")]
#[command(version, about = "Cached Lotto 6/45 draw service")]
pub struct Cli {
    /// Path to lotto.toml
    #[arg(long, global = true, env = "LOTTO_CONFIG", default_value = "lotto.toml")]
    pub config: PathBuf,

    /// Lotto server address for client commands
    #[arg(
        long,
        global = true,
        env = "LOTTO_ADDR",
        default_value = "http://localhost:9091"
    )]
    pub server: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Show one round
    Draw(DrawArgs),
    /// List a range of rounds
    Bulk(RangeArgs),
    /// List the most recent rounds
    Latest(LatestArgs),
    /// Numbers missing from recent draws
    Missing(MissingArgs),
    /// Draws containing a number
    Search(SearchArgs),
    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// HTTP listen address (overrides config file)
    #[arg(long, env = "LOTTO_HTTP_ADDR")]
    pub http_addr: Option<SocketAddr>,

    /// Results endpoint to fetch draws from (overrides config file)
    #[arg(long, env = "LOTTO_ORIGIN_URL")]
    pub origin: Option<String>,
}

#[derive(Args, Debug)]
pub struct DrawArgs {
    pub round: u32,
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    pub from: u32,
    pub to: u32,
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct LatestArgs {
    #[arg(long, default_value = "5")]
    pub count: u32,
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct MissingArgs {
    pub from: u32,
    pub to: u32,
    /// How many of the newest draws to check
    #[arg(long, default_value = "5")]
    pub weeks: usize,
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    pub number: u8,
    pub from: u32,
    pub to: u32,
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Validate,
    Show,
}
