mod cli;
mod config;
mod http;
mod serve;

use clap::Parser;
use cli::{Cli, Commands};
use config::LottoConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = LottoConfig::load_or_default(&cli.config)
                .with_overrides(args.http_addr, args.origin);
            let errors = config.validate();
            if !errors.is_empty() {
                anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "));
            }
            serve::run(config).await
        }
        Commands::Draw(args) => cli::draws::draw(args, &cli.server).await,
        Commands::Bulk(args) => cli::draws::bulk(args, &cli.server).await,
        Commands::Latest(args) => cli::draws::latest(args, &cli.server).await,
        Commands::Missing(args) => cli::draws::missing(args, &cli.server).await,
        Commands::Search(args) => cli::draws::search(args, &cli.server).await,
        Commands::Config(cmd) => cli::config_cmd::run(cmd, &cli.config).await,
    }
}
