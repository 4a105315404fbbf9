mod cli;

use anyhow::Result;
use clap::Parser as _;
use cli::Args;
use mailview::{config::Config, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load_from_file(args.config.clone())?;
    logging::init(config.username());

    cli::run(args, &config).await
}
