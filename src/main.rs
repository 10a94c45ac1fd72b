// src/main.rs

use forkseed::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("forkseed error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    // Before clap, so `env = ...` arguments see values from `.env`.
    let dotenv = config::load_dotenv();
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    config::report_dotenv(&dotenv);
    run(args).await?;
    Ok(())
}
