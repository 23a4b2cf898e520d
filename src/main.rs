use anyhow::Result;
use clap::Parser;

use eloquent_chat::{
    cli::Cli,
    runtime::{resolve_config, NonInteractiveRunner, Orchestrator},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.verbose);

    if let Some(prompt) = cli.prompt.clone() {
        run_non_interactive(cli, prompt).await
    } else {
        let orchestrator = Orchestrator::new(cli)?;
        orchestrator.run().await
    }
}

/// Send one message, print the reply and exit
async fn run_non_interactive(cli: Cli, prompt: String) -> Result<()> {
    let config = resolve_config(&cli)?;
    let runner = NonInteractiveRunner::new(config)?;

    let result = runner.execute(prompt).await;
    println!("{}", runner.format_result(&result, cli.output_format));

    if !result.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
