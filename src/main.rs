use clap::Parser;
use course_library::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Seed { file } => cli::seed::run(&file).await,
        Command::Resolve { doc_id, key } => cli::resolve::run(&doc_id, &key).await,
    }
}
