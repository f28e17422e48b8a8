//! CLI entry point for agent-chat.

mod app;
mod cli;

use clap::Parser;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    if let Err(err) = app::entry::run(args).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
