use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = timegate::cli::Cli::parse();
    if let Err(e) = timegate::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
