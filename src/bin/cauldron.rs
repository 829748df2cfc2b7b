/// Cauldron CLI
///
/// Checks, runs and watches cauldron scripts from the terminal using the same
/// coordinator an editor integration would drive.
use cauldron::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run_cli().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
