use application::LedgerApp;
use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("flatledger - shared-living expense reconciliation");

    // Load configuration from environment variables
    let config = Config::from_env();
    println!("Using database: {}", config.database_path);

    // Initialize the application with configuration
    let _app = LedgerApp::new(&config.database_path);

    println!("Ledger engine initialized");
    println!("API server binary: api-server (binds {})", config.api_address());

    // Keep the application running
    println!("Service running... (Press Ctrl+C to stop)");
    tokio::signal::ctrl_c().await?;
    println!("Shutting down");

    Ok(())
}
