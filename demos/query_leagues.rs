//! Fetches the leagues of one country, shows the first few and saves them all.

use apifootball::{print_json, save_json, ApiClient, ApiConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Run with RUST_LOG=info RAPIDAPI_KEY=... cargo run --example query_leagues
    env_logger::init();

    let config = ApiConfig::from_env()?;
    let client = ApiClient::new(config)?;
    let leagues = client
        .get("leagues", &[("country", "Belgium"), ("season", "2023")])
        .await?;
    print_json(&leagues);
    let dir = std::env::temp_dir();
    let path = save_json(&leagues, "leagues_belgium.json", &dir)?;
    println!("Saved to {}", path.display());
    Ok(())
}
