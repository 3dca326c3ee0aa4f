use apifootball::{print_json, save_json, ApiClient, ApiConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Query API-Football endpoints")]
struct Cli {
    /// Endpoint to call (e.g. leagues, teams, fixtures)
    endpoint: String,
    /// Query parameter as key=value, can be repeated
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
    /// API host, overrides RAPIDAPI_HOST
    #[arg(long)]
    host: Option<String>,
    /// Give up after this many seconds. No timeout if left out
    #[arg(long)]
    timeout: Option<u64>,
    /// Save the payload under this file name
    #[arg(long)]
    save: Option<String>,
    /// Directory to save into
    #[arg(long, default_value = ".", requires = "save")]
    dir: PathBuf,
    /// Keep the whole body instead of only the response field
    #[arg(long)]
    raw: bool,
    /// Do not print a preview
    #[arg(short, long)]
    quiet: bool,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {}", s)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Run with RUST_LOG=info to see the call status lines
    dotenv::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(host) = cli.host {
        config = config.with_host(host);
        config.validate()?;
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let client = ApiClient::new(config)?;
    let params: Vec<(&str, &str)> = cli
        .params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let data = if cli.raw {
        client.get_raw(&cli.endpoint, &params).await?
    } else {
        client.get(&cli.endpoint, &params).await?
    };

    if !cli.quiet {
        print_json(&data);
    }
    if let Some(filename) = cli.save {
        save_json(&data, &filename, &cli.dir)?;
    }
    Ok(())
}
