use std::env;
use std::path::Path;
use std::time::Duration;

use dotenvy::dotenv;

use pushkind_clients::{Command, RunSettings};
use pushkind_clients::api::http::HttpClientApi;
use pushkind_clients::models::config::ClientConfig;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let client_config = match ClientConfig::load() {
        Ok(client_config) => client_config,
        Err(err) => {
            log::error!("Error loading client config: {}", err);
            std::process::exit(1);
        }
    };

    let args: Vec<String> = env::args().skip(1).collect();
    let command: Command = match args.join(" ").parse() {
        Ok(command) => command,
        Err(err) => {
            log::error!("{err}. Usage: pushkind-clients [list [page] | lookup <key> | export | create field=value...]");
            std::process::exit(2);
        }
    };

    let api = match HttpClientApi::from_config(&client_config) {
        Ok(api) => api,
        Err(err) => {
            log::error!("Error building client for {}: {}", client_config.api_base_url, err);
            std::process::exit(1);
        }
    };

    log::info!(
        "Using client service at {} (timeout {:?})",
        client_config.api_base_url,
        Duration::from_secs(client_config.timeout_secs)
    );

    let settings = RunSettings {
        page_size: client_config.page_size,
        export_dir: Path::new(&client_config.export_dir),
        phone_policy: client_config.phone_policy(),
    };
    pushkind_clients::run(&api, command, &settings).await
}
