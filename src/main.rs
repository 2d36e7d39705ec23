use social_ad_generator_lib::{local_server, AdGenerator, AppConfig, GeminiClient, Studio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let http = reqwest::Client::new();
    let generator = AdGenerator::new(
        GeminiClient::with_client(http.clone(), &config),
        GeminiClient::with_client(http, &config),
    );
    let studio = Studio::new(Arc::new(generator), config.cta_label);

    local_server::start_server(studio, config.bind_addr).await;
    Ok(())
}
