use keyed_api_client::ApiClient;
use serde_json::json;
use snafu::prelude::*;
use tracing_subscriber::EnvFilter;

#[snafu::report]
#[tokio::main]
pub async fn main() -> Result<(), snafu::Whatever> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let endpoint = std::env::var("API_ENDPOINT").whatever_context("Failed to get API_ENDPOINT")?;
    let client = ApiClient::from_env("API_KEY").whatever_context("Failed to get API_KEY")?;

    let http_client = reqwest::Client::new();

    let (tx, rx) = tokio::sync::oneshot::channel();
    client.spawn_with_body(
        http_client,
        endpoint,
        "POST",
        &json!({ "name": "demo", "tags": ["a", "b"] }),
        move |result| {
            let _ = tx.send(result);
        },
    );

    let response = rx
        .await
        .whatever_context("Completion was dropped")?
        .whatever_context("Request failed")?;

    println!("{}", response.status());
    println!("{}", response.text());

    Ok(())
}
