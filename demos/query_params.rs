use keyed_api_client::{ApiClient, QueryParams};
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

    let params: QueryParams = std::env::args()
        .skip(1)
        .filter_map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
        })
        .collect();

    let response = client
        .send_with_query_params(&http_client, endpoint, "GET", params)
        .await
        .whatever_context("Request failed")?;

    println!("{}", response.status());
    println!("{}", response.text());

    Ok(())
}
