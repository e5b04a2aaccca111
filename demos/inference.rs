//! Example running inference against a deployed project and sampling
//! its Prometheus metrics.
//!
//! Run with:
//! ```bash
//! MODELZ_API_KEY=mzi-... cargo run --example inference -- llama-7b
//! ```

use std::error::Error;

use modelz::{Client, Config, EnvConfig};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let project = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "llama-7b".to_string());

    let client = Client::new(Config::new(&project).apply_env(EnvConfig::from_env()))?;

    println!("=== Inference: {project} ===");
    let resp = client
        .inference(json!({"prompt": "A llama walks into a bar"}).into(), None)
        .await?;
    println!("status: {}", resp.status());
    println!("data: {:?}", resp.data()?);
    println!();

    println!("=== Metrics: {project} ===");
    let metrics = client.metrics(None).await?;
    for line in metrics.lines().take(10) {
        println!("{line}");
    }

    Ok(())
}
