use anyhow::Context;
use clap::Parser;
use lead_relay::ApiResponse;
use serde_json::json;

/// Posts one lead to a running relay and prints what it answered.
#[derive(Debug, Parser)]
#[command(name = "send-lead")]
#[command(about = "Submit a test lead to a running lead-relay")]
struct Args {
    #[arg(long, env = "RELAY_URL", default_value = "http://localhost:8787")]
    url: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    contact: String,

    #[arg(long)]
    goal: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let endpoint = format!("{}/api/lead", args.url.trim_end_matches('/'));

    println!("🚀 Sending lead to {}", endpoint);

    let response = reqwest::Client::new()
        .post(&endpoint)
        .json(&json!({
            "name": args.name,
            "contact": args.contact,
            "goal": args.goal,
        }))
        .send()
        .await
        .with_context(|| format!("Relay at {} is unreachable", endpoint))?;

    let status = response.status();
    let body: ApiResponse = response
        .json()
        .await
        .context("Relay answered with a non-JSON body")?;

    if body.ok {
        println!("✅ {} lead delivered", status);
        return Ok(());
    }

    eprintln!(
        "❌ {} {}",
        status,
        body.error.as_deref().unwrap_or("unexpected response")
    );
    std::process::exit(1);
}
