//! CLI Status Command
//!
//! Reports uptime and lobby occupancy of a running gateway.

use anyhow::Result;
use serde_json::Value;

pub async fn run(port: u16) -> Result<()> {
    let client = reqwest::Client::new();
    let resp = match client
        .get(format!("http://localhost:{port}/api/health"))
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(_) => {
            println!("Pairline is not running on port {port}");
            return Ok(());
        }
    };

    let body: Value = resp.json().await?;
    println!("{}", render(&body));
    Ok(())
}

fn render(body: &Value) -> String {
    let field = |key: &str| body.get(key).and_then(Value::as_u64).unwrap_or(0);
    format!(
        "\nPairline Gateway Status\n\n  Status:  {}\n  Uptime:  {}s\n  Online:  {}\n  Waiting: {}\n  Paired:  {}\n",
        body.get("status").and_then(Value::as_str).unwrap_or("unknown"),
        field("uptimeSeconds"),
        field("online"),
        field("waiting"),
        field("paired"),
    )
}
