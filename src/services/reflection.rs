use crate::config::Config;

/// Ask the model for a short reflection on a journal entry. Callers decide
/// whether a failure aborts the request or degrades to no reflection.
pub async fn generate_reflection(
    config: &Config,
    entry_text: &str,
    mood: Option<&str>,
) -> Result<String, anyhow::Error> {
    let prompt = format!(
        r#"You are a warm and emotionally intelligent journaling guide. A user just wrote:

"{}"

Mood: {}

Give a short, thoughtful reflection or follow-up question to help them reflect further. Be gentle, supportive, and human."#,
        entry_text,
        mood.unwrap_or("unspecified"),
    );

    call_claude(config, &prompt).await
}

async fn call_claude(config: &Config, prompt: &str) -> Result<String, anyhow::Error> {
    if config.claude_api_key.is_empty() {
        anyhow::bail!("CLAUDE_API_KEY is not configured");
    }

    // 30-second timeout to prevent indefinite hangs
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let response = client
        .post("https://api.anthropic.com/v1/messages")
        .header("x-api-key", &config.claude_api_key)
        .header("anthropic-version", "2023-06-01")
        .header("content-type", "application/json")
        .json(&serde_json::json!({
            "model": config.claude_model,
            "max_tokens": 512,
            "messages": [{
                "role": "user",
                "content": prompt
            }]
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Claude API error {}: {}", status, body);
    }

    let claude_response: serde_json::Value = response.json().await?;
    let text = claude_response["content"][0]["text"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Claude API returned no text content"))?;

    Ok(text.trim().to_string())
}
