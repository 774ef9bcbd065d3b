use crate::constants::{DESTINATION_API_BASE_URL, UPSTREAM_TIMEOUT_SECS};
use anyhow::Result;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::Duration;

const PROMPT: &str = "You are a travel content generator.\n\
Give me a random tourist destination or city from anywhere in the world.\n\
\n\
Output must follow this EXACT format:\n\
Line 1: City, Country\n\
Line 2: One sentence description.\n\
Line 3: One sentence description.\n\
Line 4: One sentence description.\n\
Line 5: One sentence description.\n\
Line 6: One sentence description.\n\
\n\
Rules:\n\
- No bold text, no markdown, no numbering, no extra lines, no lists.\n\
- Each sentence should be engaging, informative, and under 25 words.\n\
- Do not include any headings or introductions before the city name.";

/// One-shot generative-AI call producing a destination suggestion. The reply
/// is an unstructured multi-line string split on newlines: first line is the
/// destination, the rest the description.
#[derive(Debug, Clone)]
pub struct DestinationService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DestinationService {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DESTINATION_API_BASE_URL.to_string(),
        }
    }

    pub async fn random_destination(&self) -> Result<(String, String)> {
        let response = self
            .client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{"parts": [{"text": PROMPT}]}]
            }))
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let text = generated_text(&body)
            .ok_or_else(|| anyhow::anyhow!("No generated text in response"))?;

        parse_destination_text(text)
            .ok_or_else(|| anyhow::anyhow!("Generated text did not match the expected format"))
    }
}

fn generated_text(body: &Value) -> Option<&str> {
    body.get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
}

fn parse_destination_text(text: &str) -> Option<(String, String)> {
    let mut lines = text.trim().lines().filter(|line| !line.trim().is_empty());
    let destination = lines.next()?.trim().to_string();
    let description = lines.map(str::trim).collect::<Vec<_>>().join("\n");

    Some((destination, description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_destination_text() {
        let text = "Luang Prabang, Laos\nA riverside town of gilded temples.\nMonks collect alms at dawn.";
        let (destination, description) = parse_destination_text(text).unwrap();
        assert_eq!(destination, "Luang Prabang, Laos");
        assert_eq!(
            description,
            "A riverside town of gilded temples.\nMonks collect alms at dawn."
        );
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\n\nTbilisi, Georgia\n\nSulfur baths and supras.\n";
        let (destination, description) = parse_destination_text(text).unwrap();
        assert_eq!(destination, "Tbilisi, Georgia");
        assert_eq!(description, "Sulfur baths and supras.");
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse_destination_text("   \n  ").is_none());
    }

    #[test]
    fn test_generated_text_extraction() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "Oaxaca, Mexico\nMole and mezcal."}]}}]
        });
        assert_eq!(
            generated_text(&body),
            Some("Oaxaca, Mexico\nMole and mezcal.")
        );
        assert_eq!(generated_text(&json!({})), None);
    }
}
