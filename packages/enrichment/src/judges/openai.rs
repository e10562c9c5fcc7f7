//! OpenAI implementation of the judgment trait.
//!
//! A reference implementation using the chat-completions API with vision
//! content parts for image input. All prompts request JSON; responses go
//! through [`parse_judgment`](super::parse_judgment), so fenced or
//! prose-wrapped replies still parse.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{EnrichmentError, Result};
use crate::traits::judge::ProductJudge;
use crate::types::category::CategoryProfile;
use crate::types::footprint::{FootprintDetails, FootprintResult};
use crate::types::report::{AttributeGuess, ProductIdentity, ProductImage};

/// OpenAI-backed judge.
///
/// Uses a vision-capable chat model for identification/attribute guesses
/// and the same model as a text capability for categorization and
/// footprint scoring.
#[derive(Clone)]
pub struct OpenAiJudge {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiJudge {
    /// Create a new judge with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into().into(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| EnrichmentError::Judge("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set the model (default: gpt-4o).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Make a chat completion request; `user_content` is either a plain
    /// string or a content-part array for vision requests.
    async fn chat(&self, system: &str, user_content: serde_json::Value) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user_content},
            ],
            "temperature": 0.0,
            "max_tokens": 1024,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EnrichmentError::Judge(Box::new(e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Judge(
                format!("OpenAI API error: {error_text}").into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Judge(Box::new(e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| EnrichmentError::Judge("no response from OpenAI".into()))
    }

    fn vision_content(instruction: &str, image: &ProductImage) -> serde_json::Value {
        let url = match image {
            ProductImage::Url(url) => url.clone(),
            ProductImage::Bytes { data, mime } => {
                format!("data:{mime};base64,{}", STANDARD.encode(data))
            }
        };
        serde_json::json!([
            {"type": "text", "text": instruction},
            {"type": "image_url", "image_url": {"url": url}},
        ])
    }
}

#[async_trait]
impl ProductJudge for OpenAiJudge {
    async fn identify(&self, image: &ProductImage) -> Result<ProductIdentity> {
        let system = r#"You identify consumer products from photos.
Output JSON: {"name": "product name", "brand": "brand or null"}"#;

        let content =
            Self::vision_content("Identify the product in this photo.", image);
        let response = self.chat(system, content).await?;

        super::parse_judgment(&response).ok_or_else(|| {
            EnrichmentError::Identification(format!(
                "response did not contain a product identity: {response}"
            ))
        })
    }

    async fn guess_attributes(&self, image: &ProductImage) -> Result<AttributeGuess> {
        let system = r#"You estimate the likely composition of a consumer product from its photo and label.
Output JSON: {"ingredients": ["..."], "packaging_materials": ["plastic"], "recyclable": false}
Only list ingredients typical for this kind of product."#;

        let content = Self::vision_content(
            "Estimate the ingredients and packaging of this product.",
            image,
        );
        let response = self.chat(system, content).await?;

        super::parse_judgment(&response).ok_or_else(|| {
            EnrichmentError::Identification(format!(
                "response did not contain an attribute guess: {response}"
            ))
        })
    }

    async fn categorize(&self, product_name: &str) -> Result<CategoryProfile> {
        let system = r#"You classify consumer products for comparison shopping.
Output JSON:
{
  "main_category": "...",
  "sub_category": "...",
  "product_type": "the generic product type to search for",
  "target_use": ["what the product is for"],
  "search_terms": ["2-4 search query variants"],
  "exclude_terms": ["terms that indicate a different product kind"],
  "key_characteristics": ["traits a genuine alternative should mention"]
}"#;

        let response = self
            .chat(system, serde_json::json!(product_name))
            .await?;

        super::parse_judgment(&response).ok_or_else(|| {
            EnrichmentError::Categorization(format!(
                "response did not contain a category profile: {response}"
            ))
        })
    }

    async fn score_footprint(
        &self,
        ingredients: &[String],
        packaging_materials: &[String],
        recyclable: bool,
    ) -> Result<FootprintResult> {
        let system = r#"You estimate a product's environmental impact from its ingredients and packaging.
Output JSON with every score between 0 (worst) and 100 (best):
{
  "score": 0,
  "details": {"manufacturing": 0, "transportation": 0, "packaging": 0, "lifecycle": 0},
  "overall_explanation": "one short paragraph"
}"#;

        let user = format!(
            "Ingredients: {}\nPackaging materials: {}\nRecyclable: {}",
            ingredients.join(", "),
            packaging_materials.join(", "),
            recyclable
        );
        let response = self.chat(system, serde_json::json!(user)).await?;

        let parsed: ScoreResponse = super::parse_judgment(&response).ok_or_else(|| {
            EnrichmentError::Scoring(format!(
                "response did not contain a numeric verdict: {response}"
            ))
        })?;

        let mut result = FootprintResult::new(parsed.score, parsed.details);
        if let Some(explanation) = parsed.overall_explanation {
            result = result.with_explanation(explanation);
        }
        Ok(result)
    }
}

// Response types

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct ScoreResponse {
    score: f64,
    #[serde(default)]
    details: FootprintDetails,
    #[serde(default)]
    overall_explanation: Option<String>,
}
