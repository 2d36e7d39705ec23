use crate::config::AppConfig;
use crate::error::GenerationError;
use crate::generator::{CopyWriter, EncodedImage, ImageRenderer, ImageRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: Vec<PredictInstance<'a>>,
    parameters: PredictParameters<'a>,
}

#[derive(Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters<'a> {
    sample_count: u32,
    aspect_ratio: &'a str,
    output_options: OutputOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions<'a> {
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

pub struct GeminiClient {
    http: Client,
    api_base: Url,
    api_key: Option<String>,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &AppConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> Url {
        let model = model.trim().trim_start_matches("models/");
        let path = format!(
            "{}/models/{}:{}",
            self.api_base.path().trim_end_matches('/'),
            model,
            method
        );
        let mut url = self.api_base.clone();
        url.set_path(&path);
        url
    }

    async fn post<B, T>(&self, url: Url, body: &B) -> Result<T, GenerationError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::CredentialMissing)?;

        log::debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| GenerationError::MalformedResponse(format!("unexpected envelope: {}", e)))
    }
}

#[async_trait]
impl CopyWriter for GeminiClient {
    async fn write_copy(&self, prompt: &str, schema: &Value) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };
        let url = self.endpoint(&self.text_model, "generateContent");
        let response: GenerateContentResponse = self.post(url, &request).await?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::MalformedResponse(
                "text response has no content".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl ImageRenderer for GeminiClient {
    async fn render(
        &self,
        prompt: &str,
        request: &ImageRequest,
    ) -> Result<Vec<EncodedImage>, GenerationError> {
        let body = PredictRequest {
            instances: vec![PredictInstance { prompt }],
            parameters: PredictParameters {
                sample_count: request.count,
                aspect_ratio: request.aspect_ratio,
                output_options: OutputOptions {
                    mime_type: request.mime_type,
                },
            },
        };
        let url = self.endpoint(&self.image_model, "predict");
        let response: PredictResponse = self.post(url, &body).await?;

        // Filtered predictions come back without bytes.
        Ok(response
            .predictions
            .into_iter()
            .filter_map(|prediction| prediction.bytes_base64_encoded)
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes_base64| EncodedImage { bytes_base64 })
            .collect())
    }
}
