use crate::error::GenerationError;
use crate::models::{AdCopy, BusinessInfo, GeneratedAd};
use crate::utils::data_uri;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub count: u32,
    pub mime_type: &'static str,
    pub aspect_ratio: &'static str,
}

/// One square JPEG, the usual shape for a social feed.
pub const AD_IMAGE: ImageRequest = ImageRequest {
    count: 1,
    mime_type: "image/jpeg",
    aspect_ratio: "1:1",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes_base64: String,
}

/// Text generation with a structured-output schema. Returns the raw JSON text.
#[async_trait]
pub trait CopyWriter: Send + Sync {
    async fn write_copy(&self, prompt: &str, schema: &Value) -> Result<String, GenerationError>;
}

/// Image generation from a single prompt.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    async fn render(
        &self,
        prompt: &str,
        request: &ImageRequest,
    ) -> Result<Vec<EncodedImage>, GenerationError>;
}

/// What the controller drives: one attempt, no retry.
#[async_trait]
pub trait GenerateAd: Send + Sync {
    async fn generate(&self, info: &BusinessInfo) -> Result<GeneratedAd, GenerationError>;
}

pub struct AdGenerator<W, R> {
    writer: W,
    renderer: R,
}

impl<W: CopyWriter, R: ImageRenderer> AdGenerator<W, R> {
    pub fn new(writer: W, renderer: R) -> Self {
        Self { writer, renderer }
    }

    async fn run(&self, info: &BusinessInfo) -> Result<GeneratedAd, GenerationError> {
        let raw = self
            .writer
            .write_copy(&copy_prompt(info), &ad_copy_schema())
            .await?;
        let ad_copy = parse_ad_copy(&raw)?;
        log::debug!("Ad copy ready, headline: {}", ad_copy.headline);

        let images = self.renderer.render(&ad_copy.image_prompt, &AD_IMAGE).await?;
        let image = images.into_iter().next().ok_or(GenerationError::EmptyImageResult)?;
        if BASE64.decode(image.bytes_base64.as_bytes()).is_err() {
            return Err(GenerationError::MalformedResponse(
                "image bytes are not valid base64".to_string(),
            ));
        }

        Ok(GeneratedAd {
            image_url: data_uri(AD_IMAGE.mime_type, &image.bytes_base64),
            ad_copy,
        })
    }
}

#[async_trait]
impl<W: CopyWriter, R: ImageRenderer> GenerateAd for AdGenerator<W, R> {
    async fn generate(&self, info: &BusinessInfo) -> Result<GeneratedAd, GenerationError> {
        self.run(info).await.map_err(|e| {
            log::error!("Error generating ad ({:?}): {}", e.kind(), e);
            e
        })
    }
}

pub fn copy_prompt(info: &BusinessInfo) -> String {
    format!(
        "Based on the following business information, generate compelling ad copy and a highly \
detailed, visually striking image prompt for a social media ad.

Business Name: {}
Business Description: {}
Product/Service to Advertise: {}
Target Audience: {}
Call to Action: {}
Ad Tone: {}

The image prompt should be descriptive and artistic, suitable for a text-to-image AI model to \
create a captivating visual.
Return ONLY a JSON object that follows the provided schema.",
        info.name,
        info.description,
        info.product,
        info.target_audience,
        info.call_to_action,
        info.tone,
    )
}

/// Response schema in the provider's OpenAPI subset.
pub fn ad_copy_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "headline": {
                "type": "STRING",
                "description": "A catchy headline for the ad (max 10 words)."
            },
            "body": {
                "type": "STRING",
                "description": "The main body text of the ad (2-3 sentences)."
            },
            "imagePrompt": {
                "type": "STRING",
                "description": "A detailed, creative prompt for an image generation model. Example: 'A vibrant, photorealistic image of a person joyfully using [product] in a sun-drenched, modern setting, with a shallow depth of field.'"
            }
        },
        "required": ["headline", "body", "imagePrompt"]
    })
}

/// Checks the reply against the schema instead of trusting it.
pub fn parse_ad_copy(raw: &str) -> Result<AdCopy, GenerationError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| GenerationError::MalformedResponse(format!("copy is not JSON: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| GenerationError::MalformedResponse("copy is not a JSON object".into()))?;

    let field = |key: &str| -> Result<String, GenerationError> {
        match object.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
            Some(Value::String(_)) => Err(GenerationError::MalformedResponse(format!(
                "copy field `{}` is blank",
                key
            ))),
            Some(_) => Err(GenerationError::MalformedResponse(format!(
                "copy field `{}` is not a string",
                key
            ))),
            None => Err(GenerationError::MalformedResponse(format!(
                "copy field `{}` is missing",
                key
            ))),
        }
    };

    Ok(AdCopy {
        headline: field("headline")?,
        body: field("body")?,
        image_prompt: field("imagePrompt")?,
    })
}
