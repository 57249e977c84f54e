use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageEncoder, codecs::png::PngEncoder};
use miru_config::ocr::OcrConfig;
use miru_types::{Rect, RegionImage, TextFragment};
use serde::{Deserialize, Serialize};

use crate::engine::{OcrEngine, OcrError};

/// HTTP OCR engine client. Sends the region image as base64 PNG and maps
/// the heterogeneous engine response into canonical fragments.
#[derive(Clone)]
pub struct HttpOcrEngine {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpOcrEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct RecognizeRequest {
    image: String,
    languages: Vec<String>,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    fragments: Vec<WireFragment>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct WireFragment {
    text: String,
    confidence: f32,
    bbox: WireBox,
}

#[derive(Deserialize)]
struct WireBox {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

#[async_trait::async_trait]
impl OcrEngine for HttpOcrEngine {
    async fn recognize(
        &self,
        image: &RegionImage,
        languages: &[String],
    ) -> Result<Vec<TextFragment>, OcrError> {
        let request = RecognizeRequest {
            image: STANDARD.encode(encode_png(image)?),
            languages: languages.to_vec(),
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response: RecognizeResponse = builder.send().await?.json().await?;

        if let Some(error) = response.error {
            return Err(OcrError::Engine(error));
        }

        Ok(response
            .fragments
            .into_iter()
            .map(|f| TextFragment {
                text: f.text,
                confidence: f.confidence,
                bbox: Rect::new(f.bbox.x, f.bbox.y, f.bbox.width, f.bbox.height),
            })
            .collect())
    }
}

fn encode_png(image: &RegionImage) -> Result<Vec<u8>, OcrError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer).write_image(
        &image.data,
        image.width,
        image.height,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(buffer)
}
