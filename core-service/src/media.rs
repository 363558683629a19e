//! Media uploads and asset URLs.

use crate::error::{CoreError, Result};
use bridge_traits::multipart::{FilePart, MultipartForm};
use core_gateway::HttpGateway;
use core_registry::EntityId;
use serde_json::{json, Value};
use tracing::instrument;

pub const POST_IMAGE_UPLOAD_PATH: &str = "/uploads/posts";
pub const MEDIA_UPLOAD_PATH: &str = "/media/upload";
pub const YOUTUBE_PATH: &str = "/media/youtube";

/// Shown wherever a record has no image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

/// Absolute URL of a stored asset.
///
/// Empty paths map to [`PLACEHOLDER_IMAGE`]; absolute `http(s)` URLs are
/// returned as they are.
pub fn asset_url(asset_base_url: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return PLACEHOLDER_IMAGE.to_string();
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        asset_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Clone, Debug)]
pub struct MediaService {
    gateway: HttpGateway,
    asset_base_url: String,
}

impl MediaService {
    pub fn new(gateway: HttpGateway, asset_base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            asset_base_url: asset_base_url.into(),
        }
    }

    pub fn asset_url(&self, path: &str) -> String {
        asset_url(&self.asset_base_url, path)
    }

    /// Upload an image for a post body and return its URL.
    #[instrument(skip_all, fields(filename = %file.filename))]
    pub async fn upload_post_image(&self, file: FilePart) -> Result<String> {
        let form = MultipartForm::new().file("file", file);
        let response = self.gateway.post(POST_IMAGE_UPLOAD_PATH, form).await?;

        response
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CoreError::UnexpectedResponse("upload response has no url".to_string()))
    }

    /// Upload an image or video, optionally attached to a product.
    #[instrument(skip_all, fields(filename = %file.filename))]
    pub async fn upload_media(
        &self,
        file: FilePart,
        product_id: Option<EntityId>,
    ) -> Result<Value> {
        let mut form = MultipartForm::new().file("file", file);
        if let Some(product_id) = product_id {
            form = form.text("productId", product_id.as_str());
        }
        Ok(self.gateway.post(MEDIA_UPLOAD_PATH, form).await?)
    }

    /// Register a YouTube video, optionally attached to a product.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`] for an empty URL, before any request.
    pub async fn add_youtube(
        &self,
        title: &str,
        youtube_url: &str,
        product_id: Option<EntityId>,
    ) -> Result<Value> {
        if youtube_url.trim().is_empty() {
            return Err(CoreError::InvalidInput("Enter YouTube URL".to_string()));
        }

        let product_id = product_id.map(|id| match id.as_str().parse::<i64>() {
            Ok(number) => json!(number),
            Err(_) => json!(id.as_str()),
        });
        let body = json!({
            "title": title,
            "youtubeUrl": youtube_url,
            "productId": product_id,
        });
        Ok(self.gateway.post(YOUTUBE_PATH, body).await?)
    }
}
