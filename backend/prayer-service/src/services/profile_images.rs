//! Profile pictures.
//!
//! Uploads are shrunk to fit a 125x125 box with the aspect ratio kept,
//! re-encoded in their original format and handed to a `ProfileImageStore`.
//! Decoding and resizing run on the blocking thread pool.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use image::{GenericImageView, ImageOutputFormat};
use rand::Rng;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, Result};

pub const THUMBNAIL_SIZE: u32 = 125;
const PROFILE_FOLDER: &str = "profile_pics";

/// Accepted upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Map a request `Content-Type` to a format. Only JPEG and PNG are accepted.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    fn decoder_format(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }

    fn output_format(&self) -> ImageOutputFormat {
        match self {
            ImageFormat::Jpeg => ImageOutputFormat::Jpeg(85),
            ImageFormat::Png => ImageOutputFormat::Png,
        }
    }
}

/// Thumbnail bytes and their final dimensions
#[derive(Debug)]
pub struct Thumbnail {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode `data` as `format`, shrink it to fit the thumbnail box and encode
/// it back to the same format. Images already inside the box keep their size.
pub fn make_thumbnail(data: &[u8], format: ImageFormat) -> Result<Thumbnail> {
    let img = image::load_from_memory_with_format(data, format.decoder_format())
        .map_err(|e| AppError::BadRequest(format!("Could not read image: {}", e)))?;

    let (orig_w, orig_h) = img.dimensions();
    let img = if orig_w > THUMBNAIL_SIZE || orig_h > THUMBNAIL_SIZE {
        img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
    } else {
        img
    };
    let (width, height) = img.dimensions();

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format.output_format())
        .map_err(|e| AppError::Internal(format!("Failed to encode thumbnail: {}", e)))?;

    debug!(
        original_width = orig_w,
        original_height = orig_h,
        width,
        height,
        "profile thumbnail generated"
    );

    Ok(Thumbnail {
        data: out.into_inner(),
        width,
        height,
    })
}

/// Where profile pictures end up.
#[async_trait]
pub trait ProfileImageStore: Send + Sync {
    /// Store `data` under `key` and return its public URL.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String>;
}

/// S3 bucket whose objects are served from `public_base_url`
#[derive(Clone)]
pub struct S3ProfileImageStore {
    client: Arc<Client>,
    bucket: String,
    public_base_url: String,
}

impl S3ProfileImageStore {
    pub fn new(client: Client, bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Build a client from the standard AWS environment and profile chain.
    pub async fn from_env(bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&aws_config), bucket, public_base_url)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl ProfileImageStore for S3ProfileImageStore {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {}", e)))?;

        Ok(self.public_url(key))
    }
}

/// Object key for a new picture of `user_id`. A random suffix keeps old
/// URLs from being overwritten while caches still hold them.
pub fn profile_image_key(user_id: Uuid, format: ImageFormat) -> String {
    let suffix: u64 = rand::thread_rng().gen();
    format!(
        "{}/{}-{:016x}.{}",
        PROFILE_FOLDER,
        user_id,
        suffix,
        format.extension()
    )
}

/// Thumbnail `data` and upload it, returning the stored URL.
pub async fn save_profile_picture(
    store: &dyn ProfileImageStore,
    user_id: Uuid,
    data: Vec<u8>,
    format: ImageFormat,
) -> Result<String> {
    let thumbnail = tokio::task::spawn_blocking(move || make_thumbnail(&data, format))
        .await
        .map_err(|e| AppError::Internal(format!("Thumbnail task panicked: {}", e)))??;

    let key = profile_image_key(user_id, format);
    let url = store
        .put(&key, thumbnail.data, format.content_type())
        .await?;

    info!(%user_id, key = %key, "profile picture stored");
    Ok(url)
}
