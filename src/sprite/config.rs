use crate::browser;
use crate::sprite::SpriteType;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Construction parameters for a [`Sprite`](crate::sprite::Sprite).
///
/// Deserializable so sprite definitions can live in JSON manifests next to
/// the image assets; field names mirror the manifest keys.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SpriteConfig {
    pub id: String,
    pub name: String,
    pub pos_x: f64,
    pub pos_y: f64,
    /// Hitbox width until the backing image finishes loading.
    pub width: f64,
    /// Hitbox height until the backing image finishes loading.
    pub height: f64,
    pub image_source: String,
    pub animations: HashMap<String, AnimationConfig>,
    /// Number of frames in the horizontal strip image.
    pub frames: u32,
    /// Render ticks each frame is held before advancing.
    pub frame_buffer: u32,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub auto_play: bool,
    pub scale: f64,
    /// Smooth scaling looks poor on low-resolution pixel art, hence off by
    /// default.
    pub smoothing: bool,
    #[serde(rename = "type")]
    pub sprite_type: SpriteType,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        SpriteConfig {
            id: String::new(),
            name: String::new(),
            pos_x: 0.0,
            pos_y: 0.0,
            width: 0.0,
            height: 0.0,
            image_source: String::new(),
            animations: HashMap::new(),
            frames: 1,
            frame_buffer: 3,
            looping: true,
            auto_play: true,
            scale: 1.0,
            smoothing: false,
            sprite_type: SpriteType::Object,
        }
    }
}

impl SpriteConfig {
    /// Fetches a sprite definition from a JSON manifest.
    pub async fn fetch(url: &str) -> Result<Self> {
        browser::fetch_json(url).await
    }
}

/// A named animation variant. Unset fields fall back to whatever the sprite
/// is currently using when the variant is switched to.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AnimationConfig {
    pub image_source: String,
    pub frames: Option<u32>,
    pub frame_buffer: Option<u32>,
    #[serde(rename = "loop")]
    pub looping: Option<bool>,
}
