pub mod animation;
mod config;

pub use config::{AnimationConfig, SpriteConfig};

use crate::camera::View;
use crate::engine::{ImageAsset, Renderer};
use crate::geometry::{Point, Rect, Size};
use anyhow::Result;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

use animation::Animator;

/// Classification tag for sprites. Purely informational except for
/// [`Static`](SpriteType::Static), which pins a sprite to the viewport
/// instead of the camera.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteType {
    #[default]
    Object,
    Player,
    Background,
    Fluid,
    Passable,
    Item,
    Block,
    Air,
    Static,
}

/// Invoked once when a non-looping animation variant first reaches its last
/// frame. Shared so the screen can fire it after releasing its borrows.
pub type CompletionCallback = Rc<dyn Fn()>;

struct Animation {
    image: ImageAsset,
    frames: Option<u32>,
    frame_buffer: Option<u32>,
    looping: Option<bool>,
    on_complete: Option<CompletionCallback>,
}

/// A drawable, optionally animated rectangular image region. Frames come
/// from a horizontal strip image; named variants swap in their own strip.
///
/// The configured width/height serve as the hitbox until the backing image
/// finishes loading; afterwards the image dimensions are authoritative and
/// one frame is `natural_width / frames` wide. Drawing before the load
/// completes is a no-op.
pub struct Sprite {
    id: String,
    name: String,
    position: Point,
    width: f64,
    height: f64,
    scale: f64,
    smoothing: bool,
    sprite_type: SpriteType,
    base_image: ImageAsset,
    animations: HashMap<String, Animation>,
    active_animation: Option<String>,
    animator: Animator,
}

impl Sprite {
    /// Builds the sprite and kicks off the image loads for the base strip
    /// and every animation variant.
    pub fn new(config: SpriteConfig) -> Result<Self> {
        let base_image = ImageAsset::load(&config.image_source)?;
        let mut animations = HashMap::new();
        for (name, animation) in config.animations {
            animations.insert(
                name,
                Animation {
                    image: ImageAsset::load(&animation.image_source)?,
                    frames: animation.frames,
                    frame_buffer: animation.frame_buffer,
                    looping: animation.looping,
                    on_complete: None,
                },
            );
        }

        Ok(Sprite {
            id: config.id,
            name: config.name,
            position: Point::new(config.pos_x, config.pos_y),
            width: config.width,
            height: config.height,
            scale: config.scale,
            smoothing: config.smoothing,
            sprite_type: config.sprite_type,
            base_image,
            animations,
            active_animation: None,
            animator: Animator::new(
                config.frames,
                config.frame_buffer,
                config.looping,
                config.auto_play,
            ),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sprite_type(&self) -> SpriteType {
        self.sprite_type
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Point::new(x, y);
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn current_frame(&self) -> u32 {
        self.animator.current_frame()
    }

    pub fn elapsed_frames(&self) -> u32 {
        self.animator.elapsed_frames()
    }

    pub fn is_loaded(&self) -> bool {
        self.active_image().is_loaded()
    }

    pub fn play(&mut self) {
        self.animator.play();
    }

    pub fn pause(&mut self) {
        self.animator.pause();
    }

    /// Dimensions of a single frame: the configured width/height before the
    /// active image loads, the image's own dimensions afterwards.
    pub fn frame_size(&self) -> Size {
        let image = self.active_image();
        if image.is_loaded() {
            let natural = image.natural_size();
            Size::new(natural.width / self.animator.frames() as f64, natural.height)
        } else {
            Size::new(self.width, self.height)
        }
    }

    /// World-space bounding box used for click testing.
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.position, self.frame_size().scaled(self.scale))
    }

    /// Attaches a completion callback to a named variant. Unknown names are
    /// reported and ignored.
    pub fn on_animation_complete(&mut self, name: &str, callback: impl Fn() + 'static) {
        match self.animations.get_mut(name) {
            Some(animation) => animation.on_complete = Some(Rc::new(callback)),
            None => error!("There's no animation with key '{}'", name),
        }
    }

    /// Switches to a named variant: rewinds to frame 0 and adopts the
    /// variant's image plus any frame-count/delay/loop overrides. Unknown
    /// names are reported and leave the sprite untouched; switching to the
    /// variant that is already active is a no-op.
    pub fn switch_animation(&mut self, name: &str) {
        let Some(animation) = self.animations.get(name) else {
            error!("There's no animation with key '{}'", name);
            return;
        };
        if self.active_animation.as_deref() == Some(name) {
            return;
        }

        self.animator.rewind();
        if let Some(frames) = animation.frames {
            self.animator.set_frames(frames);
        }
        if let Some(frame_buffer) = animation.frame_buffer {
            self.animator.set_frame_buffer(frame_buffer);
        }
        if let Some(looping) = animation.looping {
            self.animator.set_looping(looping);
        }
        self.active_animation = Some(name.to_string());
    }

    /// Draws the current frame through `view` and then advances the
    /// animation; one call per render tick does both. No-op until the active
    /// image has loaded. When a variant's completion becomes due its
    /// callback is returned rather than invoked, so the caller can run it
    /// outside of any outstanding borrows.
    #[must_use]
    pub fn draw(&mut self, renderer: &Renderer, view: View) -> Option<CompletionCallback> {
        if !self.active_image().is_loaded() {
            return None;
        }

        renderer.set_smoothing(self.smoothing);
        let frame = self.frame_size();
        let source = Rect::new(
            Point::new(frame.width * self.animator.current_frame() as f64, 0.0),
            frame,
        );
        let destination = view.project(Rect::new(self.position, frame.scaled(self.scale)));
        renderer.draw_image(self.active_image().element(), &source, &destination);

        self.advance_frames()
    }

    /// Advances the animation by one tick without drawing. Unlike
    /// [`draw`](Self::draw) this does not wait for the image to load; the
    /// frame counters are independent of it.
    pub fn advance_frames(&mut self) -> Option<CompletionCallback> {
        if self.animator.advance() {
            return self
                .active_animation
                .as_ref()
                .and_then(|name| self.animations.get(name))
                .and_then(|animation| animation.on_complete.clone());
        }
        None
    }

    /// Resolves once the base image and every variant image have loaded.
    pub async fn load(&self) -> Result<()> {
        self.base_image.wait().await?;
        try_join_all(self.animations.values().map(|animation| animation.image.wait())).await?;
        Ok(())
    }

    fn active_image(&self) -> &ImageAsset {
        self.active_animation
            .as_ref()
            .and_then(|name| self.animations.get(name))
            .map(|animation| &animation.image)
            .unwrap_or(&self.base_image)
    }
}
