//! Sprite, camera and render-loop helpers for the HTML canvas.
//!
//! A [`Screen`] takes over a canvas element, owns a throttled
//! requestAnimationFrame redraw loop and a camera (offset + zoom), and
//! renders registered [`Sprite`]s every tick. Pointer dragging pans the
//! camera, the wheel zooms it, and clicks are hit-tested against every
//! camera-relative sprite and delivered to registered listeners.

#[macro_use]
pub mod browser;

pub mod camera;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod screen;
pub mod sprite;

pub use camera::{Camera, View, MIN_ZOOM};
pub use events::{ClickEvent, SpriteHit, SpriteSnapshot, ZoomEvent};
pub use geometry::{Point, Rect, Size};
pub use screen::{Screen, ScreenConfig};
pub use sprite::{AnimationConfig, Sprite, SpriteConfig, SpriteType};
