use crate::camera::View;
use crate::geometry::{Point, Size};
use crate::sprite::{Sprite, SpriteType};
use std::rc::Rc;
use web_sys::WheelEvent;

/// Copy of the matched sprite's drawing state at click time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSnapshot {
    pub name: String,
    pub position: Point,
    pub size: Size,
}

/// One entry in the click match list.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteHit {
    pub id: String,
    pub sprite_type: SpriteType,
    pub sprite: SpriteSnapshot,
}

/// Delivered to click listeners. `position` is the pointer resolved into
/// world space; `hits` holds every camera-relative sprite whose hitbox
/// contains it, in registration order. The list may be empty.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub position: Point,
    pub hits: Vec<SpriteHit>,
}

/// Delivered to zoom listeners after each applied wheel step.
#[derive(Debug, Clone)]
pub struct ZoomEvent {
    pub zoom: f64,
    pub event: WheelEvent,
}

pub type ClickListener = Rc<dyn Fn(&ClickEvent)>;
pub type ZoomListener = Rc<dyn Fn(&ZoomEvent)>;

/// Resolves a screen-space pointer through the view and tests every sprite,
/// collecting matches in slice order.
pub fn hit_test(sprites: &[Sprite], pointer: Point, view: View) -> ClickEvent {
    let position = view.screen_to_world(pointer);
    let hits = sprites
        .iter()
        .filter(|sprite| sprite.hitbox().contains(position))
        .map(|sprite| SpriteHit {
            id: sprite.id().to_string(),
            sprite_type: sprite.sprite_type(),
            sprite: SpriteSnapshot {
                name: sprite.name().to_string(),
                position: sprite.position(),
                size: sprite.frame_size(),
            },
        })
        .collect();

    ClickEvent { position, hits }
}
