use crate::browser;
use crate::camera::{Camera, View};
use crate::engine::{RenderLoop, Renderer};
use crate::events::{self, ClickEvent, ClickListener, ZoomEvent, ZoomListener};
use crate::geometry::{Point, Rect, Size};
use crate::sprite::{CompletionCallback, Sprite, SpriteType};
use anyhow::{anyhow, Result};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};

/// Construction parameters for a [`Screen`].
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Id of the canvas element to take over. Missing elements and
    /// non-canvas elements are construction errors.
    pub canvas_id: String,
    pub width: u32,
    pub height: u32,
    /// CSS background applied to the canvas element.
    pub background: String,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            canvas_id: String::from("canvas"),
            width: 640,
            height: 360,
            background: String::from("black"),
        }
    }
}

impl ScreenConfig {
    pub fn new(canvas_id: &str) -> Self {
        ScreenConfig {
            canvas_id: canvas_id.to_string(),
            ..ScreenConfig::default()
        }
    }
}

struct ScreenState {
    camera: Camera,
    /// Camera-relative sprites, drawn and hit-tested in insertion order.
    sprites: Vec<Sprite>,
    /// Screen-fixed sprites, drawn after the camera-relative set.
    static_sprites: Vec<Sprite>,
    size: Size,
}

impl ScreenState {
    fn center(&self) -> Point {
        Rect::new(Point::new(0.0, 0.0), self.size).center()
    }
}

#[derive(Default)]
struct Listeners {
    click: Vec<ClickListener>,
    zoom: Vec<ZoomListener>,
}

/// Owns the render loop, the camera and the sprite collections for one
/// canvas element. All shared state lives behind this instance; DOM
/// callbacks and the frame loop clone the inner `Rc` instead of reaching
/// for process-wide statics.
pub struct Screen {
    canvas: HtmlCanvasElement,
    state: Rc<RefCell<ScreenState>>,
    listeners: Rc<RefCell<Listeners>>,
}

impl Screen {
    /// Takes over the canvas element, wires the input handlers and starts
    /// the 60 fps redraw loop. Fails fast when the element is missing, is
    /// not a canvas, or yields no 2d context.
    pub fn new(config: ScreenConfig) -> Result<Self> {
        console_error_panic_hook::set_once();

        let canvas = browser::canvas_by_id(&config.canvas_id)?;
        canvas
            .style()
            .set_property("background", &config.background)
            .map_err(|err| anyhow!("Could not set canvas background : {:#?}", err))?;
        canvas.set_width(config.width);
        canvas.set_height(config.height);
        let context = browser::context_from(&canvas)?;

        let state = Rc::new(RefCell::new(ScreenState {
            camera: Camera::new(),
            sprites: Vec::new(),
            static_sprites: Vec::new(),
            size: Size::new(config.width as f64, config.height as f64),
        }));
        let listeners = Rc::new(RefCell::new(Listeners::default()));

        let screen = Screen {
            canvas,
            state,
            listeners,
        };
        screen.attach_click_handler()?;
        screen.attach_drag_handlers()?;
        screen.attach_zoom_handler()?;

        let state = Rc::clone(&screen.state);
        RenderLoop::start(Renderer::new(context), move |renderer| {
            Self::render_frame(&state, renderer)
        })?;

        Ok(screen)
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Adds a sprite to the render set. `Static` sprites go to the
    /// screen-fixed collection, everything else follows the camera.
    /// Duplicate ids are not rejected; unregistering removes all of them.
    pub fn register_sprite(&self, sprite: Sprite) {
        let mut state = self.state.borrow_mut();
        if sprite.sprite_type() == SpriteType::Static {
            state.static_sprites.push(sprite);
        } else {
            state.sprites.push(sprite);
        }
    }

    /// Removes every sprite with this id from both collections.
    pub fn unregister_sprite(&self, id: &str) {
        let mut state = self.state.borrow_mut();
        state.sprites.retain(|sprite| sprite.id() != id);
        state.static_sprites.retain(|sprite| sprite.id() != id);
    }

    /// Looks a sprite up across both collections, camera-relative first.
    pub fn sprite(&self, id: &str) -> Option<Ref<'_, Sprite>> {
        Ref::filter_map(self.state.borrow(), |state| {
            state
                .sprites
                .iter()
                .chain(state.static_sprites.iter())
                .find(|sprite| sprite.id() == id)
        })
        .ok()
    }

    pub fn sprite_mut(&self, id: &str) -> Option<RefMut<'_, Sprite>> {
        RefMut::filter_map(self.state.borrow_mut(), |state| {
            state
                .sprites
                .iter_mut()
                .chain(state.static_sprites.iter_mut())
                .find(|sprite| sprite.id() == id)
        })
        .ok()
    }

    pub fn camera_offset(&self) -> Point {
        self.state.borrow().camera.offset()
    }

    pub fn set_camera_offset(&self, x: f64, y: f64) {
        self.state.borrow_mut().camera.set_offset(x, y);
    }

    pub fn zoom(&self) -> f64 {
        self.state.borrow().camera.zoom()
    }

    pub fn set_zoom(&self, zoom: f64) {
        self.state.borrow_mut().camera.set_zoom(zoom);
    }

    pub fn set_zoom_speed(&self, speed: f64) {
        self.state.borrow_mut().camera.set_zoom_speed(speed);
    }

    /// Enables camera dragging with pointer or touch input.
    pub fn enable_drag(&self, enabled: bool) {
        self.state.borrow_mut().camera.enable_drag(enabled);
    }

    /// Enables wheel zoom.
    pub fn enable_zoom(&self, enabled: bool) {
        self.state.borrow_mut().camera.enable_zoom(enabled);
    }

    pub fn on_click(&self, listener: impl Fn(&ClickEvent) + 'static) {
        self.listeners.borrow_mut().click.push(Rc::new(listener));
    }

    pub fn on_zoom(&self, listener: impl Fn(&ZoomEvent) + 'static) {
        self.listeners.borrow_mut().zoom.push(Rc::new(listener));
    }

    fn render_frame(state: &Rc<RefCell<ScreenState>>, renderer: &Renderer) {
        let mut due: Vec<CompletionCallback> = Vec::new();
        {
            let mut guard = state.borrow_mut();
            let state = &mut *guard;
            renderer.clear(&Rect::new(Point::new(0.0, 0.0), state.size));

            let view = state.camera.view();
            for sprite in state.sprites.iter_mut() {
                if let Some(callback) = sprite.draw(renderer, view) {
                    due.push(callback);
                }
            }
            for sprite in state.static_sprites.iter_mut() {
                if let Some(callback) = sprite.draw(renderer, View::identity()) {
                    due.push(callback);
                }
            }
        }
        // completion callbacks may call back into the screen
        for callback in due {
            callback();
        }
    }

    fn attach_click_handler(&self) -> Result<()> {
        let state = Rc::clone(&self.state);
        let listeners = Rc::clone(&self.listeners);
        let closure = browser::closure_wrap(Box::new(move |event: MouseEvent| {
            let to_fire: Vec<ClickListener> = listeners.borrow().click.clone();
            if to_fire.is_empty() {
                return;
            }
            let click_event = {
                let state = state.borrow();
                if state.camera.is_dragging() {
                    return;
                }
                let pointer = Point::new(event.offset_x() as f64, event.offset_y() as f64);
                events::hit_test(&state.sprites, pointer, state.camera.view())
            };
            for listener in &to_fire {
                listener(&click_event);
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        self.add_listener("click", &closure)?;
        closure.forget();
        Ok(())
    }

    fn attach_drag_handlers(&self) -> Result<()> {
        let state = Rc::clone(&self.state);
        let down = browser::closure_wrap(Box::new(move |event: MouseEvent| {
            let pointer = Point::new(event.offset_x() as f64, event.offset_y() as f64);
            state.borrow_mut().camera.begin_drag(pointer);
        }) as Box<dyn FnMut(MouseEvent)>);
        self.add_listener("pointerdown", &down)?;
        down.forget();

        let state = Rc::clone(&self.state);
        let moved = browser::closure_wrap(Box::new(move |event: MouseEvent| {
            let pointer = Point::new(event.offset_x() as f64, event.offset_y() as f64);
            state.borrow_mut().camera.drag_to(pointer);
        }) as Box<dyn FnMut(MouseEvent)>);
        self.add_listener("pointermove", &moved)?;
        moved.forget();

        let state = Rc::clone(&self.state);
        let up = browser::closure_wrap(Box::new(move |_event: MouseEvent| {
            state.borrow_mut().camera.end_drag();
        }) as Box<dyn FnMut(MouseEvent)>);
        self.add_listener("pointerup", &up)?;
        self.add_listener("pointerleave", &up)?;
        up.forget();

        // touch positions arrive in client coordinates
        let state = Rc::clone(&self.state);
        let touch_start = browser::closure_wrap(Box::new(move |event: TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                let pointer = Point::new(touch.client_x() as f64, touch.client_y() as f64);
                state.borrow_mut().camera.begin_drag(pointer);
            }
        }) as Box<dyn FnMut(TouchEvent)>);
        self.add_listener_with_passive("touchstart", &touch_start, true)?;
        touch_start.forget();

        let state = Rc::clone(&self.state);
        let touch_move = browser::closure_wrap(Box::new(move |event: TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                let pointer = Point::new(touch.client_x() as f64, touch.client_y() as f64);
                state.borrow_mut().camera.drag_to(pointer);
            }
            event.prevent_default();
        }) as Box<dyn FnMut(TouchEvent)>);
        self.add_listener_with_passive("touchmove", &touch_move, false)?;
        touch_move.forget();

        let state = Rc::clone(&self.state);
        let touch_end = browser::closure_wrap(Box::new(move |_event: TouchEvent| {
            state.borrow_mut().camera.end_drag();
        }) as Box<dyn FnMut(TouchEvent)>);
        self.add_listener_with_passive("touchend", &touch_end, true)?;
        self.add_listener_with_passive("touchcancel", &touch_end, true)?;
        touch_end.forget();

        Ok(())
    }

    fn attach_zoom_handler(&self) -> Result<()> {
        let state = Rc::clone(&self.state);
        let listeners = Rc::clone(&self.listeners);
        let closure = browser::closure_wrap(Box::new(move |event: WheelEvent| {
            let zoom = {
                let mut state = state.borrow_mut();
                let center = state.center();
                state.camera.apply_wheel(event.delta_y(), center)
            };
            let Some(zoom) = zoom else {
                return;
            };

            let to_fire: Vec<ZoomListener> = listeners.borrow().zoom.clone();
            let zoom_event = ZoomEvent {
                zoom,
                event: event.clone(),
            };
            for listener in &to_fire {
                listener(&zoom_event);
            }
            event.prevent_default();
        }) as Box<dyn FnMut(WheelEvent)>);
        self.add_listener_with_passive("wheel", &closure, false)?;
        closure.forget();
        Ok(())
    }

    fn add_listener<T: ?Sized>(&self, kind: &str, closure: &Closure<T>) -> Result<()> {
        self.canvas
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|err| anyhow!("Could not attach '{}' listener : {:#?}", kind, err))
    }

    fn add_listener_with_passive<T: ?Sized>(
        &self,
        kind: &str,
        closure: &Closure<T>,
        passive: bool,
    ) -> Result<()> {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        self.canvas
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|err| anyhow!("Could not attach '{}' listener : {:#?}", kind, err))
    }
}
