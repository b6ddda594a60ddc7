use crate::browser;
use crate::geometry::{Rect, Size};
use anyhow::{anyhow, Error, Result};
use futures::channel::oneshot::{channel, Receiver};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

// target frame rate; frames arriving early are skipped, not accumulated
const FPS: f64 = 60.0;
const FRAME_INTERVAL: f64 = 1000.0 / FPS;

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

/// Drives a callback once per animation frame, throttled to 60 fps. A frame
/// that fires before the interval has elapsed reschedules itself and does
/// nothing else. There is no cancellation beyond dropping the page.
pub struct RenderLoop {
    last_frame: f64,
}

impl RenderLoop {
    pub fn start(renderer: Renderer, mut tick: impl FnMut(&Renderer) + 'static) -> Result<()> {
        let mut render_loop = RenderLoop {
            last_frame: browser::now()?,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            let _ = browser::request_animation_frame(f.borrow().as_ref().unwrap());
            if perf - render_loop.last_frame < FRAME_INTERVAL {
                return;
            }
            render_loop.last_frame = perf;
            tick(&renderer);
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("RenderLoop: loop closure is None"))?,
        )?;

        Ok(())
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Renderer { context }
    }

    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.position.x,
            rect.position.y,
            rect.size.width,
            rect.size.height,
        );
    }

    pub fn set_smoothing(&self, enabled: bool) {
        self.context.set_image_smoothing_enabled(enabled);
    }

    pub fn draw_image(&self, image: &HtmlImageElement, frame: &Rect, destination: &Rect) {
        self.context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                frame.position.x,
                frame.position.y,
                frame.size.width,
                frame.size.height,
                destination.position.x,
                destination.position.y,
                destination.size.width,
                destination.size.height,
            )
            .expect("Drawing is throwing exceptions! Unrecoverable error");
    }
}

/// An image element plus its load state. Construction kicks off the load and
/// returns immediately; callers either poll [`is_loaded`](Self::is_loaded)
/// (drawing is a no-op until then) or await [`wait`](Self::wait) to preload.
/// A load error leaves the asset permanently not-loaded.
pub struct ImageAsset {
    element: HtmlImageElement,
    loaded: Rc<Cell<bool>>,
    ready: RefCell<Option<Receiver<Result<(), Error>>>>,
}

impl ImageAsset {
    pub fn load(source: &str) -> Result<Self> {
        let element = browser::new_image()?;
        let loaded = Rc::new(Cell::new(false));
        let (tx, rx) = channel::<Result<(), Error>>();
        let success_tx = Rc::new(RefCell::new(Some(tx)));
        let error_tx = success_tx.clone();
        let loaded_flag = loaded.clone();

        let success_callback = browser::closure_once(move || {
            loaded_flag.set(true);
            if let Some(tx) = success_tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        });

        let error_callback = browser::closure_once(move |err: JsValue| {
            if let Some(tx) = error_tx.borrow_mut().take() {
                let _ = tx.send(Err(anyhow!("Error loading image : {:#?}", err)));
            }
        });

        element.set_onload(Some(success_callback.as_ref().unchecked_ref()));
        element.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
        element.set_src(source);

        // keep callbacks alive until the image loads or errors
        success_callback.forget();
        error_callback.forget();

        Ok(ImageAsset {
            element,
            loaded,
            ready: RefCell::new(Some(rx)),
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    pub fn element(&self) -> &HtmlImageElement {
        &self.element
    }

    /// Full dimensions of the backing image; meaningless before the load
    /// completes.
    pub fn natural_size(&self) -> Size {
        Size::new(
            self.element.natural_width() as f64,
            self.element.natural_height() as f64,
        )
    }

    /// Resolves once the image has finished loading, or with the load error.
    pub async fn wait(&self) -> Result<()> {
        if self.loaded.get() {
            return Ok(());
        }
        let rx = self.ready.borrow_mut().take();
        match rx {
            // outer ? is the channel, inner ? is the load result
            Some(rx) => Ok(rx.await??),
            None => Err(anyhow!("Image readiness was already awaited")),
        }
    }
}
