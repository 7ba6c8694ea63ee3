//! WebAssembly entry point and JavaScript bindings.

use drawtool_core::{BackgroundRequest, DrawingTool, DrawingToolConfig, ShapeId};
use kurbo::{Point, Size};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlImageElement};

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

type ImageCallback = Closure<dyn FnMut(Event)>;

/// A background image being loaded by the browser, together with the
/// callbacks registered on it.
struct ImageLoad {
    image: HtmlImageElement,
    _onload: ImageCallback,
    _onerror: ImageCallback,
}

impl ImageLoad {
    /// Unregister the callbacks so they can be dropped safely.
    fn detach(&self) {
        self.image.set_onload(None);
        self.image.set_onerror(None);
    }
}

/// The drawing widget as seen from JavaScript.
///
/// The widget is shared with pending image loads, which complete on a later
/// event-loop tick.
#[wasm_bindgen(js_name = DrawingTool)]
pub struct WebDrawingTool {
    inner: Rc<RefCell<DrawingTool>>,
    /// The latest background load; replacing it drops the previous callbacks.
    image_load: RefCell<Option<ImageLoad>>,
}

#[wasm_bindgen(js_class = DrawingTool)]
impl WebDrawingTool {
    /// Create a widget from a JSON options string; missing options take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<WebDrawingTool, JsValue> {
        let config = match options {
            Some(json) => DrawingToolConfig::from_json(&json).map_err(to_js)?,
            None => DrawingToolConfig::default(),
        };
        let widget = DrawingTool::new(config).map_err(to_js)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(widget)),
            image_load: RefCell::new(None),
        })
    }

    #[wasm_bindgen(js_name = chooseTool)]
    pub fn choose_tool(&self, selector: &str) -> Result<(), JsValue> {
        self.inner.borrow_mut().choose_tool(selector).map_err(to_js)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = changeOutOfTool)]
    pub fn change_out_of_tool(&self) -> Result<(), JsValue> {
        self.inner.borrow_mut().change_out_of_tool().map_err(to_js)?;
        Ok(())
    }

    /// Selector of the current tool.
    #[wasm_bindgen(js_name = currentTool)]
    pub fn current_tool(&self) -> Option<String> {
        self.inner
            .borrow()
            .current_tool()
            .map(|k| k.selector().to_string())
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f64, y: f64) {
        self.inner.borrow_mut().pointer_down(Point::new(x, y));
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) {
        self.inner.borrow_mut().pointer_move(Point::new(x, y));
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self, x: f64, y: f64) {
        self.inner.borrow_mut().pointer_up(Point::new(x, y));
    }

    /// Select the object under a point; returns its id.
    #[wasm_bindgen(js_name = selectAt)]
    pub fn select_at(&self, x: f64, y: f64) -> Option<String> {
        self.inner
            .borrow_mut()
            .select_at(Point::new(x, y))
            .map(|id| id.to_string())
    }

    #[wasm_bindgen(js_name = selectShape)]
    pub fn select_shape(&self, id: &str) -> Result<bool, JsValue> {
        let id = ShapeId::parse_str(id).map_err(to_js)?;
        Ok(self.inner.borrow_mut().select_shape(id))
    }

    pub fn selection(&self) -> Vec<String> {
        self.inner
            .borrow()
            .selection()
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[wasm_bindgen(js_name = scaleSelection)]
    pub fn scale_selection(&self, sx: f64, sy: f64) -> Result<usize, JsValue> {
        self.inner.borrow_mut().scale_selection(sx, sy).map_err(to_js)
    }

    pub fn clear(&self, clear_background: bool) {
        self.inner.borrow_mut().clear(clear_background);
    }

    pub fn save(&self) -> Result<String, JsValue> {
        self.inner.borrow().save().map_err(to_js)
    }

    pub fn load(&self, json: &str) -> Result<(), JsValue> {
        let request = self.inner.borrow_mut().load(json).map_err(to_js)?;
        if let Some(request) = request {
            self.fetch_background(request)?;
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = setStrokeColor)]
    pub fn set_stroke_color(&self, color: &str) -> Result<(), JsValue> {
        self.inner.borrow_mut().set_stroke_color(color).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setStrokeWidth)]
    pub fn set_stroke_width(&self, width: f64) -> Result<(), JsValue> {
        self.inner.borrow_mut().set_stroke_width(width).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setFill)]
    pub fn set_fill(&self, color: &str) -> Result<(), JsValue> {
        self.inner.borrow_mut().set_fill(color).map_err(to_js)
    }

    /// Load a background image from a URL; it appears once the browser has
    /// loaded it.
    #[wasm_bindgen(js_name = setBackgroundImage)]
    pub fn set_background_image(&self, url: &str) -> Result<(), JsValue> {
        let request = self.inner.borrow_mut().set_background_image(url);
        self.fetch_background(request)
    }

    #[wasm_bindgen(js_name = resizeBackgroundToCanvas)]
    pub fn resize_background_to_canvas(&self) {
        self.inner.borrow_mut().resize_background_to_canvas();
    }

    #[wasm_bindgen(js_name = resizeCanvasToBackground)]
    pub fn resize_canvas_to_background(&self) {
        self.inner.borrow_mut().resize_canvas_to_background();
    }

    pub fn check(&self) {
        self.inner.borrow().check();
    }
}

impl WebDrawingTool {
    /// Load the requested image in the browser and complete the request
    /// once it arrives.
    fn fetch_background(&self, request: BackgroundRequest) -> Result<(), JsValue> {
        if let Some(previous) = self.image_load.borrow_mut().take() {
            previous.detach();
        }

        let image = HtmlImageElement::new()?;
        image.set_cross_origin(Some("anonymous"));

        let src = request.src.clone();
        let widget = Rc::clone(&self.inner);
        let loaded = image.clone();
        let mut pending = Some(request);
        let onload = ImageCallback::new(move |_| {
            loaded.set_onload(None);
            loaded.set_onerror(None);
            let Some(request) = pending.take() else {
                return;
            };
            let natural = Size::new(loaded.natural_width() as f64, loaded.natural_height() as f64);
            widget.borrow_mut().complete_background_load(request, natural);
        });
        image.set_onload(Some(onload.as_ref().unchecked_ref()));

        let failed = src.clone();
        let errored = image.clone();
        let onerror = ImageCallback::new(move |_| {
            errored.set_onload(None);
            errored.set_onerror(None);
            log::warn!("Failed to load background image {}", failed);
        });
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        image.set_src(&src);
        *self.image_load.borrow_mut() = Some(ImageLoad {
            image,
            _onload: onload,
            _onerror: onerror,
        });

        Ok(())
    }
}

/// Initialize logging for the browser.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&to_js(e));
    }

    log::info!("Drawtool (WASM) ready");
}
