//! The drawing widget: tool registry, event dispatch and surface operations.

use crate::background::{BackgroundPlacement, BackgroundRequest};
use crate::config::DrawingToolConfig;
use crate::error::{DrawError, DrawResult};
use crate::events::SurfaceEvent;
use crate::shapes::{ShapeId, parse_css_color};
use crate::snapshot;
use crate::surface::Surface;
use crate::tools::{
    DeleteTool, FreeDrawTool, SelectionTool, ShapeKind, ShapeTool, Tool, ToolAction, ToolKind,
    ToolVariant,
};
use kurbo::{Point, Size};
use std::collections::{HashMap, VecDeque};

/// Outcome of choosing a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChange {
    /// The current tool changed.
    Switched {
        previous: Option<ToolKind>,
        current: ToolKind,
    },
    /// The tool was already current; it was re-triggered instead.
    Reactivated(ToolKind),
    /// A single-use tool ran; the current tool is unchanged.
    Used(ToolKind),
}

/// A drawing widget: one surface plus the toolbar of tools acting on it.
#[derive(Debug)]
pub struct DrawingTool {
    config: DrawingToolConfig,
    surface: Surface,
    tools: HashMap<ToolKind, Tool>,
    current: Option<ToolKind>,
    previous: Option<ToolKind>,
}

impl DrawingTool {
    /// Create a widget and activate the selection tool.
    pub fn new(config: DrawingToolConfig) -> DrawResult<Self> {
        let mut widget = Self {
            surface: Surface::new(config.size()),
            tools: Self::create_tools(&config),
            current: None,
            previous: None,
            config,
        };

        let style = widget.config.clone();
        widget.set_stroke_width(style.stroke_width)?;
        widget.set_stroke_color(&style.stroke_color)?;
        widget.set_fill(&style.fill)?;

        widget.choose(ToolKind::Select)?;
        Ok(widget)
    }

    fn create_tools(config: &DrawingToolConfig) -> HashMap<ToolKind, Tool> {
        let shape = |kind| ToolVariant::Shape(ShapeTool::new(kind, config.min_drag_distance));
        ToolKind::ALL
            .into_iter()
            .map(|kind| {
                let variant = match kind {
                    ToolKind::Select => ToolVariant::Select(SelectionTool::new(config.touch_supported)),
                    ToolKind::Line => shape(ShapeKind::Line),
                    ToolKind::Rectangle => shape(ShapeKind::Rectangle),
                    ToolKind::Ellipse => shape(ShapeKind::Ellipse),
                    ToolKind::Square => shape(ShapeKind::Square),
                    ToolKind::Circle => shape(ShapeKind::Circle),
                    ToolKind::FreeDraw => ToolVariant::FreeDraw(FreeDrawTool::new()),
                    ToolKind::Delete => ToolVariant::Delete(DeleteTool),
                };
                (kind, Tool::new(kind, variant))
            })
            .collect()
    }

    pub fn config(&self) -> &DrawingToolConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    // --- tools ---

    /// Choose a tool by its toolbar selector.
    pub fn choose_tool(&mut self, selector: &str) -> DrawResult<ToolChange> {
        match ToolKind::from_selector(selector) {
            Some(kind) => self.choose(kind),
            None => {
                log::warn!(
                    "Could not find tool with selector \"{}\", keeping {:?}",
                    selector,
                    self.current
                );
                Err(DrawError::UnknownTool(selector.to_string()))
            }
        }
    }

    /// Choose a tool by kind.
    pub fn choose(&mut self, kind: ToolKind) -> DrawResult<ToolChange> {
        let Some(tool) = self.tools.get_mut(&kind) else {
            return Err(DrawError::UnknownTool(kind.selector().to_string()));
        };

        if self.current == Some(kind) {
            log::debug!("{} is already the current tool", kind);
            tool.activate_again(&mut self.surface);
            return Ok(ToolChange::Reactivated(kind));
        }

        if tool.is_single_use() {
            log::debug!("Using {}", kind);
            tool.use_once(&mut self.surface);
            return Ok(ToolChange::Used(kind));
        }

        if let Some(old) = self.current.and_then(|k| self.tools.get_mut(&k)) {
            old.set_active(false, &mut self.surface);
        }
        if let Some(tool) = self.tools.get_mut(&kind) {
            tool.set_active(true, &mut self.surface);
        }
        let previous = self.current.replace(kind);
        self.previous = previous;
        self.surface.render_all();
        log::info!("Switched to {}", kind);

        Ok(ToolChange::Switched {
            previous,
            current: kind,
        })
    }

    /// Leave the current tool for the default selection tool.
    pub fn change_out_of_tool(&mut self) -> DrawResult<ToolChange> {
        self.choose(ToolKind::Select)
    }

    pub fn current_tool(&self) -> Option<ToolKind> {
        self.current
    }

    /// The tool that was current before the last switch.
    pub fn previous_tool(&self) -> Option<ToolKind> {
        self.previous
    }

    pub fn tool(&self, kind: ToolKind) -> Option<&Tool> {
        self.tools.get(&kind)
    }

    /// Tools currently flagged active.
    pub fn active_tools(&self) -> Vec<ToolKind> {
        ToolKind::ALL
            .into_iter()
            .filter(|k| self.tools.get(k).is_some_and(Tool::is_active))
            .collect()
    }

    // --- input ---

    pub fn pointer_down(&mut self, point: Point) {
        self.dispatch_pointer(SurfaceEvent::MouseDown(point), point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.dispatch_pointer(SurfaceEvent::MouseMove(point), point);
    }

    pub fn pointer_up(&mut self, point: Point) {
        self.dispatch_pointer(SurfaceEvent::MouseUp(point), point);
    }

    /// Pointer events with non-finite coordinates are dropped.
    fn dispatch_pointer(&mut self, event: SurfaceEvent, point: Point) {
        if !point.is_finite() {
            log::warn!("Ignoring {:?} at non-finite position", event.kind());
            return;
        }
        self.dispatch(event);
    }

    /// Select one object, as a click with the selection tool would.
    /// Returns false when the object is not currently selectable.
    pub fn select_shape(&mut self, id: ShapeId) -> bool {
        if !self.surface.select(id) {
            return false;
        }
        self.dispatch(SurfaceEvent::ObjectSelected(id));
        self.surface.render_all();
        true
    }

    /// Select the topmost selectable object under a point.
    pub fn select_at(&mut self, point: Point) -> Option<ShapeId> {
        let id = self.surface.find_target(point)?;
        self.select_shape(id).then_some(id)
    }

    pub fn selection(&self) -> &[ShapeId] {
        self.surface.selection()
    }

    /// Deliver an event to every listening tool. Follow-up events run after
    /// the current one; tool switches run once all events are delivered.
    fn dispatch(&mut self, event: SurfaceEvent) {
        let mut events = VecDeque::from([event]);
        let mut switches = Vec::new();

        while let Some(event) = events.pop_front() {
            for kind in self.surface.listeners().targets(event.kind()) {
                let Some(tool) = self.tools.get_mut(&kind) else {
                    continue;
                };
                match tool.handle(event, &mut self.surface) {
                    Some(ToolAction::Selected(ids)) => {
                        events.extend(ids.into_iter().map(SurfaceEvent::ObjectSelected));
                    }
                    Some(ToolAction::ChooseTool(next)) => switches.push(next),
                    None => {}
                }
            }
        }

        for next in switches {
            if let Err(e) = self.choose(next) {
                log::warn!("{}", e);
            }
        }
    }

    /// Resize the selected objects by the given factors instead of scaling
    /// them, so stroke widths stay as drawn. Factors must be finite and
    /// positive. Returns how many objects were resized.
    pub fn scale_selection(&mut self, sx: f64, sy: f64) -> DrawResult<usize> {
        let valid = |f: f64| f.is_finite() && f > 0.0;
        if !valid(sx) || !valid(sy) {
            log::warn!("Ignoring invalid scale factors {} x {}", sx, sy);
            return Err(DrawError::InvalidScale(sx, sy));
        }
        if self.current != Some(ToolKind::Select) {
            return Ok(0);
        }
        let ids = self.surface.selection().to_vec();
        let mut resized = 0;
        for id in ids {
            if let Some(shape) = self.surface.get_mut(id) {
                shape.resize(sx, sy);
                resized += 1;
            }
        }
        if resized > 0 {
            self.surface.render_all();
        }
        Ok(resized)
    }

    // --- surface ---

    /// Remove every object, and the background image if asked to.
    pub fn clear(&mut self, clear_background: bool) {
        self.surface.clear_objects();
        if clear_background {
            self.surface.clear_background();
        }
        self.surface.render_all();
    }

    /// Serialize the drawing.
    pub fn save(&self) -> DrawResult<String> {
        snapshot::save(&self.surface)
    }

    /// Replace the drawing with a saved snapshot.
    ///
    /// A returned request must be completed with
    /// [`complete_background_load`](Self::complete_background_load) once the
    /// host has loaded the image.
    pub fn load(&mut self, json: &str) -> DrawResult<Option<BackgroundRequest>> {
        let request = snapshot::load(&mut self.surface, json).inspect_err(|e| {
            log::warn!("Failed to load snapshot: {}", e);
        })?;
        // Loaded objects follow the current tool's selectability.
        let selectable = self.current == Some(ToolKind::Select);
        self.surface.set_all_selectable(selectable);
        Ok(request)
    }

    /// Set the stroke color of new shapes and the brush. An empty string
    /// removes the stroke.
    pub fn set_stroke_color(&mut self, css: &str) -> DrawResult<()> {
        let color = parse_css_color(css).inspect_err(|e| log::warn!("{}", e))?;
        self.surface.style_mut().stroke_color = color;
        self.surface.brush_mut().color = color;
        Ok(())
    }

    /// Set the stroke width of new shapes and the brush.
    pub fn set_stroke_width(&mut self, width: f64) -> DrawResult<()> {
        if !width.is_finite() || width < 0.0 {
            log::warn!("Ignoring invalid stroke width {}", width);
            return Err(DrawError::InvalidStrokeWidth(width));
        }
        self.surface.style_mut().stroke_width = width;
        self.surface.brush_mut().width = width;
        Ok(())
    }

    /// Set the fill of new shapes. An empty string means no fill.
    pub fn set_fill(&mut self, css: &str) -> DrawResult<()> {
        let color = parse_css_color(css).inspect_err(|e| log::warn!("{}", e))?;
        self.surface.style_mut().fill_color = color;
        Ok(())
    }

    /// Start loading a background image, centered on the surface. The host
    /// completes the returned request when the image is available.
    pub fn set_background_image(&mut self, src: &str) -> BackgroundRequest {
        let placement = BackgroundPlacement::centered(self.surface.size());
        self.surface.begin_background_load(src, placement)
    }

    /// Install a loaded background image. Returns false for superseded requests.
    pub fn complete_background_load(&mut self, request: BackgroundRequest, natural: Size) -> bool {
        self.surface.complete_background_load(request, natural)
    }

    /// Stretch the background image to the surface size.
    pub fn resize_background_to_canvas(&mut self) {
        let size = self.surface.size();
        let Some(background) = self.surface.background_mut() else {
            log::debug!("No background image to resize");
            return;
        };
        background.width = size.width;
        background.height = size.height;
        self.surface.render_all();
    }

    /// Resize the surface to the background image and center the image.
    pub fn resize_canvas_to_background(&mut self) {
        let Some(size) = self.surface.background().map(|b| b.size()) else {
            log::debug!("No background image to resize to");
            return;
        };
        self.surface.set_dimensions(size);
        if let Some(background) = self.surface.background_mut() {
            background.left = size.width / 2.0;
            background.top = size.height / 2.0;
        }
        self.surface.render_all();
    }

    /// Log every object on the surface.
    pub fn check(&self) {
        for shape in self.surface.objects() {
            let style = shape.style();
            log::debug!(
                "{} {} bounds={:?} stroke={} width={} selectable={}",
                shape.type_name(),
                shape.id(),
                shape.bounds(),
                style.stroke_color.map(|c| c.to_css()).unwrap_or_default(),
                style.stroke_width,
                shape.is_selectable(),
            );
        }
    }
}
