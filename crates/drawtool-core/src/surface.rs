//! The drawing surface: object list, selection state, background and style
//! defaults shared by every tool.

use crate::background::{BackgroundImage, BackgroundPlacement, BackgroundRequest};
use crate::events::Listeners;
use crate::shapes::{SerializableColor, Shape, ShapeId, ShapeStyle};
use kurbo::{Point, Rect, Size};

/// Hit tolerance for click selection, in surface units.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Brush used by the free-draw tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub color: Option<SerializableColor>,
    pub width: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Some(SerializableColor::black()),
            width: 1.0,
        }
    }
}

/// The shared drawing area all tools mutate.
#[derive(Debug, Clone)]
pub struct Surface {
    /// Objects in z-order (back to front).
    objects: Vec<Shape>,
    /// Currently selected objects, in selection order.
    selection: Vec<ShapeId>,
    /// Whether rubber-band multi-select is enabled.
    selection_enabled: bool,
    /// Whether pointer input paints with the brush.
    drawing_mode: bool,
    size: Size,
    background: Option<BackgroundImage>,
    /// Bumped on every background change so stale loads can be ignored.
    background_generation: u64,
    style: ShapeStyle,
    brush: Brush,
    listeners: Listeners,
    render_requests: u64,
}

impl Surface {
    /// Create an empty surface of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            objects: Vec::new(),
            selection: Vec::new(),
            selection_enabled: false,
            drawing_mode: false,
            size,
            background: None,
            background_generation: 0,
            style: ShapeStyle::default(),
            brush: Brush::default(),
            listeners: Listeners::new(),
            render_requests: 0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Change the surface dimensions.
    pub fn set_dimensions(&mut self, size: Size) {
        self.size = size;
    }

    /// Request a redraw from the host.
    pub fn render_all(&mut self) {
        self.render_requests += 1;
    }

    /// Number of redraws requested so far.
    pub fn render_count(&self) -> u64 {
        self.render_requests
    }

    // --- objects ---

    /// All objects in z-order, including provisional ones.
    pub fn objects(&self) -> &[Shape] {
        &self.objects
    }

    /// Objects that belong to the persistent drawing.
    pub fn persistent_objects(&self) -> impl Iterator<Item = &Shape> {
        self.objects.iter().filter(|s| !s.is_provisional())
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.objects.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.objects.iter_mut().find(|s| s.id() == id)
    }

    /// Add an object on top of the others.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.objects.push(shape);
        id
    }

    /// Remove an object, keeping the order of the rest.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.objects.iter().position(|s| s.id() == id)?;
        self.selection.retain(|&s| s != id);
        Some(self.objects.remove(index))
    }

    /// Replace the object list wholesale.
    pub(crate) fn replace_objects(&mut self, objects: Vec<Shape>) {
        self.objects = objects;
        self.selection.clear();
    }

    /// Remove every object and the selection.
    pub fn clear_objects(&mut self) {
        self.objects.clear();
        self.selection.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // --- selection ---

    pub fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    pub fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
    }

    /// Mark every object selectable or not.
    pub fn set_all_selectable(&mut self, selectable: bool) {
        for shape in self.objects.iter_mut().rev() {
            shape.props_mut().selectable = selectable;
        }
    }

    pub fn selection(&self) -> &[ShapeId] {
        &self.selection
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    /// Select a single object, replacing the selection.
    /// Returns false if the object does not exist or is not selectable.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if !self.get(id).is_some_and(|s| s.is_selectable()) {
            return false;
        }
        self.selection.clear();
        self.selection.push(id);
        true
    }

    /// Select several objects at once; non-selectable ids are skipped.
    /// Returns the ids that ended up selected.
    pub fn select_many(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        self.selection = ids
            .iter()
            .copied()
            .filter(|&id| self.get(id).is_some_and(|s| s.is_selectable()))
            .collect();
        self.selection.clone()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Remove the selected objects. Returns them in z-order.
    pub fn remove_selected(&mut self) -> Vec<Shape> {
        let selected = std::mem::take(&mut self.selection);
        let (removed, kept): (Vec<Shape>, Vec<Shape>) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|s| selected.contains(&s.id()));
        self.objects = kept;
        removed
    }

    /// Topmost selectable object under a point.
    pub fn find_target(&self, point: Point) -> Option<ShapeId> {
        self.objects
            .iter()
            .rev()
            .filter(|s| s.is_selectable() && !s.is_provisional())
            .find(|s| s.hit_test(point, HIT_TOLERANCE))
            .map(|s| s.id())
    }

    /// Selectable objects intersecting a rectangle, in z-order.
    pub fn objects_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        self.objects
            .iter()
            .filter(|s| s.is_selectable() && !s.is_provisional())
            .filter(|s| s.intersects_rect(rect))
            .map(|s| s.id())
            .collect()
    }

    // --- style ---

    /// Style handed to newly created shapes.
    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn set_drawing_mode(&mut self, enabled: bool) {
        self.drawing_mode = enabled;
    }

    // --- listeners ---

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut Listeners {
        &mut self.listeners
    }

    // --- background ---

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn background_mut(&mut self) -> Option<&mut BackgroundImage> {
        self.background.as_mut()
    }

    /// Drop the background image and any load still in flight.
    pub fn clear_background(&mut self) {
        self.background = None;
        self.background_generation += 1;
    }

    /// Start loading a new background image. Any earlier pending load is
    /// superseded.
    pub fn begin_background_load(
        &mut self,
        src: impl Into<String>,
        placement: BackgroundPlacement,
    ) -> BackgroundRequest {
        self.background_generation += 1;
        BackgroundRequest {
            generation: self.background_generation,
            src: src.into(),
            placement,
        }
    }

    /// Finish a background load. Returns false if the request was superseded.
    pub fn complete_background_load(&mut self, request: BackgroundRequest, natural: Size) -> bool {
        if request.generation != self.background_generation {
            log::debug!("Ignoring stale background load for {}", request.src);
            return false;
        }
        self.background = Some(request.into_image(natural));
        self.render_all();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, ShapeTrait};

    fn selectable_rect(x: f64, y: f64) -> Shape {
        let mut rect = Rectangle::new(Point::new(x, y), 50.0, 50.0);
        rect.style.fill_color = Some(SerializableColor::white());
        rect.props_mut().selectable = true;
        Shape::Rectangle(rect)
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let a = surface.add(selectable_rect(0.0, 0.0));
        let b = surface.add(selectable_rect(10.0, 0.0));
        let c = surface.add(selectable_rect(20.0, 0.0));
        assert!(surface.remove(b).is_some());
        let ids: Vec<_> = surface.objects().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![a, c]);
        assert!(surface.remove(b).is_none());
    }

    #[test]
    fn test_select_requires_selectable() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let id = surface.add(Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0)));
        assert!(!surface.select(id));
        surface.set_all_selectable(true);
        assert!(surface.select(id));
        assert_eq!(surface.selection(), &[id]);
    }

    #[test]
    fn test_find_target_prefers_topmost() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let _below = surface.add(selectable_rect(0.0, 0.0));
        let above = surface.add(selectable_rect(25.0, 25.0));
        assert_eq!(surface.find_target(Point::new(30.0, 30.0)), Some(above));
        assert_eq!(surface.find_target(Point::new(300.0, 300.0)), None);
    }

    #[test]
    fn test_remove_selected() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let a = surface.add(selectable_rect(0.0, 0.0));
        let b = surface.add(selectable_rect(100.0, 0.0));
        let c = surface.add(selectable_rect(200.0, 0.0));
        surface.select_many(&[c, a]);
        let removed = surface.remove_selected();
        assert_eq!(removed.len(), 2);
        assert_eq!(surface.objects().len(), 1);
        assert_eq!(surface.objects()[0].id(), b);
        assert!(surface.selection().is_empty());
    }

    #[test]
    fn test_stale_background_load_is_ignored() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let first = surface.begin_background_load("a.png", BackgroundPlacement::centered(surface.size()));
        let second = surface.begin_background_load("b.png", BackgroundPlacement::centered(surface.size()));
        assert!(!surface.complete_background_load(first, Size::new(10.0, 10.0)));
        assert!(surface.background().is_none());
        assert!(surface.complete_background_load(second, Size::new(10.0, 10.0)));
        assert_eq!(surface.background().map(|b| b.src.as_str()), Some("b.png"));
    }

    #[test]
    fn test_clear_background_cancels_pending_load() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let pending = surface.begin_background_load("a.png", BackgroundPlacement::centered(surface.size()));
        surface.clear_background();
        assert!(!surface.complete_background_load(pending, Size::new(10.0, 10.0)));
    }
}
