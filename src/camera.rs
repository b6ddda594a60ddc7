use crate::geometry::{Point, Rect};

/// Lower bound for the zoom scale; scroll-down steps clamp here.
pub const MIN_ZOOM: f64 = 0.2;

const DEFAULT_ZOOM_SPEED: f64 = 0.01;

/// Snapshot of the camera transform for one frame. Drawing and hit-testing
/// both go through this so the two can never disagree about where a sprite is.
///
/// world_to_screen and screen_to_world are inverses of each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub offset: Point,
    pub zoom: f64,
}

impl View {
    /// View for screen-fixed sprites: no offset, no zoom.
    pub fn identity() -> Self {
        View {
            offset: Point::new(0.0, 0.0),
            zoom: 1.0,
        }
    }

    pub fn world_to_screen(&self, point: Point) -> Point {
        (point - self.offset).scaled(self.zoom)
    }

    pub fn screen_to_world(&self, point: Point) -> Point {
        point.scaled(1.0 / self.zoom) + self.offset
    }

    pub fn project(&self, rect: Rect) -> Rect {
        Rect {
            position: self.world_to_screen(rect.position),
            size: rect.size.scaled(self.zoom),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging { last: Point },
}

/// Camera offset, zoom scale and the pointer-drag state machine. All methods
/// are pure state transitions; the screen feeds them from its DOM callbacks.
#[derive(Debug, Clone)]
pub struct Camera {
    offset: Point,
    zoom: f64,
    zoom_speed: f64,
    drag_enabled: bool,
    zoom_enabled: bool,
    drag: DragState,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            offset: Point::new(0.0, 0.0),
            zoom: 1.0,
            zoom_speed: DEFAULT_ZOOM_SPEED,
            drag_enabled: false,
            zoom_enabled: false,
            drag: DragState::Idle,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Camera::default()
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn set_offset(&mut self, x: f64, y: f64) {
        self.offset = Point::new(x, y);
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn set_zoom_speed(&mut self, speed: f64) {
        self.zoom_speed = speed;
    }

    pub fn enable_drag(&mut self, enabled: bool) {
        self.drag_enabled = enabled;
    }

    pub fn enable_zoom(&mut self, enabled: bool) {
        self.zoom_enabled = enabled;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn view(&self) -> View {
        View {
            offset: self.offset,
            zoom: self.zoom,
        }
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        if !self.drag_enabled {
            return;
        }
        self.drag = DragState::Dragging { last: pointer };
    }

    /// Dragging right moves the offset left, so the world appears to follow
    /// the pointer.
    pub fn drag_to(&mut self, pointer: Point) {
        if !self.drag_enabled {
            return;
        }
        if let DragState::Dragging { last } = self.drag {
            self.offset = self.offset - (pointer - last);
            self.drag = DragState::Dragging { last: pointer };
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Applies one wheel step. Returns the new zoom when zooming is enabled,
    /// `None` otherwise. `center` is the midpoint of the canvas rectangle;
    /// the offset is recentered so the point under it stays visually put.
    pub fn apply_wheel(&mut self, delta_y: f64, center: Point) -> Option<f64> {
        if !self.zoom_enabled {
            return None;
        }

        let old_zoom = self.zoom;
        if delta_y > 0.0 {
            self.zoom = (self.zoom - self.zoom_speed).max(MIN_ZOOM);
        } else {
            self.zoom += self.zoom_speed;
        }

        let ratio = self.zoom / old_zoom;
        self.offset = Point {
            x: center.x - (center.x - self.offset.x) / ratio,
            y: center.y - (center.y - self.offset.y) / ratio,
        };

        Some(self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn drag_camera() -> Camera {
        let mut camera = Camera::new();
        camera.enable_drag(true);
        camera
    }

    #[test]
    fn drag_subtracts_the_pointer_delta() {
        let mut camera = drag_camera();
        camera.begin_drag(Point::new(100.0, 100.0));
        camera.drag_to(Point::new(110.0, 95.0));
        assert_eq!(camera.offset(), Point::new(-10.0, 5.0));
    }

    #[test]
    fn drag_tracks_the_last_pointer_position() {
        let mut camera = drag_camera();
        camera.begin_drag(Point::new(0.0, 0.0));
        camera.drag_to(Point::new(4.0, 0.0));
        camera.drag_to(Point::new(10.0, 0.0));
        assert_eq!(camera.offset(), Point::new(-10.0, 0.0));
    }

    #[test]
    fn drag_does_nothing_while_capture_is_disabled() {
        let mut camera = Camera::new();
        camera.begin_drag(Point::new(0.0, 0.0));
        camera.drag_to(Point::new(10.0, -5.0));
        assert!(!camera.is_dragging());
        assert_eq!(camera.offset(), Point::new(0.0, 0.0));
    }

    #[test]
    fn move_without_a_begun_drag_is_ignored() {
        let mut camera = drag_camera();
        camera.drag_to(Point::new(10.0, 10.0));
        assert_eq!(camera.offset(), Point::new(0.0, 0.0));
    }

    #[test]
    fn end_drag_returns_to_idle() {
        let mut camera = drag_camera();
        camera.begin_drag(Point::new(0.0, 0.0));
        assert!(camera.is_dragging());
        camera.end_drag();
        assert!(!camera.is_dragging());
    }

    #[test]
    fn wheel_is_ignored_while_zoom_is_disabled() {
        let mut camera = Camera::new();
        assert_eq!(camera.apply_wheel(120.0, Point::new(320.0, 180.0)), None);
        assert_relative_eq!(camera.zoom(), 1.0);
    }

    #[test]
    fn zoom_never_drops_below_the_floor() {
        let mut camera = Camera::new();
        camera.enable_zoom(true);
        camera.set_zoom_speed(0.05);
        for _ in 0..1000 {
            camera.apply_wheel(120.0, Point::new(320.0, 180.0));
        }
        assert_relative_eq!(camera.zoom(), MIN_ZOOM);
    }

    #[test]
    fn scroll_up_increases_without_an_upper_bound() {
        let mut camera = Camera::new();
        camera.enable_zoom(true);
        camera.set_zoom_speed(0.5);
        for _ in 0..10 {
            camera.apply_wheel(-120.0, Point::new(320.0, 180.0));
        }
        assert_relative_eq!(camera.zoom(), 6.0);
    }

    #[test]
    fn wheel_recenters_the_offset_around_the_canvas_midpoint() {
        let mut camera = Camera::new();
        camera.enable_zoom(true);
        camera.set_zoom_speed(1.0);
        camera.set_offset(100.0, 60.0);
        let center = Point::new(320.0, 180.0);

        let zoom = camera.apply_wheel(-120.0, center).unwrap();
        assert_relative_eq!(zoom, 2.0);
        // offset = center - (center - old) / (new / old)
        assert_relative_eq!(camera.offset().x, 320.0 - (320.0 - 100.0) / 2.0);
        assert_relative_eq!(camera.offset().y, 180.0 - (180.0 - 60.0) / 2.0);
    }

    #[test]
    fn view_transforms_round_trip() {
        let view = View {
            offset: Point::new(15.0, -3.0),
            zoom: 1.8,
        };
        let world = Point::new(42.5, 99.0);
        let back = view.screen_to_world(view.world_to_screen(world));
        assert_relative_eq!(back.x, world.x);
        assert_relative_eq!(back.y, world.y);
    }

    #[test]
    fn identity_view_leaves_points_alone() {
        let view = View::identity();
        let point = Point::new(12.0, 34.0);
        assert_eq!(view.world_to_screen(point), point);
        assert_eq!(view.screen_to_world(point), point);
    }

    #[test]
    fn click_resolution_matches_a_world_space_hitbox() {
        // Click at (50,50) with offset (0,0) and zoom 1 lands inside a
        // 20x20 sprite at (40,40).
        let view = View::identity();
        let world = view.screen_to_world(Point::new(50.0, 50.0));
        let hitbox = Rect::from_coords(40.0, 40.0, 20.0, 20.0);
        assert!(hitbox.contains(world));

        let elsewhere = Rect::from_coords(100.0, 100.0, 20.0, 20.0);
        assert!(!elsewhere.contains(world));
    }

    #[test]
    fn projected_rect_scales_position_and_size() {
        let view = View {
            offset: Point::new(10.0, 10.0),
            zoom: 2.0,
        };
        let rect = Rect::from_coords(20.0, 30.0, 8.0, 4.0);
        let projected = view.project(rect);
        assert_eq!(projected.position, Point::new(20.0, 40.0));
        assert_eq!(projected.size.width, 16.0);
        assert_eq!(projected.size.height, 8.0);
    }
}
