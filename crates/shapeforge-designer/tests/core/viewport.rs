use shapeforge_designer::geometry::Point;
use shapeforge_designer::viewport::Viewport;

fn assert_close(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
        "{} != {}",
        a,
        b
    );
}

#[test]
fn test_viewport_creation() {
    let vp = Viewport::new();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan_x(), 0.0);
    assert_eq!(vp.pan_y(), 0.0);
    assert_eq!(vp.canvas_size(), 800.0);
}

#[test]
fn test_screen_canvas_roundtrip() {
    let mut vp = Viewport::new();
    vp.set_zoom(2.0);
    vp.set_pan(-100.0, 50.0);
    let canvas = vp.screen_to_canvas(Point::new(300.0, 250.0));
    assert_close(canvas, Point::new(200.0, 100.0));
    assert_close(vp.canvas_to_screen(canvas), Point::new(300.0, 250.0));
    assert_eq!(vp.screen_to_canvas_len(24.0), 12.0);
}

#[test]
fn test_zoom_at_point_keeps_point_fixed() {
    let mut vp = Viewport::new();
    vp.set_pan(37.0, -12.0);
    let screen = Point::new(123.0, 456.0);
    let before = vp.screen_to_canvas(screen);
    for delta in [1.0, 1.0, -1.0, 3.0] {
        assert!(vp.zoom_at_point(delta, screen.x, screen.y));
        assert_close(vp.screen_to_canvas(screen), before);
    }
    assert!((vp.zoom() - 1.4).abs() < 1e-9);
}

#[test]
fn test_zero_delta_zoom_leaves_viewport_untouched() {
    let mut vp = Viewport::new();
    vp.set_zoom(1.3);
    vp.set_pan(-42.5, 17.25);
    let before = vp.clone();
    assert!(!vp.zoom_at_point(0.0, 123.0, 45.0));
    assert_eq!(vp.zoom().to_bits(), before.zoom().to_bits());
    assert_eq!(vp.pan_x().to_bits(), before.pan_x().to_bits());
    assert_eq!(vp.pan_y().to_bits(), before.pan_y().to_bits());
}

#[test]
fn test_zoom_at_limit_is_noop() {
    let mut vp = Viewport::new();
    vp.set_zoom(4.0);
    vp.set_pan(10.0, 20.0);
    assert!(!vp.zoom_at_point(1.0, 400.0, 400.0));
    assert_eq!(vp.zoom(), 4.0);
    assert_eq!(vp.pan(), Point::new(10.0, 20.0));

    vp.set_zoom(0.25);
    assert!(!vp.zoom_out());
    assert_eq!(vp.zoom(), 0.25);
}

#[test]
fn test_zoom_is_clamped() {
    let mut vp = Viewport::new();
    assert!(vp.set_zoom(10.0));
    assert_eq!(vp.zoom(), 4.0);
    assert!(vp.set_zoom(0.01));
    assert_eq!(vp.zoom(), 0.25);
}

#[test]
fn test_set_zoom_at_point_is_idempotent() {
    let mut vp = Viewport::new();
    let start_pan = vp.pan();
    assert!(vp.set_zoom_at_point(1.0, 1.5, 400.0, 300.0, start_pan.x, start_pan.y));
    let first = vp.clone();
    assert!(!vp.set_zoom_at_point(1.0, 1.5, 400.0, 300.0, start_pan.x, start_pan.y));
    assert_eq!(vp, first);
    assert_close(vp.screen_to_canvas(Point::new(400.0, 300.0)), Point::new(400.0, 300.0));
}

#[test]
fn test_set_zoom_at_point_clamps_scale() {
    let mut vp = Viewport::new();
    vp.set_zoom_at_point(1.0, 100.0, 0.0, 0.0, 0.0, 0.0);
    assert_eq!(vp.zoom(), 4.0);
    vp.set_zoom_at_point(1.0, 0.0001, 0.0, 0.0, 0.0, 0.0);
    assert_eq!(vp.zoom(), 0.25);
}

#[test]
fn test_zoom_in_about_canvas_center() {
    let mut vp = Viewport::new();
    assert!(vp.zoom_in());
    assert!((vp.zoom() - 1.1).abs() < 1e-9);
    assert_close(vp.screen_to_canvas(Point::new(400.0, 400.0)), Point::new(400.0, 400.0));
    vp.reset();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan(), Point::ZERO);
}

#[test]
fn test_visible_region() {
    let mut vp = Viewport::new();
    vp.set_zoom(2.0);
    vp.set_pan(-200.0, 0.0);
    let region = vp.visible_region();
    assert_eq!(region.min_x, 100.0);
    assert_eq!(region.min_y, 0.0);
    assert_eq!(region.width(), 400.0);
}
