use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(4, 2).unwrap().rgba_len(), 32);
}

#[test]
fn default_canvas_is_full_hd() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (1920, 1080));
}

#[test]
fn snap_frame_rounds_and_clamps() {
    assert_eq!(snap_frame(0.0, 180), 0);
    assert_eq!(snap_frame(89.5, 180), 90);
    assert_eq!(snap_frame(89.49, 180), 89);
    assert_eq!(snap_frame(179.0, 180), 179);
    assert_eq!(snap_frame(400.0, 180), 179);
    assert_eq!(snap_frame(-3.0, 180), 0);
    assert_eq!(snap_frame(f64::NAN, 180), 0);
    assert_eq!(snap_frame(5.0, 0), 0);
}
