use super::*;
use crate::assets::FrameImage;

fn canvas() -> Canvas {
    Canvas {
        width: 4,
        height: 2,
    }
}

fn solid(rgba: [u8; 4]) -> FrameImage {
    FrameImage::solid(2, 1, rgba).unwrap()
}

#[test]
fn loaded_frame_is_scaled_to_the_surface() {
    let store = FrameStore::new(3);
    store.resolve(1, Some(solid([10, 20, 30, 255])));
    let mut r = Renderer::new(store, canvas());

    assert!(r.render(1));
    let s = r.surface().unwrap();
    assert_eq!((s.width(), s.height()), (4, 2));
    assert_eq!(s.pixel(3, 1), Some([10, 20, 30, 255]));
    assert_eq!(r.shown(), Some(1));
}

#[test]
fn unloaded_and_failed_frames_leave_raster_untouched() {
    let store = FrameStore::new(3);
    store.resolve(0, Some(solid([1, 2, 3, 255])));
    store.resolve(2, None);
    let mut r = Renderer::new(store, canvas());
    r.render(0);
    let before = r.surface().unwrap().data().to_vec();

    assert!(!r.render(1));
    assert!(!r.render(2));
    assert!(!r.render(99));

    assert_eq!(r.surface().unwrap().data(), before.as_slice());
    assert_eq!(r.shown(), Some(0));
    assert_eq!(r.paint_count(), 1);
}

#[test]
fn render_is_idempotent() {
    let store = FrameStore::new(1);
    store.resolve(0, Some(solid([9, 8, 7, 255])));
    let mut r = Renderer::new(store, canvas());
    r.render(0);
    let once = r.surface().unwrap().clone();
    r.render(0);
    assert_eq!(r.surface().unwrap(), &once);
    assert_eq!(r.paint_count(), 1);
}

#[test]
fn switching_frames_replaces_content() {
    let store = FrameStore::new(2);
    store.resolve(0, Some(solid([255, 0, 0, 255])));
    store.resolve(1, Some(solid([0, 0, 255, 255])));
    let mut r = Renderer::new(store, canvas());
    r.render(0);
    r.render(1);
    assert_eq!(r.surface().unwrap().pixel(0, 0), Some([0, 0, 255, 255]));
    r.render(0);
    assert_eq!(r.surface().unwrap().pixel(0, 0), Some([255, 0, 0, 255]));
}

#[test]
fn missing_surface_makes_renderer_a_noop() {
    let store = FrameStore::new(1);
    store.resolve(0, Some(solid([1, 1, 1, 255])));
    let mut r = Renderer::new(
        store,
        Canvas {
            width: 0,
            height: 0,
        },
    );
    assert!(!r.is_enabled());
    assert!(!r.render(0));
    assert!(r.surface().is_none());
}
