use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn host() -> ScrollHost {
    ScrollHost::new(Size::new(1000.0, 100.0))
}

#[test]
fn pinned_container_spans_viewport_multiples() {
    let h = host();
    let r = h.add_pinned_container("hero", 0.0, 8.0);
    assert_eq!(r.height(), 800.0);
    assert_eq!(h.container("hero"), Some(r));
    assert_eq!(h.remove_container("hero"), Some(r));
    assert_eq!(h.container("hero"), None);
}

#[test]
fn progress_runs_from_top_top_to_bottom_bottom() {
    let c = Rect::new(0.0, 50.0, 1000.0, 850.0);
    let vp = Size::new(1000.0, 100.0);
    assert_eq!(scroll_progress(c, vp, 0.0), Some(0.0));
    assert_eq!(scroll_progress(c, vp, 50.0), Some(0.0));
    assert_eq!(scroll_progress(c, vp, 400.0), Some(0.5));
    assert_eq!(scroll_progress(c, vp, 750.0), Some(1.0));
    assert_eq!(scroll_progress(c, vp, 5000.0), Some(1.0));
}

#[test]
fn container_no_taller_than_viewport_has_no_progress() {
    let vp = Size::new(1000.0, 100.0);
    assert_eq!(
        scroll_progress(Rect::new(0.0, 0.0, 1000.0, 100.0), vp, 10.0),
        None
    );
    assert!(matches!(
        ScrollRange::new(Rect::new(0.0, 0.0, 10.0, 40.0), vp),
        Err(PlayerError::BindingSetup(_))
    ));
}

#[test]
fn scroll_and_tick_reach_listeners() {
    let h = host();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s1 = Rc::clone(&seen);
    let s2 = Rc::clone(&seen);
    let _a = h.on_scroll(move |y| s1.borrow_mut().push(("scroll", *y)));
    let _b = h.on_tick(move |dt| s2.borrow_mut().push(("tick", *dt)));

    h.scroll_to(12.0);
    h.tick(0.016);
    h.tick(-1.0);
    h.scroll_to(f64::NAN);

    assert_eq!(
        *seen.borrow(),
        vec![("scroll", 12.0), ("tick", 0.016), ("scroll", 0.0)]
    );
    assert_eq!(h.scroll_y(), 0.0);
    assert_eq!(h.listener_counts(), (1, 1));
}
