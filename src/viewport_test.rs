#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn local_approx_eq(a: LocalPoint, b: LocalPoint) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Points ---

#[test]
fn local_point_sub_and_add() {
    let a = LocalPoint::new(10.0, 20.0);
    let b = LocalPoint::new(3.0, 5.0);
    assert_eq!(a - b, LocalPoint::new(7.0, 15.0));
    assert_eq!(a + b, LocalPoint::new(13.0, 25.0));
}

#[test]
fn local_point_distance_sq() {
    let a = LocalPoint::new(0.0, 0.0);
    let b = LocalPoint::new(3.0, 4.0);
    assert_eq!(a.distance_sq(b), 25.0);
}

// --- ScaleState conversions ---

#[test]
fn screen_to_local_identity() {
    let state = ScaleState::new(800.0, 600.0);
    let local = state.screen_to_local(ScreenPoint::new(50.0, 75.0));
    assert!(local_approx_eq(local, LocalPoint::new(50.0, 75.0)));
}

#[test]
fn screen_to_local_divides_by_scale() {
    let state = ScaleState { initial_width: 800.0, initial_height: 600.0, scale_x: 2.0, scale_y: 0.5 };
    let local = state.screen_to_local(ScreenPoint::new(100.0, 100.0));
    assert!(local_approx_eq(local, LocalPoint::new(50.0, 200.0)));
}

#[test]
fn local_to_screen_inverts_screen_to_local() {
    let state = ScaleState { initial_width: 800.0, initial_height: 600.0, scale_x: 1.25, scale_y: 0.8 };
    let screen = ScreenPoint::new(333.0, 121.0);
    let back = state.local_to_screen(state.screen_to_local(screen));
    assert!(approx_eq(back.x, screen.x));
    assert!(approx_eq(back.y, screen.y));
}

#[test]
fn screen_to_local_zero_scale_is_identity() {
    let state = ScaleState { initial_width: 800.0, initial_height: 600.0, scale_x: 0.0, scale_y: f64::NAN };
    let local = state.screen_to_local(ScreenPoint::new(40.0, 30.0));
    assert!(local_approx_eq(local, LocalPoint::new(40.0, 30.0)));
}

#[test]
fn screen_distance_to_local() {
    let state = ScaleState { initial_width: 800.0, initial_height: 600.0, scale_x: 2.0, scale_y: 4.0 };
    assert!(approx_eq(state.screen_dx_to_local(10.0), 5.0));
    assert!(approx_eq(state.screen_dy_to_local(10.0), 2.5));
}

// --- ScaleTracker lifecycle ---

#[test]
fn initialize_sets_identity_scale() {
    let mut tracker = ScaleTracker::new();
    let state = tracker.initialize(1000.0, 800.0).unwrap();
    assert_eq!(state.scale_x, 1.0);
    assert_eq!(state.scale_y, 1.0);
    assert_eq!(state.initial_width, 1000.0);
    assert_eq!(state.initial_height, 800.0);
    assert_eq!(tracker.current_size(), (1000.0, 800.0));
    assert!(tracker.is_initialized());
}

#[test]
fn initialize_twice_keeps_first_baseline() {
    let mut tracker = ScaleTracker::new();
    tracker.initialize(1000.0, 800.0).unwrap();
    let err = tracker.initialize(500.0, 400.0).unwrap_err();
    assert_eq!(err, ViewportError::AlreadyInitialized { width: 1000.0, height: 800.0 });
    let state = tracker.state().unwrap();
    assert_eq!(state.initial_width, 1000.0);
    assert_eq!(state.initial_height, 800.0);
}

#[test]
fn initialize_rejects_non_finite_size() {
    let mut tracker = ScaleTracker::new();
    assert!(matches!(tracker.initialize(f64::NAN, 10.0), Err(ViewportError::InvalidSize { .. })));
    assert!(matches!(tracker.initialize(10.0, -1.0), Err(ViewportError::InvalidSize { .. })));
    assert!(!tracker.is_initialized());
}

#[test]
fn resize_before_initialize_is_error() {
    let mut tracker = ScaleTracker::new();
    assert_eq!(tracker.on_resize(100.0, 100.0), Err(ViewportError::NotInitialized));
    assert!(tracker.state().is_none());
}

#[test]
fn resize_recomputes_scale_from_baseline() {
    let mut tracker = ScaleTracker::new();
    tracker.initialize(1000.0, 800.0).unwrap();
    let state = tracker.on_resize(500.0, 1600.0).unwrap();
    assert!(approx_eq(state.scale_x, 0.5));
    assert!(approx_eq(state.scale_y, 2.0));
    assert_eq!(tracker.current_size(), (500.0, 1600.0));
}

#[test]
fn resize_sequence_always_relative_to_initial() {
    let mut tracker = ScaleTracker::new();
    tracker.initialize(1000.0, 800.0).unwrap();
    for (w, h) in [(1200.0, 900.0), (300.0, 200.0), (1000.0, 800.0), (1999.0, 1.0)] {
        let state = tracker.on_resize(w, h).unwrap();
        assert!(approx_eq(state.scale_x, w / 1000.0));
        assert!(approx_eq(state.scale_y, h / 800.0));
        assert_eq!(state.initial_width, 1000.0);
        assert_eq!(state.initial_height, 800.0);
    }
}

#[test]
fn resize_with_zero_baseline_keeps_previous_scale() {
    let mut tracker = ScaleTracker::new();
    tracker.initialize(0.0, 800.0).unwrap();
    let state = tracker.on_resize(640.0, 480.0).unwrap();
    assert_eq!(state.scale_x, 1.0);
    assert_eq!(state.scale_y, 1.0);
    assert_eq!(tracker.current_size(), (640.0, 480.0));
}

#[test]
fn resize_to_zero_is_ignored() {
    let mut tracker = ScaleTracker::new();
    tracker.initialize(1000.0, 800.0).unwrap();
    tracker.on_resize(2000.0, 1600.0).unwrap();
    let state = tracker.on_resize(0.0, 0.0).unwrap();
    assert!(approx_eq(state.scale_x, 2.0));
    assert!(approx_eq(state.scale_y, 2.0));
    assert_eq!(tracker.current_size(), (2000.0, 1600.0));
}

#[test]
fn tracker_conversion_uses_current_scale() {
    let mut tracker = ScaleTracker::new();
    tracker.initialize(1000.0, 800.0).unwrap();
    tracker.on_resize(2000.0, 400.0).unwrap();
    let local = tracker.screen_to_local(ScreenPoint::new(200.0, 200.0));
    assert!(local_approx_eq(local, LocalPoint::new(100.0, 400.0)));
}

#[test]
fn tracker_conversion_before_initialize_is_identity() {
    let tracker = ScaleTracker::new();
    let local = tracker.screen_to_local(ScreenPoint::new(12.0, 34.0));
    assert_eq!(local, LocalPoint::new(12.0, 34.0));
}
