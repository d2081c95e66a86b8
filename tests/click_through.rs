use std::cell::Cell;

use serial_test::serial;
use window_keeper::error::Result;
use window_keeper::hit_test::{HitTestType, PixelSampler, Rgba};
use window_keeper::native::headless::HeadlessWindow;
use window_keeper::native::TransparentMode;
use window_keeper::{WindowController, WindowSelector};

struct Frame {
    alpha: Cell<f32>,
}

impl PixelSampler for Frame {
    fn surface_size(&self) -> (i32, i32) {
        (800, 600)
    }

    fn sample(&self, _x: i32, _y: i32) -> Result<Rgba> {
        Ok(Rgba::new(0.0, 0.0, 0.0, self.alpha.get()))
    }
}

fn transparent_window() -> (HeadlessWindow, WindowController<HeadlessWindow>) {
    let window = HeadlessWindow::new();
    let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
    controller.attach(WindowSelector::OwnWindow).expect("attach");
    assert!(controller.set_transparent(true));
    (window, controller)
}

fn frame(controller: &mut WindowController<HeadlessWindow>, surface: &Frame, alpha: f32) {
    surface.alpha.set(alpha);
    controller.hit_test((400, 300), Some(surface), None);
    controller.poll();
}

#[test]
#[serial]
fn click_through_follows_hysteresis() {
    let (window, mut controller) = transparent_window();
    let surface = Frame {
        alpha: Cell::new(1.0),
    };
    assert!(!controller.is_click_through());

    frame(&mut controller, &surface, 0.0);
    assert!(controller.is_click_through());
    assert!(window.snapshot().click_through);

    frame(&mut controller, &surface, 0.0);
    assert!(controller.is_click_through());

    frame(&mut controller, &surface, 1.0);
    assert!(!controller.is_click_through());
    assert!(!window.snapshot().click_through);
}

#[test]
#[serial]
fn disabled_hit_test_leaves_click_through_alone() {
    let (_window, mut controller) = transparent_window();
    let surface = Frame {
        alpha: Cell::new(0.0),
    };
    controller.set_hit_test_enabled(false);
    frame(&mut controller, &surface, 0.0);
    assert!(!controller.is_click_through());

    controller.set_hit_test_enabled(true);
    controller.set_hit_test_type(HitTestType::None);
    frame(&mut controller, &surface, 0.0);
    assert!(!controller.is_click_through());
}

#[test]
#[serial]
fn color_key_mode_never_enables_click_through() {
    let (_window, mut controller) = transparent_window();
    assert!(controller.set_transparent_mode(TransparentMode::ColorKey));
    let surface = Frame {
        alpha: Cell::new(0.0),
    };
    frame(&mut controller, &surface, 0.0);
    assert!(!controller.is_click_through());
}

#[test]
#[serial]
fn pointer_outside_surface_passes_clicks() {
    let (_window, mut controller) = transparent_window();
    let surface = Frame {
        alpha: Cell::new(1.0),
    };
    assert!(!controller.hit_test((900, 10), Some(&surface), None));
    controller.poll();
    assert!(controller.is_click_through());
    assert_eq!(controller.picked_color(), None);
}
