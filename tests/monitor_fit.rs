use serial_test::serial;
use window_keeper::native::headless::HeadlessWindow;
use window_keeper::native::MonitorRect;
use window_keeper::{WindowController, WindowEvent, WindowSelector};

fn two_monitor_window() -> HeadlessWindow {
    let window = HeadlessWindow::new();
    window.set_monitors(vec![
        MonitorRect::new(0, 0, 1920, 1080),
        MonitorRect::new(1920, 0, 2560, 1440),
    ]);
    window
}

#[test]
#[serial]
fn fit_centers_before_maximizing() {
    let window = HeadlessWindow::new();
    let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
    controller.attach(WindowSelector::OwnWindow).expect("attach");

    assert!(controller.fit_to_monitor(true, 0));
    assert!(controller.is_zoomed());
    // Restoring reveals where the window was centered before maximizing.
    assert!(controller.set_zoomed(false));
    assert_eq!(controller.position().expect("position"), (560, 240));
    assert_eq!(controller.size().expect("size"), (800, 600));
}

#[test]
#[serial]
fn out_of_range_index_is_clamped_to_last_monitor() {
    let window = two_monitor_window();
    let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
    controller.attach(WindowSelector::OwnWindow).expect("attach");

    assert!(controller.fit_to_monitor(true, 7));
    assert_eq!(controller.current_monitor(), Some(1));
    assert_eq!(window.snapshot().size, (2560, 1440));
    assert_eq!(controller.fit_target().monitor_index, 7);
}

#[test]
#[serial]
fn no_monitors_skips_fitting() {
    let window = HeadlessWindow::new();
    window.set_monitors(Vec::new());
    let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
    controller.attach(WindowSelector::OwnWindow).expect("attach");

    assert!(!controller.fit_to_monitor(true, 0));
    assert!(!window.calls().contains(&"set_maximized"));
}

#[test]
#[serial]
fn monitor_change_refits_and_notifies() {
    let window = two_monitor_window();
    let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
    controller.attach(WindowSelector::OwnWindow).expect("attach");
    let events = controller.subscribe();
    assert!(controller.fit_to_monitor(true, 1));

    window.set_monitors(vec![
        MonitorRect::new(0, 0, 1920, 1080),
        MonitorRect::new(-1280, 0, 1280, 1024),
    ]);
    // The OS restores windows whose monitor went away.
    window.with_state(|state| state.maximized = false);
    assert!(window.emit_monitor_changed());
    controller.poll();

    let state = window.snapshot();
    assert!(state.maximized);
    assert_eq!(state.position, (-1280, 0));
    assert_eq!(state.size, (1280, 1024));
    assert!(events
        .try_iter()
        .any(|event| event == WindowEvent::MonitorChanged { monitor_count: 2 }));
}

#[test]
#[serial]
fn style_change_while_fitting_rezooms_on_next_poll() {
    let window = HeadlessWindow::new();
    let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
    controller.attach(WindowSelector::OwnWindow).expect("attach");
    assert!(controller.fit_to_monitor(true, 0));

    window.with_state(|state| state.maximized = false);
    window.emit_style_changed(window_keeper::state::WindowStateEvent::STYLE_CHANGED);

    controller.poll();
    assert!(!window.snapshot().maximized);
    assert!(!controller.is_zoomed());

    controller.poll();
    assert!(window.snapshot().maximized);
    assert!(controller.is_zoomed());
}

#[test]
#[serial]
fn fit_requested_while_detached_applies_on_reacquire() {
    let window = two_monitor_window();
    let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
    assert!(!controller.fit_to_monitor(true, 1));
    assert!(window.calls().is_empty());

    controller.poll();
    assert!(controller.is_active());
    assert!(controller.is_zoomed());
    assert_eq!(controller.current_monitor(), Some(1));
}
