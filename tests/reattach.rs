use serial_test::serial;
use window_keeper::hit_test::HitTester;
use window_keeper::native::headless::HeadlessWindow;
use window_keeper::native::{NativeWindow, Rgb8, TransparentMode};
use window_keeper::state::ZOrder;
use window_keeper::{Preferences, WindowController, WindowSelector};

#[test]
#[serial]
fn reattach_reads_state_from_window_not_cache() {
    let window = HeadlessWindow::new();
    let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
    controller.attach(WindowSelector::OwnWindow).expect("attach");
    controller.set_topmost(true);
    controller.set_alpha(0.4);
    controller.detach();

    window.with_state(|state| {
        state.topmost = false;
        state.bottommost = true;
        state.alpha = 0.7;
        state.transparent = true;
        state.click_through = true;
        state.maximized = true;
    });

    controller.attach(WindowSelector::OwnWindow).expect("reattach");
    assert!(!controller.is_topmost());
    assert!(controller.is_bottommost());
    assert_eq!(controller.alpha(), 0.7);
    assert!(controller.is_transparent());
    assert!(controller.is_click_through());
    assert!(controller.is_zoomed());
}

#[test]
#[serial]
fn poll_reacquires_recreated_window_and_replays_preferences() {
    let window = HeadlessWindow::new();
    let prefs = Preferences {
        transparent: true,
        transparent_mode: TransparentMode::ColorKey,
        key_color: Rgb8::rgb(0, 255, 0),
        alpha: 0.8,
        z_order: ZOrder::Bottommost,
        ..Preferences::default()
    };
    let mut controller = WindowController::with_preferences(
        window.clone(),
        WindowSelector::OwnWindow,
        prefs,
        HitTester::default(),
    );

    controller.poll();
    assert!(controller.is_active());
    assert_eq!(
        window.calls(),
        vec![
            "set_transparent_mode",
            "set_key_color",
            "set_alpha",
            "set_transparent",
            "set_borderless",
            "set_bottommost",
            "set_click_through",
        ]
    );

    window.close();
    controller.poll();
    assert!(!controller.is_active());
    assert_eq!(controller.handle(), None);
    controller.poll();
    assert!(!controller.is_active());

    let handle = window.reopen();
    assert!(!window.snapshot().transparent);
    controller.poll();
    assert_eq!(controller.handle(), Some(handle));

    let state = window.snapshot();
    assert!(state.transparent);
    assert!(state.borderless);
    assert!(state.bottommost);
    assert!(!state.topmost);
    assert_eq!(state.alpha, 0.8);
    assert_eq!(state.transparent_mode, TransparentMode::ColorKey);
    assert_eq!(state.key_color, Rgb8::rgb(0, 255, 0));
    assert_eq!(controller.preferences(), &prefs);
}

#[test]
#[serial]
fn attach_to_missing_window_reports_not_found() {
    let window = HeadlessWindow::new();
    let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
    let err = controller
        .attach(WindowSelector::Handle(0xdead))
        .expect_err("no such window");
    assert!(err.to_string().contains("Handle(57005)"));
    assert!(!controller.is_active());
    assert!(!window.is_active());
}
