//! Window state controller.
//!
//! Owns the attached window and its canonical [`WindowState`], drives the
//! attach/detach/re-acquire cycle from [`WindowController::poll`] and forwards
//! every mutation to the [`NativeWindow`] backend. Native failures are logged
//! and leave the state untouched.

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, trace, warn};

use crate::error::Result;
use crate::events::{self, bridge, WindowEvent};
use crate::hit_test::{HitFrame, HitTestType, HitTester, PixelSampler, Rgba, SceneRaycaster};
use crate::monitor_fit::{self, FitAction, FitTarget};
use crate::native::{MonitorRect, NativeWindow, Rgb8, TransparentMode, WindowHandle, WindowSelector};
use crate::settings::ControllerSettings;
use crate::state::{ClickPolicy, WindowState, ZOrder};

/// What the host asked for. Survives detach and is replayed onto the window
/// each time `poll` re-acquires it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preferences {
    pub transparent: bool,
    pub transparent_mode: TransparentMode,
    pub key_color: Rgb8,
    pub alpha: f32,
    pub z_order: ZOrder,
    pub click_through: bool,
    pub fit: FitTarget,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            transparent: false,
            transparent_mode: TransparentMode::Alpha,
            key_color: Rgb8::default(),
            alpha: 1.0,
            z_order: ZOrder::Normal,
            click_through: false,
            fit: FitTarget::default(),
        }
    }
}

pub struct WindowController<N: NativeWindow> {
    native: N,
    selector: WindowSelector,
    handle: Option<WindowHandle>,
    state: WindowState,
    prefs: Preferences,
    force_zoom_pending: bool,
    hit_tester: HitTester,
    hit_test_enabled: bool,
    subscribers: Vec<Sender<WindowEvent>>,
}

impl<N: NativeWindow> WindowController<N> {
    pub fn new(native: N, selector: WindowSelector) -> Self {
        Self::with_preferences(native, selector, Preferences::default(), HitTester::default())
    }

    pub fn with_preferences(
        native: N,
        selector: WindowSelector,
        prefs: Preferences,
        hit_tester: HitTester,
    ) -> Self {
        Self {
            native,
            selector,
            handle: None,
            state: WindowState::default(),
            prefs,
            force_zoom_pending: false,
            hit_tester,
            hit_test_enabled: true,
            subscribers: Vec::new(),
        }
    }

    pub fn from_settings(native: N, settings: &ControllerSettings) -> Self {
        let mut controller = Self::with_preferences(
            native,
            settings.selector,
            settings.preferences(),
            settings.hit_tester(),
        );
        controller.hit_test_enabled = settings.hit_test_enabled;
        controller
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut N {
        &mut self.native
    }

    pub fn selector(&self) -> WindowSelector {
        self.selector
    }

    pub fn handle(&self) -> Option<WindowHandle> {
        self.handle
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Attach to the window `selector` resolves to.
    ///
    /// A no-op returning the current handle while attached. A handle whose
    /// window vanished is released first.
    ///
    /// State is read back from the window; stored preferences are not pushed.
    /// Call [`Self::apply_preferences`] afterwards, or let [`Self::poll`]
    /// attach, which replays them.
    pub fn attach(&mut self, selector: WindowSelector) -> Result<WindowHandle> {
        if let Some(handle) = self.handle {
            if self.native.is_active() {
                return Ok(handle);
            }
            debug!(handle, "attached window is gone; releasing it");
            self.detach();
        }

        self.selector = selector;
        let handle = self.native.attach(selector)?;
        self.handle = Some(handle);

        bridge().init();
        self.native.register_drop_callback(events::on_files_dropped);
        self.native
            .register_monitor_changed_callback(events::on_monitor_changed);
        self.native
            .register_style_changed_callback(events::on_style_changed);

        self.state = WindowState::read_back(&self.native);
        self.force_zoom_pending = false;
        info!(handle, ?selector, "attached to window");
        Ok(handle)
    }

    /// Release the window and reset the state. Idempotent.
    pub fn detach(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.native.unregister_drop_callback();
        self.native.unregister_monitor_changed_callback();
        self.native.unregister_style_changed_callback();
        self.native.detach();
        bridge().teardown();

        self.state = WindowState::default();
        self.force_zoom_pending = false;
        info!(handle, "detached from window");
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some() && self.native.is_active()
    }

    /// Advance one frame: re-acquire or tick the window, publish pending
    /// native events, then reconcile click-through with the last hit test.
    pub fn poll(&mut self) {
        if self.is_active() {
            self.native.per_frame_tick();
            if std::mem::take(&mut self.force_zoom_pending)
                && self.prefs.fit.enabled
                && !self.native.is_maximized()
            {
                debug!("re-maximizing fitted window after style change");
                self.set_zoomed(true);
            }
            self.state.zoomed = self.native.is_maximized();
        } else {
            self.reacquire();
        }

        self.dispatch_events();
        self.update_click_through();
    }

    fn reacquire(&mut self) {
        match self.attach(self.selector) {
            Ok(handle) => {
                debug!(handle, "re-acquired window; replaying preferences");
                self.apply_preferences();
                if self.prefs.fit.enabled {
                    self.refit();
                }
            }
            Err(err) => trace!(%err, "window not available"),
        }
    }

    /// Push every stored preference onto the attached window.
    pub fn apply_preferences(&mut self) {
        let prefs = self.prefs;
        self.set_transparent_mode(prefs.transparent_mode);
        self.set_key_color(prefs.key_color);
        self.set_alpha(prefs.alpha);
        self.set_transparent(prefs.transparent);
        match prefs.z_order {
            ZOrder::Bottommost => self.set_bottommost(true),
            ZOrder::Topmost => self.set_topmost(true),
            ZOrder::Normal => self.set_topmost(false),
        };
        self.set_click_through(prefs.click_through);
    }

    fn dispatch_events(&mut self) {
        let bridge = bridge();

        if let Some(monitor_count) = bridge.take_monitor_changed() {
            debug!(monitor_count, "monitor configuration changed");
            if self.is_active() && self.prefs.fit.on_monitor_changed() == FitAction::Fit {
                self.refit();
            }
            self.publish(WindowEvent::MonitorChanged { monitor_count });
        }

        if let Some(event) = bridge.take_style_changed() {
            debug!(?event, "window style changed");
            if self.prefs.fit.enabled {
                self.force_zoom_pending = true;
            }
            self.publish(WindowEvent::StyleChanged(event));
        }

        if let Some(paths) = bridge.take_dropped_files() {
            debug!(count = paths.len(), "files dropped");
            self.publish(WindowEvent::FilesDropped(paths));
        }
    }

    /// Receive monitor, style and drop notifications from future polls.
    pub fn subscribe(&mut self) -> Receiver<WindowEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, event: WindowEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn forward(&mut self, call: &'static str, f: impl FnOnce(&mut N) -> Result<()>) -> bool {
        if !self.is_active() {
            trace!(call, "no window attached; preference recorded");
            return false;
        }
        match f(&mut self.native) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, call, "native window call failed");
                false
            }
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.state.transparent
    }

    pub fn is_borderless(&self) -> bool {
        self.state.borderless()
    }

    /// Transparency always comes with a borderless frame.
    pub fn set_transparent(&mut self, enabled: bool) -> bool {
        self.prefs.transparent = enabled;
        let applied = self.forward("set_transparent", |native| {
            native.set_transparent(enabled)?;
            native.set_borderless(enabled)
        });
        if applied {
            self.state.transparent = enabled;
            self.update_click_through();
        } else if self.is_active() {
            // The first call may have landed before the second failed.
            self.state.transparent = self.native.is_transparent();
        }
        applied
    }

    pub fn transparent_mode(&self) -> TransparentMode {
        self.state.transparent_mode
    }

    pub fn set_transparent_mode(&mut self, mode: TransparentMode) -> bool {
        self.prefs.transparent_mode = mode;
        let applied = self.forward("set_transparent_mode", |native| {
            native.set_transparent_mode(mode)
        });
        if applied {
            self.state.transparent_mode = mode;
        }
        applied
    }

    pub fn key_color(&self) -> Rgb8 {
        self.state.key_color
    }

    pub fn set_key_color(&mut self, color: Rgb8) -> bool {
        self.prefs.key_color = color;
        let applied = self.forward("set_key_color", |native| native.set_key_color(color));
        if applied {
            self.state.key_color = color;
        }
        applied
    }

    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    /// Values outside `[0, 1]` are left to the backend to clamp or reject.
    pub fn set_alpha(&mut self, alpha: f32) -> bool {
        self.prefs.alpha = alpha;
        let applied = self.forward("set_alpha", |native| native.set_alpha(alpha));
        if applied {
            self.state.alpha = self.native.alpha();
        }
        applied
    }

    pub fn is_click_through(&self) -> bool {
        self.state.click_through()
    }

    pub fn set_click_through(&mut self, enabled: bool) -> bool {
        self.prefs.click_through = enabled;
        self.apply_click_through(ClickPolicy::from_flag(enabled))
    }

    fn apply_click_through(&mut self, policy: ClickPolicy) -> bool {
        let applied = self.forward("set_click_through", |native| {
            native.set_click_through(policy.is_through())
        });
        if applied {
            self.state.click = policy;
        }
        applied
    }

    pub fn is_topmost(&self) -> bool {
        self.state.topmost()
    }

    pub fn is_bottommost(&self) -> bool {
        self.state.bottommost()
    }

    pub fn set_topmost(&mut self, enabled: bool) -> bool {
        self.prefs.z_order = self.prefs.z_order.set_topmost(enabled);
        let next = self.state.z_order.set_topmost(enabled);
        let unpin_bottom = enabled && self.state.z_order.is_bottommost();
        let applied = self.forward("set_topmost", |native| {
            if unpin_bottom {
                native.set_bottommost(false)?;
            }
            native.set_topmost(enabled)
        });
        if applied {
            self.state.z_order = next;
        } else {
            self.resync_z_order();
        }
        applied
    }

    pub fn set_bottommost(&mut self, enabled: bool) -> bool {
        self.prefs.z_order = self.prefs.z_order.set_bottommost(enabled);
        let next = self.state.z_order.set_bottommost(enabled);
        let unpin_top = enabled && self.state.z_order.is_topmost();
        let applied = self.forward("set_bottommost", |native| {
            if unpin_top {
                native.set_topmost(false)?;
            }
            native.set_bottommost(enabled)
        });
        if applied {
            self.state.z_order = next;
        } else {
            self.resync_z_order();
        }
        applied
    }

    /// Take the z-order from the window after a partially applied change.
    fn resync_z_order(&mut self) {
        if self.is_active() {
            self.state.z_order =
                ZOrder::from_flags(self.native.is_topmost(), self.native.is_bottommost());
        }
    }

    pub fn is_zoomed(&self) -> bool {
        self.state.zoomed
    }

    pub fn set_zoomed(&mut self, enabled: bool) -> bool {
        let applied = self.forward("set_maximized", |native| native.set_maximized(enabled));
        if applied {
            self.state.zoomed = enabled;
        }
        applied
    }

    pub fn position(&self) -> Result<(i32, i32)> {
        self.native.position()
    }

    pub fn set_position(&mut self, x: i32, y: i32) -> bool {
        self.forward("set_position", |native| native.set_position(x, y))
    }

    pub fn size(&self) -> Result<(i32, i32)> {
        self.native.size()
    }

    pub fn set_size(&mut self, width: i32, height: i32) -> bool {
        self.forward("set_size", |native| native.set_size(width, height))
    }

    pub fn client_size(&self) -> Result<(i32, i32)> {
        self.native.client_size()
    }

    pub fn cursor_position(&self) -> Option<(i32, i32)> {
        self.native.cursor_position()
    }

    pub fn set_cursor_position(&mut self, x: i32, y: i32) -> bool {
        match self.native.set_cursor_position(x, y) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, x, y, "could not move cursor");
                false
            }
        }
    }

    pub fn monitor_count(&self) -> usize {
        self.native.monitor_count()
    }

    pub fn monitor_rect(&self, index: usize) -> Option<MonitorRect> {
        self.native.monitor_rect(index)
    }

    pub fn current_monitor(&self) -> Option<usize> {
        self.native.current_monitor()
    }

    pub fn fit_target(&self) -> FitTarget {
        self.prefs.fit
    }

    pub fn is_fitting(&self) -> bool {
        self.prefs.fit.enabled
    }

    /// Change the fit target. While detached the target is only recorded and
    /// `false` is returned; it takes effect on re-acquire.
    pub fn fit_to_monitor(&mut self, enabled: bool, monitor_index: i32) -> bool {
        let action = self.prefs.fit.request(enabled, monitor_index);
        if !self.is_active() {
            return false;
        }
        match action {
            FitAction::None => true,
            FitAction::Fit => self.refit(),
            FitAction::Release => self.set_zoomed(false),
        }
    }

    fn refit(&mut self) -> bool {
        let count = self.native.monitor_count();
        let Some(index) = self.prefs.fit.resolve(count) else {
            debug!("no monitors reported; skipping fit");
            return false;
        };
        match monitor_fit::fit_to_monitor(&mut self.native, index) {
            Ok(()) => {
                self.state.zoomed = self.native.is_maximized();
                true
            }
            Err(err) => {
                warn!(%err, index, "could not fit window to monitor");
                false
            }
        }
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    pub fn hit_tester_mut(&mut self) -> &mut HitTester {
        &mut self.hit_tester
    }

    pub fn set_hit_test_type(&mut self, kind: HitTestType) {
        self.hit_tester.kind = kind;
    }

    pub fn is_hit_test_enabled(&self) -> bool {
        self.hit_test_enabled
    }

    /// Turn the automatic click-through reconciliation on or off.
    pub fn set_hit_test_enabled(&mut self, enabled: bool) {
        self.hit_test_enabled = enabled;
    }

    pub fn picked_color(&self) -> Option<Rgba> {
        self.hit_tester.picked_color()
    }

    /// Run the end-of-frame pointer test. The next `poll` reconciles
    /// click-through against the result.
    pub fn hit_test(
        &mut self,
        pointer: (i32, i32),
        sampler: Option<&dyn PixelSampler>,
        raycaster: Option<&dyn SceneRaycaster>,
    ) -> bool {
        let frame = HitFrame {
            pointer,
            transparent: self.state.transparent,
            mode: self.state.transparent_mode,
            sampler,
            raycaster,
        };
        self.hit_tester.test(&frame)
    }

    fn update_click_through(&mut self) {
        if !self.hit_test_enabled || self.hit_tester.kind == HitTestType::None {
            return;
        }
        if !self.is_active() {
            return;
        }
        let next = self
            .state
            .click
            .reconcile(self.hit_tester.on_object(), self.state.transparent);
        if next != self.state.click && self.apply_click_through(next) {
            debug!(through = next.is_through(), "click-through reconciled");
        }
    }

    /// Log the monitor layout as the backend reports it.
    pub fn log_monitors(&self) {
        let count = self.native.monitor_count();
        let current = self.native.current_monitor();
        info!(count, ?current, "monitor layout");
        for index in 0..count {
            if let Some(rect) = self.native.monitor_rect(index) {
                info!(
                    index,
                    x = rect.x,
                    y = rect.y,
                    width = rect.width,
                    height = rect.height,
                    "monitor"
                );
            }
        }
    }
}

impl<N: NativeWindow> Drop for WindowController<N> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::headless::HeadlessWindow;
    use serial_test::serial;

    fn attached() -> (HeadlessWindow, WindowController<HeadlessWindow>) {
        let window = HeadlessWindow::new();
        let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
        controller
            .attach(WindowSelector::OwnWindow)
            .expect("attach headless window");
        (window, controller)
    }

    #[test]
    #[serial]
    fn attach_twice_returns_same_handle() {
        let (window, mut controller) = attached();
        let first = controller.handle();
        assert_eq!(controller.attach(WindowSelector::OwnWindow).ok(), first);
        assert!(window.calls().is_empty());
    }

    #[test]
    #[serial]
    fn detach_is_idempotent_and_resets_state() {
        let (window, mut controller) = attached();
        controller.set_topmost(true);
        controller.detach();
        controller.detach();
        assert!(!controller.is_active());
        assert_eq!(controller.state(), &WindowState::default());
        assert!(!window.emit_files_dropped("a.txt"));
    }

    #[test]
    #[serial]
    fn failed_setter_keeps_state() {
        let (window, mut controller) = attached();
        window.fail("set_click_through");
        assert!(!controller.set_click_through(true));
        assert!(!controller.is_click_through());
        assert!(!window.snapshot().click_through);
    }

    #[test]
    #[serial]
    fn transparency_makes_window_borderless() {
        let (window, mut controller) = attached();
        assert!(controller.set_transparent(true));
        assert!(controller.is_borderless());
        assert!(window.snapshot().borderless);
    }

    #[test]
    #[serial]
    fn half_applied_transparency_reports_window_state() {
        let (window, mut controller) = attached();
        window.fail("set_borderless");
        assert!(!controller.set_transparent(true));
        assert!(window.snapshot().transparent);
        assert_eq!(controller.is_transparent(), window.snapshot().transparent);
    }

    #[test]
    #[serial]
    fn setters_while_detached_only_record_preferences() {
        let window = HeadlessWindow::new();
        let mut controller = WindowController::new(window.clone(), WindowSelector::OwnWindow);
        assert!(!controller.set_alpha(0.5));
        assert!(!controller.fit_to_monitor(true, 0));
        assert_eq!(controller.preferences().alpha, 0.5);
        assert!(controller.fit_target().enabled);
        assert!(window.calls().is_empty());
    }

    #[test]
    #[serial]
    fn disabling_fit_unmaximizes_without_restoring_rect() {
        let (window, mut controller) = attached();
        assert!(controller.fit_to_monitor(true, 0));
        assert!(controller.is_zoomed());
        assert!(controller.fit_to_monitor(false, 0));
        assert!(!controller.is_zoomed());
        // Restored from the fit's own maximize, i.e. the centered rect.
        assert_eq!(window.snapshot().position, (560, 240));
    }
}
