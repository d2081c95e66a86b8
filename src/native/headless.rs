//! In-memory window backend.
//!
//! Behaves like a single top-level window on a configurable set of monitors.
//! Clones share state, so a test can keep one handle to inspect and drive the
//! window (close it, deliver callbacks, inject failures) while the controller
//! owns another.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{Result, WindowError};
use crate::monitor_fit::select_monitor_for_point;
use crate::native::{
    DropCallback, IntCallback, MonitorRect, NativeWindow, Rgb8, TransparentMode, WindowHandle,
    WindowSelector,
};
use crate::state::WindowStateEvent;

const FIRST_HANDLE: WindowHandle = 0x1001;
/// `ERROR_INVALID_WINDOW_HANDLE`, reported for injected failures.
const INJECTED_FAILURE_CODE: u32 = 1400;
const FRAME_INSETS: (i32, i32) = (16, 39);

#[derive(Debug, Clone)]
pub struct HeadlessState {
    pub handle: WindowHandle,
    pub owner: Option<WindowHandle>,
    pub exists: bool,
    pub focused: bool,
    pub attached: Option<WindowHandle>,

    pub transparent: bool,
    pub borderless: bool,
    pub topmost: bool,
    pub bottommost: bool,
    pub click_through: bool,
    pub maximized: bool,
    pub alpha: f32,
    pub transparent_mode: TransparentMode,
    pub key_color: Rgb8,
    pub position: (i32, i32),
    pub size: (i32, i32),
    restore_rect: Option<((i32, i32), (i32, i32))>,

    pub monitors: Vec<MonitorRect>,
    pub cursor: (i32, i32),

    /// Mutating calls in the order they were made, failed ones included.
    pub calls: Vec<&'static str>,
    pub ticks: u32,
    failing: HashSet<&'static str>,

    drop_callback: Option<DropCallback>,
    monitor_callback: Option<IntCallback>,
    style_callback: Option<IntCallback>,
}

impl HeadlessState {
    fn fresh_window(handle: WindowHandle, monitors: Vec<MonitorRect>) -> Self {
        Self {
            handle,
            owner: None,
            exists: true,
            focused: true,
            attached: None,
            transparent: false,
            borderless: false,
            topmost: false,
            bottommost: false,
            click_through: false,
            maximized: false,
            alpha: 1.0,
            transparent_mode: TransparentMode::Alpha,
            key_color: Rgb8::default(),
            position: (100, 100),
            size: (800, 600),
            restore_rect: None,
            monitors,
            cursor: (0, 0),
            calls: Vec::new(),
            ticks: 0,
            failing: HashSet::new(),
            drop_callback: None,
            monitor_callback: None,
            style_callback: None,
        }
    }

    fn is_active(&self) -> bool {
        self.exists && self.attached.is_some()
    }

    fn current_monitor(&self) -> Option<usize> {
        let center = (
            self.position.0 + self.size.0 / 2,
            self.position.1 + self.size.1 / 2,
        );
        select_monitor_for_point(&self.monitors, center)
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    state: Arc<Mutex<HeadlessState>>,
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessWindow {
    /// An 800x600 window at (100, 100) on one 1920x1080 monitor.
    pub fn new() -> Self {
        let monitors = vec![MonitorRect::new(0, 0, 1920, 1080)];
        Self {
            state: Arc::new(Mutex::new(HeadlessState::fresh_window(
                FIRST_HANDLE,
                monitors,
            ))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the whole window state.
    pub fn snapshot(&self) -> HeadlessState {
        self.lock().clone()
    }

    /// Direct access for arranging test scenarios.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut HeadlessState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Make every later call named `call` fail with a native error.
    pub fn fail(&self, call: &'static str) {
        self.lock().failing.insert(call);
    }

    pub fn recover(&self, call: &'static str) {
        self.lock().failing.remove(call);
    }

    pub fn set_monitors(&self, monitors: Vec<MonitorRect>) {
        self.lock().monitors = monitors;
    }

    /// Destroy the window out-of-band, as if the user closed it.
    pub fn close(&self) {
        let mut state = self.lock();
        state.exists = false;
        debug!(handle = state.handle, "headless window closed");
    }

    /// Create a replacement window with a new handle and default attributes.
    /// Callbacks and the monitor layout carry over.
    pub fn reopen(&self) -> WindowHandle {
        let mut state = self.lock();
        let mut next = HeadlessState::fresh_window(state.handle + 1, state.monitors.clone());
        next.owner = state.owner;
        next.drop_callback = state.drop_callback;
        next.monitor_callback = state.monitor_callback;
        next.style_callback = state.style_callback;
        next.calls = std::mem::take(&mut state.calls);
        next.failing = std::mem::take(&mut state.failing);
        *state = next;
        state.handle
    }

    /// Deliver a raw drop payload through the registered callback.
    pub fn emit_files_dropped(&self, payload: &str) -> bool {
        let callback = self.lock().drop_callback;
        match callback {
            Some(callback) => {
                callback(payload);
                true
            }
            None => false,
        }
    }

    pub fn emit_monitor_changed(&self) -> bool {
        let (callback, count) = {
            let state = self.lock();
            (state.monitor_callback, state.monitors.len())
        };
        match callback {
            Some(callback) => {
                callback(count.min(i32::MAX as usize) as i32);
                true
            }
            None => false,
        }
    }

    pub fn emit_style_changed(&self, event: WindowStateEvent) -> bool {
        let callback = self.lock().style_callback;
        match callback {
            Some(callback) => {
                callback(event.bits() as i32);
                true
            }
            None => false,
        }
    }

    fn apply(&self, call: &'static str, f: impl FnOnce(&mut HeadlessState)) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(call);
        if !state.is_active() {
            return Err(WindowError::Detached);
        }
        if state.failing.contains(call) {
            return Err(WindowError::native(call, INJECTED_FAILURE_CODE));
        }
        f(&mut state);
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&HeadlessState) -> T) -> Result<T> {
        let state = self.lock();
        if !state.is_active() {
            return Err(WindowError::Detached);
        }
        Ok(f(&state))
    }

    fn set_pinned(&mut self, call: &'static str, topmost: bool, enabled: bool) -> Result<()> {
        let mut changed = false;
        self.apply(call, |state| {
            let flag = if topmost {
                &mut state.topmost
            } else {
                &mut state.bottommost
            };
            changed = *flag != enabled;
            *flag = enabled;
        })?;
        if changed {
            let event = match (topmost, enabled) {
                (true, true) => WindowStateEvent::TOPMOST_ENABLED,
                (true, false) => WindowStateEvent::TOPMOST_DISABLED,
                (false, true) => WindowStateEvent::BOTTOMMOST_ENABLED,
                (false, false) => WindowStateEvent::BOTTOMMOST_DISABLED,
            };
            self.emit_style_changed(event);
        }
        Ok(())
    }
}

impl NativeWindow for HeadlessWindow {
    fn attach(&mut self, selector: WindowSelector) -> Result<WindowHandle> {
        let mut state = self.lock();
        let found = if !state.exists {
            None
        } else {
            match selector {
                WindowSelector::OwnWindow => Some(state.handle),
                WindowSelector::OwnerWindow => state.owner,
                WindowSelector::ActiveWindow => state.focused.then_some(state.handle),
                WindowSelector::Handle(handle) => (handle == state.handle).then_some(handle),
            }
        };
        match found {
            Some(handle) => {
                state.attached = Some(handle);
                Ok(handle)
            }
            None => Err(WindowError::NotFound { selector }),
        }
    }

    fn detach(&mut self) {
        self.lock().attached = None;
    }

    fn is_active(&self) -> bool {
        self.lock().is_active()
    }

    fn per_frame_tick(&mut self) {
        let mut state = self.lock();
        if state.is_active() {
            state.ticks += 1;
        }
    }

    fn is_transparent(&self) -> bool {
        self.lock().transparent
    }

    fn is_borderless(&self) -> bool {
        self.lock().borderless
    }

    fn is_topmost(&self) -> bool {
        self.lock().topmost
    }

    fn is_bottommost(&self) -> bool {
        self.lock().bottommost
    }

    fn is_click_through(&self) -> bool {
        self.lock().click_through
    }

    fn is_maximized(&self) -> bool {
        self.lock().maximized
    }

    fn alpha(&self) -> f32 {
        self.lock().alpha
    }

    fn set_transparent(&mut self, enabled: bool) -> Result<()> {
        self.apply("set_transparent", |state| state.transparent = enabled)
    }

    fn set_borderless(&mut self, enabled: bool) -> Result<()> {
        self.apply("set_borderless", |state| state.borderless = enabled)
    }

    fn set_alpha(&mut self, alpha: f32) -> Result<()> {
        self.apply("set_alpha", |state| state.alpha = alpha.clamp(0.0, 1.0))
    }

    fn set_click_through(&mut self, enabled: bool) -> Result<()> {
        self.apply("set_click_through", |state| state.click_through = enabled)
    }

    fn set_topmost(&mut self, enabled: bool) -> Result<()> {
        self.set_pinned("set_topmost", true, enabled)
    }

    fn set_bottommost(&mut self, enabled: bool) -> Result<()> {
        self.set_pinned("set_bottommost", false, enabled)
    }

    fn set_maximized(&mut self, enabled: bool) -> Result<()> {
        self.apply("set_maximized", |state| {
            if enabled && !state.maximized {
                let index = state.current_monitor().unwrap_or(0);
                if let Some(rect) = state.monitors.get(index).copied() {
                    state.restore_rect = Some((state.position, state.size));
                    state.position = (rect.x, rect.y);
                    state.size = (rect.width, rect.height);
                    state.maximized = true;
                }
            } else if !enabled && state.maximized {
                if let Some((position, size)) = state.restore_rect.take() {
                    state.position = position;
                    state.size = size;
                }
                state.maximized = false;
            }
        })
    }

    fn position(&self) -> Result<(i32, i32)> {
        self.read(|state| state.position)
    }

    fn set_position(&mut self, x: i32, y: i32) -> Result<()> {
        self.apply("set_position", |state| state.position = (x, y))
    }

    fn size(&self) -> Result<(i32, i32)> {
        self.read(|state| state.size)
    }

    fn set_size(&mut self, width: i32, height: i32) -> Result<()> {
        self.apply("set_size", |state| state.size = (width.max(0), height.max(0)))
    }

    fn client_size(&self) -> Result<(i32, i32)> {
        self.read(|state| {
            if state.borderless {
                state.size
            } else {
                (
                    (state.size.0 - FRAME_INSETS.0).max(0),
                    (state.size.1 - FRAME_INSETS.1).max(0),
                )
            }
        })
    }

    fn monitor_count(&self) -> usize {
        self.lock().monitors.len()
    }

    fn monitor_rect(&self, index: usize) -> Option<MonitorRect> {
        self.lock().monitors.get(index).copied()
    }

    fn current_monitor(&self) -> Option<usize> {
        self.lock().current_monitor()
    }

    fn cursor_position(&self) -> Option<(i32, i32)> {
        Some(self.lock().cursor)
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("set_cursor_position");
        state.cursor = (x, y);
        Ok(())
    }

    fn register_drop_callback(&mut self, callback: DropCallback) -> bool {
        self.lock().drop_callback = Some(callback);
        true
    }

    fn unregister_drop_callback(&mut self) -> bool {
        self.lock().drop_callback.take().is_some()
    }

    fn register_monitor_changed_callback(&mut self, callback: IntCallback) -> bool {
        self.lock().monitor_callback = Some(callback);
        true
    }

    fn unregister_monitor_changed_callback(&mut self) -> bool {
        self.lock().monitor_callback.take().is_some()
    }

    fn register_style_changed_callback(&mut self, callback: IntCallback) -> bool {
        self.lock().style_callback = Some(callback);
        true
    }

    fn unregister_style_changed_callback(&mut self) -> bool {
        self.lock().style_callback.take().is_some()
    }

    fn transparent_mode(&self) -> TransparentMode {
        self.lock().transparent_mode
    }

    fn set_transparent_mode(&mut self, mode: TransparentMode) -> Result<()> {
        self.apply("set_transparent_mode", |state| state.transparent_mode = mode)
    }

    fn key_color(&self) -> Rgb8 {
        self.lock().key_color
    }

    fn set_key_color(&mut self, color: Rgb8) -> Result<()> {
        self.apply("set_key_color", |state| state.key_color = color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_resolves_selectors() {
        let mut window = HeadlessWindow::new();
        assert_eq!(
            window.attach(WindowSelector::OwnerWindow),
            Err(WindowError::NotFound {
                selector: WindowSelector::OwnerWindow
            })
        );
        assert_eq!(window.attach(WindowSelector::Handle(7)).ok(), None);
        assert_eq!(window.attach(WindowSelector::ActiveWindow), Ok(FIRST_HANDLE));
        assert!(window.is_active());
    }

    #[test]
    fn setters_fail_while_detached() {
        let mut window = HeadlessWindow::new();
        assert_eq!(window.set_alpha(0.5), Err(WindowError::Detached));
        assert_eq!(window.position(), Err(WindowError::Detached));
    }

    #[test]
    fn close_makes_window_inactive_and_reopen_gets_new_handle() {
        let mut window = HeadlessWindow::new();
        window.attach(WindowSelector::OwnWindow).expect("attach");
        window.set_transparent(true).expect("transparent");

        window.close();
        assert!(!window.is_active());
        assert!(window.attach(WindowSelector::OwnWindow).is_err());

        let handle = window.reopen();
        assert_ne!(handle, FIRST_HANDLE);
        assert_eq!(window.attach(WindowSelector::OwnWindow), Ok(handle));
        assert!(!window.is_transparent());
    }

    #[test]
    fn maximize_snaps_to_current_monitor_and_restores() {
        let mut window = HeadlessWindow::new();
        window.attach(WindowSelector::OwnWindow).expect("attach");
        window.set_maximized(true).expect("maximize");
        assert_eq!(window.size(), Ok((1920, 1080)));
        window.set_maximized(false).expect("restore");
        assert_eq!(window.position(), Ok((100, 100)));
        assert_eq!(window.size(), Ok((800, 600)));
    }

    #[test]
    fn injected_failure_leaves_attribute_untouched() {
        let mut window = HeadlessWindow::new();
        window.attach(WindowSelector::OwnWindow).expect("attach");
        window.fail("set_alpha");
        assert!(matches!(
            window.set_alpha(0.2),
            Err(WindowError::NativeCallFailure { call: "set_alpha", .. })
        ));
        assert_eq!(window.alpha(), 1.0);
        window.recover("set_alpha");
        window.set_alpha(0.2).expect("alpha");
        assert_eq!(window.alpha(), 0.2);
    }

    #[test]
    fn client_size_excludes_frame_unless_borderless() {
        let mut window = HeadlessWindow::new();
        window.attach(WindowSelector::OwnWindow).expect("attach");
        assert_eq!(window.client_size(), Ok((784, 561)));
        window.set_borderless(true).expect("borderless");
        assert_eq!(window.client_size(), Ok((800, 600)));
    }
}
