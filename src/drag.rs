//! Moving the attached window by dragging its content.
//!
//! Pointer coordinates are relative to the window's client area, so the start
//! point stays valid while the window follows the pointer.

use tracing::debug;

use crate::controller::WindowController;
use crate::native::NativeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(self) -> bool {
        self.ctrl || self.shift || self.alt
    }
}

#[derive(Debug, Clone)]
pub struct DragMove {
    pub enabled: bool,
    /// Refuse to move a zoomed or fitted window.
    pub disable_on_zoomed: bool,
    dragging: bool,
    start: (i32, i32),
    saved_hit_test: bool,
}

impl Default for DragMove {
    fn default() -> Self {
        Self {
            enabled: true,
            disable_on_zoomed: true,
            dragging: false,
            start: (0, 0),
            saved_hit_test: true,
        }
    }
}

impl DragMove {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn blocked<N: NativeWindow>(&self, controller: &WindowController<N>) -> bool {
        !self.enabled
            || (self.disable_on_zoomed && (controller.is_zoomed() || controller.is_fitting()))
    }

    /// Start dragging. Hit-testing is suspended and click-through forced off
    /// until the drag ends.
    pub fn begin<N: NativeWindow>(
        &mut self,
        controller: &mut WindowController<N>,
        pointer: (i32, i32),
        button: PointerButton,
    ) -> bool {
        if button != PointerButton::Left || self.blocked(controller) {
            return false;
        }
        if !self.dragging {
            self.saved_hit_test = controller.is_hit_test_enabled();
            controller.set_hit_test_enabled(false);
            controller.set_click_through(false);
            debug!(?pointer, "drag started");
        }
        self.dragging = true;
        self.start = pointer;
        true
    }

    /// Follow the pointer. Returns whether the window moved.
    pub fn drag<N: NativeWindow>(
        &mut self,
        controller: &mut WindowController<N>,
        pointer: (i32, i32),
        button: PointerButton,
        modifiers: Modifiers,
    ) -> bool {
        if !self.dragging {
            return false;
        }
        if self.blocked(controller) {
            self.end(controller);
            return false;
        }
        if button != PointerButton::Left || modifiers.any() {
            return false;
        }

        let Ok((x, y)) = controller.position() else {
            return false;
        };
        let (dx, dy) = (pointer.0 - self.start.0, pointer.1 - self.start.1);
        if (dx, dy) == (0, 0) {
            return false;
        }
        controller.set_position(x + dx, y + dy)
    }

    /// Finish dragging and restore the hit-test switch.
    pub fn end<N: NativeWindow>(&mut self, controller: &mut WindowController<N>) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        controller.set_hit_test_enabled(self.saved_hit_test);
        debug!("drag ended");
    }

    pub fn pointer_up<N: NativeWindow>(
        &mut self,
        controller: &mut WindowController<N>,
        button: PointerButton,
    ) {
        if button == PointerButton::Left {
            self.end(controller);
        }
    }
}
