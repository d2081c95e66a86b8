use tracing::debug;

use crate::error::{Result, WindowError};
use crate::native::{MonitorRect, NativeWindow};

pub fn monitor_contains_point(rect: MonitorRect, point: (i32, i32)) -> bool {
    point.0 >= rect.x
        && point.0 < rect.x + rect.width
        && point.1 >= rect.y
        && point.1 < rect.y + rect.height
}

pub fn select_monitor_for_point(monitors: &[MonitorRect], point: (i32, i32)) -> Option<usize> {
    monitors
        .iter()
        .position(|rect| monitor_contains_point(*rect, point))
}

/// Clamp a requested monitor index into `[0, count - 1]`; `None` when there
/// are no monitors at all.
pub fn clamp_monitor_index(index: i32, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = (count - 1).min(i32::MAX as usize) as i32;
    Some(index.clamp(0, last) as usize)
}

/// Top-left position that puts a window of `size` at the center of `rect`.
pub fn centered_position(rect: MonitorRect, size: (i32, i32)) -> (i32, i32) {
    let (cx, cy) = rect.center();
    (cx - size.0 / 2, cy - size.1 / 2)
}

/// Center the window on monitor `index` and maximize it there.
///
/// A maximized window is restored first; maximizing only after the move makes
/// the OS snap to the target monitor instead of the one the window overlapped.
pub fn fit_to_monitor<N: NativeWindow + ?Sized>(native: &mut N, index: usize) -> Result<()> {
    let count = native.monitor_count();
    let rect = native
        .monitor_rect(index)
        .ok_or(WindowError::InvalidMonitorIndex {
            index: index.min(i32::MAX as usize) as i32,
            count,
        })?;

    if native.is_maximized() {
        native.set_maximized(false)?;
    }

    let size = native.size()?;
    let (x, y) = centered_position(rect, size);
    native.set_position(x, y)?;
    native.set_maximized(true)?;
    debug!(index, x, y, "fitted window to monitor");
    Ok(())
}

/// What the controller should do after a [`FitTarget`] change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAction {
    None,
    /// Recompute the fit for the current target.
    Fit,
    /// Fitting was switched off: un-maximize. The pre-fit rect is not restored.
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FitTarget {
    pub enabled: bool,
    pub monitor_index: i32,
}

impl FitTarget {
    pub fn new(enabled: bool, monitor_index: i32) -> Self {
        Self {
            enabled,
            monitor_index,
        }
    }

    /// Record a new target and report whether a refit is needed.
    pub fn request(&mut self, enabled: bool, monitor_index: i32) -> FitAction {
        let previous = *self;
        self.enabled = enabled;
        self.monitor_index = monitor_index;

        match (previous.enabled, enabled) {
            (false, true) => FitAction::Fit,
            (true, true) if previous.monitor_index != monitor_index => FitAction::Fit,
            (true, false) => FitAction::Release,
            _ => FitAction::None,
        }
    }

    pub fn on_monitor_changed(&self) -> FitAction {
        if self.enabled {
            FitAction::Fit
        } else {
            FitAction::None
        }
    }

    /// The index to fit given the currently reported monitor count.
    pub fn resolve(&self, count: usize) -> Option<usize> {
        clamp_monitor_index(self.monitor_index, count)
    }
}
