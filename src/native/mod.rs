//! The native windowing collaborator.
//!
//! [`NativeWindow`] is the capability set the controller consumes. Backends:
//! `win32` (Windows only, really restyles an HWND) and `headless` (an
//! in-memory window used on other targets and by the test-suite).
//!
//! Callbacks cross the boundary as plain function pointers because the native
//! side has no user-data slot; they land in the process-wide bridge in
//! [`crate::events`].

pub mod headless;
#[cfg(windows)]
pub mod win32;

use raw_window_handle::RawWindowHandle;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WindowError};

/// Opaque identifier of the attached native window (an HWND on Windows).
pub type WindowHandle = isize;

/// Receives the raw drop payload; see [`crate::path_list`] for the format.
pub type DropCallback = fn(&str);

/// Receives an integer argument: the monitor count or a style event mask.
pub type IntCallback = fn(i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "handle", rename_all = "snake_case")]
pub enum WindowSelector {
    /// The main window of this process.
    OwnWindow,
    /// The root owner of this process's main window.
    OwnerWindow,
    /// The window of this process that currently has focus.
    ActiveWindow,
    /// An explicit native handle.
    Handle(WindowHandle),
}

impl Default for WindowSelector {
    fn default() -> Self {
        Self::OwnWindow
    }
}

impl TryFrom<RawWindowHandle> for WindowSelector {
    type Error = WindowError;

    fn try_from(raw: RawWindowHandle) -> Result<Self> {
        match raw {
            RawWindowHandle::Win32(handle) => Ok(Self::Handle(handle.hwnd.get())),
            _ => Err(WindowError::NotFound {
                selector: WindowSelector::OwnWindow,
            }),
        }
    }
}

/// How transparency is produced. Only meaningful on Windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransparentMode {
    /// Per-pixel alpha from the rendered output.
    #[default]
    Alpha,
    /// One RGB value is treated as fully transparent; the OS hit-tests it.
    ColorKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0x00BBGGRR`, the COLORREF layout.
    pub fn to_colorref(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16)
    }

    pub fn from_colorref(value: u32) -> Self {
        Self::rgb(
            (value & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            ((value >> 16) & 0xff) as u8,
        )
    }
}

impl Default for Rgb8 {
    /// Near-black magenta: unlikely to appear in rendered content.
    fn default() -> Self {
        Self::rgb(0x01, 0x00, 0x01)
    }
}

/// A display rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonitorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl MonitorRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

pub const LWA_COLORKEY: u32 = 0x1;
pub const LWA_ALPHA: u32 = 0x2;

/// Arguments for `SetLayeredWindowAttributes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayeredAttributes {
    pub key: u32,
    pub alpha: u8,
    pub flags: u32,
}

impl LayeredAttributes {
    /// Layering needed for the given window attributes, or `None` when the
    /// window can drop `WS_EX_LAYERED`.
    ///
    /// Click-through needs a layered window; a layered window with no
    /// attributes set is never drawn, so it gets a fully opaque alpha.
    pub fn select(
        transparent: bool,
        mode: TransparentMode,
        key_color: Rgb8,
        alpha: f32,
        click_through: bool,
    ) -> Option<Self> {
        let mut flags = 0;
        if transparent && mode == TransparentMode::ColorKey {
            flags |= LWA_COLORKEY;
        }
        let opacity = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        if opacity < u8::MAX {
            flags |= LWA_ALPHA;
        }
        if flags == 0 && !click_through {
            return None;
        }
        if flags == 0 {
            flags = LWA_ALPHA;
        }
        Some(Self {
            key: key_color.to_colorref(),
            alpha: opacity,
            flags,
        })
    }
}

/// Capability set the controller requires from a windowing backend.
///
/// Setters return `Err(WindowError::Detached)` when nothing is attached and
/// `Err(WindowError::NativeCallFailure)` when the OS rejects the call.
pub trait NativeWindow {
    fn attach(&mut self, selector: WindowSelector) -> Result<WindowHandle>;
    fn detach(&mut self);
    /// A window is attached and still exists.
    fn is_active(&self) -> bool;
    /// Style maintenance; called once per frame while active.
    fn per_frame_tick(&mut self);

    fn is_transparent(&self) -> bool;
    fn is_borderless(&self) -> bool;
    fn is_topmost(&self) -> bool;
    fn is_bottommost(&self) -> bool;
    fn is_click_through(&self) -> bool;
    fn is_maximized(&self) -> bool;
    fn alpha(&self) -> f32;

    fn set_transparent(&mut self, enabled: bool) -> Result<()>;
    fn set_borderless(&mut self, enabled: bool) -> Result<()>;
    fn set_alpha(&mut self, alpha: f32) -> Result<()>;
    fn set_click_through(&mut self, enabled: bool) -> Result<()>;
    fn set_topmost(&mut self, enabled: bool) -> Result<()>;
    fn set_bottommost(&mut self, enabled: bool) -> Result<()>;
    fn set_maximized(&mut self, enabled: bool) -> Result<()>;

    fn position(&self) -> Result<(i32, i32)>;
    fn set_position(&mut self, x: i32, y: i32) -> Result<()>;
    fn size(&self) -> Result<(i32, i32)>;
    fn set_size(&mut self, width: i32, height: i32) -> Result<()>;
    fn client_size(&self) -> Result<(i32, i32)>;

    fn monitor_count(&self) -> usize;
    fn monitor_rect(&self, index: usize) -> Option<MonitorRect>;
    fn current_monitor(&self) -> Option<usize>;

    fn cursor_position(&self) -> Option<(i32, i32)>;
    fn set_cursor_position(&mut self, x: i32, y: i32) -> Result<()>;

    fn register_drop_callback(&mut self, callback: DropCallback) -> bool;
    fn unregister_drop_callback(&mut self) -> bool;
    fn register_monitor_changed_callback(&mut self, callback: IntCallback) -> bool;
    fn unregister_monitor_changed_callback(&mut self) -> bool;
    fn register_style_changed_callback(&mut self, callback: IntCallback) -> bool;
    fn unregister_style_changed_callback(&mut self) -> bool;

    // Windows-only knobs; other backends accept and ignore them.

    fn transparent_mode(&self) -> TransparentMode {
        TransparentMode::Alpha
    }

    fn set_transparent_mode(&mut self, _mode: TransparentMode) -> Result<()> {
        Ok(())
    }

    fn key_color(&self) -> Rgb8 {
        Rgb8::default()
    }

    fn set_key_color(&mut self, _color: Rgb8) -> Result<()> {
        Ok(())
    }
}

/// The backend for the current target.
#[cfg(windows)]
pub fn platform_window() -> win32::Win32Window {
    win32::Win32Window::new()
}

/// The backend for the current target.
#[cfg(not(windows))]
pub fn platform_window() -> headless::HeadlessWindow {
    headless::HeadlessWindow::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{RawWindowHandle, Win32WindowHandle, XlibWindowHandle};
    use std::num::NonZeroIsize;

    #[test]
    fn colorref_is_bgr_packed() {
        let color = Rgb8::rgb(0x12, 0x34, 0x56);
        assert_eq!(color.to_colorref(), 0x0056_3412);
        assert_eq!(Rgb8::from_colorref(0x0056_3412), color);
    }

    #[test]
    fn layered_attributes_follow_window_state() {
        let key = Rgb8::default();
        assert_eq!(
            LayeredAttributes::select(false, TransparentMode::Alpha, key, 1.0, false),
            None
        );

        let through = LayeredAttributes::select(false, TransparentMode::Alpha, key, 1.0, true)
            .expect("click-through needs layering");
        assert_eq!((through.flags, through.alpha), (LWA_ALPHA, 255));

        let keyed = LayeredAttributes::select(true, TransparentMode::ColorKey, key, 0.5, false)
            .expect("color key");
        assert_eq!(keyed.flags, LWA_COLORKEY | LWA_ALPHA);
        assert_eq!(keyed.alpha, 128);
        assert_eq!(keyed.key, 0x0001_0001);

        // Alpha-mode transparency comes from DWM, not from layering.
        assert_eq!(
            LayeredAttributes::select(true, TransparentMode::Alpha, key, 1.0, false),
            None
        );
    }

    #[test]
    fn monitor_center_uses_origin() {
        assert_eq!(MonitorRect::new(1920, 0, 2560, 1440).center(), (3200, 720));
    }

    #[test]
    fn win32_raw_handle_becomes_handle_selector() {
        let hwnd = NonZeroIsize::new(0x5000).expect("non-zero");
        let raw = RawWindowHandle::Win32(Win32WindowHandle::new(hwnd));
        assert_eq!(
            WindowSelector::try_from(raw),
            Ok(WindowSelector::Handle(0x5000))
        );

        let xlib = RawWindowHandle::Xlib(XlibWindowHandle::new(7));
        assert!(WindowSelector::try_from(xlib).is_err());
    }

    #[test]
    fn selector_serializes_with_kind_tag() {
        let json = serde_json::to_value(WindowSelector::Handle(16)).expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "handle", "handle": 16}));
        let own: WindowSelector =
            serde_json::from_value(serde_json::json!({"kind": "own_window"})).expect("parse");
        assert_eq!(own, WindowSelector::OwnWindow);
    }
}
