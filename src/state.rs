use bitflags::bitflags;

use crate::native::{NativeWindow, Rgb8, TransparentMode};

/// Z-order pinning. Topmost and bottommost are exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZOrder {
    #[default]
    Normal,
    Topmost,
    Bottommost,
}

impl ZOrder {
    /// Bottommost wins when a backend reports both flags.
    pub fn from_flags(topmost: bool, bottommost: bool) -> Self {
        match (topmost, bottommost) {
            (_, true) => Self::Bottommost,
            (true, false) => Self::Topmost,
            (false, false) => Self::Normal,
        }
    }

    pub fn set_topmost(self, enabled: bool) -> Self {
        match (self, enabled) {
            (_, true) => Self::Topmost,
            (Self::Topmost, false) => Self::Normal,
            (other, false) => other,
        }
    }

    pub fn set_bottommost(self, enabled: bool) -> Self {
        match (self, enabled) {
            (_, true) => Self::Bottommost,
            (Self::Bottommost, false) => Self::Normal,
            (other, false) => other,
        }
    }

    pub fn is_topmost(self) -> bool {
        self == Self::Topmost
    }

    pub fn is_bottommost(self) -> bool {
        self == Self::Bottommost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickPolicy {
    Through,
    #[default]
    NotThrough,
}

impl ClickPolicy {
    pub fn from_flag(click_through: bool) -> Self {
        if click_through {
            Self::Through
        } else {
            Self::NotThrough
        }
    }

    pub fn is_through(self) -> bool {
        self == Self::Through
    }

    /// Next policy given this frame's hit-test result.
    ///
    /// Content under the pointer always captures clicks again; an empty
    /// transparent area starts passing them through. Anything else keeps the
    /// previous policy.
    pub fn reconcile(self, hit: bool, transparent: bool) -> Self {
        match self {
            Self::Through if hit => Self::NotThrough,
            Self::NotThrough if transparent && !hit => Self::Through,
            unchanged => unchanged,
        }
    }
}

/// Canonical window attributes owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowState {
    pub transparent: bool,
    pub transparent_mode: TransparentMode,
    pub key_color: Rgb8,
    pub alpha: f32,
    pub click: ClickPolicy,
    pub z_order: ZOrder,
    pub zoomed: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            transparent: false,
            transparent_mode: TransparentMode::Alpha,
            key_color: Rgb8::default(),
            alpha: 1.0,
            click: ClickPolicy::NotThrough,
            z_order: ZOrder::Normal,
            zoomed: false,
        }
    }
}

impl WindowState {
    /// Read every attribute back from the backend.
    pub fn read_back<N: NativeWindow + ?Sized>(native: &N) -> Self {
        Self {
            transparent: native.is_transparent(),
            transparent_mode: native.transparent_mode(),
            key_color: native.key_color(),
            alpha: native.alpha(),
            click: ClickPolicy::from_flag(native.is_click_through()),
            z_order: ZOrder::from_flags(native.is_topmost(), native.is_bottommost()),
            zoomed: native.is_maximized(),
        }
    }

    pub fn borderless(&self) -> bool {
        self.transparent
    }

    pub fn click_through(&self) -> bool {
        self.click.is_through()
    }

    pub fn topmost(&self) -> bool {
        self.z_order.is_topmost()
    }

    pub fn bottommost(&self) -> bool {
        self.z_order.is_bottommost()
    }
}

bitflags! {
    /// Payload of a style-changed notification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowStateEvent: u32 {
        const STYLE_CHANGED = 1;
        const RESIZED = 2;
        const ENABLED = 8;
        const TOPMOST = 16;
        const BOTTOMMOST = 32;
        const WALLPAPER_MODE = 64;

        const TOPMOST_ENABLED = Self::TOPMOST.bits() | Self::STYLE_CHANGED.bits() | Self::ENABLED.bits();
        const TOPMOST_DISABLED = Self::TOPMOST.bits() | Self::STYLE_CHANGED.bits();
        const BOTTOMMOST_ENABLED = Self::BOTTOMMOST.bits() | Self::STYLE_CHANGED.bits() | Self::ENABLED.bits();
        const BOTTOMMOST_DISABLED = Self::BOTTOMMOST.bits() | Self::STYLE_CHANGED.bits();
        const WALLPAPER_MODE_ENABLED = Self::WALLPAPER_MODE.bits() | Self::STYLE_CHANGED.bits() | Self::ENABLED.bits();
        const WALLPAPER_MODE_DISABLED = Self::WALLPAPER_MODE.bits() | Self::STYLE_CHANGED.bits();
    }
}

impl WindowStateEvent {
    /// Interpret the integer a native style callback delivers. Unknown bits
    /// are kept.
    pub fn from_raw(raw: i32) -> Self {
        Self::from_bits_retain(raw as u32)
    }
}
