use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::controller::Preferences;
use crate::hit_test::{
    HitTestType, HitTester, DEFAULT_LAYER_MASK, DEFAULT_OPACITY_THRESHOLD,
    DEFAULT_RAYCAST_MAX_DEPTH,
};
use crate::monitor_fit::FitTarget;
use crate::native::{Rgb8, TransparentMode, WindowSelector};
use crate::state::ZOrder;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Which window to attach to. Defaults to this process's main window.
    #[serde(default)]
    pub selector: WindowSelector,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub transparent_mode: TransparentMode,
    /// Pixels of this color become transparent in color-key mode.
    #[serde(default)]
    pub key_color: Rgb8,
    /// Whole-window opacity in `[0, 1]`.
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    #[serde(default)]
    pub topmost: bool,
    /// Takes precedence over `topmost` when both are set.
    #[serde(default)]
    pub bottommost: bool,
    #[serde(default)]
    pub click_through: bool,
    #[serde(default)]
    pub hit_test: HitTestType,
    /// Reconcile click-through with the per-frame hit test.
    #[serde(default = "default_true")]
    pub hit_test_enabled: bool,
    /// Minimum alpha counted as content by the opacity hit test.
    #[serde(default = "default_opacity_threshold")]
    pub opacity_threshold: f32,
    #[serde(default = "default_raycast_max_depth")]
    pub raycast_max_depth: f32,
    #[serde(default = "default_layer_mask")]
    pub layer_mask: u32,
    /// Keep the window maximized on `monitor_to_fit`.
    #[serde(default)]
    pub fit_monitor: bool,
    #[serde(default)]
    pub monitor_to_fit: i32,
    /// When enabled the logger starts at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Log to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_alpha() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_opacity_threshold() -> f32 {
    DEFAULT_OPACITY_THRESHOLD
}

fn default_raycast_max_depth() -> f32 {
    DEFAULT_RAYCAST_MAX_DEPTH
}

fn default_layer_mask() -> u32 {
    DEFAULT_LAYER_MASK
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            selector: WindowSelector::default(),
            transparent: false,
            transparent_mode: TransparentMode::default(),
            key_color: Rgb8::default(),
            alpha: default_alpha(),
            topmost: false,
            bottommost: false,
            click_through: false,
            hit_test: HitTestType::default(),
            hit_test_enabled: true,
            opacity_threshold: default_opacity_threshold(),
            raycast_max_depth: default_raycast_max_depth(),
            layer_mask: default_layer_mask(),
            fit_monitor: false,
            monitor_to_fit: 0,
            debug_logging: false,
            log_file: None,
        }
    }
}

impl ControllerSettings {
    /// Load settings, falling back to defaults for a missing or empty file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Self = serde_json::from_str(&content)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Clamp ranged values and resolve conflicting z-order flags.
    pub fn sanitize(&mut self) {
        if !self.alpha.is_finite() {
            tracing::warn!(alpha = self.alpha, "invalid alpha; using 1.0");
            self.alpha = default_alpha();
        }
        self.alpha = self.alpha.clamp(0.0, 1.0);

        if !self.opacity_threshold.is_finite() {
            self.opacity_threshold = default_opacity_threshold();
        }
        self.opacity_threshold = self.opacity_threshold.clamp(0.0, 1.0);

        if self.raycast_max_depth.is_nan() || self.raycast_max_depth <= 0.0 {
            self.raycast_max_depth = default_raycast_max_depth();
        }

        if self.topmost && self.bottommost {
            tracing::warn!("both topmost and bottommost requested; keeping bottommost");
            self.topmost = false;
        }
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            transparent: self.transparent,
            transparent_mode: self.transparent_mode,
            key_color: self.key_color,
            alpha: self.alpha,
            z_order: ZOrder::from_flags(self.topmost, self.bottommost),
            click_through: self.click_through,
            fit: FitTarget::new(self.fit_monitor, self.monitor_to_fit),
        }
    }

    pub fn hit_tester(&self) -> HitTester {
        let mut tester = HitTester::new(self.hit_test);
        tester.opacity_threshold = self.opacity_threshold;
        tester.raycast_max_depth = self.raycast_max_depth;
        tester.layer_mask = self.layer_mask;
        tester
    }
}
