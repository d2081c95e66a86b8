//! Error taxonomy for window control.
//!
//! None of these are fatal. Losing the window is a state transition that the
//! per-frame poll heals by re-attaching; everything else is logged and the
//! controller's state is left as it was.

use thiserror::Error;

use crate::native::WindowSelector;

/// Errors produced by the controller and the native backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The attach target does not exist (yet). Retried every poll while inactive.
    #[error("no window matched {selector:?}")]
    NotFound { selector: WindowSelector },

    /// A fit request referenced a monitor the OS does not report.
    #[error("monitor index {index} is out of range ({count} monitors)")]
    InvalidMonitorIndex { index: i32, count: usize },

    /// The pointer was outside the render surface during an opacity hit-test.
    #[error("pointer ({x}, {y}) is outside the render surface")]
    SampleOutOfBounds { x: i32, y: i32 },

    /// A native setter or getter reported failure.
    #[error("{call} failed (error {code:#010x})")]
    NativeCallFailure { call: &'static str, code: u32 },

    /// A native call was made while no window is attached.
    #[error("no window is attached")]
    Detached,
}

impl WindowError {
    pub fn native(call: &'static str, code: u32) -> Self {
        Self::NativeCallFailure { call, code }
    }

    /// Wrap a windows-crate error, keeping the HRESULT bits for display.
    #[cfg(windows)]
    pub fn win32(call: &'static str, err: windows::core::Error) -> Self {
        Self::NativeCallFailure {
            call,
            code: err.code().0 as u32,
        }
    }
}

pub type Result<T> = std::result::Result<T, WindowError>;

#[cfg(test)]
mod tests {
    use super::WindowError;
    use crate::native::WindowSelector;

    #[test]
    fn native_failure_formats_code_as_hex() {
        let err = WindowError::native("SetLayeredWindowAttributes", 0x8007_0578);
        assert_eq!(
            err.to_string(),
            "SetLayeredWindowAttributes failed (error 0x80070578)"
        );
    }

    #[test]
    fn not_found_names_the_selector() {
        let err = WindowError::NotFound {
            selector: WindowSelector::Handle(42),
        };
        assert!(err.to_string().contains("Handle(42)"));
    }
}
