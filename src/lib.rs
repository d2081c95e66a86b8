pub mod controller;
pub mod drag;
pub mod error;
pub mod events;
pub mod logging;
pub mod monitor_fit;
pub mod native;
pub mod path_list;
pub mod settings;
pub mod state;

pub use controller::{Preferences, WindowController};
pub use error::WindowError;
pub use events::WindowEvent;
pub use native::{NativeWindow, WindowHandle, WindowSelector};
