use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use window_keeper::native::{self, WindowSelector};
use window_keeper::settings::ControllerSettings;
use window_keeper::{logging, WindowController, WindowEvent};

const FRAME: Duration = Duration::from_millis(16);
/// Frames to keep retrying after the window disappears before giving up.
const REACQUIRE_FRAMES: u32 = 5 * 60;

fn parse_selector(arg: &str) -> Result<WindowSelector> {
    match arg {
        "own" => Ok(WindowSelector::OwnWindow),
        "owner" => Ok(WindowSelector::OwnerWindow),
        "active" => Ok(WindowSelector::ActiveWindow),
        raw => {
            let handle = match raw.strip_prefix("0x") {
                Some(hex) => isize::from_str_radix(hex, 16),
                None => raw.parse::<isize>(),
            }
            .with_context(|| format!("'{raw}' is not a window handle"))?;
            Ok(WindowSelector::Handle(handle))
        }
    }
}

fn main() -> Result<()> {
    if !cfg!(windows) {
        return Err(anyhow!("window_keeper only manages windows on Windows"));
    }

    let mut args = std::env::args().skip(1);
    let target = args
        .next()
        .ok_or_else(|| anyhow!("usage: window_keeper <hwnd|own|owner|active> [settings.json]"))?;
    let settings_path = args.next().unwrap_or_else(|| "settings.json".into());

    let mut settings = ControllerSettings::load(&settings_path)?;
    settings.selector = parse_selector(&target)?;
    logging::init(settings.debug_logging, settings.log_file.clone());

    let mut controller = WindowController::from_settings(native::platform_window(), &settings);
    let events = controller.subscribe();
    controller.poll();
    if !controller.is_active() {
        return Err(anyhow!("no window matched {:?}", settings.selector));
    }
    controller.log_monitors();

    let mut missing_frames = 0;
    loop {
        controller.poll();
        for event in events.try_iter() {
            match event {
                WindowEvent::MonitorChanged { .. } => controller.log_monitors(),
                WindowEvent::StyleChanged(state) => tracing::debug!(?state, "style changed"),
                WindowEvent::FilesDropped(paths) => tracing::info!(?paths, "files dropped"),
            }
        }

        if controller.is_active() {
            missing_frames = 0;
        } else {
            missing_frames += 1;
            if missing_frames > REACQUIRE_FRAMES {
                tracing::info!("window is gone; exiting");
                return Ok(());
            }
        }
        std::thread::sleep(FRAME);
    }
}

#[cfg(test)]
mod tests {
    use super::parse_selector;
    use window_keeper::WindowSelector;

    #[test]
    fn parses_handles_and_keywords() {
        assert_eq!(parse_selector("own").ok(), Some(WindowSelector::OwnWindow));
        assert_eq!(
            parse_selector("0x1f").ok(),
            Some(WindowSelector::Handle(0x1f))
        );
        assert_eq!(parse_selector("42").ok(), Some(WindowSelector::Handle(42)));
        assert!(parse_selector("window").is_err());
    }
}
