use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use crate::core::ports::CompositorProbe;
use crate::global_constants::LOG_TAG_COMPOSITOR;

/// Process names of X11 window managers and standalone compositors that blend
/// translucent windows.
const KNOWN_COMPOSITORS: &[&str] = &[
    "picom",
    "compton",
    "xcompmgr",
    "kwin_x11",
    "kwin_wayland",
    "gnome-shell",
    "mutter",
    "compiz",
    "muffin",
    "cinnamon",
    "marco",
    "budgie-wm",
    "xfwm4",
];

/// Decides whether translucent overlays are blended by the desktop. Wayland sessions,
/// Windows and macOS always composite. On X11 a compositing manager has to be running.
pub struct ProcessCompositorProbe;

impl ProcessCompositorProbe {
    pub fn initialize() -> Self {
        log::debug!("{} initializing compositor probe", LOG_TAG_COMPOSITOR);
        Self
    }

    fn is_wayland_session() -> bool {
        std::env::var_os("WAYLAND_DISPLAY").is_some()
            || std::env::var("XDG_SESSION_TYPE")
                .map(|session_type| session_type.eq_ignore_ascii_case("wayland"))
                .unwrap_or(false)
    }

    fn is_known_compositor(process_name: &str) -> bool {
        let process_name = process_name.to_ascii_lowercase();
        KNOWN_COMPOSITORS
            .iter()
            .any(|compositor| process_name == *compositor)
    }

    fn find_running_compositor(&self) -> Option<String> {
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );

        system
            .processes()
            .values()
            .map(|process| process.name().to_string_lossy().into_owned())
            .find(|name| Self::is_known_compositor(name))
    }
}

impl CompositorProbe for ProcessCompositorProbe {
    fn is_compositor_active(&self) -> bool {
        if cfg!(any(target_os = "windows", target_os = "macos")) {
            return true;
        }

        if Self::is_wayland_session() {
            log::debug!("{} wayland session, compositor active", LOG_TAG_COMPOSITOR);
            return true;
        }

        match self.find_running_compositor() {
            Some(name) => {
                log::debug!("{} found compositor process '{}'", LOG_TAG_COMPOSITOR, name);
                true
            }
            None => {
                log::info!(
                    "{} no compositing manager running, overlays need a background",
                    LOG_TAG_COMPOSITOR
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_known_compositor_matches_exact_names() {
        assert!(ProcessCompositorProbe::is_known_compositor("picom"));
        assert!(ProcessCompositorProbe::is_known_compositor("KWin_X11"));
        assert!(ProcessCompositorProbe::is_known_compositor("gnome-shell"));
    }

    #[test]
    fn test_is_known_compositor_rejects_other_processes() {
        assert!(!ProcessCompositorProbe::is_known_compositor("i3"));
        assert!(!ProcessCompositorProbe::is_known_compositor("picom-conf"));
        assert!(!ProcessCompositorProbe::is_known_compositor(""));
    }
}
