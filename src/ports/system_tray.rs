use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::global_constants::APPLICATION_NAME;

const MENU_ID_NEW_CAPTURE: &str = "new-capture";
const MENU_ID_SHOW_WINDOW: &str = "show-window";
const MENU_ID_QUIT: &str = "quit";
const ICON_SIZE: u32 = 32;

pub struct SystemTray {
    _tray_icon: TrayIcon,
    _menu: Menu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    NewCapture,
    ShowWindow,
    Quit,
}

impl SystemTray {
    pub fn build() -> anyhow::Result<Self> {
        log::info!("[SYSTEM_TRAY] Initializing system tray");

        let icon = Icon::from_rgba(render_icon_rgba(ICON_SIZE), ICON_SIZE, ICON_SIZE)?;

        let menu = Menu::new();
        menu.append(&MenuItem::with_id(
            MenuId::new(MENU_ID_NEW_CAPTURE),
            "New Capture",
            true,
            None,
        ))?;
        menu.append(&MenuItem::with_id(
            MenuId::new(MENU_ID_SHOW_WINDOW),
            "Show Window",
            true,
            None,
        ))?;
        menu.append(&MenuItem::with_id(MenuId::new(MENU_ID_QUIT), "Quit", true, None))?;

        let tray_icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu.clone()))
            .with_tooltip(APPLICATION_NAME)
            .with_icon(icon)
            .build()?;

        log::info!("[SYSTEM_TRAY] System tray initialized successfully");

        Ok(Self {
            _tray_icon: tray_icon,
            _menu: menu,
        })
    }

    pub fn poll_events() -> Option<TrayEvent> {
        let event = MenuEvent::receiver().try_recv().ok()?;
        log::debug!("[SYSTEM_TRAY] Received menu event: {:?}", event.id);
        TrayEvent::from_menu_id(event.id.0.as_ref())
    }
}

impl TrayEvent {
    fn from_menu_id(menu_id: &str) -> Option<Self> {
        match menu_id {
            MENU_ID_NEW_CAPTURE => Some(TrayEvent::NewCapture),
            MENU_ID_SHOW_WINDOW => Some(TrayEvent::ShowWindow),
            MENU_ID_QUIT => Some(TrayEvent::Quit),
            _ => {
                log::warn!("[SYSTEM_TRAY] Unknown menu event: {}", menu_id);
                None
            }
        }
    }
}

/// A rounded frame with a dot in the middle, drawn so no icon asset has to ship.
fn render_icon_rgba(size: u32) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    let center = (size as f32 - 1.0) / 2.0;

    for y in 0..size {
        for x in 0..size {
            let is_frame = x < 3 || y < 3 || x >= size - 3 || y >= size - 3;
            let distance = ((x as f32 - center).powi(2) + (y as f32 - center).powi(2)).sqrt();
            let pixel = if is_frame {
                [30, 144, 255, 255]
            } else if distance < size as f32 / 5.0 {
                [255, 255, 255, 255]
            } else {
                [0, 0, 0, 0]
            };
            rgba.extend_from_slice(&pixel);
        }
    }

    rgba
}
