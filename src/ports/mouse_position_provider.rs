use crate::core::ports::MousePositionProvider;
use crate::global_constants::MESSAGE_MOUSE_POSITION_FAILED;
use mouse_position::mouse_position::Mouse;

pub struct SystemMousePositionProvider;

impl SystemMousePositionProvider {
    pub fn initialize() -> Self {
        log::debug!("[MOUSE] initializing mouse position provider");
        Self
    }

    fn query_system_mouse_position(&self) -> Mouse {
        Mouse::get_mouse_position()
    }

    fn convert_mouse_result_to_position(&self, mouse_result: Mouse) -> Result<(i32, i32), String> {
        match mouse_result {
            Mouse::Position { x, y } => {
                log::debug!("[MOUSE] current position: ({}, {})", x, y);
                Ok((x, y))
            }
            Mouse::Error => {
                log::warn!("[MOUSE] {}", MESSAGE_MOUSE_POSITION_FAILED);
                Err(MESSAGE_MOUSE_POSITION_FAILED.to_string())
            }
        }
    }
}

impl MousePositionProvider for SystemMousePositionProvider {
    fn get_current_mouse_position(&self) -> Result<(i32, i32), String> {
        let mouse_position_result = self.query_system_mouse_position();
        self.convert_mouse_result_to_position(mouse_position_result)
    }
}
