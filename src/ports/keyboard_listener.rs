use iced::futures::{channel::mpsc, SinkExt, Stream, StreamExt};
use iced::stream;
use rdev::{listen, EventType, Key};

use crate::global_constants::{
    LOG_TAG_KEYBOARD, MESSAGE_KEYBOARD_CAPTURE_HOTKEY, MESSAGE_KEYBOARD_ESCAPE_PRESSED,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalKeyboardEvent {
    CaptureHotkeyPressed,
    EscapePressed,
}

pub struct GlobalKeyboardListener;

impl GlobalKeyboardListener {
    pub fn create_event_stream() -> impl Stream<Item = GlobalKeyboardEvent> {
        stream::channel(
            1,
            |mut output_channel: mpsc::Sender<GlobalKeyboardEvent>| async move {
                let (keyboard_sender, mut keyboard_receiver) = mpsc::channel(1);

                Self::spawn_keyboard_listener_thread(keyboard_sender);

                loop {
                    let keyboard_event: rdev::Event = keyboard_receiver.select_next_some().await;
                    if let Some(global_event) = map_event_type(&keyboard_event.event_type) {
                        let _ = output_channel.send(global_event).await;
                    }
                }
            },
        )
    }

    fn spawn_keyboard_listener_thread(mut keyboard_sender: mpsc::Sender<rdev::Event>) {
        std::thread::spawn(move || {
            log::info!(
                "{} Starting global keyboard listener thread",
                LOG_TAG_KEYBOARD
            );
            if let Err(e) = listen(move |event| {
                if matches!(event.event_type, EventType::KeyPress(_)) {
                    let _ = keyboard_sender.try_send(event);
                }
            }) {
                log::error!(
                    "{} Failed to start keyboard listener: {:?}. Global hotkeys are disabled.",
                    LOG_TAG_KEYBOARD,
                    e
                );
            }
        });
    }
}

fn map_event_type(event_type: &EventType) -> Option<GlobalKeyboardEvent> {
    match event_type {
        EventType::KeyPress(key) => map_key_press(key),
        _ => None,
    }
}

fn map_key_press(key: &Key) -> Option<GlobalKeyboardEvent> {
    match key {
        Key::PrintScreen => {
            log::info!("{} {}", LOG_TAG_KEYBOARD, MESSAGE_KEYBOARD_CAPTURE_HOTKEY);
            Some(GlobalKeyboardEvent::CaptureHotkeyPressed)
        }
        Key::Escape => {
            log::debug!("{} {}", LOG_TAG_KEYBOARD, MESSAGE_KEYBOARD_ESCAPE_PRESSED);
            Some(GlobalKeyboardEvent::EscapePressed)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_screen_press_starts_capture() {
        assert_eq!(
            map_event_type(&EventType::KeyPress(Key::PrintScreen)),
            Some(GlobalKeyboardEvent::CaptureHotkeyPressed)
        );
    }

    #[test]
    fn test_escape_press_cancels() {
        assert_eq!(
            map_event_type(&EventType::KeyPress(Key::Escape)),
            Some(GlobalKeyboardEvent::EscapePressed)
        );
    }

    #[test]
    fn test_releases_and_other_keys_are_ignored() {
        assert_eq!(map_event_type(&EventType::KeyRelease(Key::PrintScreen)), None);
        assert_eq!(map_event_type(&EventType::KeyPress(Key::KeyS)), None);
    }
}
