use iced::widget::button;
use iced::{Background, Border, Color, Shadow, Theme};

use crate::core::models::ThemeMode;

pub fn get_theme(mode: &ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::custom(
            "Dark".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.11, 0.11, 0.12),
                text: Color::from_rgb(0.95, 0.95, 0.95),
                primary: Color::from_rgb(0.12, 0.56, 1.0),
                success: Color::from_rgb(0.2, 0.8, 0.4),
                danger: Color::from_rgb(1.0, 0.3, 0.3),
                warning: Color::from_rgb(1.0, 0.7, 0.0),
            },
        ),
        ThemeMode::Light => Theme::custom(
            "Light".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.96, 0.96, 0.97),
                text: Color::from_rgb(0.1, 0.1, 0.1),
                primary: Color::from_rgb(0.1, 0.45, 0.9),
                success: Color::from_rgb(0.1, 0.6, 0.3),
                danger: Color::from_rgb(0.85, 0.2, 0.2),
                warning: Color::from_rgb(0.9, 0.6, 0.0),
            },
        ),
    }
}

struct ButtonColors {
    active: Color,
    hovered: Color,
    pressed: Color,
    text: Color,
}

const CAPTURE_COLORS: ButtonColors = ButtonColors {
    active: Color::from_rgb(0.118, 0.565, 1.0),
    hovered: Color::from_rgb(0.282, 0.655, 1.0),
    pressed: Color::from_rgb(0.082, 0.431, 0.8),
    text: Color::WHITE,
};

const SECONDARY_COLORS: ButtonColors = ButtonColors {
    active: Color::from_rgb(0.25, 0.25, 0.27),
    hovered: Color::from_rgb(0.33, 0.33, 0.35),
    pressed: Color::from_rgb(0.2, 0.2, 0.22),
    text: Color::from_rgb(0.9, 0.9, 0.9),
};

const DISABLED_BACKGROUND: Color = Color::from_rgb(0.3, 0.3, 0.3);
const DISABLED_TEXT: Color = Color::from_rgb(0.55, 0.55, 0.55);

fn styled_button(colors: &ButtonColors, status: button::Status) -> button::Style {
    let (background, text_color) = match status {
        button::Status::Active => (colors.active, colors.text),
        button::Status::Hovered => (colors.hovered, colors.text),
        button::Status::Pressed => (colors.pressed, colors.text),
        button::Status::Disabled => (DISABLED_BACKGROUND, DISABLED_TEXT),
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color,
        border: Border {
            color: background,
            width: 1.0,
            radius: 6.0.into(),
        },
        shadow: Shadow::default(),
        snap: matches!(status, button::Status::Pressed),
    }
}

/// "New capture" and other primary actions.
pub fn capture_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    styled_button(&CAPTURE_COLORS, status)
}

pub fn secondary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    styled_button(&SECONDARY_COLORS, status)
}

/// Colour of the dot in front of the status line.
pub fn status_color(status: &str) -> Color {
    let status = status.to_ascii_lowercase();
    if status.contains("error") || status.contains("failed") {
        Color::from_rgb(1.0, 0.3, 0.3)
    } else if status.contains("waiting") || status.contains("select") {
        Color::from_rgb(1.0, 0.8, 0.2)
    } else if status.contains("ready") || status.contains("saved") || status.contains("copied") {
        Color::from_rgb(0.2, 0.8, 0.4)
    } else {
        Color::from_rgba(0.5, 0.5, 0.5, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_theme_dark_mode() {
        let palette = get_theme(&ThemeMode::Dark).palette();

        assert_eq!(palette.background, Color::from_rgb(0.11, 0.11, 0.12));
        assert_eq!(palette.text, Color::from_rgb(0.95, 0.95, 0.95));
    }

    #[test]
    fn test_get_theme_light_mode() {
        let palette = get_theme(&ThemeMode::Light).palette();

        assert_eq!(palette.background, Color::from_rgb(0.96, 0.96, 0.97));
        assert_eq!(palette.text, Color::from_rgb(0.1, 0.1, 0.1));
    }

    #[test]
    fn test_capture_button_follows_status() {
        let theme = Theme::Dark;

        let active = capture_button_style(&theme, button::Status::Active);
        let pressed = capture_button_style(&theme, button::Status::Pressed);

        assert_eq!(
            active.background,
            Some(Background::Color(CAPTURE_COLORS.active))
        );
        assert_eq!(
            pressed.background,
            Some(Background::Color(CAPTURE_COLORS.pressed))
        );
        assert!(!active.snap);
        assert!(pressed.snap);
    }

    #[test]
    fn test_disabled_buttons_share_gray_style() {
        let theme = Theme::Dark;

        let capture = capture_button_style(&theme, button::Status::Disabled);
        let secondary = secondary_button_style(&theme, button::Status::Disabled);

        assert_eq!(capture.background, secondary.background);
        assert_eq!(capture.text_color, DISABLED_TEXT);
    }

    #[test]
    fn test_status_color_reflects_status_text() {
        assert_eq!(status_color("Capture failed: no monitor"), Color::from_rgb(1.0, 0.3, 0.3));
        assert_eq!(status_color("Select an area"), Color::from_rgb(1.0, 0.8, 0.2));
        assert_eq!(status_color("Ready"), Color::from_rgb(0.2, 0.8, 0.4));
        assert_eq!(status_color("Capturing"), Color::from_rgba(0.5, 0.5, 0.5, 1.0));
    }
}
