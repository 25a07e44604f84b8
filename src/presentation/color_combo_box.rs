use std::fmt;

use iced::widget::{container, pick_list, row, Space};
use iced::{Alignment, Background, Border, Color, Element, Length};

const FALLBACK_COLOR: Color = Color::from_rgb(30.0 / 255.0, 144.0 / 255.0, 1.0);

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("gray", [128, 128, 128]),
    ("red", [255, 0, 0]),
    ("darkred", [139, 0, 0]),
    ("orange", [255, 165, 0]),
    ("yellow", [255, 255, 0]),
    ("gold", [255, 215, 0]),
    ("green", [0, 128, 0]),
    ("limegreen", [50, 205, 50]),
    ("cyan", [0, 255, 255]),
    ("blue", [0, 0, 255]),
    ("dodgerblue", [30, 144, 255]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("magenta", [255, 0, 255]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
];

/// Parses a named colour or a `#rrggbb` string.
pub fn parse_color(name: &str) -> Option<Color> {
    let name = name.trim();

    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        return Some(Color::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?));
    }

    NAMED_COLORS
        .iter()
        .find(|(known_name, _)| known_name.eq_ignore_ascii_case(name))
        .map(|(_, [r, g, b])| Color::from_rgb8(*r, *g, *b))
}

pub fn to_hex(color: Color) -> String {
    let [r, g, b, _] = color.into_rgba8();
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

fn same_rgb(first: Color, second: Color) -> bool {
    first.into_rgba8()[..3] == second.into_rgba8()[..3]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorEntry {
    name: String,
    color: Color,
}

impl ColorEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl fmt::Display for ColorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub struct ColorComboBox {
    entries: Vec<ColorEntry>,
    selected: Option<usize>,
}

impl ColorComboBox {
    pub fn new(color_names: &[&str]) -> Self {
        let mut combo_box = Self {
            entries: Vec::new(),
            selected: None,
        };
        combo_box.populate_list(color_names);
        combo_box
    }

    fn populate_list(&mut self, color_names: &[&str]) {
        self.entries.clear();

        for name in color_names {
            match parse_color(name) {
                Some(color) => self.entries.push(ColorEntry {
                    name: name.trim().to_string(),
                    color,
                }),
                None => log::warn!("[COLOR_COMBO] skipping unknown colour '{}'", name),
            }
        }

        self.selected = if self.entries.is_empty() { None } else { Some(0) };
    }

    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn selected_entry(&self) -> Option<&ColorEntry> {
        self.selected.and_then(|index| self.entries.get(index))
    }

    pub fn color(&self) -> Color {
        self.selected_entry()
            .map(ColorEntry::color)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Name of the current entry, suitable for persisting.
    pub fn color_name(&self) -> String {
        self.selected_entry()
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| to_hex(self.color()))
    }

    /// Selects the entry with this colour, appending a `#rrggbb` entry when none matches.
    pub fn set_color(&mut self, color: Color) {
        if let Some(index) = self
            .entries
            .iter()
            .position(|entry| same_rgb(entry.color, color))
        {
            self.selected = Some(index);
            return;
        }

        let name = to_hex(color);
        log::debug!("[COLOR_COMBO] adding custom colour {}", name);
        self.entries.push(ColorEntry { name, color });
        self.selected = Some(self.entries.len() - 1);
    }

    pub fn set_color_name(&mut self, name: &str) {
        if let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
        {
            self.selected = Some(index);
            return;
        }

        match parse_color(name) {
            Some(color) => self.set_color(color),
            None => log::warn!(
                "[COLOR_COMBO] ignoring unknown colour '{}', keeping {}",
                name,
                self.color_name()
            ),
        }
    }

    pub fn view<'a, Message: Clone + 'a>(
        &'a self,
        on_select: impl Fn(ColorEntry) -> Message + 'a,
    ) -> Element<'a, Message> {
        let swatch_color = self.color();
        let swatch = container(Space::new())
            .width(Length::Fixed(20.0))
            .height(Length::Fixed(20.0))
            .style(move |_theme| container::Style {
                background: Some(Background::Color(swatch_color)),
                border: Border {
                    color: Color::from_rgba(0.5, 0.5, 0.5, 0.8),
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            });

        row![
            swatch,
            pick_list(self.entries.as_slice(), self.selected_entry(), on_select).padding(8),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_accepts_names_and_hex() {
        assert_eq!(parse_color("red"), Some(Color::from_rgb8(255, 0, 0)));
        assert_eq!(parse_color("DodgerBlue"), Some(Color::from_rgb8(30, 144, 255)));
        assert_eq!(parse_color("#10ff80"), Some(Color::from_rgb8(16, 255, 128)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("not-a-colour"), None);
    }

    #[test]
    fn test_parse_color_rejects_signed_hex_pairs() {
        assert!(parse_color("#+f+f+f").is_none());
        assert!(parse_color("#-1-1-1").is_none());
        assert!(parse_color("#12345g").is_none());
    }

    #[test]
    fn test_new_skips_unknown_names_and_selects_first() {
        let combo_box = ColorComboBox::new(&["red", "chartreuse-ish", "#00ff00"]);

        let names: Vec<&str> = combo_box.entries().iter().map(ColorEntry::name).collect();
        assert_eq!(names, vec!["red", "#00ff00"]);
        assert_eq!(combo_box.color_name(), "red");
    }

    #[test]
    fn test_set_color_selects_existing_entry() {
        let mut combo_box = ColorComboBox::new(&["red", "yellow", "black"]);

        combo_box.set_color(Color::from_rgb8(255, 255, 0));

        assert_eq!(combo_box.color_name(), "yellow");
        assert_eq!(combo_box.entries().len(), 3);
    }

    #[test]
    fn test_set_color_appends_unlisted_colour() {
        let mut combo_box = ColorComboBox::new(&["red", "yellow"]);

        combo_box.set_color(Color::from_rgb8(1, 2, 3));

        assert_eq!(combo_box.entries().len(), 3);
        assert_eq!(combo_box.color_name(), "#010203");
        assert_eq!(combo_box.color().into_rgba8(), [1, 2, 3, 255]);
    }

    #[test]
    fn test_set_color_name_keeps_selection_for_unknown_name() {
        let mut combo_box = ColorComboBox::new(&["red", "white"]);
        combo_box.set_color_name("white");

        combo_box.set_color_name("nonsense");

        assert_eq!(combo_box.color_name(), "white");
    }

    #[test]
    fn test_empty_combo_box_falls_back_to_default_colour() {
        let combo_box = ColorComboBox::new(&[]);

        assert!(combo_box.selected_entry().is_none());
        assert_eq!(combo_box.color_name(), "#1e90ff");
    }
}
