use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMode {
    RectArea,
    FullScreen,
    CurrentScreen,
    ActiveWindow,
}

impl CaptureMode {
    pub const ALL: [CaptureMode; 4] = [
        CaptureMode::RectArea,
        CaptureMode::FullScreen,
        CaptureMode::CurrentScreen,
        CaptureMode::ActiveWindow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CaptureMode::RectArea => "rect-area",
            CaptureMode::FullScreen => "full-screen",
            CaptureMode::CurrentScreen => "current-screen",
            CaptureMode::ActiveWindow => "active-window",
        }
    }
}

impl Default for CaptureMode {
    fn default() -> Self {
        CaptureMode::RectArea
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureMode::RectArea => write!(f, "Rectangular Area"),
            CaptureMode::FullScreen => write!(f, "Full Screen (All Monitors)"),
            CaptureMode::CurrentScreen => write!(f, "Current Screen"),
            CaptureMode::ActiveWindow => write!(f, "Active Window"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCaptureMode(pub String);

impl fmt::Display for UnknownCaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown capture mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownCaptureMode {}

impl FromStr for CaptureMode {
    type Err = UnknownCaptureMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "rect-area" | "rectarea" | "area" => Ok(CaptureMode::RectArea),
            "full-screen" | "fullscreen" | "full" => Ok(CaptureMode::FullScreen),
            "current-screen" | "currentscreen" | "current" | "screen" => {
                Ok(CaptureMode::CurrentScreen)
            }
            "active-window" | "activewindow" | "active" | "window" => {
                Ok(CaptureMode::ActiveWindow)
            }
            _ => Err(UnknownCaptureMode(value.to_string())),
        }
    }
}
