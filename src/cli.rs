use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::core::models::{CaptureMode, LaunchMode};

/// Command line options. Any capture option switches to a windowless capture run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArguments {
    /// Kept as the raw name so an unknown `--mode` value reaches the grabber and cancels there.
    pub capture_mode_name: Option<String>,
    pub delay_seconds: Option<i64>,
    pub capture_cursor: bool,
    pub save_path: Option<PathBuf>,
    pub show_help: bool,
    pub show_version: bool,
}

impl CliArguments {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse<I, S>(arguments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut arguments = arguments.into_iter().map(Into::into);

        while let Some(argument) = arguments.next() {
            match argument.as_str() {
                "-r" | "--rectarea" => parsed.set_mode(CaptureMode::RectArea.name())?,
                "-f" | "--fullscreen" => parsed.set_mode(CaptureMode::FullScreen.name())?,
                "-m" | "--current" => parsed.set_mode(CaptureMode::CurrentScreen.name())?,
                "-a" | "--active" => parsed.set_mode(CaptureMode::ActiveWindow.name())?,
                "--mode" => {
                    let name = Self::expect_value(&mut arguments, &argument)?;
                    parsed.set_mode(&name)?;
                }
                "-d" | "--delay" => {
                    let value = Self::expect_value(&mut arguments, &argument)?;
                    let seconds = value
                        .trim()
                        .parse::<i64>()
                        .with_context(|| format!("Invalid delay '{}', expected seconds", value))?;
                    parsed.delay_seconds = Some(seconds);
                }
                "-c" | "--cursor" => parsed.capture_cursor = true,
                "-p" | "--path" => {
                    let value = Self::expect_value(&mut arguments, &argument)?;
                    parsed.save_path = Some(PathBuf::from(value));
                }
                "-h" | "--help" => parsed.show_help = true,
                "-v" | "--version" => parsed.show_version = true,
                unknown => bail!("Unknown option '{}'", unknown),
            }
        }

        Ok(parsed)
    }

    fn expect_value(arguments: &mut impl Iterator<Item = String>, option: &str) -> Result<String> {
        arguments
            .next()
            .with_context(|| format!("Option '{}' needs a value", option))
    }

    fn set_mode(&mut self, name: &str) -> Result<()> {
        if let Some(existing) = &self.capture_mode_name {
            if existing != name {
                bail!(
                    "Only one capture mode can be given, got '{}' and '{}'",
                    existing,
                    name
                );
            }
        }
        self.capture_mode_name = Some(name.to_string());
        Ok(())
    }

    pub fn launch_mode(&self) -> LaunchMode {
        if self.capture_mode_name.is_some() {
            LaunchMode::Cli
        } else {
            LaunchMode::Gui
        }
    }

    pub fn delay_ms(&self) -> i64 {
        self.delay_seconds.unwrap_or(0).saturating_mul(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(arguments: &[&str]) -> Result<CliArguments> {
        CliArguments::parse(arguments.iter().copied())
    }

    #[test]
    fn test_no_arguments_launch_gui() {
        let arguments = parse(&[]).unwrap();

        assert_eq!(arguments, CliArguments::default());
        assert_eq!(arguments.launch_mode(), LaunchMode::Gui);
    }

    #[test]
    fn test_mode_flags_select_cli_capture() {
        let cases = [
            ("-r", "rect-area"),
            ("--fullscreen", "full-screen"),
            ("-m", "current-screen"),
            ("--active", "active-window"),
        ];

        for (flag, expected_mode) in cases {
            let arguments = parse(&[flag]).unwrap();
            assert_eq!(arguments.capture_mode_name.as_deref(), Some(expected_mode));
            assert_eq!(arguments.launch_mode(), LaunchMode::Cli);
        }
    }

    #[test]
    fn test_all_options_are_combined() {
        let arguments = parse(&["-f", "-d", "3", "-c", "-p", "/tmp/shot.png"]).unwrap();

        assert_eq!(arguments.capture_mode_name.as_deref(), Some("full-screen"));
        assert_eq!(arguments.delay_ms(), 3000);
        assert!(arguments.capture_cursor);
        assert_eq!(arguments.save_path, Some(PathBuf::from("/tmp/shot.png")));
    }

    #[test]
    fn test_mode_by_name_keeps_unknown_names() {
        let arguments = parse(&["--mode", "freeform"]).unwrap();

        assert_eq!(arguments.capture_mode_name.as_deref(), Some("freeform"));
        assert_eq!(arguments.launch_mode(), LaunchMode::Cli);
    }

    #[test]
    fn test_negative_delay_is_passed_through() {
        let arguments = parse(&["-m", "--delay", "-2"]).unwrap();

        assert_eq!(arguments.delay_ms(), -2000);
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let error = parse(&["-r", "-d"]).unwrap_err();

        assert!(error.to_string().contains("needs a value"));
    }

    #[test]
    fn test_bad_delay_is_an_error() {
        let error = parse(&["-r", "-d", "soon"]).unwrap_err();

        assert!(error.to_string().contains("Invalid delay"));
    }

    #[test]
    fn test_conflicting_modes_are_an_error() {
        assert!(parse(&["-r", "-f"]).is_err());
        assert!(parse(&["-r", "--rectarea"]).is_ok());
    }

    #[test]
    fn test_unknown_option_is_an_error() {
        assert!(parse(&["--upload"]).is_err());
    }

    #[test]
    fn test_help_and_version_flags() {
        let arguments = parse(&["-h", "--version"]).unwrap();

        assert!(arguments.show_help);
        assert!(arguments.show_version);
        assert_eq!(arguments.launch_mode(), LaunchMode::Gui);
    }
}
