#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod adapters;
mod app;
mod cli;
mod core;
mod global_constants;
mod ports;
mod presentation;

use iced::daemon;

use crate::adapters::macos_permissions;
use crate::cli::CliArguments;
use crate::global_constants::{
    APPLICATION_NAME, APPLICATION_VERSION, CLI_EXIT_CODE_USAGE, USAGE,
};

fn main() -> iced::Result {
    env_logger::init();

    let cli_arguments = match CliArguments::parse_from_env() {
        Ok(arguments) => arguments,
        Err(error) => {
            eprintln!("{}: {:#}\n\n{}", APPLICATION_NAME, error, USAGE);
            std::process::exit(CLI_EXIT_CODE_USAGE);
        }
    };

    if cli_arguments.show_help {
        print!("{}", USAGE);
        return Ok(());
    }
    if cli_arguments.show_version {
        println!("{} {}", APPLICATION_NAME, APPLICATION_VERSION);
        return Ok(());
    }

    log::info!(
        "[MAIN] Starting {} {} ({:?} mode)",
        APPLICATION_NAME,
        APPLICATION_VERSION,
        cli_arguments.launch_mode()
    );

    if !macos_permissions::macos::request_screen_recording_permission() {
        log::error!("[MAIN] Screen recording permission not granted, captures will be empty");
    }
    if !macos_permissions::macos::request_accessibility_permission() {
        log::error!("[MAIN] Accessibility permission not granted, global hotkeys will not work");
    }

    #[cfg(target_os = "macos")]
    {
        use tray_icon::TrayIconEvent;
        TrayIconEvent::set_event_handler(Some(|_event| {}));
    }

    daemon(
        move || app::SnipApp::build(cli_arguments.clone()),
        app::SnipApp::handle_update,
        app::SnipApp::render_view,
    )
    .title(app::SnipApp::window_title)
    .subscription(app::SnipApp::handle_subscription)
    .run()
}
