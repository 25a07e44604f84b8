pub mod app_orchestrator;
pub mod image_grabber;
