/// Session lifecycle orchestration
pub mod session_service;

pub use session_service::SessionService;
