// Application services
// Orchestrate domain rules and ports; no transport concerns

pub mod user_service;

pub use user_service::UserService;
