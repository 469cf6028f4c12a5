pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod history;
pub mod models;
pub mod planner;
pub mod presentation;
pub mod prompt;
pub mod retry;
pub mod service;
pub mod session;
pub mod transport;
pub mod validation;

pub use crate::error::{Result, TravelPlannerError};
pub use crate::service::TravelPlannerService;
