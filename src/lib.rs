pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

pub use db::models::{FilterCriteria, VaccinationRecord};
pub use error::VaxError;
pub use service::{ArimaOrder, ForecastResult, Session};
