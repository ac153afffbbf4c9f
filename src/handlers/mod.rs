pub mod auth;
pub mod forecast;
pub mod records;
