pub mod authenticator;
pub mod dataset_loader;
pub mod forecast;

pub use authenticator::{Authenticator, Session};
pub use forecast::{ArimaOrder, ForecastEngine, ForecastResult};
