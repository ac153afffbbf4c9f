pub mod session;

pub use session::RequireSession;
