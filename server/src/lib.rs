pub mod config;
pub mod error;
pub mod http;
pub mod protocol;
pub mod session;
pub mod views;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorCode};
pub use http::{build_router, serve, AppState};
pub use protocol::{parse_call, Request};
pub use session::{GameStore, Reply, Session};
