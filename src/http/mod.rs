//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → middleware.rs (build RequestContext, run engine)
//!     → response.rs (Redirect / DebugReport response)
//!     → or fall through to the inner router (404 in the standalone server)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{redirect_middleware, EngineState, RedirectState};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
