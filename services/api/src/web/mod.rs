pub mod admin;
pub mod public;
pub mod responses;
pub mod server;
pub mod state;

// Re-export the router builders used by the binaries and the integration tests.
pub use admin::{router as admin_router, AdminApiDoc};
pub use public::{router as content_router, ContentApiDoc};
pub use state::{AdminState, ContentState};
