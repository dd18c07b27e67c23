mod logout;
mod middleware;
mod pages;
mod router;
mod session;
mod state;

#[cfg(test)]
mod test_utils;

pub use middleware::require_session;
pub use router::{gate_router, gate_router_no_trace};
pub use session::ValidSession;
pub use state::GateState;

// Re-export the core crate's entry points
pub use session_gate::{GateConfig, GateError, init, resolve_display_title};
