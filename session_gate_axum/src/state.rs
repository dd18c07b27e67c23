use std::sync::Arc;

use session_gate::SessionGate;

/// Shared state for the gate routes
#[derive(Clone)]
pub struct GateState {
    pub gate: SessionGate,
    pub title: Arc<str>,
    pub redirect_url: Arc<str>,
}

impl GateState {
    pub fn new(gate: SessionGate, title: impl Into<Arc<str>>, redirect_url: impl Into<Arc<str>>) -> Self {
        Self {
            gate,
            title: title.into(),
            redirect_url: redirect_url.into(),
        }
    }
}
