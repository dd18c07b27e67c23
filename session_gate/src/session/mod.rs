mod gate;
mod logout;
mod types;
mod validate;

#[cfg(test)]
mod test_utils;

pub use gate::SessionGate;
pub use types::{Decision, DenyReason, LogoutOutcome, LogoutResponse};
