//! Workspace root crate.
//!
//! Re-exports the plant model, operator controls and safety logic so
//! integration tests can depend on a single crate.

pub use controller::*;
pub use safety::*;
pub use sim::*;
