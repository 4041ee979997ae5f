pub mod bootstrap;
pub mod context;
pub mod errors;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use context::{ServiceKind, ServiceState};
pub use startup::{build_app, run};
