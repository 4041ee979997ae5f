//! Shared plumbing for the campus record services: logging setup, startup
//! environment checks, health body and Prometheus metrics.

pub mod types;
pub mod utils;
pub mod env;
pub mod observability;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok("student");
        assert_eq!(h.status, "ok");
        assert_eq!(h.service, "student");
    }
}
