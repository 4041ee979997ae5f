use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: String,
    pub service: String,
}

impl Health {
    pub fn ok(service: &str) -> Self {
        Self { status: "ok".into(), service: service.into() }
    }
}
