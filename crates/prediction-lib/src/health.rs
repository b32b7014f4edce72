//! Health check infrastructure for the prediction service
//!
//! Tracks per-component health and overall readiness for liveness and
//! readiness probes. Readiness is tied to the model lifecycle: the service
//! is not ready until an artifact has been loaded.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is experiencing issues but still operational
    Degraded,
    /// Component has failed
    Unhealthy,
}

/// Information about a component's health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: ComponentStatus::Healthy,
            message: None,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Degraded,
            message: Some(message.into()),
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Unhealthy,
            message: Some(message.into()),
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Overall health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: HashMap<String, ComponentHealth>,
}

impl HealthResponse {
    fn compute_status(components: &HashMap<String, ComponentHealth>) -> ComponentStatus {
        let mut has_degraded = false;
        for health in components.values() {
            match health.status {
                ComponentStatus::Unhealthy => return ComponentStatus::Unhealthy,
                ComponentStatus::Degraded => has_degraded = true,
                ComponentStatus::Healthy => {}
            }
        }
        if has_degraded {
            ComponentStatus::Degraded
        } else {
            ComponentStatus::Healthy
        }
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const MODEL_REPOSITORY: &str = "model_repository";
    pub const PREDICTOR: &str = "predictor";
}

/// Registry tracking component health and service readiness
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<HashMap<String, ComponentHealth>>>,
    ready: Arc<RwLock<bool>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with initial healthy status
    pub fn register(&self, name: &str) {
        self.components
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), ComponentHealth::healthy());
    }

    pub fn set_healthy(&self, name: &str) {
        self.update(name, ComponentHealth::healthy());
    }

    pub fn set_degraded(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::degraded(message));
    }

    pub fn set_unhealthy(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::unhealthy(message));
    }

    fn update(&self, name: &str, health: ComponentHealth) {
        self.components
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), health);
    }

    /// Flip readiness; set after the model artifact is resident.
    pub fn set_ready(&self, ready: bool) {
        *self.ready.write().unwrap_or_else(|e| e.into_inner()) = ready;
    }

    pub fn health(&self) -> HealthResponse {
        let components = self
            .components
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let status = HealthResponse::compute_status(&components);
        HealthResponse { status, components }
    }

    pub fn readiness(&self) -> ReadinessResponse {
        let ready = *self.ready.read().unwrap_or_else(|e| e.into_inner());
        if !ready {
            return ReadinessResponse {
                ready: false,
                reason: Some("model not yet loaded".to_string()),
            };
        }
        if self.health().status == ComponentStatus::Unhealthy {
            return ReadinessResponse {
                ready: false,
                reason: Some("critical component unhealthy".to_string()),
            };
        }
        ReadinessResponse {
            ready: true,
            reason: None,
        }
    }
}
