//! Application Services
//!
//! Business logic orchestration layer that coordinates the hypothesis engine,
//! repository access and dataset storage.

mod analysis;

pub use analysis::*;

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Confidence level used when a request does not supply one
    pub default_confidence: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_confidence: 0.95,
        }
    }
}

/// Service context for request handling
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// Request correlation ID for tracing
    pub correlation_id: String,
}

impl ServiceContext {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
        }
    }

    /// Context with a freshly generated correlation ID
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_context() {
        let ctx = ServiceContext::new("req-1");
        assert_eq!(ctx.correlation_id, "req-1");

        let a = ServiceContext::generate();
        let b = ServiceContext::generate();
        assert_ne!(a.correlation_id, b.correlation_id);
    }

    #[test]
    fn test_default_config() {
        assert_eq!(ServiceConfig::default().default_confidence, 0.95);
    }
}
