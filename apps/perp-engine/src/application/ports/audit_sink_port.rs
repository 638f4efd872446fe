//! Audit Sink Port (Driven Port)
//!
//! Fire-and-forget recorder for every stage of a cycle. Failures are logged
//! by the caller and never change the cycle outcome.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::order_execution::{ExecutionPlan, ExecutionResult, OrderRequest};
use crate::domain::risk_management::EvaluationResult;

/// Something worth archiving.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A risk verdict, proceed or deny.
    RiskEvaluation {
        /// Asset key.
        asset: String,
        /// The verdict.
        result: EvaluationResult,
    },
    /// A plan and the orders built from it.
    ExecutionPlan {
        /// The plan.
        plan: Box<ExecutionPlan>,
        /// Orders in submission order.
        orders: Vec<OrderRequest>,
    },
    /// The outcome of submitting an order batch.
    Execution {
        /// Asset key.
        asset: String,
        /// Contract symbol.
        symbol: String,
        /// The outcome.
        result: ExecutionResult,
    },
    /// A stage failed.
    Error {
        /// Asset key.
        asset: String,
        /// Stage that failed.
        stage: String,
        /// Error message.
        message: String,
    },
}

impl AuditEvent {
    /// Storage / log label.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::RiskEvaluation { .. } => "risk_evaluation",
            Self::ExecutionPlan { .. } => "execution_plan",
            Self::Execution { .. } => "execution",
            Self::Error { .. } => "error",
        }
    }
}

/// Audit sink error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuditError {
    /// Serialization error.
    #[error("Audit serialization error: {message}")]
    SerializationError {
        /// Error details.
        message: String,
    },

    /// Storage error.
    #[error("Audit storage error: {message}")]
    StorageError {
        /// Error details.
        message: String,
    },
}

/// Port for archiving cycle events.
#[async_trait]
pub trait AuditSinkPort: Send + Sync {
    /// Record one event.
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// No-op audit sink for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpAuditSink;

#[async_trait]
impl AuditSinkPort for NoOpAuditSink {
    async fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        Ok(())
    }
}

/// Audit sink that writes each event as a structured log line.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSinkPort for TracingAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let payload =
            serde_json::to_string(event).map_err(|e| AuditError::SerializationError {
                message: e.to_string(),
            })?;
        tracing::info!(event_type = event.event_type(), payload = %payload, "audit");
        Ok(())
    }
}
