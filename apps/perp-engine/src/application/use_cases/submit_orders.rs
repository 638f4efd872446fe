//! Submit Orders Use Case
//!
//! Sends a planned order batch to the broker strictly in sequence. Each order
//! gets the bounded retry loop; the first order that still fails aborts the
//! batch and the caller receives the partial result.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{BrokerError, BrokerPort};
use crate::broker::{AttemptOutcome, RetryError, RetryPolicy, run_with_retry};
use crate::domain::order_execution::{ExecutionResult, OrderRequest};
use crate::domain::shared::Symbol;
use crate::observability::{record_order_retry, record_order_submission};

/// Why a batch stopped early.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// The cancellation token fired.
    #[error("submission cancelled")]
    Cancelled,

    /// An order kept failing transiently.
    #[error("order {index} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Position of the order in the batch.
        index: usize,
        /// Attempts made.
        attempts: u32,
        /// Error of the final attempt.
        source: BrokerError,
    },

    /// An order failed permanently.
    #[error("order {index} failed on attempt {attempt}: {source}")]
    Fatal {
        /// Position of the order in the batch.
        index: usize,
        /// Attempt that failed.
        attempt: u32,
        /// The broker error.
        source: BrokerError,
    },

    /// An order carried a non-positive amount.
    #[error("order {index} has invalid amount {amount}")]
    InvalidOrder {
        /// Position of the order in the batch.
        index: usize,
        /// The offending amount.
        amount: f64,
    },

    /// Nothing to submit.
    #[error("empty order batch")]
    EmptyBatch,
}

impl SubmitError {
    fn from_retry(index: usize, error: RetryError<BrokerError>) -> Self {
        match error {
            RetryError::Cancelled => Self::Cancelled,
            RetryError::Exhausted { attempts, last } => Self::RetriesExhausted {
                index,
                attempts,
                source: last,
            },
            RetryError::Fatal { attempt, error } => Self::Fatal {
                index,
                attempt,
                source: error,
            },
        }
    }

    /// True when the batch stopped because of cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A failed batch together with what was submitted before the failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct SubmissionFailure {
    /// Partial result: accepted orders, `executed = false`, failure note.
    pub result: ExecutionResult,
    /// What went wrong.
    #[source]
    pub error: SubmitError,
}

/// Use case for submitting an order batch to the broker.
pub struct OrderSubmitter<B>
where
    B: BrokerPort,
{
    broker: Arc<B>,
    policy: RetryPolicy,
}

impl<B> OrderSubmitter<B>
where
    B: BrokerPort,
{
    /// Create a new OrderSubmitter.
    pub const fn new(broker: Arc<B>, policy: RetryPolicy) -> Self {
        Self { broker, policy }
    }

    /// Retry policy in force.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute the use case.
    ///
    /// Orders are submitted in the order given, one at a time. Amounts are
    /// checked for the whole batch before the first broker call.
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        symbol: &Symbol,
        orders: Vec<OrderRequest>,
    ) -> Result<ExecutionResult, SubmissionFailure> {
        let mut result = ExecutionResult::pending();

        if orders.is_empty() {
            return Err(fail(result, SubmitError::EmptyBatch));
        }

        if let Some((index, order)) = orders
            .iter()
            .enumerate()
            .find(|(_, order)| order.amount.is_nan() || order.amount <= 0.0)
        {
            return Err(fail(
                result,
                SubmitError::InvalidOrder {
                    index,
                    amount: order.amount,
                },
            ));
        }

        let broker_name = self.broker.name().to_string();
        let total = orders.len();

        for (index, order) in orders.into_iter().enumerate() {
            let started = Instant::now();
            let outcome = run_with_retry(&self.policy, cancel, "submit_order", |attempt| {
                if attempt > 1 {
                    record_order_retry(&broker_name);
                }
                let broker = Arc::clone(&self.broker);
                let order = &order;
                async move { AttemptOutcome::from_result(broker.submit_order(symbol, order).await) }
            })
            .await;
            let latency = started.elapsed().as_secs_f64();

            match outcome {
                Ok(ack) => {
                    record_order_submission(&broker_name, "accepted", order.kind(), latency);
                    tracing::info!(
                        symbol = %symbol,
                        index,
                        total,
                        kind = order.kind(),
                        side = %order.side.as_str(),
                        amount = order.amount,
                        client_order_id = %ack.client_order_id,
                        broker_order_id = %ack.broker_order_id,
                        "Order accepted"
                    );
                    result.orders.push(order);
                }
                Err(error) => {
                    let error = SubmitError::from_retry(index, error);
                    let status = if error.is_cancelled() { "cancelled" } else { "failed" };
                    record_order_submission(&broker_name, status, order.kind(), latency);
                    if error.is_cancelled() {
                        tracing::warn!(symbol = %symbol, index, total, "Order submission cancelled");
                    } else {
                        tracing::error!(
                            symbol = %symbol,
                            index,
                            total,
                            kind = order.kind(),
                            error = %error,
                            "Order submission failed, aborting batch"
                        );
                    }
                    return Err(fail(result, error));
                }
            }
        }

        result.executed = true;
        result.execution_time = Utc::now();
        Ok(result)
    }
}

fn fail(mut result: ExecutionResult, error: SubmitError) -> SubmissionFailure {
    result.executed = false;
    result.execution_time = Utc::now();
    result.notes.push(format!("order failed: {error}"));
    SubmissionFailure { result, error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::OrderAck;
    use crate::domain::order_execution::{OrderParameters, OrderSide, TriggerType};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mock broker replaying scripted responses; accepts once the script runs out
    struct MockBroker {
        script: Mutex<VecDeque<Result<(), BrokerError>>>,
        submitted: Mutex<Vec<String>>,
    }

    impl MockBroker {
        fn new(script: Vec<Result<(), BrokerError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.submitted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BrokerPort for MockBroker {
        fn name(&self) -> &str {
            "mock"
        }

        async fn submit_order(
            &self,
            _symbol: &Symbol,
            order: &OrderRequest,
        ) -> Result<OrderAck, BrokerError> {
            self.submitted.lock().unwrap().push(order.kind().to_string());
            let next = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
            next.map(|()| OrderAck {
                broker_order_id: format!("b-{}", order.client_order_id),
                client_order_id: order.client_order_id.clone(),
                accepted_at: Utc::now(),
            })
        }
    }

    fn batch() -> Vec<OrderRequest> {
        vec![
            OrderRequest::market(OrderSide::Buy, 0.2, 50_000.0, OrderParameters::default()),
            OrderRequest::protective(
                TriggerType::StopLoss,
                OrderSide::Sell,
                0.2,
                45_000.0,
                OrderParameters::default(),
            ),
            OrderRequest::protective(
                TriggerType::TakeProfit,
                OrderSide::Sell,
                0.2,
                52_000.0,
                OrderParameters::default(),
            ),
        ]
    }

    fn submitter(broker: &Arc<MockBroker>) -> OrderSubmitter<MockBroker> {
        OrderSubmitter::new(Arc::clone(broker), RetryPolicy::new(3, Duration::from_millis(1)))
    }

    fn symbol() -> Symbol {
        Symbol::new("BTC/USDC:USDC")
    }

    #[tokio::test]
    async fn submits_in_order() {
        let broker = Arc::new(MockBroker::new(vec![]));
        let result = submitter(&broker)
            .execute(&CancellationToken::new(), &symbol(), batch())
            .await
            .unwrap();

        assert!(result.executed);
        assert_eq!(result.orders.len(), 3);
        assert_eq!(broker.calls(), vec!["market", "stop_loss", "take_profit"]);
    }

    #[tokio::test]
    async fn transient_errors_are_retried() {
        let broker = Arc::new(MockBroker::new(vec![
            Err(BrokerError::RateLimited),
            Err(BrokerError::Timeout {
                message: "slow".into(),
            }),
        ]));
        let result = submitter(&broker)
            .execute(&CancellationToken::new(), &symbol(), batch())
            .await
            .unwrap();

        assert!(result.executed);
        assert_eq!(broker.calls().len(), 5);
    }

    #[tokio::test]
    async fn fatal_error_aborts_with_partial_result() {
        let broker = Arc::new(MockBroker::new(vec![
            Ok(()),
            Err(BrokerError::InsufficientMargin),
        ]));
        let failure = submitter(&broker)
            .execute(&CancellationToken::new(), &symbol(), batch())
            .await
            .unwrap_err();

        assert!(matches!(
            failure.error,
            SubmitError::Fatal {
                index: 1,
                attempt: 1,
                ..
            }
        ));
        assert!(!failure.result.executed);
        assert_eq!(failure.result.orders.len(), 1);
        assert!(failure.result.notes[0].starts_with("order failed:"));
        // The take profit was never attempted
        assert_eq!(broker.calls(), vec!["market", "stop_loss"]);
    }

    #[tokio::test]
    async fn exhausted_retries_abort() {
        let broker = Arc::new(MockBroker::new(vec![
            Err(BrokerError::Unavailable {
                message: "maintenance".into(),
            });
            3
        ]));
        let failure = submitter(&broker)
            .execute(&CancellationToken::new(), &symbol(), batch())
            .await
            .unwrap_err();

        assert!(matches!(
            failure.error,
            SubmitError::RetriesExhausted {
                index: 0,
                attempts: 3,
                ..
            }
        ));
        assert!(failure.result.orders.is_empty());
        assert_eq!(broker.calls().len(), 3);
    }

    #[tokio::test]
    async fn invalid_amount_is_rejected_before_any_call() {
        let broker = Arc::new(MockBroker::new(vec![]));
        let mut orders = batch();
        orders[2].amount = 0.0;

        let failure = submitter(&broker)
            .execute(&CancellationToken::new(), &symbol(), orders)
            .await
            .unwrap_err();

        assert_eq!(
            failure.error,
            SubmitError::InvalidOrder {
                index: 2,
                amount: 0.0
            }
        );
        assert!(broker.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_batch_is_an_error() {
        let broker = Arc::new(MockBroker::new(vec![]));
        let failure = submitter(&broker)
            .execute(&CancellationToken::new(), &symbol(), Vec::new())
            .await
            .unwrap_err();
        assert_eq!(failure.error, SubmitError::EmptyBatch);
    }

    #[tokio::test]
    async fn cancellation_is_distinct() {
        let broker = Arc::new(MockBroker::new(vec![]));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let failure = submitter(&broker)
            .execute(&cancel, &symbol(), batch())
            .await
            .unwrap_err();

        assert!(failure.error.is_cancelled());
        assert!(broker.calls().is_empty());
    }
}
