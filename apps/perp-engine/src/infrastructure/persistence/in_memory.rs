//! In-memory daily risk ledger for testing.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::risk_management::{
    DailyRiskLedger, DailyStatus, LedgerError, LedgerSettings, RiskActivity, RiskEvent,
    trading_day,
};
use crate::observability::record_daily_halt;

#[derive(Debug, Default)]
struct LedgerState {
    days: HashMap<String, DailyStatus>,
    events: Vec<RiskActivity>,
}

/// In-memory implementation of `DailyRiskLedger`.
///
/// Suitable for testing and development. State is lost on restart.
#[derive(Debug)]
pub struct InMemoryRiskLedger {
    settings: LedgerSettings,
    state: Mutex<LedgerState>,
}

impl InMemoryRiskLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new(settings: LedgerSettings) -> Self {
        Self {
            settings,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Stored status for a trading date.
    #[must_use]
    pub fn status(&self, trading_date: &str) -> Option<DailyStatus> {
        self.lock().days.get(trading_date).cloned()
    }

    /// Every activity entry in insertion order.
    #[must_use]
    pub fn events(&self) -> Vec<RiskActivity> {
        self.lock().events.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DailyRiskLedger for InMemoryRiskLedger {
    async fn update(
        &self,
        timestamp: DateTime<Utc>,
        equity: f64,
    ) -> Result<DailyStatus, LedgerError> {
        let date = trading_day(timestamp, self.settings.reset_hour());
        let max_daily_loss = self.settings.max_daily_loss();
        let mut state = self.lock();

        let Some(stored) = state.days.get(&date) else {
            let status = DailyStatus::opening(date.clone(), equity);
            state.days.insert(date, status.clone());
            return Ok(status);
        };

        let (status, trips) = DailyStatus::advance(
            date.clone(),
            stored.start_equity,
            stored.halted,
            equity,
            max_daily_loss,
        );

        if trips {
            let message = status.halt_message(max_daily_loss);
            tracing::warn!(
                trading_date = %date,
                loss_percent = status.loss_percent,
                start_equity = status.start_equity,
                current_equity = status.current_equity,
                "{message}"
            );
            state.events.push(RiskActivity {
                occurred_at: timestamp,
                event_type: RiskEvent::DAILY_HALT.to_string(),
                message,
                details: halt_details(&status),
                trading_date: date.clone(),
            });
            record_daily_halt();
        }

        state.days.insert(date, status.clone());
        Ok(status)
    }

    async fn log_event(&self, event: RiskEvent) -> Result<(), LedgerError> {
        if event.event_type.trim().is_empty() {
            return Err(LedgerError::InvalidEvent {
                message: "event type must not be empty".to_string(),
            });
        }

        let now = Utc::now();
        let trading_date = event
            .trading_date
            .unwrap_or_else(|| trading_day(now, self.settings.reset_hour()));

        self.lock().events.push(RiskActivity {
            occurred_at: now,
            event_type: event.event_type,
            message: event.message,
            details: event.details,
            trading_date,
        });
        Ok(())
    }
}

/// JSON details stored with a halt entry.
pub(crate) fn halt_details(status: &DailyStatus) -> String {
    serde_json::json!({
        "start_equity": status.start_equity,
        "current_equity": status.current_equity,
        "loss_percent": status.loss_percent,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn ledger() -> InMemoryRiskLedger {
        InMemoryRiskLedger::new(LedgerSettings::new(0.03, 0).unwrap())
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn first_update_opens_the_day() {
        let ledger = ledger();
        let status = ledger.update(at(1), 100_000.0).await.unwrap();

        assert_eq!(status.trading_date, "2024-05-01");
        assert_eq!(status.start_equity, 100_000.0);
        assert_eq!(status.loss_percent, 0.0);
        assert!(!status.halted);
    }

    #[tokio::test]
    async fn breach_halts_and_logs_once() {
        let ledger = ledger();
        ledger.update(at(1), 100_000.0).await.unwrap();

        let halted = ledger.update(at(2), 96_500.0).await.unwrap();
        assert!(halted.halted);
        assert!((halted.loss_percent + 0.035).abs() < 1e-12);

        // Recovery does not clear the flag
        let recovered = ledger.update(at(3), 101_000.0).await.unwrap();
        assert!(recovered.halted);

        let events = ledger.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, RiskEvent::DAILY_HALT);
        assert_eq!(events[0].trading_date, "2024-05-01");
    }

    #[tokio::test]
    async fn new_day_resets_halt() {
        let ledger = ledger();
        ledger.update(at(1), 100_000.0).await.unwrap();
        ledger.update(at(2), 90_000.0).await.unwrap();

        let next = ledger.update(at(2) + Duration::days(1), 90_000.0).await.unwrap();
        assert_eq!(next.trading_date, "2024-05-02");
        assert_eq!(next.start_equity, 90_000.0);
        assert!(!next.halted);
    }

    #[tokio::test]
    async fn zero_start_equity_never_halts() {
        let ledger = ledger();
        ledger.update(at(1), 0.0).await.unwrap();
        let status = ledger.update(at(2), -500.0).await.unwrap();
        assert_eq!(status.loss_percent, 0.0);
        assert!(!status.halted);
    }

    #[tokio::test]
    async fn log_event_defaults_trading_date() {
        let ledger = ledger();
        ledger
            .log_event(RiskEvent::new("note", "manual review").with_details("{}"))
            .await
            .unwrap();
        ledger
            .log_event(RiskEvent::new("note", "pinned").on("2024-04-30"))
            .await
            .unwrap();

        let events = ledger.events();
        assert_eq!(events.len(), 2);
        assert!(!events[0].trading_date.is_empty());
        assert_eq!(events[1].trading_date, "2024-04-30");
    }

    #[tokio::test]
    async fn log_event_rejects_empty_type() {
        let err = ledger().log_event(RiskEvent::new("  ", "x")).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEvent { .. }));
    }

    proptest! {
        #[test]
        fn halt_is_monotonic_within_a_day(equities in prop::collection::vec(1.0f64..200_000.0, 1..20)) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let ledger = ledger();
                ledger.update(at(0), 100_000.0).await.unwrap();
                let mut seen_halt = false;
                for (i, equity) in equities.iter().enumerate() {
                    let minute = Duration::minutes(i64::try_from(i).unwrap() + 1);
                    let status = ledger.update(at(0) + minute, *equity).await.unwrap();
                    if seen_halt {
                        prop_assert!(status.halted);
                    }
                    prop_assert_eq!(status.halted, seen_halt || status.loss_percent <= -0.03);
                    seen_halt = status.halted;
                }
                Ok(())
            })?;
        }
    }
}
