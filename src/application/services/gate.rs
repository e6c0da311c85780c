//! Gate controller: the entry/exit state machine
//!
//! A vehicle is NOT_PARKED until an entry opens a session for it and
//! becomes NOT_PARKED again when the exit closes that session. Each
//! transition runs under the gate lock inside one storage transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::application::GateLock;
use crate::domain::{
    elapsed_minutes, fee_cents, DomainError, DomainResult, FeeSchedule, NewSession,
    RepositoryProvider, ScanCode,
};

/// Result of a successful entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryReceipt {
    pub session_id: i32,
    pub vehicle_no: String,
    pub slot_number: String,
    pub entry_time: DateTime<Utc>,
}

/// Result of a successful exit
#[derive(Debug, Clone, PartialEq)]
pub struct ExitReceipt {
    pub session_id: i32,
    pub vehicle_no: String,
    pub slot_number: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub fee: f64,
}

pub struct GateController {
    repos: Arc<dyn RepositoryProvider>,
    lock: GateLock,
    fees: FeeSchedule,
    code_prefix: String,
}

impl GateController {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        lock: GateLock,
        fees: FeeSchedule,
        code_prefix: impl Into<String>,
    ) -> Self {
        Self {
            repos,
            lock,
            fees,
            code_prefix: code_prefix.into(),
        }
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fees
    }

    pub async fn enter(&self, scanned: &str) -> DomainResult<EntryReceipt> {
        self.enter_at(scanned, Utc::now()).await
    }

    pub async fn exit(&self, scanned: &str) -> DomainResult<ExitReceipt> {
        self.exit_at(scanned, Utc::now()).await
    }

    /// Entry with an explicit clock reading
    pub async fn enter_at(&self, scanned: &str, now: DateTime<Utc>) -> DomainResult<EntryReceipt> {
        let result = self.try_enter(scanned, now).await;
        match &result {
            Ok(receipt) => {
                metrics::counter!("parking_entries_total").increment(1);
                info!(
                    vehicle_no = %receipt.vehicle_no,
                    slot_number = %receipt.slot_number,
                    session_id = receipt.session_id,
                    "Vehicle entered"
                );
                self.publish_availability().await;
            }
            Err(e) => self.reject("entry", e),
        }
        result
    }

    /// Exit with an explicit clock reading
    pub async fn exit_at(&self, scanned: &str, now: DateTime<Utc>) -> DomainResult<ExitReceipt> {
        let result = self.try_exit(scanned, now).await;
        match &result {
            Ok(receipt) => {
                metrics::counter!("parking_exits_total").increment(1);
                metrics::counter!("parking_revenue_cents_total")
                    .increment(fee_cents(receipt.fee));
                info!(
                    vehicle_no = %receipt.vehicle_no,
                    slot_number = %receipt.slot_number,
                    session_id = receipt.session_id,
                    duration_minutes = receipt.duration_minutes,
                    fee = receipt.fee,
                    "Vehicle exited"
                );
                self.publish_availability().await;
            }
            Err(e) => self.reject("exit", e),
        }
        result
    }

    async fn try_enter(&self, scanned: &str, now: DateTime<Utc>) -> DomainResult<EntryReceipt> {
        let code = ScanCode::parse(scanned, &self.code_prefix)?;
        let vehicle_no = code.vehicle_no();

        let _guard = self.lock.lock().await;
        let scope = self.repos.begin().await?;

        let vehicle = scope
            .vehicles()
            .find_by_vehicle_no(vehicle_no)
            .await?
            .ok_or_else(|| DomainError::UnknownVehicle(vehicle_no.to_string()))?;

        if scope
            .sessions()
            .find_active_by_vehicle(vehicle_no)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyParked(vehicle_no.to_string()));
        }

        let slot = scope.slots().allocate(vehicle_no, now).await?;
        let session = scope
            .sessions()
            .open(NewSession {
                vehicle_id: Some(vehicle.id),
                vehicle_no: vehicle_no.to_string(),
                slot_id: slot.id,
                entry_time: now,
            })
            .await?;

        scope.commit().await?;

        Ok(EntryReceipt {
            session_id: session.id,
            vehicle_no: session.vehicle_no,
            slot_number: slot.slot_number,
            entry_time: session.entry_time,
        })
    }

    /// Exit only needs the active session; the registry is not consulted.
    async fn try_exit(&self, scanned: &str, now: DateTime<Utc>) -> DomainResult<ExitReceipt> {
        let code = ScanCode::parse(scanned, &self.code_prefix)?;
        let vehicle_no = code.vehicle_no();

        let _guard = self.lock.lock().await;
        let scope = self.repos.begin().await?;

        let session = scope
            .sessions()
            .find_active_by_vehicle(vehicle_no)
            .await?
            .ok_or_else(|| DomainError::NoActiveSession(vehicle_no.to_string()))?;

        let duration_minutes = elapsed_minutes(session.entry_time, now);
        let fee = self.fees.fee_for_minutes(duration_minutes);

        let closed = scope
            .sessions()
            .close(session.id, now, duration_minutes, fee)
            .await?;
        let slot = scope.slots().release(session.slot_id).await?;

        scope.commit().await?;

        Ok(ExitReceipt {
            session_id: closed.id,
            vehicle_no: closed.vehicle_no,
            slot_number: slot.slot_number,
            entry_time: closed.entry_time,
            exit_time: now,
            duration_minutes,
            fee,
        })
    }

    fn reject(&self, direction: &'static str, err: &DomainError) {
        metrics::counter!(
            "parking_gate_rejections_total",
            "direction" => direction,
            "kind" => err.kind()
        )
        .increment(1);
        if err.is_infrastructure() {
            warn!(direction, error = %err, "Gate transaction failed");
        } else {
            info!(direction, kind = err.kind(), "Gate transaction rejected: {}", err);
        }
    }

    async fn publish_availability(&self) {
        match self.repos.slots().counts().await {
            Ok(counts) => {
                metrics::gauge!("parking_slots_available").set(counts.available as f64)
            }
            Err(e) => warn!(error = %e, "Failed to read slot counts"),
        }
    }
}
