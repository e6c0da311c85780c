//! Vehicle registry service: registration, lookup, listing and deletion

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::application::GateLock;
use crate::domain::vehicle::issue_code;
use crate::domain::{DomainError, DomainResult, NewVehicle, RepositoryProvider, ScanCode, Vehicle};

/// Regenerations allowed when a freshly derived issued code is already taken
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Registration request, before normalization
#[derive(Debug, Clone, Default)]
pub struct RegisterVehicle {
    pub name: String,
    pub vehicle_no: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Outcome of a successful registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub vehicle: Vehicle,
    /// String handed to the external code renderer
    pub scan_payload: String,
}

pub struct VehicleRegistryService {
    repos: Arc<dyn RepositoryProvider>,
    gate_lock: GateLock,
    code_prefix: String,
    code_length: usize,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl VehicleRegistryService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        gate_lock: GateLock,
        code_prefix: impl Into<String>,
        code_length: usize,
    ) -> Self {
        Self {
            repos,
            gate_lock,
            code_prefix: code_prefix.into(),
            code_length,
        }
    }

    fn normalize(input: RegisterVehicle) -> DomainResult<RegisterVehicle> {
        let name = input.name.trim().to_string();
        let vehicle_no = input.vehicle_no.trim().to_string();

        if name.is_empty() || vehicle_no.is_empty() {
            return Err(DomainError::Validation(
                "Name and Vehicle Number are required".to_string(),
            ));
        }
        if !ScanCode::is_encodable(&vehicle_no) {
            return Err(DomainError::Validation(
                "Vehicle Number must not contain ':'".to_string(),
            ));
        }

        let email = non_empty(input.email);
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(DomainError::Validation(format!("Invalid email: {}", email)));
            }
        }

        Ok(RegisterVehicle {
            name,
            vehicle_no,
            phone: non_empty(input.phone),
            email,
        })
    }

    /// Register a vehicle and derive its issued code and scan payload.
    ///
    /// Every write to the store is serialized by the gate lock: SQLite
    /// answers a second writer upgrading from a read lock with SQLITE_BUSY
    /// instead of waiting.
    pub async fn register(&self, input: RegisterVehicle) -> DomainResult<Registration> {
        let input = Self::normalize(input)?;

        let _guard = self.gate_lock.lock().await;
        let scope = self.repos.begin().await?;
        let vehicles = scope.vehicles();
        if vehicles.find_by_vehicle_no(&input.vehicle_no).await?.is_some() {
            return Err(DomainError::DuplicateVehicle(input.vehicle_no));
        }

        let now = Utc::now();
        let mut issued_code = None;
        for attempt in 0..MAX_CODE_ATTEMPTS {
            let candidate = issue_code(&input.vehicle_no, now, attempt, self.code_length);
            if !vehicles.issued_code_exists(&candidate).await? {
                issued_code = Some(candidate);
                break;
            }
            warn!(vehicle_no = %input.vehicle_no, attempt, "Issued code collision, regenerating");
        }
        let issued_code = issued_code.ok_or_else(|| {
            DomainError::InvalidState(format!(
                "could not derive a unique issued code for {}",
                input.vehicle_no
            ))
        })?;

        let vehicle = vehicles
            .insert(NewVehicle {
                name: input.name,
                vehicle_no: input.vehicle_no,
                issued_code,
                phone: input.phone,
                email: input.email,
                created_at: now,
            })
            .await?;
        scope.commit().await?;

        metrics::counter!("parking_registrations_total").increment(1);
        info!(
            vehicle_id = vehicle.id,
            vehicle_no = %vehicle.vehicle_no,
            "Vehicle registered"
        );

        let scan_payload = ScanCode::payload(&self.code_prefix, &vehicle.vehicle_no, now);
        Ok(Registration {
            vehicle,
            scan_payload,
        })
    }

    pub async fn lookup(&self, vehicle_no: &str) -> DomainResult<Option<Vehicle>> {
        self.repos.vehicles().find_by_vehicle_no(vehicle_no.trim()).await
    }

    /// All vehicles, newest registration first
    pub async fn list(&self) -> DomainResult<Vec<Vehicle>> {
        self.repos.vehicles().list().await
    }

    /// Delete a vehicle unless it is currently parked. Runs under the gate
    /// lock so the active-session check cannot race an entry.
    pub async fn delete(&self, vehicle_id: i32) -> DomainResult<()> {
        let _guard = self.gate_lock.lock().await;
        let scope = self.repos.begin().await?;

        let vehicle = scope
            .vehicles()
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", vehicle_id))?;

        if scope
            .sessions()
            .find_active_by_vehicle(&vehicle.vehicle_no)
            .await?
            .is_some()
        {
            return Err(DomainError::HasActiveSession(vehicle.vehicle_no));
        }

        scope.vehicles().delete(vehicle_id).await?;
        scope.commit().await?;

        info!(vehicle_id, vehicle_no = %vehicle.vehicle_no, "Vehicle deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{alice, harness, vehicle};

    #[tokio::test]
    async fn register_trims_and_issues_code() {
        let h = harness(5).await;
        let mut input = alice();
        input.name = "  Alice ".into();
        input.vehicle_no = " KA-01-1234 ".into();
        input.phone = Some("   ".into());

        let reg = h.registry.register(input).await.unwrap();
        assert_eq!(reg.vehicle.name, "Alice");
        assert_eq!(reg.vehicle.vehicle_no, "KA-01-1234");
        assert_eq!(reg.vehicle.phone, None);
        assert_eq!(reg.vehicle.issued_code.len(), 16);
        assert!(reg.scan_payload.starts_with("PARKING:KA-01-1234:"));

        let code = ScanCode::parse(&reg.scan_payload, "PARKING").unwrap();
        assert_eq!(code.vehicle_no(), "KA-01-1234");
    }

    #[tokio::test]
    async fn register_waits_for_the_gate_lock() {
        let h = std::sync::Arc::new(harness(5).await);
        let guard = h.lock.lock().await;

        let pending = {
            let h = h.clone();
            tokio::spawn(async move { h.registry.register(alice()).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!pending.is_finished());
        assert!(h.registry.lookup("KA-01-1234").await.unwrap().is_none());

        drop(guard);
        let reg = pending.await.unwrap().unwrap();
        assert_eq!(reg.vehicle.vehicle_no, "KA-01-1234");
    }

    #[tokio::test]
    async fn duplicate_plate_is_rejected() {
        let h = harness(5).await;
        h.registry.register(alice()).await.unwrap();
        let err = h
            .registry
            .register(vehicle("Bob", "KA-01-1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateVehicle(_)));
        assert_eq!(h.registry.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_fields_fail_validation() {
        let h = harness(5).await;
        for input in [vehicle("", "KA-01"), vehicle("Bob", "   "), vehicle("Bob", "A:B")] {
            assert!(matches!(
                h.registry.register(input).await,
                Err(DomainError::Validation(_))
            ));
        }

        let mut bad_email = alice();
        bad_email.email = Some("not-an-email".into());
        assert!(matches!(
            h.registry.register(bad_email).await,
            Err(DomainError::Validation(_))
        ));
        assert!(h.registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn issued_codes_differ_for_shared_plate_prefix() {
        let h = harness(5).await;
        let a = h
            .registry
            .register(vehicle("A", "KA-01-AAAAAAAAAAAAAAAAAAAA-1"))
            .await
            .unwrap();
        let b = h
            .registry
            .register(vehicle("B", "KA-01-AAAAAAAAAAAAAAAAAAAA-2"))
            .await
            .unwrap();
        assert_ne!(a.vehicle.issued_code, b.vehicle.issued_code);
    }

    #[tokio::test]
    async fn lookup_and_list() {
        let h = harness(5).await;
        h.registry.register(vehicle("A", "P-1")).await.unwrap();
        h.registry.register(vehicle("B", "P-2")).await.unwrap();

        assert_eq!(h.registry.lookup(" P-1 ").await.unwrap().unwrap().name, "A");
        assert!(h.registry.lookup("P-3").await.unwrap().is_none());

        let listed: Vec<_> = h
            .registry
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.vehicle_no)
            .collect();
        assert_eq!(listed, vec!["P-2", "P-1"]);
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let h = harness(5).await;
        assert!(matches!(
            h.registry.delete(42).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_parked_vehicle_is_refused() {
        let h = harness(5).await;
        let reg = h.registry.register(alice()).await.unwrap();
        h.gate.enter(&reg.scan_payload).await.unwrap();

        let err = h.registry.delete(reg.vehicle.id).await.unwrap_err();
        assert!(matches!(err, DomainError::HasActiveSession(_)));
        assert!(h.registry.lookup("KA-01-1234").await.unwrap().is_some());

        h.gate.exit(&reg.scan_payload).await.unwrap();
        h.registry.delete(reg.vehicle.id).await.unwrap();
        assert!(h.registry.lookup("KA-01-1234").await.unwrap().is_none());
    }
}
