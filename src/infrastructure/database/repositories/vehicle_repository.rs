//! SeaORM implementation of VehicleRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};

use super::db_err;
use crate::domain::vehicle::{NewVehicle, Vehicle, VehicleRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::vehicle;

pub struct SeaOrmVehicleRepository {
    db: DatabaseConnection,
}

impl SeaOrmVehicleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: vehicle::Model) -> Vehicle {
    Vehicle {
        id: m.id,
        name: m.name,
        vehicle_no: m.vehicle_no,
        issued_code: m.issued_code,
        phone: m.phone,
        email: m.email,
        created_at: m.created_at,
    }
}

fn insert_err(e: sea_orm::DbErr, vehicle_no: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("issued_code") => {
            DomainError::InvalidState(format!("issued code collision for {}", vehicle_no))
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::DuplicateVehicle(vehicle_no.to_string())
        }
        _ => db_err(e),
    }
}

pub(crate) async fn insert<C: ConnectionTrait>(conn: &C, v: NewVehicle) -> DomainResult<Vehicle> {
    debug!("Registering vehicle: {}", v.vehicle_no);
    let vehicle_no = v.vehicle_no.clone();

    let model = vehicle::ActiveModel {
        name: Set(v.name),
        vehicle_no: Set(v.vehicle_no),
        issued_code: Set(v.issued_code),
        phone: Set(v.phone),
        email: Set(v.email),
        created_at: Set(v.created_at),
        ..Default::default()
    };

    let inserted = model
        .insert(conn)
        .await
        .map_err(|e| insert_err(e, &vehicle_no))?;
    Ok(model_to_domain(inserted))
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> DomainResult<Option<Vehicle>> {
    let found = vehicle::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_err)?;
    Ok(found.map(model_to_domain))
}

pub(crate) async fn find_by_vehicle_no<C: ConnectionTrait>(
    conn: &C,
    vehicle_no: &str,
) -> DomainResult<Option<Vehicle>> {
    let found = vehicle::Entity::find()
        .filter(vehicle::Column::VehicleNo.eq(vehicle_no))
        .one(conn)
        .await
        .map_err(db_err)?;
    Ok(found.map(model_to_domain))
}

pub(crate) async fn issued_code_exists<C: ConnectionTrait>(
    conn: &C,
    issued_code: &str,
) -> DomainResult<bool> {
    let n = vehicle::Entity::find()
        .filter(vehicle::Column::IssuedCode.eq(issued_code))
        .count(conn)
        .await
        .map_err(db_err)?;
    Ok(n > 0)
}

pub(crate) async fn list<C: ConnectionTrait>(conn: &C) -> DomainResult<Vec<Vehicle>> {
    let rows = vehicle::Entity::find()
        .order_by_desc(vehicle::Column::CreatedAt)
        .order_by_desc(vehicle::Column::Id)
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(rows.into_iter().map(model_to_domain).collect())
}

pub(crate) async fn count<C: ConnectionTrait>(conn: &C) -> DomainResult<u64> {
    vehicle::Entity::find().count(conn).await.map_err(db_err)
}

pub(crate) async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> DomainResult<()> {
    debug!("Deleting vehicle: {}", id);
    let result = vehicle::Entity::delete_by_id(id)
        .exec(conn)
        .await
        .map_err(db_err)?;
    if result.rows_affected == 0 {
        return Err(DomainError::not_found("Vehicle", "id", id));
    }
    Ok(())
}

#[async_trait]
impl VehicleRepository for SeaOrmVehicleRepository {
    async fn insert(&self, vehicle: NewVehicle) -> DomainResult<Vehicle> {
        insert(&self.db, vehicle).await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Vehicle>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_vehicle_no(&self, vehicle_no: &str) -> DomainResult<Option<Vehicle>> {
        find_by_vehicle_no(&self.db, vehicle_no).await
    }

    async fn issued_code_exists(&self, issued_code: &str) -> DomainResult<bool> {
        issued_code_exists(&self.db, issued_code).await
    }

    async fn list(&self) -> DomainResult<Vec<Vehicle>> {
        list(&self.db).await
    }

    async fn count(&self) -> DomainResult<u64> {
        count(&self.db).await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        delete(&self.db, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::testing::memory_db;
    use chrono::{Duration, Utc};

    fn new_vehicle(vehicle_no: &str, code: &str) -> NewVehicle {
        NewVehicle {
            name: "Asha".into(),
            vehicle_no: vehicle_no.into(),
            issued_code: code.into(),
            phone: None,
            email: Some("asha@example.com".into()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let repo = SeaOrmVehicleRepository::new(memory_db().await);
        let saved = repo.insert(new_vehicle("KA-01-1234", "ABC")).await.unwrap();

        let by_no = repo.find_by_vehicle_no("KA-01-1234").await.unwrap().unwrap();
        assert_eq!(by_no, saved);
        assert_eq!(by_no.email.as_deref(), Some("asha@example.com"));
        assert!(repo.find_by_id(saved.id).await.unwrap().is_some());
        assert!(repo.issued_code_exists("ABC").await.unwrap());
        assert!(!repo.issued_code_exists("XYZ").await.unwrap());
        assert!(repo.find_by_vehicle_no("ka-01-1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_plate_is_rejected() {
        let repo = SeaOrmVehicleRepository::new(memory_db().await);
        repo.insert(new_vehicle("KA-01-1234", "ABC")).await.unwrap();
        let err = repo.insert(new_vehicle("KA-01-1234", "DEF")).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateVehicle(ref v) if v == "KA-01-1234"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn issued_code_collision_is_not_reported_as_duplicate() {
        let repo = SeaOrmVehicleRepository::new(memory_db().await);
        repo.insert(new_vehicle("A-1", "SAME")).await.unwrap();
        let err = repo.insert(new_vehicle("B-2", "SAME")).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = SeaOrmVehicleRepository::new(memory_db().await);
        let mut older = new_vehicle("OLD-1", "C1");
        older.created_at = Utc::now() - Duration::hours(1);
        repo.insert(older).await.unwrap();
        repo.insert(new_vehicle("NEW-1", "C2")).await.unwrap();

        let plates: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.vehicle_no)
            .collect();
        assert_eq!(plates, vec!["NEW-1", "OLD-1"]);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = SeaOrmVehicleRepository::new(memory_db().await);
        let saved = repo.insert(new_vehicle("KA-01-1234", "ABC")).await.unwrap();
        repo.delete(saved.id).await.unwrap();
        assert!(matches!(
            repo.delete(saved.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
