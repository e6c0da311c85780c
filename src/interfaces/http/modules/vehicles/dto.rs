//! Vehicle DTOs

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{RegisterVehicle, Registration};
use crate::domain::Vehicle;

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

/// Registration form. Required fields are checked for emptiness by the
/// registry so a blank name reports the same error from every front-end.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterVehicleRequest {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub vehicle_no: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email)]
    pub email: Option<String>,
}

impl From<RegisterVehicleRequest> for RegisterVehicle {
    fn from(r: RegisterVehicleRequest) -> Self {
        Self {
            name: r.name,
            vehicle_no: r.vehicle_no,
            phone: r.phone,
            email: r.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterVehicleResponse {
    pub vehicle_id: i32,
    pub name: String,
    pub vehicle_no: String,
    pub issued_code: String,
    /// Payload to render as the vehicle's QR code
    pub qr_data: String,
}

impl From<Registration> for RegisterVehicleResponse {
    fn from(r: Registration) -> Self {
        Self {
            vehicle_id: r.vehicle.id,
            name: r.vehicle.name,
            vehicle_no: r.vehicle.vehicle_no,
            issued_code: r.vehicle.issued_code,
            qr_data: r.scan_payload,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleDto {
    pub id: i32,
    pub name: String,
    pub vehicle_no: String,
    pub issued_code: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
}

impl From<Vehicle> for VehicleDto {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            name: v.name,
            vehicle_no: v.vehicle_no,
            issued_code: v.issued_code,
            phone: v.phone,
            email: v.email,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleListResponse {
    pub users: Vec<VehicleDto>,
}
