//! Create parking_sessions table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_vehicles::Vehicles;
use super::m20240101_000002_create_slots::Slots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingSessions::VehicleId).integer())
                    .col(
                        ColumnDef::new(ParkingSessions::VehicleNo)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::SlotId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::EntryTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingSessions::ExitTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(ParkingSessions::DurationMinutes).big_integer())
                    .col(ColumnDef::new(ParkingSessions::Fee).double())
                    .col(
                        ColumnDef::new(ParkingSessions::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_sessions_vehicle")
                            .from(ParkingSessions::Table, ParkingSessions::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_sessions_slot")
                            .from(ParkingSessions::Table, ParkingSessions::SlotId)
                            .to(Slots::Table, Slots::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Active-session lookup by plate on every gate event
        manager
            .create_index(
                Index::create()
                    .name("idx_parking_sessions_vehicle_status")
                    .table(ParkingSessions::Table)
                    .col(ParkingSessions::VehicleNo)
                    .col(ParkingSessions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_sessions_entry_time")
                    .table(ParkingSessions::Table)
                    .col(ParkingSessions::EntryTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSessions {
    Table,
    Id,
    VehicleId,
    VehicleNo,
    SlotId,
    EntryTime,
    ExitTime,
    DurationMinutes,
    Fee,
    Status,
}
