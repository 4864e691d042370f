//! Create reservation_rooms join table

use sea_orm_migration::prelude::*;

use super::m20240601_000002_create_rooms::Rooms;
use super::m20240601_000003_create_reservations::Reservations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReservationRooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReservationRooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReservationRooms::ReservationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationRooms::RoomId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationRooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_rooms_reservation")
                            .from(ReservationRooms::Table, ReservationRooms::ReservationId)
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_rooms_room")
                            .from(ReservationRooms::Table, ReservationRooms::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per (reservation, room)
        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_rooms_unique")
                    .table(ReservationRooms::Table)
                    .col(ReservationRooms::ReservationId)
                    .col(ReservationRooms::RoomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_rooms_room")
                    .table(ReservationRooms::Table)
                    .col(ReservationRooms::RoomId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReservationRooms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ReservationRooms {
    Table,
    Id,
    ReservationId,
    RoomId,
    UpdatedAt,
}
