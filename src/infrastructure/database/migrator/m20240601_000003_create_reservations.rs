//! Create reservations table
//!
//! Stay dates are calendar dates; the (from_date, to_date) index serves the
//! overlap lookups done before every booking write.

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::GuestName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::TotalPerson)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::TotalPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::FromDate).date().not_null())
                    .col(ColumnDef::new(Reservations::ToDate).date().not_null())
                    .col(ColumnDef::new(Reservations::CheckinTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Reservations::CheckoutTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("reserved"),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_user")
                            .from(Reservations::Table, Reservations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_stay")
                    .table(Reservations::Table)
                    .col(Reservations::FromDate)
                    .col(Reservations::ToDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    UserId,
    GuestName,
    TotalPerson,
    TotalPrice,
    FromDate,
    ToDate,
    CheckinTime,
    CheckoutTime,
    Status,
    CreatedAt,
    UpdatedAt,
}
