//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: String,
    pub guest_name: String,
    pub total_person: i32,
    pub total_price: i64,

    pub from_date: Date,
    pub to_date: Date,

    #[sea_orm(nullable)]
    pub checkin_time: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub checkout_time: Option<DateTimeUtc>,

    /// Reservation status: reserved, checked_in, checked_out
    pub status: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::reservation_room::Entity")]
    ReservationRooms,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::reservation_room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReservationRooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
