//! Room entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub room_number: String,

    /// Nightly price in minor currency units
    pub price: i64,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation_room::Entity")]
    ReservationRooms,
}

impl Related<super::reservation_room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReservationRooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
