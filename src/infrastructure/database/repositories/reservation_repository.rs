//! SeaORM implementation of ReservationRepository
//!
//! Every write opens a transaction, repeats the overlap query inside it and
//! only then touches `reservations` / `reservation_rooms`. Returning early
//! with `?` drops the transaction, which rolls it back.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use tracing::debug;

use super::room_repository::room_model_to_domain;
use crate::domain::reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationRepository, ReservationStatus,
    ReservationWithRooms, StayRange,
};
use crate::domain::{DomainError, DomainResult, Room};
use crate::infrastructure::database::entities::{reservation, reservation_room, room};
use crate::support::PaginatedResult;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        user_id: m.user_id,
        guest_name: m.guest_name,
        total_person: m.total_person,
        total_price: m.total_price,
        from_date: m.from_date,
        to_date: m.to_date,
        checkin_time: m.checkin_time,
        checkout_time: m.checkout_time,
        status: ReservationStatus::from_str(&m.status),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

// ── Query helpers ───────────────────────────────────────────────

/// Stored stays that intersect `stay`: starting inside it, ending inside it,
/// or spanning it.
fn overlap_condition(stay: StayRange) -> Condition {
    use reservation::Column;

    Condition::any()
        .add(
            Condition::all()
                .add(Column::FromDate.gte(stay.from))
                .add(Column::FromDate.lte(stay.to)),
        )
        .add(
            Condition::all()
                .add(Column::ToDate.gte(stay.from))
                .add(Column::ToDate.lte(stay.to)),
        )
        .add(
            Condition::all()
                .add(Column::FromDate.lte(stay.from))
                .add(Column::ToDate.gte(stay.to)),
        )
}

async fn overlapping_on<C: ConnectionTrait>(
    conn: &C,
    room_id: i32,
    stay: StayRange,
    exclude: Option<i32>,
) -> Result<Vec<reservation::Model>, DbErr> {
    let mut query = reservation::Entity::find()
        .join(
            sea_orm::JoinType::InnerJoin,
            reservation::Relation::ReservationRooms.def(),
        )
        .filter(reservation_room::Column::RoomId.eq(room_id))
        .filter(overlap_condition(stay));

    if let Some(id) = exclude {
        query = query.filter(reservation::Column::Id.ne(id));
    }

    query.order_by_asc(reservation::Column::Id).all(conn).await
}

/// Fail with `RoomUnavailable` naming every room in `room_ids` that already
/// has an overlapping stay.
async fn ensure_rooms_free<C: ConnectionTrait>(
    conn: &C,
    room_ids: &[i32],
    stay: StayRange,
    exclude: Option<i32>,
) -> DomainResult<()> {
    let rooms = room::Entity::find()
        .filter(room::Column::Id.is_in(room_ids.iter().copied()))
        .order_by_asc(room::Column::RoomNumber)
        .all(conn)
        .await?;

    let mut taken = Vec::new();
    for r in rooms {
        if !overlapping_on(conn, r.id, stay, exclude).await?.is_empty() {
            taken.push(r.room_number);
        }
    }

    if taken.is_empty() {
        Ok(())
    } else {
        Err(DomainError::RoomUnavailable { rooms: taken })
    }
}

async fn delete_associations<C: ConnectionTrait>(
    conn: &C,
    reservation_id: i32,
) -> Result<u64, DbErr> {
    let res = reservation_room::Entity::delete_many()
        .filter(reservation_room::Column::ReservationId.eq(reservation_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// Delete-all-then-insert; the last writer's room set wins.
async fn replace_room_associations<C: ConnectionTrait>(
    conn: &C,
    reservation_id: i32,
    room_ids: &[i32],
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    delete_associations(conn, reservation_id).await?;
    if room_ids.is_empty() {
        return Ok(());
    }

    let rows = room_ids.iter().map(|&room_id| reservation_room::ActiveModel {
        id: NotSet,
        reservation_id: Set(reservation_id),
        room_id: Set(room_id),
        updated_at: Set(now),
    });
    reservation_room::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

/// Rooms of each reservation in `reservation_ids`, ordered by room number
async fn rooms_by_reservation<C: ConnectionTrait>(
    conn: &C,
    reservation_ids: &[i32],
) -> Result<HashMap<i32, Vec<Room>>, DbErr> {
    let mut out: HashMap<i32, Vec<Room>> = HashMap::new();
    if reservation_ids.is_empty() {
        return Ok(out);
    }

    let links = reservation_room::Entity::find()
        .filter(reservation_room::Column::ReservationId.is_in(reservation_ids.iter().copied()))
        .find_also_related(room::Entity)
        .all(conn)
        .await?;

    for (link, room) in links {
        if let Some(room) = room {
            out.entry(link.reservation_id)
                .or_default()
                .push(room_model_to_domain(room));
        }
    }
    for rooms in out.values_mut() {
        rooms.sort_by(|a, b| a.number.cmp(&b.number));
    }
    Ok(out)
}

async fn with_rooms<C: ConnectionTrait>(
    conn: &C,
    model: reservation::Model,
) -> Result<ReservationWithRooms, DbErr> {
    let rooms = rooms_by_reservation(conn, &[model.id])
        .await?
        .remove(&model.id)
        .unwrap_or_default();
    Ok(ReservationWithRooms {
        reservation: model_to_domain(model),
        rooms,
    })
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ReservationWithRooms>> {
        let Some(model) = reservation::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(with_rooms(&self.db, model).await?))
    }

    async fn find_overlapping(
        &self,
        room_id: i32,
        stay: StayRange,
        exclude: Option<i32>,
    ) -> DomainResult<Vec<Reservation>> {
        let models = overlapping_on(&self.db, room_id, stay, exclude).await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn create(
        &self,
        r: NewReservation,
        room_ids: &[i32],
    ) -> DomainResult<ReservationWithRooms> {
        debug!(guest = %r.guest_name, rooms = ?room_ids, "Creating reservation");

        let txn = self.db.begin().await?;
        ensure_rooms_free(&txn, room_ids, r.stay(), None).await?;

        let now = Utc::now();
        let model = reservation::ActiveModel {
            id: NotSet,
            user_id: Set(r.user_id),
            guest_name: Set(r.guest_name),
            total_person: Set(r.total_person),
            total_price: Set(r.total_price),
            from_date: Set(r.from_date),
            to_date: Set(r.to_date),
            checkin_time: Set(r.checkin_time),
            checkout_time: Set(r.checkout_time),
            status: Set(r.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model.insert(&txn).await?;
        replace_room_associations(&txn, saved.id, room_ids, now).await?;

        let result = with_rooms(&txn, saved).await?;
        txn.commit().await?;
        Ok(result)
    }

    async fn update(
        &self,
        r: Reservation,
        room_ids: &[i32],
    ) -> DomainResult<ReservationWithRooms> {
        debug!(reservation_id = r.id, rooms = ?room_ids, "Updating reservation");

        let txn = self.db.begin().await?;
        let Some(existing) = reservation::Entity::find_by_id(r.id).one(&txn).await? else {
            return Err(DomainError::reservation_not_found(r.id));
        };
        ensure_rooms_free(&txn, room_ids, r.stay(), Some(r.id)).await?;

        let now = Utc::now();
        let mut active: reservation::ActiveModel = existing.into();
        active.guest_name = Set(r.guest_name);
        active.total_person = Set(r.total_person);
        active.total_price = Set(r.total_price);
        active.from_date = Set(r.from_date);
        active.to_date = Set(r.to_date);
        active.checkin_time = Set(r.checkin_time);
        active.checkout_time = Set(r.checkout_time);
        active.status = Set(r.status.as_str().to_string());
        active.updated_at = Set(now);
        let saved = active.update(&txn).await?;
        replace_room_associations(&txn, saved.id, room_ids, now).await?;

        let result = with_rooms(&txn, saved).await?;
        txn.commit().await?;
        Ok(result)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        debug!(reservation_id = id, "Deleting reservation");

        let txn = self.db.begin().await?;
        if reservation::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::reservation_not_found(id));
        }
        let links = delete_associations(&txn, id).await?;
        reservation::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        debug!(reservation_id = id, links, "Reservation deleted");
        Ok(())
    }

    async fn paginate(
        &self,
        filter: ReservationFilter,
        page: u32,
        page_size: u32,
    ) -> DomainResult<PaginatedResult<ReservationWithRooms>> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        // Overlap with the filter bounds; a missing bound is open-ended
        let mut query = reservation::Entity::find();
        if let Some(from) = filter.from_date {
            query = query.filter(reservation::Column::ToDate.gte(from));
        }
        if let Some(to) = filter.to_date {
            query = query.filter(reservation::Column::FromDate.lte(to));
        }

        let paginator = query
            .order_by_desc(reservation::Column::Id)
            .paginate(&self.db, u64::from(page_size));
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(u64::from(page - 1)).await?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut rooms = rooms_by_reservation(&self.db, &ids).await?;
        let items = models
            .into_iter()
            .map(|m| {
                let rooms = rooms.remove(&m.id).unwrap_or_default();
                ReservationWithRooms {
                    reservation: model_to_domain(m),
                    rooms,
                }
            })
            .collect();

        Ok(PaginatedResult::new(items, total, page, page_size))
    }
}

// ── Tests ──────────────────────────────────────────────────────
