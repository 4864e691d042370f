//! Plain-text booking emails

use crate::domain::ReservationWithRooms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    BookingCreated,
    BookingUpdated,
}

/// Rendered subject and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingEmail {
    pub subject: String,
    pub body: String,
}

pub fn render(kind: EmailKind, booking: &ReservationWithRooms) -> BookingEmail {
    let r = &booking.reservation;
    let (subject, opening) = match kind {
        EmailKind::BookingCreated => (
            format!("Booking confirmed: reservation #{}", r.id),
            "Thank you for your booking. Your reservation is confirmed.",
        ),
        EmailKind::BookingUpdated => (
            format!("Booking updated: reservation #{}", r.id),
            "Your reservation has been updated. The current details are below.",
        ),
    };

    let body = format!(
        "Dear {guest},\n\n\
         {opening}\n\n\
         Reservation: #{id}\n\
         Room(s):     {rooms}\n\
         Check-in:    {from}\n\
         Check-out:   {to}\n\
         Guests:      {persons}\n\
         Total price: {price}\n\n\
         We look forward to welcoming you.\n",
        guest = r.guest_name,
        id = r.id,
        rooms = booking.room_numbers().join(", "),
        from = r.from_date.format("%Y-%m-%d"),
        to = r.to_date.format("%Y-%m-%d"),
        persons = r.total_person,
        price = r.total_price,
    );

    BookingEmail { subject, body }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::domain::{Reservation, ReservationStatus, Room};

    fn booking() -> ReservationWithRooms {
        let now = Utc::now();
        ReservationWithRooms {
            reservation: Reservation {
                id: 42,
                user_id: "u-1".into(),
                guest_name: "Jane Doe".into(),
                total_person: 3,
                total_price: 75_000,
                from_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                to_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
                checkin_time: None,
                checkout_time: None,
                status: ReservationStatus::Reserved,
                created_at: now,
                updated_at: now,
            },
            rooms: vec![Room::new(1, "101", 10_000), Room::new(2, "102", 12_000)],
        }
    }

    #[test]
    fn created_email_lists_the_booking() {
        let email = render(EmailKind::BookingCreated, &booking());

        assert_eq!(email.subject, "Booking confirmed: reservation #42");
        assert!(email.body.starts_with("Dear Jane Doe,"));
        assert!(email.body.contains("Room(s):     101, 102"));
        assert!(email.body.contains("Check-in:    2024-06-01"));
        assert!(email.body.contains("Check-out:   2024-06-05"));
        assert!(email.body.contains("Guests:      3"));
        assert!(email.body.contains("Total price: 75000"));
    }

    #[test]
    fn updated_email_has_its_own_subject() {
        let email = render(EmailKind::BookingUpdated, &booking());
        assert_eq!(email.subject, "Booking updated: reservation #42");
        assert!(email.body.contains("has been updated"));
    }
}
