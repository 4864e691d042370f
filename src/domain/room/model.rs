//! Room domain entity

/// Hotel room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: i32,
    /// Human-facing room number, e.g. "101"
    pub number: String,
    /// Nightly price in minor currency units
    pub price: i64,
}

impl Room {
    pub fn new(id: i32, number: impl Into<String>, price: i64) -> Self {
        Self {
            id,
            number: number.into(),
            price,
        }
    }
}
