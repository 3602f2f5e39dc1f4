use crate::{
    database_id::DatabaseId,
    ledger::{Money, check_amount},
    validation::ValidationError,
};

pub type RoomId = DatabaseId;

/// A room of the mosque that can be booked, e.g. the main hall.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    /// The unique name of the room.
    pub name: String,
    /// How many people fit in the room.
    pub capacity: u32,
    /// The fee for renting the room for one day.
    pub rental_rate: Money,
    /// Whether the room is offered to outside renters.
    pub available_for_rent: bool,
    pub rules: String,
    pub facilities: String,
}

/// The fields needed to create or update a room.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoom {
    pub name: String,
    pub capacity: u32,
    pub rental_rate: Money,
    pub available_for_rent: bool,
    pub rules: String,
    pub facilities: String,
}

impl NewRoom {
    /// # Errors
    /// Returns a [ValidationError] if the name is blank or the rate is
    /// negative or too large.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }

        check_amount(self.rental_rate)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ledger::MAX_AMOUNT, validation::ValidationError};

    use super::NewRoom;

    fn new_room(name: &str, rental_rate: i64) -> NewRoom {
        NewRoom {
            name: name.to_owned(),
            capacity: 500,
            rental_rate,
            available_for_rent: true,
            rules: String::new(),
            facilities: String::new(),
        }
    }

    #[test]
    fn accepts_named_room() {
        assert_eq!(new_room("Aula Utama", 2_500_000).validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(
            new_room(" ", 0).validate(),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn rejects_negative_rate() {
        assert_eq!(
            new_room("Aula Utama", -1).validate(),
            Err(ValidationError::NegativeAmount(-1))
        );
    }

    #[test]
    fn rejects_rate_above_limit() {
        assert_eq!(
            new_room("Aula Utama", MAX_AMOUNT + 1).validate(),
            Err(ValidationError::AmountTooLarge(MAX_AMOUNT + 1))
        );
    }
}
