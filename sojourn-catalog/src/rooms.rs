use serde::{Deserialize, Serialize};

/// A bookable room category within a hotel. Quantities only ever move through
/// the guarded decrement in the booking store, so `quantity` never observes a
/// negative value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomType {
    pub name: String,
    pub capacity: u32,
    pub price_per_night_cents: i64,
    pub quantity: u32,
}

/// Room type exactly as the add-hotel form submits it: every numeric field is
/// a string. Validation happens here, once, so the rest of the system only
/// sees well-formed numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomTypeDraft {
    pub name: String,
    pub capacity: String,
    pub price: String,
    pub quantity: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("room type name must not be empty")]
    EmptyName,

    #[error("invalid price {0:?}: expected a non-negative amount with at most two decimals")]
    BadPrice(String),

    #[error("invalid {field} {value:?}: expected a non-negative whole number")]
    BadCount { field: &'static str, value: String },

    #[error("room capacity must be at least 1")]
    ZeroCapacity,
}

impl RoomTypeDraft {
    pub fn validate(self) -> Result<RoomType, RoomError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RoomError::EmptyName);
        }

        let capacity = parse_count("capacity", &self.capacity)?;
        if capacity == 0 {
            return Err(RoomError::ZeroCapacity);
        }
        let quantity = parse_count("quantity", &self.quantity)?;
        let price_per_night_cents = parse_money_cents(&self.price)?;

        Ok(RoomType {
            name,
            capacity,
            price_per_night_cents,
            quantity,
        })
    }
}

/// Parses a decimal amount like "150", "150.5" or "150.50" into cents.
/// Anything else is rejected; there is no NaN-to-zero fallback.
pub fn parse_money_cents(raw: &str) -> Result<i64, RoomError> {
    let s = raw.trim();
    let bad = || RoomError::BadPrice(raw.to_string());

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad());
    }
    if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad());
    }

    let whole: i64 = whole.parse().map_err(|_| bad())?;
    let frac_cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| bad())? * 10,
        _ => frac.parse().map_err(|_| bad())?,
    };

    Ok(whole * 100 + frac_cents)
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, RoomError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| RoomError::BadCount {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, capacity: &str, price: &str, quantity: &str) -> RoomTypeDraft {
        RoomTypeDraft {
            name: name.to_string(),
            capacity: capacity.to_string(),
            price: price.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn parses_whole_and_fractional_prices() {
        assert_eq!(parse_money_cents("150").unwrap(), 15000);
        assert_eq!(parse_money_cents("150.5").unwrap(), 15050);
        assert_eq!(parse_money_cents("150.50").unwrap(), 15050);
        assert_eq!(parse_money_cents("0.99").unwrap(), 99);
    }

    #[test]
    fn rejects_malformed_prices() {
        for raw in ["", "abc", "-3", "12.345", "1,000", ".50", "1."] {
            assert!(parse_money_cents(raw).is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn validates_a_complete_draft() {
        let room = draft("Deluxe", "2", "150", "2").validate().unwrap();
        assert_eq!(room.name, "Deluxe");
        assert_eq!(room.capacity, 2);
        assert_eq!(room.price_per_night_cents, 15000);
        assert_eq!(room.quantity, 2);
    }

    #[test]
    fn rejects_bad_counts_and_names() {
        assert!(draft("", "2", "100", "1").validate().is_err());
        assert!(draft("Twin", "two", "100", "1").validate().is_err());
        assert!(draft("Twin", "0", "100", "1").validate().is_err());
        assert!(draft("Twin", "2", "100", "-1").validate().is_err());
    }
}
