use std::collections::BTreeSet;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rooms::{RoomError, RoomType, RoomTypeDraft};

/// The hotel aggregate. Room types stay ordered as the owner entered them;
/// amenities are a deduplicated tag set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub room_types: Vec<RoomType>,
    pub amenities: BTreeSet<String>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Hotel {
    pub fn room_type(&self, name: &str) -> Option<&RoomType> {
        self.room_types.iter().find(|r| r.name == name)
    }
}

/// Add-hotel form payload. Room fields arrive stringly and get
/// parsed-or-rejected in `validate`.
#[derive(Debug, Clone, Deserialize)]
pub struct HotelDraft {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub room_types: Vec<RoomTypeDraft>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum HotelError {
    #[error("hotel name must not be empty")]
    EmptyName,

    #[error("a hotel needs at least one room type")]
    NoRoomTypes,

    #[error("duplicate room type {0:?}")]
    DuplicateRoomType(String),

    #[error("invalid time {0:?}: expected HH:MM")]
    BadTime(String),

    #[error(transparent)]
    Room(#[from] RoomError),
}

impl HotelDraft {
    pub fn validate(self, owner_id: &str, now: DateTime<Utc>) -> Result<Hotel, HotelError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(HotelError::EmptyName);
        }
        if self.room_types.is_empty() {
            return Err(HotelError::NoRoomTypes);
        }

        let mut room_types = Vec::with_capacity(self.room_types.len());
        for draft in self.room_types {
            let room = draft.validate()?;
            if room_types.iter().any(|r: &RoomType| r.name == room.name) {
                return Err(HotelError::DuplicateRoomType(room.name));
            }
            room_types.push(room);
        }

        let amenities = self
            .amenities
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        Ok(Hotel {
            id: Uuid::new_v4(),
            name,
            description: self.description,
            location: self.location,
            room_types,
            amenities,
            open_time: parse_time(self.open_time)?,
            close_time: parse_time(self.close_time)?,
            owner_id: owner_id.to_string(),
            created_at: now,
        })
    }
}

fn parse_time(raw: Option<String>) -> Result<Option<NaiveTime>, HotelError> {
    match raw {
        None => Ok(None),
        Some(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Some)
            .map_err(|_| HotelError::BadTime(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_draft() -> HotelDraft {
        HotelDraft {
            name: "Seaside Inn".to_string(),
            description: Some("On the beach".to_string()),
            location: Some("Galle".to_string()),
            room_types: vec![RoomTypeDraft {
                name: "Deluxe".to_string(),
                capacity: "2".to_string(),
                price: "150".to_string(),
                quantity: "2".to_string(),
            }],
            amenities: vec!["wifi".to_string(), "pool".to_string(), "wifi".to_string()],
            open_time: Some("08:00".to_string()),
            close_time: Some("22:00".to_string()),
        }
    }

    #[test]
    fn validates_and_dedupes_amenities() {
        let hotel = base_draft().validate("owner-1", Utc::now()).unwrap();
        assert_eq!(hotel.amenities.len(), 2);
        assert_eq!(hotel.room_types.len(), 1);
        assert_eq!(hotel.owner_id, "owner-1");
        assert!(hotel.room_type("Deluxe").is_some());
        assert!(hotel.room_type("Suite").is_none());
    }

    #[test]
    fn rejects_empty_room_list_and_bad_time() {
        let mut draft = base_draft();
        draft.room_types.clear();
        assert!(matches!(
            draft.validate("owner-1", Utc::now()),
            Err(HotelError::NoRoomTypes)
        ));

        let mut draft = base_draft();
        draft.open_time = Some("8 o'clock".to_string());
        assert!(matches!(
            draft.validate("owner-1", Utc::now()),
            Err(HotelError::BadTime(_))
        ));
    }

    #[test]
    fn rejects_duplicate_room_names() {
        let mut draft = base_draft();
        draft.room_types.push(RoomTypeDraft {
            name: "Deluxe".to_string(),
            capacity: "3".to_string(),
            price: "200".to_string(),
            quantity: "1".to_string(),
        });
        assert!(matches!(
            draft.validate("owner-1", Utc::now()),
            Err(HotelError::DuplicateRoomType(_))
        ));
    }
}
