pub mod hotel;
pub mod pricing;
pub mod repository;
pub mod rooms;

pub use hotel::{Hotel, HotelDraft};
pub use pricing::Quote;
pub use repository::HotelRepository;
pub use rooms::{RoomType, RoomTypeDraft};
