pub mod dates;
pub mod models;
pub mod repository;
pub mod service;

pub use dates::{DayMarker, RangeSelector};
pub use models::{Booking, BookingStatus, Notification, NotificationKind, StaySummary};
pub use repository::{BookingRepository, NotificationRepository, UserProfile, UserRepository};
pub use service::{BookingService, ConsoleBooking, SubmitBooking};
