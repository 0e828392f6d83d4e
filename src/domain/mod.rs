pub mod events;

pub use events::NotificationEvent;
