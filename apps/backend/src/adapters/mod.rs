pub mod draft_store_sea;
pub mod notifications_sea;

pub use draft_store_sea::SeaDraftStore;
pub use notifications_sea::SeaNotificationSink;
