pub mod registry;
pub mod room;
pub mod timer;
