pub mod actor;
pub mod appointment;
pub mod booking;
pub mod slot;
