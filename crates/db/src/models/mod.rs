//! Row models and insert DTOs for every table this service reads or owns.

pub mod message;
pub mod notification;
pub mod payment;
pub mod profile;
pub mod project;
