//! Request extractors shared by handlers.

pub mod acting_user;
