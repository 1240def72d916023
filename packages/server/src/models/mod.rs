pub mod auth;
pub mod challenge;
pub mod import;
pub mod phase;
pub mod shared;
pub mod team;
