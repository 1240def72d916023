pub mod assets;
pub mod auth;
pub mod challenge;
pub mod import;
pub mod phase;
pub mod team;
