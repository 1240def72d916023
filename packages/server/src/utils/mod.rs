pub mod filename;
pub mod hash;
pub mod jwt;
pub mod teams;
