mod common;

mod challenge;
mod phase;
