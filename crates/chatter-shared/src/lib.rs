//! # chatter-shared
//!
//! Domain identifier types and constants shared by every Chatter crate.

pub mod constants;
pub mod types;
