#![allow(clippy::new_without_default)]

pub mod q_shared;
pub mod common;
pub mod cvar;
