//! Curriculum pacing-guide lookup: load district pacing sheets, derive the
//! district → school → grade option cascade and find what is being taught
//! on a given date.

pub mod config;
pub mod data;
pub mod error;
pub mod state;
