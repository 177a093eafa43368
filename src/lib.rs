// src/lib.rs

//! Timetable Library
//!
//! Lecture catalog search with paged results, timetable collections and
//! cached server-side rendering of catalog pages.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod utils;
