//! Train running-status server.
//!
//! Fetches a train's timetable and live tracking feed from RailRadar,
//! reconciles the two into a per-stop status view, and serves it over
//! HTTP.

pub mod cache;
pub mod config;
pub mod domain;
pub mod railradar;
pub mod reconcile;
pub mod sequence;
pub mod web;
