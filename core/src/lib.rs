//! Core library for dolevtrack: daily nutrition/weight logs, goals, local storage,
//! and the derived weekly, streak and compliance metrics shown by the front ends.
//!
//! The metric modules (`balance`, `weight`, `streak`, `compliance`, `dashboard`) are
//! pure functions of `(logs, goals, today)`. Storage and export live in `db`,
//! `export` and `service`.

pub mod balance;
pub mod compliance;
pub mod dashboard;
pub mod day;
pub mod db;
pub mod export;
pub mod models;
pub mod service;
pub mod streak;
pub mod weight;
