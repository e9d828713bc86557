// src/services/mod.rs
pub mod calculations;
pub mod charts;
pub mod regression;
pub mod returns;
pub mod yahoo;
