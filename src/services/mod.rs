// src/services/mod.rs
pub mod calculations;
pub mod prices;
pub mod recessions;
pub mod returns;
