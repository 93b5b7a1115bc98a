//! Tamagotchi Sim - virtual pets with autonomous decay

pub mod core;
pub mod entity;
pub mod naming;
pub mod simulation;
