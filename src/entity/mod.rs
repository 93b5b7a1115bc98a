pub mod action;
pub mod pet;

pub use action::Action;
pub use pet::{Pet, PetView};
