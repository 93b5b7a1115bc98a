//! Capacity-bounded, ordered collection of live pets

use serde::Serialize;

use crate::core::error::CapacityError;
use crate::core::types::{PetId, Vital};
use crate::entity::pet::{Pet, PetView};

/// A pet removed from the roster because a vital reached zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Departure {
    /// State at the moment of eviction
    pub pet: PetView,
    /// Zero vitals, in reporting order
    pub reasons: Vec<Vital>,
}

impl Departure {
    fn from_pet(pet: &Pet) -> Self {
        Self {
            pet: pet.view(),
            reasons: pet.depleted_vitals(),
        }
    }

    /// "energy & happiness"
    pub fn reason_text(&self) -> String {
        self.reasons
            .iter()
            .map(|v| v.name())
            .collect::<Vec<_>>()
            .join(" & ")
    }

    pub fn message(&self) -> String {
        format!(
            "{} has left because their {} reached 0",
            self.pet.name,
            self.reason_text()
        )
    }
}

/// Live pets in insertion order
///
/// No pet with a zero vital survives an [`Roster::eviction_check`].
#[derive(Debug)]
pub struct Roster {
    pets: Vec<Pet>,
    capacity: usize,
}

impl Roster {
    pub fn new(capacity: usize) -> Self {
        Self {
            pets: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pets.len() >= self.capacity
    }

    pub fn ensure_room(&self) -> Result<(), CapacityError> {
        if self.is_full() {
            return Err(CapacityError {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append a pet; a rejected pet is dropped, cancelling its schedule
    pub fn admit(&mut self, pet: Pet) -> Result<PetId, CapacityError> {
        self.ensure_room()?;
        let id = pet.id;
        self.pets.push(pet);
        Ok(id)
    }

    pub fn get(&self, id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PetId) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| p.id == id)
    }

    /// Pet at a 0-based roster position
    pub fn at(&self, index: usize) -> Option<&Pet> {
        self.pets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pet> {
        self.pets.iter()
    }

    pub fn views(&self) -> Vec<PetView> {
        self.pets.iter().map(Pet::view).collect()
    }

    /// Remove every pet with a zero vital
    ///
    /// Classification happens on the whole pre-eviction roster before anything
    /// is removed. Survivors and departures both keep their roster order.
    /// Running it twice in a row is harmless: the second pass finds nothing.
    pub fn eviction_check(&mut self) -> Vec<Departure> {
        if !self.pets.iter().any(Pet::is_depleted) {
            return Vec::new();
        }

        let (mut evicted, kept): (Vec<Pet>, Vec<Pet>) =
            std::mem::take(&mut self.pets)
                .into_iter()
                .partition(Pet::is_depleted);
        self.pets = kept;

        evicted
            .iter_mut()
            .map(|pet| {
                pet.cancel_schedule();
                let departure = Departure::from_pet(pet);
                tracing::info!(
                    pet = %pet.name,
                    reasons = %departure.reason_text(),
                    "pet evicted"
                );
                departure
            })
            .collect()
    }

    /// Drop every pet, cancelling all schedules; returns how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.pets.len();
        for pet in &mut self.pets {
            pet.cancel_schedule();
        }
        self.pets.clear();
        removed
    }
}
