//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for pets
///
/// Handed to the front-end on creation; stays valid until the pet is evicted
/// or the simulation restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PetId(pub Uuid);

impl PetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Species enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Tiger,
    Wolf,
    Dragon,
    Phoenix,
}

impl Species {
    /// All species, in draw order
    pub const ALL: [Species; 4] = [
        Species::Tiger,
        Species::Wolf,
        Species::Dragon,
        Species::Phoenix,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Species::Tiger => "Tiger",
            Species::Wolf => "Wolf",
            Species::Dragon => "Dragon",
            Species::Phoenix => "Phoenix",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the three bounded vitals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vital {
    Energy,
    Fullness,
    Happiness,
}

impl Vital {
    /// Vitals in reporting order
    pub const ALL: [Vital; 3] = [Vital::Energy, Vital::Fullness, Vital::Happiness];

    pub fn name(&self) -> &'static str {
        match self {
            Vital::Energy => "energy",
            Vital::Fullness => "fullness",
            Vital::Happiness => "happiness",
        }
    }
}

impl std::fmt::Display for Vital {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
