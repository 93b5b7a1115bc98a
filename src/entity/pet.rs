//! A single pet: three bounded vitals plus its private decay countdown

use std::rc::Rc;

use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::core::types::{PetId, Species, Vital};
use crate::entity::action::Action;
use crate::simulation::schedule::Schedule;

/// Upper bound for every vital
pub const VITAL_MAX: u8 = 100;

/// Invoked after this pet's scheduled decay has been applied
///
/// Bound by the owning simulation; the pet never touches the roster itself.
pub type DecayHook = Rc<dyn Fn(PetId)>;

pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub species: Species,
    energy: u8,
    fullness: u8,
    happiness: u8,
    /// Ticks left until the next decay (period..=1)
    countdown: u32,
    decay_period: u32,
    decay_amount: u8,
    schedule: Option<Schedule>,
    decay_hook: Option<DecayHook>,
}

impl Pet {
    /// Pet with the default starting point: 50/50/50, decaying 10 every 10 ticks
    pub fn new(name: String, species: Species) -> Self {
        Self::from_config(name, species, &SimulationConfig::default())
    }

    pub fn from_config(name: String, species: Species, config: &SimulationConfig) -> Self {
        let start = config.starting_vitals.min(VITAL_MAX);
        Self {
            id: PetId::new(),
            name,
            species,
            energy: start,
            fullness: start,
            happiness: start,
            countdown: config.decay_period_ticks,
            decay_period: config.decay_period_ticks,
            decay_amount: config.decay_amount,
            schedule: None,
            decay_hook: None,
        }
    }

    /// Override vitals directly, clamped to the valid range
    pub fn with_vitals(mut self, energy: u8, fullness: u8, happiness: u8) -> Self {
        self.energy = energy.min(VITAL_MAX);
        self.fullness = fullness.min(VITAL_MAX);
        self.happiness = happiness.min(VITAL_MAX);
        self
    }

    pub fn energy(&self) -> u8 {
        self.energy
    }

    pub fn fullness(&self) -> u8 {
        self.fullness
    }

    pub fn happiness(&self) -> u8 {
        self.happiness
    }

    pub fn vital(&self, vital: Vital) -> u8 {
        match vital {
            Vital::Energy => self.energy,
            Vital::Fullness => self.fullness,
            Vital::Happiness => self.happiness,
        }
    }

    pub fn nap(&mut self) {
        self.energy = raise(self.energy, 40);
        self.fullness = self.fullness.saturating_sub(10);
        self.happiness = self.happiness.saturating_sub(10);
    }

    pub fn play(&mut self) {
        self.energy = self.energy.saturating_sub(10);
        self.fullness = self.fullness.saturating_sub(10);
        self.happiness = raise(self.happiness, 30);
    }

    pub fn eat(&mut self) {
        self.energy = self.energy.saturating_sub(15);
        self.fullness = raise(self.fullness, 30);
        self.happiness = raise(self.happiness, 5);
    }

    /// Reduce every vital by the decay amount, floored at zero
    pub fn decay(&mut self) {
        self.energy = self.energy.saturating_sub(self.decay_amount);
        self.fullness = self.fullness.saturating_sub(self.decay_amount);
        self.happiness = self.happiness.saturating_sub(self.decay_amount);
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Nap => self.nap(),
            Action::Play => self.play(),
            Action::Eat => self.eat(),
        }
    }

    /// Advance the decay countdown by one tick
    ///
    /// Returns true when this tick fired the decay. Exactly one decay happens
    /// per `decay_period` ticks; the countdown is back at the full period
    /// afterwards.
    pub fn tick(&mut self) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.decay();
            self.countdown = self.decay_period;
            tracing::debug!(
                pet = %self.name,
                energy = self.energy,
                fullness = self.fullness,
                happiness = self.happiness,
                "decay"
            );
            true
        } else {
            false
        }
    }

    pub fn seconds_to_next_decay(&self) -> u32 {
        self.countdown
    }

    /// Vitals that are exactly zero, in reporting order
    pub fn depleted_vitals(&self) -> Vec<Vital> {
        Vital::ALL
            .into_iter()
            .filter(|v| self.vital(*v) == 0)
            .collect()
    }

    pub fn is_depleted(&self) -> bool {
        self.energy == 0 || self.fullness == 0 || self.happiness == 0
    }

    pub fn bind_decay_hook(&mut self, hook: DecayHook) {
        self.decay_hook = Some(hook);
    }

    pub fn decay_hook(&self) -> Option<DecayHook> {
        self.decay_hook.clone()
    }

    /// Take ownership of the running decay schedule
    pub fn attach_schedule(&mut self, schedule: Schedule) {
        if let Some(mut old) = self.schedule.replace(schedule) {
            old.cancel();
        }
    }

    /// Stop the decay schedule; safe to call more than once
    pub fn cancel_schedule(&mut self) {
        if let Some(schedule) = self.schedule.as_mut() {
            schedule.cancel();
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule.as_ref().is_some_and(|s| !s.is_cancelled())
    }

    pub fn view(&self) -> PetView {
        PetView {
            id: self.id,
            name: self.name.clone(),
            species: self.species,
            energy: self.energy,
            fullness: self.fullness,
            happiness: self.happiness,
            seconds_to_next_decay: self.countdown,
        }
    }
}

impl std::fmt::Debug for Pet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pet")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("species", &self.species)
            .field("energy", &self.energy)
            .field("fullness", &self.fullness)
            .field("happiness", &self.happiness)
            .field("countdown", &self.countdown)
            .field("scheduled", &self.is_scheduled())
            .finish()
    }
}

fn raise(value: u8, amount: u8) -> u8 {
    value.saturating_add(amount).min(VITAL_MAX)
}

/// Read-only copy of a pet for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetView {
    pub id: PetId,
    pub name: String,
    pub species: Species,
    pub energy: u8,
    pub fullness: u8,
    pub happiness: u8,
    pub seconds_to_next_decay: u32,
}

impl PetView {
    /// "00:09s" style countdown label
    pub fn countdown_label(&self) -> String {
        format!("00:{:02}s", self.seconds_to_next_decay)
    }
}
