//! Simulation facade - the only way the front-end touches pets
//!
//! Owns the roster and wires every pet's timer back into the shared
//! eviction check:
//!
//! tick -> countdown -> decay -> decay hook -> eviction check -> listener
//!
//! All state lives behind `Rc<RefCell<..>>` on one thread. A timer tick or a
//! player action runs start to finish before the next one starts, so decay,
//! eviction and roster updates are atomic with respect to each other.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{CapacityError, Result, SimError};
use crate::core::types::{PetId, Species};
use crate::entity::action::Action;
use crate::entity::pet::{DecayHook, Pet, PetView};
use crate::naming::NameSource;
use crate::simulation::roster::{Departure, Roster};
use crate::simulation::schedule::{Scheduler, Task};

/// Called with the pets a scheduled decay pushed out of the roster
pub type EvictionListener = Box<dyn FnMut(&[Departure])>;

struct Shared {
    roster: RefCell<Roster>,
    listener: RefCell<Option<EvictionListener>>,
}

impl Shared {
    fn notify(&self, departures: &[Departure]) {
        if let Some(listener) = self.listener.borrow_mut().as_mut() {
            listener(departures);
        }
    }
}

pub struct Simulation {
    shared: Rc<Shared>,
    scheduler: Rc<dyn Scheduler>,
    names: Box<dyn NameSource>,
    rng: RefCell<ChaCha8Rng>,
    config: SimulationConfig,
}

impl Simulation {
    pub fn new(
        config: SimulationConfig,
        scheduler: Rc<dyn Scheduler>,
        names: Box<dyn NameSource>,
    ) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            shared: Rc::new(Shared {
                roster: RefCell::new(Roster::new(config.capacity)),
                listener: RefCell::new(None),
            }),
            scheduler,
            names,
            rng: RefCell::new(rng),
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn len(&self) -> usize {
        self.shared.roster.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.roster.borrow().is_empty()
    }

    /// Register the receiver for decay-driven evictions, replacing any previous one
    pub fn on_decay_evicted(&self, listener: impl FnMut(&[Departure]) + 'static) {
        *self.shared.listener.borrow_mut() = Some(Box::new(listener));
    }

    /// Create a pet with a fresh name and random species and start its decay
    ///
    /// Capacity is checked before asking for a name and again once the name
    /// arrives, since other creations may have completed in between.
    pub async fn create_pet(&self) -> std::result::Result<PetId, CapacityError> {
        if let Err(e) = self.shared.roster.borrow().ensure_room() {
            tracing::warn!(capacity = e.capacity, "roster full, pet not created");
            return Err(e);
        }

        let name = match self.names.fetch_name().await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(error = %e, fallback = %self.config.fallback_name, "naming failed");
                self.config.fallback_name.clone()
            }
        };

        if let Err(e) = self.shared.roster.borrow().ensure_room() {
            tracing::warn!(capacity = e.capacity, "roster filled while naming, pet not created");
            return Err(e);
        }

        let species = self.draw_species();
        let mut pet = Pet::from_config(name, species, &self.config);
        let id = pet.id;

        pet.bind_decay_hook(eviction_hook(Rc::downgrade(&self.shared)));
        let schedule = self.scheduler.repeat(
            self.config.tick_interval(),
            tick_task(Rc::downgrade(&self.shared), id),
        );
        pet.attach_schedule(schedule);

        tracing::info!(pet = %pet.name, species = %species, "pet created");
        self.shared.roster.borrow_mut().admit(pet)
    }

    /// Apply a player action, then run the eviction check
    ///
    /// Returns the pets this call evicted. Departures produced here are
    /// returned to the caller, not sent to the decay listener.
    pub fn apply_action(&self, id: PetId, action: Action) -> Result<Vec<Departure>> {
        let mut roster = self.shared.roster.borrow_mut();
        let pet = roster.get_mut(id).ok_or(SimError::PetNotFound(id))?;
        pet.apply(action);
        tracing::debug!(
            pet = %pet.name,
            %action,
            energy = pet.energy(),
            fullness = pet.fullness(),
            happiness = pet.happiness(),
            "action applied"
        );
        Ok(roster.eviction_check())
    }

    /// Evict every pet with a zero vital
    pub fn eviction_check(&self) -> Vec<Departure> {
        self.shared.roster.borrow_mut().eviction_check()
    }

    /// Cancel every schedule and empty the roster
    pub fn restart(&self) {
        let removed = self.shared.roster.borrow_mut().clear();
        tracing::info!(removed, "simulation restarted");
    }

    /// Read-only copy of the roster in display order
    pub fn snapshot(&self) -> Vec<PetView> {
        self.shared.roster.borrow().views()
    }

    pub fn pet(&self, id: PetId) -> Option<PetView> {
        self.shared.roster.borrow().get(id).map(Pet::view)
    }

    /// Handle of the pet at a 0-based roster position
    pub fn pet_at(&self, index: usize) -> Option<PetId> {
        self.shared.roster.borrow().at(index).map(|p| p.id)
    }

    fn draw_species(&self) -> Species {
        let index = self.rng.borrow_mut().gen_range(0..Species::ALL.len());
        Species::ALL[index]
    }
}

/// Per-pet timer body: advance the countdown, then hand off to the decay hook
///
/// The roster borrow is released before the hook runs so the hook can take
/// its own.
fn tick_task(shared: Weak<Shared>, id: PetId) -> Task {
    Box::new(move || {
        let Some(shared) = shared.upgrade() else {
            return;
        };

        let hook = {
            let mut roster = shared.roster.borrow_mut();
            let Some(pet) = roster.get_mut(id) else {
                return;
            };
            if pet.tick() {
                pet.decay_hook()
            } else {
                None
            }
        };

        if let Some(hook) = hook {
            hook(id);
        }
    })
}

fn eviction_hook(shared: Weak<Shared>) -> DecayHook {
    Rc::new(move |_id| {
        let Some(shared) = shared.upgrade() else {
            return;
        };

        let departures = shared.roster.borrow_mut().eviction_check();
        if !departures.is_empty() {
            shared.notify(&departures);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::NamingError;
    use crate::naming::FixedName;
    use crate::simulation::schedule::ManualScheduler;
    use async_trait::async_trait;

    struct Broken;

    #[async_trait(?Send)]
    impl NameSource for Broken {
        async fn fetch_name(&self) -> std::result::Result<String, NamingError> {
            Err(NamingError::Exhausted)
        }
    }

    fn new_sim(scheduler: &ManualScheduler, names: Box<dyn NameSource>) -> Simulation {
        let config = SimulationConfig {
            seed: Some(3),
            ..SimulationConfig::default()
        };
        Simulation::new(config, Rc::new(scheduler.clone()), names).unwrap()
    }

    #[tokio::test]
    async fn test_create_pet_defaults() {
        let scheduler = ManualScheduler::new();
        let sim = new_sim(&scheduler, Box::new(FixedName("Ada".into())));

        let id = sim.create_pet().await.unwrap();
        let view = sim.pet(id).unwrap();

        assert_eq!(view.name, "Ada");
        assert_eq!((view.energy, view.fullness, view.happiness), (50, 50, 50));
        assert_eq!(view.seconds_to_next_decay, 10);
        assert_eq!(scheduler.active_count(), 1);
    }

    #[tokio::test]
    async fn test_naming_failure_uses_fallback() {
        let scheduler = ManualScheduler::new();
        let sim = new_sim(&scheduler, Box::new(Broken));

        let id = sim.create_pet().await.unwrap();
        assert_eq!(sim.pet(id).unwrap().name, "Random");
    }

    #[tokio::test]
    async fn test_unknown_pet_is_reported() {
        let scheduler = ManualScheduler::new();
        let sim = new_sim(&scheduler, Box::new(FixedName("Ada".into())));

        let stranger = PetId::new();
        let result = sim.apply_action(stranger, Action::Nap);
        assert!(matches!(result, Err(SimError::PetNotFound(id)) if id == stranger));
    }

    #[tokio::test]
    async fn test_decay_eviction_reaches_listener_not_caller() {
        let scheduler = ManualScheduler::new();
        let sim = new_sim(&scheduler, Box::new(FixedName("Ada".into())));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        sim.on_decay_evicted(move |departures| {
            sink.borrow_mut().extend(departures.iter().map(|d| d.message()));
        });

        sim.create_pet().await.unwrap();
        scheduler.advance_secs(50);

        assert!(sim.is_empty());
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(
            *seen.borrow(),
            vec!["Ada has left because their energy & fullness & happiness reached 0"]
        );
    }

    #[tokio::test]
    async fn test_dropping_simulation_stops_timers() {
        let scheduler = ManualScheduler::new();
        let sim = new_sim(&scheduler, Box::new(FixedName("Ada".into())));
        sim.create_pet().await.unwrap();
        sim.create_pet().await.unwrap();
        assert_eq!(scheduler.active_count(), 2);

        drop(sim);
        assert_eq!(scheduler.active_count(), 0);
        scheduler.advance_secs(60);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            capacity: 0,
            ..SimulationConfig::default()
        };
        let result = Simulation::new(
            config,
            Rc::new(ManualScheduler::new()),
            Box::new(FixedName("x".into())),
        );
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}
