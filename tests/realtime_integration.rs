//! Integration tests on the tokio clock
//!
//! Same lifecycle as the virtual-clock tests, but timers are real
//! `tokio::time::interval`s running on a paused runtime inside a LocalSet.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tamagotchi_sim::core::config::SimulationConfig;
use tamagotchi_sim::naming::FixedName;
use tamagotchi_sim::simulation::{Simulation, TokioScheduler};
use tokio::task::LocalSet;
use tokio::time::sleep;

fn simulation() -> Simulation {
    let config = SimulationConfig {
        seed: Some(1),
        ..SimulationConfig::default()
    };
    Simulation::new(config, Rc::new(TokioScheduler), Box::new(FixedName("Ada".into()))).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_decay_on_real_timers() {
    LocalSet::new()
        .run_until(async {
            let sim = simulation();
            let evictions = Rc::new(Cell::new(0));
            let counter = evictions.clone();
            sim.on_decay_evicted(move |departures| {
                counter.set(counter.get() + departures.len());
            });

            let id = sim.create_pet().await.unwrap();

            sleep(Duration::from_millis(10_500)).await;
            let pet = sim.pet(id).unwrap();
            assert_eq!((pet.energy, pet.fullness, pet.happiness), (40, 40, 40));

            sleep(Duration::from_secs(40)).await;
            assert!(sim.is_empty());
            assert_eq!(evictions.get(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_restart_silences_real_timers() {
    LocalSet::new()
        .run_until(async {
            let sim = simulation();
            let evictions = Rc::new(Cell::new(0));
            let counter = evictions.clone();
            sim.on_decay_evicted(move |departures| {
                counter.set(counter.get() + departures.len());
            });

            sim.create_pet().await.unwrap();
            sim.create_pet().await.unwrap();
            sleep(Duration::from_millis(3_500)).await;

            sim.restart();
            sleep(Duration::from_secs(120)).await;

            assert!(sim.snapshot().is_empty());
            assert_eq!(evictions.get(), 0);
        })
        .await;
}
