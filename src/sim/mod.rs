//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of platform code:
//! - Time only arrives through `SimulationEngine::tick`
//! - Randomness only through an injected `RandomSource`
//! - No rendering, audio or storage calls beyond the store trait

pub mod collision;
pub mod engine;
pub mod geometry;
pub mod phase;
pub mod player;
pub mod spawner;
pub mod state;

pub use collision::{Aabb, first_collision};
pub use engine::{FrameClock, SimulationEngine};
pub use geometry::WorldGeometry;
pub use phase::{GamePhase, RunStateMachine, Transition, Trigger};
pub use player::PlayerController;
pub use spawner::{
    ObstacleSpawner, RandomSource, ScriptedRandom, SeededRandom, SpawnOutcome, extra_spawn_chance,
    spawn_interval_at,
};
pub use state::{GameEvent, Obstacle, ObstacleKind, Player, RunSession};
