//! Procedural obstacle spawning and the difficulty ramp
//!
//! The spawn timer accrues frame time and pays out one spawn attempt per
//! elapsed interval. An attempt that would crowd its lane is dropped without
//! refunding the interval, so busy lanes thin out rather than queue up.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::WorldGeometry;
use super::state::{Obstacle, ObstacleKind, RunSession};
use crate::tuning::Tuning;
use crate::{clamp, lerp};

/// Uniform randomness used by the spawner
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Uniform index in `[0, n)`; `n` must be non-zero
    fn next_index(&mut self, n: usize) -> usize {
        ((self.next_unit() * n as f32) as usize).min(n.saturating_sub(1))
    }
}

/// Seeded PCG generator for normal play and reproducible runs
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of samples, then repeats the last one (0.0 if empty)
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    samples: VecDeque<f32>,
    last: f32,
}

impl ScriptedRandom {
    pub fn new(samples: impl IntoIterator<Item = f32>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            last: 0.0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if let Some(s) = self.samples.pop_front() {
            self.last = clamp(s, 0.0, 0.999_999);
        }
        self.last
    }
}

/// Outcome of a single spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned { lane: usize, kind: ObstacleKind },
    /// The lane still has an obstacle inside the spawn region
    Crowded { lane: usize },
}

/// Spawn interval for a point in the run: linear ramp, then held at the floor
pub fn spawn_interval_at(tuning: &Tuning, elapsed: f32) -> f32 {
    let t = clamp(elapsed / tuning.spawn_ramp_secs, 0.0, 1.0);
    lerp(tuning.spawn_interval_start, tuning.spawn_interval_end, t)
}

/// Chance of a bonus spawn attempt alongside a regular one
pub fn extra_spawn_chance(tuning: &Tuning, elapsed: f32, speed: f32) -> f32 {
    if elapsed <= tuning.extra_spawn_after_secs {
        return 0.0;
    }
    clamp(
        (speed - tuning.extra_spawn_speed_floor) / tuning.extra_spawn_speed_span,
        0.0,
        tuning.extra_spawn_max_chance,
    )
}

/// Creates obstacles and runs the difficulty curve
#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    tuning: Tuning,
}

impl ObstacleSpawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tuning: tuning.clone(),
        }
    }

    /// Advance the run clock, speed, score and spawn interval by `dt`
    pub fn ramp(&self, session: &mut RunSession, dt: f32) {
        session.elapsed += dt;
        session.speed += session.acceleration * dt;
        session.spawn_interval = spawn_interval_at(&self.tuning, session.elapsed);
        session.score += (session.speed * dt * self.tuning.score_rate) as f64;
    }

    /// Accrue `dt` on the spawn timer and pay out due spawn attempts
    pub fn tick(
        &self,
        session: &mut RunSession,
        dt: f32,
        geometry: &WorldGeometry,
        obstacles: &mut Vec<Obstacle>,
        rng: &mut dyn RandomSource,
    ) -> Vec<SpawnOutcome> {
        let mut outcomes = Vec::new();
        session.spawn_timer += dt;

        // A non-positive interval would never drain the timer
        let interval = session.spawn_interval.max(f32::EPSILON);
        while session.spawn_timer > interval {
            session.spawn_timer -= interval;
            outcomes.push(self.try_spawn(geometry, obstacles, rng));

            let chance = extra_spawn_chance(&self.tuning, session.elapsed, session.speed);
            if chance > 0.0 && rng.next_unit() < chance {
                outcomes.push(self.try_spawn(geometry, obstacles, rng));
            }
        }
        outcomes
    }

    /// One spawn attempt in a random lane, subject to the spacing rule
    pub fn try_spawn(
        &self,
        geometry: &WorldGeometry,
        obstacles: &mut Vec<Obstacle>,
        rng: &mut dyn RandomSource,
    ) -> SpawnOutcome {
        let lane = rng.next_index(geometry.lane_count);
        let kind = if rng.next_unit() < self.tuning.vehicle_probability {
            ObstacleKind::Vehicle
        } else {
            ObstacleKind::Barrier
        };

        if !self.lane_has_room(geometry, obstacles, lane) {
            log::debug!("Spawn dropped: lane {} crowded", lane);
            return SpawnOutcome::Crowded { lane };
        }

        let size = self.obstacle_size(geometry, kind);
        obstacles.push(Obstacle {
            kind,
            lane,
            pos: Vec2::new(
                geometry.lane_center(lane),
                geometry.top_boundary_y - size.y - self.tuning.spawn_gap,
            ),
            size,
            hit_inset: self.tuning.obstacle_hit_inset,
        });
        SpawnOutcome::Spawned { lane, kind }
    }

    /// True unless the topmost obstacle in `lane` is still inside the spawn region
    pub fn lane_has_room(
        &self,
        geometry: &WorldGeometry,
        obstacles: &[Obstacle],
        lane: usize,
    ) -> bool {
        let nearest = obstacles
            .iter()
            .filter(|o| o.lane == lane)
            .map(|o| o.pos.y)
            .fold(f32::INFINITY, f32::min);
        nearest >= geometry.top_boundary_y + self.tuning.spawn_spacing
    }

    /// Kind-dependent size, scaled to the viewport
    pub fn obstacle_size(&self, geometry: &WorldGeometry, kind: ObstacleKind) -> Vec2 {
        let base = match kind {
            ObstacleKind::Vehicle => self.tuning.vehicle_base,
            ObstacleKind::Barrier => self.tuning.barrier_base,
        };
        let scale = self.tuning.size_scale(
            geometry.viewport_w,
            geometry.viewport_h,
            self.tuning.obstacle_scale_min,
            self.tuning.obstacle_scale_max,
        );
        Vec2::new(base.w, base.h) * scale
    }

    /// Scroll every obstacle down by `speed * dt`
    pub fn advance(obstacles: &mut [Obstacle], speed: f32, dt: f32) {
        for o in obstacles {
            o.pos.y += speed * dt;
        }
    }

    /// Drop obstacles that have left the bottom of the viewport
    pub fn cull(&self, geometry: &WorldGeometry, obstacles: &mut Vec<Obstacle>) {
        let limit = geometry.despawn_y(self.tuning.despawn_margin);
        obstacles.retain(|o| o.pos.y <= limit);
    }
}
