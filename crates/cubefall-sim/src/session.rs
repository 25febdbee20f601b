//! `SimulationSession`: the fixed-step loop.
//!
//! One session owns everything the loop mutates (clock, accumulator,
//! estimator, registry, RNG) plus the two services it drives. The host calls
//! `frame()` once per display refresh and `spawn_tick()` on the spawn cadence;
//! both run on the host's thread and never overlap.

use std::time::Duration;

use glam::DVec3;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cubefall_core::camera::Camera;
use cubefall_core::config::SessionConfig;
use cubefall_core::enums::BacklogPolicy;
use cubefall_core::error::SessionError;
use cubefall_core::events::{FrameReport, SpawnOutcome};
use cubefall_core::observer::SessionObserver;
use cubefall_core::services::{PhysicsService, RenderService};
use cubefall_core::state::SessionSnapshot;

use crate::clock::SimulationClock;
use crate::frame_rate::FrameRateEstimator;
use crate::registry::EntityRegistry;
use crate::spawn::SpawnPolicy;
use crate::world_setup::{self, Scenery};

pub struct SimulationSession<P, R, C> {
    config: SessionConfig,
    clock: C,
    last_frame: Duration,
    /// Time base the frame-rate estimator samples: the clock reading for
    /// `frame()`, the running sum of deltas for `advance()`.
    frame_time: Duration,
    accumulator: f64,
    fixed_step: f64,
    frame_rate: FrameRateEstimator,
    policy: SpawnPolicy,
    registry: EntityRegistry,
    scenery: Scenery,
    camera: Camera,
    rng: ChaCha8Rng,
    physics: P,
    render: R,
    observer: Option<Box<dyn SessionObserver>>,

    frame_index: u64,
    fixed_ticks: u64,
    capped_frames: u64,
    /// Consecutive capped frames; the first one of a run is logged.
    capped_streak: u64,
    timing_anomalies: u64,
    spawn_ticks: u64,
    gated_spawns: u64,
}

impl<P, R, C> SimulationSession<P, R, C>
where
    P: PhysicsService,
    R: RenderService,
    C: SimulationClock,
{
    /// Validate the config and build the static scenery. The first frame's
    /// delta is measured from this call.
    pub fn new(
        config: SessionConfig,
        mut physics: P,
        mut render: R,
        clock: C,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let scenery = world_setup::build_ground(&config.world, &mut physics, &mut render)?;

        let now = clock.now();
        let fixed_step = config.frame.fixed_step();
        info!(
            "session started: {} Hz fixed step, max {} steps/frame, spawn every {} ms above {} fps, seed {}",
            config.frame.fixed_hz,
            config.frame.max_steps_per_frame,
            config.spawn.interval_ms,
            config.spawn.min_frame_rate,
            config.seed
        );

        Ok(Self {
            clock,
            last_frame: now,
            frame_time: now,
            accumulator: 0.0,
            fixed_step,
            frame_rate: FrameRateEstimator::new(config.frame_rate.window(), now),
            policy: SpawnPolicy::new(config.spawn.min_frame_rate),
            registry: EntityRegistry::new(&config.spawn),
            scenery,
            camera: Camera::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            physics,
            render,
            observer: None,
            frame_index: 0,
            fixed_ticks: 0,
            capped_frames: 0,
            capped_streak: 0,
            timing_anomalies: 0,
            spawn_ticks: 0,
            gated_spawns: 0,
            config,
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn SessionObserver>>) {
        self.observer = observer;
    }

    /// Run one render callback, measuring the delta from the clock.
    pub fn frame(&mut self) -> Result<FrameReport, SessionError> {
        let now = self.clock.now();
        let delta = now.saturating_sub(self.last_frame);
        self.last_frame = now;
        self.run_frame(delta.as_secs_f64(), |_, _| now)
    }

    /// Run one render callback with an explicit delta (seconds), for hosts
    /// that measure display time themselves. The frame-rate estimate is
    /// driven by the same deltas.
    pub fn advance(&mut self, delta_secs: f64) -> Result<FrameReport, SessionError> {
        self.run_frame(delta_secs, |frame_time, delta| {
            let delta = Duration::try_from_secs_f64(delta).unwrap_or(Duration::MAX);
            frame_time.saturating_add(delta)
        })
    }

    /// Accumulate, sample the frame rate, step physics up to the cap, sync
    /// every entity, present. In that order, each phase seeing only what the
    /// earlier ones produced.
    ///
    /// `next_frame_time` maps the previous frame time and the clamped delta
    /// to this frame's time.
    fn run_frame(
        &mut self,
        delta_secs: f64,
        next_frame_time: impl FnOnce(Duration, f64) -> Duration,
    ) -> Result<FrameReport, SessionError> {
        self.frame_index += 1;

        let anomaly = !(delta_secs.is_finite() && delta_secs > 0.0);
        let delta = if anomaly {
            self.timing_anomalies += 1;
            warn!(
                "frame {}: unusable delta {delta_secs}, clamped to zero",
                self.frame_index
            );
            0.0
        } else {
            delta_secs
        };
        self.accumulator += delta;

        // Never earlier than the last sample.
        self.frame_time = next_frame_time(self.frame_time, delta).max(self.frame_time);
        let frame_rate = self.frame_rate.sample(self.frame_time);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_frame_rate_update(frame_rate);
        }

        let max_steps = self.config.frame.max_steps_per_frame;
        let mut steps = 0;
        if !anomaly {
            while self.accumulator >= self.fixed_step && steps < max_steps {
                self.physics
                    .step(self.fixed_step, self.config.frame.solver_iterations);
                self.accumulator -= self.fixed_step;
                steps += 1;
            }
        }
        self.fixed_ticks += steps as u64;

        let capped = steps == max_steps && self.accumulator >= self.fixed_step;
        if capped {
            self.on_step_cap();
        } else if !anomaly {
            self.capped_streak = 0;
        }

        let synced = self.registry.sync_all(&self.physics, &mut self.render)?;
        self.render
            .present_frame(&self.camera)
            .map_err(SessionError::Render)?;

        Ok(FrameReport {
            delta_secs: delta,
            steps,
            capped,
            anomaly,
            frame_rate,
            accumulator: self.accumulator,
            synced,
        })
    }

    fn on_step_cap(&mut self) {
        self.capped_frames += 1;
        let backlog = self.accumulator;
        if self.capped_streak == 0 {
            warn!(
                "frame {}: step cap of {} reached, {:.4} s behind real time",
                self.frame_index, self.config.frame.max_steps_per_frame, backlog
            );
        }
        self.capped_streak += 1;

        if let Some(observer) = self.observer.as_mut() {
            observer.on_step_cap_reached(backlog);
        }

        if self.config.frame.backlog == BacklogPolicy::Discard {
            self.accumulator = self.accumulator.rem_euclid(self.fixed_step);
        }
    }

    /// One tick of the spawn cadence. Reads the estimator's value as of now.
    pub fn spawn_tick(&mut self) -> Result<SpawnOutcome, SessionError> {
        self.spawn_ticks += 1;

        let estimate = self.frame_rate.current();
        if !self.policy.admits(estimate) {
            self.gated_spawns += 1;
            debug!(
                "spawn gated at {estimate} fps (need > {})",
                self.policy.min_frame_rate
            );
            return Ok(SpawnOutcome::Gated { estimate });
        }

        let origin: DVec3 = self.config.spawn.origin();
        self.registry
            .create_entity(&mut self.physics, &mut self.render, &mut self.rng, origin)?;
        let count = self.registry.len();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_entity_count_update(count);
        }
        Ok(SpawnOutcome::Spawned { count })
    }

    /// Track a viewport change. Touches only the camera and the render viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
        self.render.resize_viewport(width, height);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            frame_index: self.frame_index,
            fixed_ticks: self.fixed_ticks,
            simulated_secs: self.fixed_ticks as f64 * self.fixed_step,
            accumulator: self.accumulator,
            frame_rate: self.frame_rate.current(),
            entity_count: self.registry.len(),
            capped_frames: self.capped_frames,
            timing_anomalies: self.timing_anomalies,
            spawn_ticks: self.spawn_ticks,
            gated_spawns: self.gated_spawns,
        }
    }

    /// Release every entity and the scenery, then hand the services back.
    pub fn shutdown(mut self) -> Result<(P, R), SessionError> {
        let snapshot = self.snapshot();
        let entities = self.registry.release_all(&mut self.physics, &mut self.render);
        let scenery = self.scenery.release(&mut self.physics, &mut self.render);
        entities.and(scenery)?;

        info!(
            "session shut down after {} frames, {} fixed steps, {} entities released",
            snapshot.frame_index, snapshot.fixed_ticks, snapshot.entity_count
        );
        Ok((self.physics, self.render))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn render_mut(&mut self) -> &mut R {
        &mut self.render
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn scenery(&self) -> Scenery {
        self.scenery
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Unconsumed simulated time (seconds).
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate.current()
    }

    /// Pin the frame-rate estimate until the next window closes.
    #[cfg(test)]
    pub(crate) fn hold_frame_rate(&mut self, fps: u32) {
        self.frame_rate.force_estimate(fps);
    }
}
