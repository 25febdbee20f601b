//! Host loop thread: drives one `SimulationSession` in real time.
//!
//! The session is created inside this thread, so none of it needs to be
//! `Send`. Commands arrive over an `mpsc` channel. Each turn the loop drains
//! commands, fires the spawn timer if due, runs a render callback if the
//! display deadline passed, then sleeps until the earlier of the two deadlines.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{error, info, warn};

use cubefall_core::error::SessionError;
use cubefall_core::services::{PhysicsService, RenderService};
use cubefall_core::state::SessionSnapshot;
use cubefall_physics::{BoxPhysicsWorld, PhysicsSettings};
use cubefall_render::HeadlessScene;
use cubefall_sim::clock::{SimulationClock, WallClock};
use cubefall_sim::spawn::SpawnTimer;
use cubefall_sim::SimulationSession;

use crate::observer::LogObserver;
use crate::state::{ExitReason, HostCommand, HostConfig};

/// What the loop hands back once the session is shut down.
pub struct HostExit<P, R> {
    pub reason: ExitReason,
    /// Statistics taken just before resources were released.
    pub snapshot: SessionSnapshot,
    pub physics: P,
    pub render: R,
}

/// Handle to a running host loop thread.
pub struct HostHandle {
    commands: mpsc::Sender<HostCommand>,
    thread: JoinHandle<Result<SessionSnapshot, SessionError>>,
}

impl HostHandle {
    /// A sender for another producer (e.g. a signal handler).
    pub fn commands(&self) -> mpsc::Sender<HostCommand> {
        self.commands.clone()
    }

    /// Wait for the loop to exit and return its final statistics.
    pub fn join(self) -> anyhow::Result<SessionSnapshot> {
        let result = self
            .thread
            .join()
            .map_err(|_| anyhow::anyhow!("host loop thread panicked"))?;
        Ok(result?)
    }
}

/// Start the headless host with the reference physics and scene services.
pub fn spawn_host_loop(config: HostConfig) -> std::io::Result<HostHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<HostCommand>();

    let thread = std::thread::Builder::new()
        .name("cubefall-host-loop".into())
        .spawn(move || -> Result<SessionSnapshot, SessionError> {
            let physics = BoxPhysicsWorld::new(PhysicsSettings::from(&config.session.world));
            let scene = HeadlessScene::new(config.viewport_width, config.viewport_height);
            let session =
                SimulationSession::new(config.session.clone(), physics, scene, WallClock::new())?
                    .with_observer(Box::new(LogObserver::new()));

            let exit = run_host_loop(session, &cmd_rx, &config, std::thread::sleep)?;
            info!("host loop exited: {:?}", exit.reason);
            Ok(exit.snapshot)
        })?;

    Ok(HostHandle {
        commands: cmd_tx,
        thread,
    })
}

/// The loop itself. `sleep` is called with the time until the next deadline.
///
/// Runs until a `Shutdown` command, channel disconnect or `max_frames`, then
/// shuts the session down.
pub fn run_host_loop<P, R, C>(
    mut session: SimulationSession<P, R, C>,
    commands: &mpsc::Receiver<HostCommand>,
    config: &HostConfig,
    mut sleep: impl FnMut(Duration),
) -> Result<HostExit<P, R>, SessionError>
where
    P: PhysicsService,
    R: RenderService,
    C: SimulationClock,
{
    session.resize(config.viewport_width, config.viewport_height);

    let frame_period = config.frame_period();
    let start = session.clock().now();
    let mut timer = SpawnTimer::start(session.config().spawn.interval(), start);
    let mut next_frame = start + frame_period;
    let mut next_stats = start + config.stats_period();
    let mut frames: u64 = 0;

    let reason = loop {
        // 1. Drain pending commands
        if let Some(reason) = drain_commands(commands, &mut session) {
            break reason;
        }

        // 2. Spawn cadence
        let now = session.clock().now();
        if timer.poll(now) {
            match session.spawn_tick() {
                Ok(_) => {}
                Err(e @ SessionError::ResourceCreation(_)) => {
                    warn!(
                        "spawn failed, continuing with {} cubes: {e:#}",
                        session.registry().len()
                    );
                }
                Err(e) => return Err(e),
            }
        }

        // 3. Render callback
        if now >= next_frame {
            session.frame()?;
            frames += 1;
            next_frame += frame_period;
            if now > next_frame + frame_period * 2 {
                // Too far behind; skip the missed refreshes.
                next_frame = now + frame_period;
            }
            if config.max_frames.is_some_and(|max| frames >= max) {
                break ExitReason::FrameLimit;
            }
        }

        if now >= next_stats {
            log_stats(&session.snapshot());
            next_stats = now + config.stats_period();
        }

        // 4. Sleep until the earlier deadline
        let wake = next_frame.min(timer.next_due());
        let now = session.clock().now();
        if wake > now {
            sleep(wake - now);
        }
    };

    let snapshot = session.snapshot();
    log_stats(&snapshot);
    let (physics, render) = session.shutdown().inspect_err(|e| error!("shutdown failed: {e}"))?;
    Ok(HostExit {
        reason,
        snapshot,
        physics,
        render,
    })
}

fn drain_commands<P, R, C>(
    commands: &mpsc::Receiver<HostCommand>,
    session: &mut SimulationSession<P, R, C>,
) -> Option<ExitReason>
where
    P: PhysicsService,
    R: RenderService,
    C: SimulationClock,
{
    loop {
        match commands.try_recv() {
            Ok(HostCommand::Resize { width, height }) => session.resize(width, height),
            Ok(HostCommand::Shutdown) => return Some(ExitReason::Shutdown),
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => return Some(ExitReason::Disconnected),
        }
    }
}

fn log_stats(snap: &SessionSnapshot) {
    info!(
        "frame {} | {} fps | {} cubes | {:.2} s simulated | {} capped | {} gated",
        snap.frame_index,
        snap.frame_rate,
        snap.entity_count,
        snap.simulated_secs,
        snap.capped_frames,
        snap.gated_spawns
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefall_sim::clock::ManualClock;

    type HeadlessSession = SimulationSession<BoxPhysicsWorld, HeadlessScene, ManualClock>;

    fn manual_session(config: &HostConfig) -> (HeadlessSession, ManualClock) {
        let clock = ManualClock::new();
        let session = SimulationSession::new(
            config.session.clone(),
            BoxPhysicsWorld::new(PhysicsSettings::from(&config.session.world)),
            HeadlessScene::new(config.viewport_width, config.viewport_height),
            clock.clone(),
        )
        .unwrap();
        (session, clock)
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<HostCommand>();
        tx.send(HostCommand::Resize {
            width: 800,
            height: 600,
        })
        .unwrap();
        tx.send(HostCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            commands,
            vec![
                HostCommand::Resize {
                    width: 800,
                    height: 600
                },
                HostCommand::Shutdown
            ]
        );
    }

    #[test]
    fn test_frame_limit_runs_simulated_ten_seconds() {
        let config = HostConfig {
            max_frames: Some(600),
            ..Default::default()
        };
        let (session, clock) = manual_session(&config);
        let (_tx, rx) = mpsc::channel();

        let exit = run_host_loop(session, &rx, &config, |d| clock.advance(d)).unwrap();

        assert_eq!(exit.reason, ExitReason::FrameLimit);
        let snap = exit.snapshot;
        assert_eq!(snap.frame_index, 600);
        assert!((598..=600).contains(&snap.fixed_ticks), "ticks {}", snap.fixed_ticks);
        // Spawn ticks every 100 ms up to 9.9 s; the first five come before
        // the first frame-rate window closes.
        assert_eq!(snap.spawn_ticks, 99);
        assert_eq!(snap.gated_spawns, 5);
        assert_eq!(snap.entity_count, 94);
        assert_eq!(snap.frame_rate, 60);

        assert_eq!(exit.physics.body_count(), 0);
        assert_eq!(exit.render.primitive_count(), 0);
        assert_eq!(exit.render.frames_presented(), 600);
    }

    #[test]
    fn test_shutdown_command_stops_before_first_frame() {
        let config = HostConfig::default();
        let (session, clock) = manual_session(&config);
        let (tx, rx) = mpsc::channel();
        tx.send(HostCommand::Resize {
            width: 640,
            height: 480,
        })
        .unwrap();
        tx.send(HostCommand::Shutdown).unwrap();

        let exit = run_host_loop(session, &rx, &config, |d| clock.advance(d)).unwrap();
        assert_eq!(exit.reason, ExitReason::Shutdown);
        assert_eq!(exit.snapshot.frame_index, 0);
        assert_eq!(exit.render.viewport(), (640, 480));
        assert_eq!(exit.physics.body_count(), 0);
    }

    #[test]
    fn test_disconnect_stops_loop() {
        let config = HostConfig::default();
        let (session, clock) = manual_session(&config);
        let (tx, rx) = mpsc::channel::<HostCommand>();
        drop(tx);

        let exit = run_host_loop(session, &rx, &config, |d| clock.advance(d)).unwrap();
        assert_eq!(exit.reason, ExitReason::Disconnected);
    }

    #[test]
    fn test_sleep_targets_next_deadline() {
        let config = HostConfig {
            max_frames: Some(3),
            ..Default::default()
        };
        let (session, clock) = manual_session(&config);
        let (_tx, rx) = mpsc::channel();
        let mut sleeps = Vec::new();

        run_host_loop(session, &rx, &config, |d| {
            sleeps.push(d);
            clock.advance(d);
        })
        .unwrap();

        let period = config.frame_period();
        assert_eq!(sleeps, vec![period, period, period]);
    }

    #[test]
    fn test_spawn_failure_does_not_stop_loop() {
        let config = HostConfig {
            max_frames: Some(120),
            ..Default::default()
        };
        let clock = ManualClock::new();
        let session = SimulationSession::new(
            config.session.clone(),
            BoxPhysicsWorld::new(PhysicsSettings {
                max_bodies: Some(3),
                ..Default::default()
            }),
            HeadlessScene::new(1280, 720),
            clock.clone(),
        )
        .unwrap();
        let (_tx, rx) = mpsc::channel();

        let exit = run_host_loop(session, &rx, &config, |d| clock.advance(d)).unwrap();
        assert_eq!(exit.reason, ExitReason::FrameLimit);
        assert_eq!(exit.snapshot.entity_count, 2);
        assert_eq!(exit.snapshot.frame_index, 120);
    }
}
