//! `LogObserver`: session statistics written to the log instead of an
//! on-screen panel.

use log::{debug, info};

use cubefall_core::observer::SessionObserver;

#[derive(Debug, Default)]
pub struct LogObserver {
    last_frame_rate: Option<u32>,
    entity_count: usize,
    cap_hits: u64,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn cap_hits(&self) -> u64 {
        self.cap_hits
    }
}

impl SessionObserver for LogObserver {
    // Called every frame; only changes are worth a line.
    fn on_frame_rate_update(&mut self, fps: u32) {
        if self.last_frame_rate != Some(fps) {
            info!("fps: {fps}");
            self.last_frame_rate = Some(fps);
        }
    }

    fn on_entity_count_update(&mut self, count: usize) {
        self.entity_count = count;
        debug!("cubes: {count}");
    }

    fn on_step_cap_reached(&mut self, backlog_secs: f64) {
        self.cap_hits += 1;
        debug!("step cap hit, backlog {backlog_secs:.4} s");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_latest_values() {
        let mut observer = LogObserver::new();
        observer.on_frame_rate_update(0);
        observer.on_frame_rate_update(60);
        observer.on_entity_count_update(3);
        observer.on_step_cap_reached(0.2);
        assert_eq!(observer.last_frame_rate, Some(60));
        assert_eq!(observer.entity_count(), 3);
        assert_eq!(observer.cap_hits(), 1);
    }
}
