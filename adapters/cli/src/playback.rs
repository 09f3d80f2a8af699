use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, ensure, Result};
use ridgeline_rendering::{Presentation, RenderingBackend, Scene};

const LOG_TARGET: &str = "ridgeline::playback";

/// Real-time backend without a window.
///
/// A timer thread stands in for the display refresh callback and forwards
/// every frame over a channel, so scene updates run on the calling thread.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeadlessBackend {
    fps: u32,
    frames: u64,
}

impl HeadlessBackend {
    /// Creates a backend that presents `duration` worth of frames at `fps`.
    pub(crate) fn new(fps: u32, duration: Duration) -> Result<Self> {
        ensure!(fps > 0, "frame rate must be positive");
        let frames = (duration.as_secs_f64() * f64::from(fps)).round() as u64;
        Ok(Self { fps, frames })
    }

    /// Number of frames the backend will present.
    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, &mut Scene) -> Result<()>,
    {
        let frame_interval = Duration::from_secs_f64(1.0 / f64::from(self.fps));
        let frames = self.frames;
        let (sender, receiver) = mpsc::channel::<Duration>();

        let timer = thread::spawn(move || {
            let mut last = Instant::now();
            for _ in 0..frames {
                thread::sleep(frame_interval);
                let now = Instant::now();
                if sender.send(now - last).is_err() {
                    break;
                }
                last = now;
            }
        });

        tracing::info!(
            target: LOG_TARGET,
            title = %presentation.title,
            fps = self.fps,
            frames,
            "playback.started"
        );

        let mut scene = presentation.scene;
        let outcome = receiver
            .iter()
            .try_for_each(|elapsed| update_scene(elapsed, &mut scene));
        drop(receiver);

        timer
            .join()
            .map_err(|_| anyhow!("frame timer thread panicked"))?;
        outcome
    }
}
