use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use inkflow_engine::capture::{
    ConnectionStatus, DeviceKind, DeviceTransform, InkCaptureSource, StatusEvent, StrokeBuilder,
};
use inkflow_engine::ink::InkPoint;
use inkflow_engine::ops::StrokeSink;

/// Synthetic pen settings.
#[derive(Debug, Clone)]
pub struct PenConfig {
    pub device: DeviceKind,
    /// Sensor size in device units.
    pub sensor: (f32, f32),
    /// View size in logical pixels.
    pub view: (f32, f32),
    pub width: f32,
    /// Time between samples.
    pub sample_interval: Duration,
    pub samples_per_stroke: usize,
    /// Samples per reported chunk.
    pub chunk: usize,
    pub pause: Duration,
    pub strokes: usize,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            device: DeviceKind::BambooSlateOrFolio,
            sensor: (21600.0, 14800.0),
            view: (1024.0, 768.0),
            width: 3.0,
            sample_interval: Duration::from_millis(4),
            samples_per_stroke: 120,
            chunk: 5,
            pause: Duration::from_millis(350),
            strokes: 16,
        }
    }
}

/// Background thread drawing parametric strokes, standing in for a smart
/// pad delivering realtime ink.
pub struct SyntheticPen {
    config: PenConfig,
    status: ConnectionStatus,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SyntheticPen {
    pub fn new(config: PenConfig) -> Self {
        Self {
            config,
            status: ConnectionStatus::NotConnected,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    #[inline]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    fn transition(&mut self, event: StatusEvent) -> Result<()> {
        self.status = self.status.apply(event)?;
        if let Some(msg) = self.status.message() {
            log::info!("{}: {msg}", self.config.device.display_name());
        }
        Ok(())
    }
}

impl InkCaptureSource for SyntheticPen {
    fn name(&self) -> &str {
        self.config.device.display_name()
    }

    fn start(&mut self, sink: StrokeSink) -> Result<()> {
        if self.worker.is_some() {
            bail!("synthetic pen already started");
        }

        self.transition(StatusEvent::ConnectRequested)?;
        self.transition(StatusEvent::Connected)?;

        let config = self.config.clone();
        let stop = Arc::clone(&self.stop);
        stop.store(false, Ordering::Release);

        let worker = std::thread::Builder::new()
            .name("synthetic-pen".into())
            .spawn(move || draw_loop(config, sink, &stop))
            .context("failed to spawn synthetic pen thread")?;

        self.worker = Some(worker);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        self.stop.store(true, Ordering::Release);
        worker
            .join()
            .map_err(|_| anyhow!("synthetic pen thread panicked"))?;
        if !self.status.is_connected() {
            return Ok(());
        }
        self.transition(StatusEvent::Disconnected)
    }
}

impl Drop for SyntheticPen {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("{e:#}");
        }
    }
}

fn draw_loop(config: PenConfig, sink: StrokeSink, stop: &AtomicBool) {
    let transform = config.device.view_transform(config.sensor, config.view);
    let mut builder = StrokeBuilder::new(sink, config.width);
    let chunk = config.chunk.max(1);

    for index in 0..config.strokes {
        let samples: Vec<InkPoint> = stroke_samples(index, &config)
            .into_iter()
            .map(|p| transform.apply_point(p))
            .collect();

        for (n, part) in samples.chunks(chunk).enumerate() {
            if stop.load(Ordering::Acquire) {
                if builder.is_active() {
                    builder.stroke_ended(None, true);
                }
                return;
            }
            if n == 0 {
                builder.stroke_began(part.to_vec());
            } else {
                builder.stroke_moved(part.to_vec());
            }
            std::thread::sleep(config.sample_interval * part.len() as u32);
        }
        builder.stroke_ended(None, false);

        log::debug!("synthetic stroke {} of {} done", index + 1, config.strokes);
        if sleep_unless_stopped(config.pause, stop) {
            return;
        }
    }
}

/// Returns `true` when stopped early.
fn sleep_unless_stopped(total: Duration, stop: &AtomicBool) -> bool {
    let step = Duration::from_millis(10);
    let mut left = total;
    while !left.is_zero() {
        if stop.load(Ordering::Acquire) {
            return true;
        }
        let d = left.min(step);
        std::thread::sleep(d);
        left -= d;
    }
    stop.load(Ordering::Acquire)
}

/// A looping curl, placed on the sensor by a low-discrepancy sequence.
/// Pressure rises and falls along the stroke.
fn stroke_samples(index: usize, config: &PenConfig) -> Vec<InkPoint> {
    let (sw, sh) = config.sensor;
    let n = config.samples_per_stroke.max(2);

    let fx = (index as f32 * 0.618_034).fract();
    let fy = (index as f32 * 0.381_966 + 0.5).fract();
    let cx = sw * (0.2 + 0.6 * fx);
    let cy = sh * (0.2 + 0.6 * fy);
    let r = sw.min(sh) * 0.08;

    // Widths are in device units; the transform scales them to the view.
    let device_width = config.width * (sw / config.view.0.max(1.0));

    (0..n)
        .map(|i| {
            let t = i as f32 / (n - 1) as f32;
            let a = t * TAU * 1.5;
            let x = cx + r * (2.0 * t - 1.0) * 2.0 + r * 0.6 * a.cos();
            let y = cy + r * 0.6 * a.sin();
            let pressure = 0.5 + 0.5 * (t * std::f32::consts::PI).sin();
            InkPoint::with_width(x, y, device_width * pressure)
        })
        .collect()
}
