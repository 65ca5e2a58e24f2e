use crate::ink::{InkPoint, StrokePhase, VectorPath};
use crate::lifecycle::{Lifecycle, SuspendGuard};
use crate::ops::{op_channel, DrawOp, OpQueue, QueuedOp, StrokeSink};
use crate::paint::Color;
use crate::raster::{Brush, RasterError, RasterTarget};
use crate::surface::{Damage, DisplaySurface, Frame, VectorLayer};

use super::{BufferConfig, DrainOutcome, DrainReport};

/// Decouples ink arrival from presentation.
///
/// Operations queue up at whatever rate the capture source delivers them and
/// are applied once per display refresh by `drain_and_present`. Nothing is
/// dropped or reordered; while the host is backgrounded the queue simply
/// grows until the next foreground tick.
///
/// The buffer itself lives on the render thread. Other threads talk to it
/// only through the `StrokeSink` handles returned by `sink()`.
pub struct RenderBuffer<G: SuspendGuard = Lifecycle> {
    sink: StrokeSink,
    queue: OpQueue,

    raster: RasterTarget,
    layers: Vec<VectorLayer>,
    clear: Color,

    guard: G,
    phase: StrokePhase,

    /// Set when the visible state changed but no frame showed it yet.
    needs_present: bool,
    /// Logical area changed since the last successful present.
    damage: Damage,
    strokes_finalized: u64,
}

impl<G: SuspendGuard> RenderBuffer<G> {
    /// Creates a buffer for a newly attached surface.
    pub fn new(config: BufferConfig, guard: G) -> Result<Self, RasterError> {
        let raster = RasterTarget::new(config.width, config.height, config.scale, config.brush)?;
        let (sink, queue) = op_channel();

        Ok(Self {
            sink,
            queue,
            raster,
            layers: Vec::new(),
            clear: config.clear,
            guard,
            phase: StrokePhase::NotStarted,
            needs_present: false,
            damage: Damage::Full,
            strokes_finalized: 0,
        })
    }

    /// A producer handle for capture sources. Clone freely.
    #[inline]
    pub fn sink(&self) -> StrokeSink {
        self.sink.clone()
    }

    /// Appends a stroke fragment. Never blocks.
    #[inline]
    pub fn enqueue_fragment(&self, points: Vec<InkPoint>, is_final: bool) {
        self.sink.enqueue_fragment(points, is_final);
    }

    /// Appends the commit of the finished stroke's geometry.
    #[inline]
    pub fn enqueue_final_stroke(&self, path: VectorPath) {
        self.sink.enqueue_final_stroke(path);
    }

    /// Appends a discard of the in-progress stroke.
    #[inline]
    pub fn enqueue_discard(&self) {
        self.sink.enqueue_discard();
    }

    /// Runs every pending operation in arrival order and presents one frame.
    ///
    /// Call once per display refresh. With an empty queue (and no frame
    /// owed from an earlier failed present) this does nothing. The suspend
    /// guard is consulted before each operation; once it reports suspended
    /// the drain stops where it is, without presenting, and the remaining
    /// operations run on a later tick.
    pub fn drain_and_present<S>(&mut self, surface: &mut S) -> DrainReport
    where
        S: DisplaySurface + ?Sized,
    {
        self.queue.pull();

        let had_work = !self.queue.is_empty();
        if !had_work && !self.needs_present {
            return DrainReport::new(DrainOutcome::Idle);
        }

        if !surface.is_ready() {
            log::trace!("surface not ready; {} ops deferred", self.queue.len());
            return self.report(DrainOutcome::SurfaceNotReady, 0, 0);
        }

        let mut executed = 0;
        let mut skipped = 0;

        loop {
            if self.queue.front().is_none() {
                break;
            }
            if self.guard.is_suspended() {
                log::debug!(
                    "drain suspended after {executed} ops; {} remain queued",
                    self.queue.len()
                );
                return self.report(DrainOutcome::Suspended, executed, skipped);
            }
            let Some(queued) = self.queue.pop_front() else { break };

            if !self.execute(queued) {
                skipped += 1;
            }
            executed += 1;
        }

        // Presenting is also driving the display.
        if self.guard.is_suspended() {
            return self.report(DrainOutcome::Suspended, executed, skipped);
        }

        let presented = surface.present(&self.frame());
        let outcome = match presented {
            Ok(()) => {
                self.needs_present = false;
                self.damage = Damage::Clean;
                DrainOutcome::Presented
            }
            Err(err) if err.is_recoverable() => {
                log::debug!("present failed ({err}); retrying next tick");
                self.needs_present = true;
                DrainOutcome::PresentFailed(err)
            }
            Err(err) => {
                log::error!("present failed: {err}");
                self.needs_present = false;
                DrainOutcome::PresentFailed(err)
            }
        };

        self.report(outcome, executed, skipped)
    }

    /// Discards pending operations, raster ink and every vector layer.
    ///
    /// Used when the surface detaches. An in-progress stroke is dropped
    /// unconditionally.
    pub fn reset(&mut self) {
        let dropped = self.queue.clear();
        self.raster.clear();
        // Subsumed by full damage.
        self.raster.take_dirty();
        self.layers.clear();
        self.phase = StrokePhase::NotStarted;
        self.needs_present = true;
        self.damage = Damage::Full;

        log::debug!("render buffer reset ({dropped} pending ops dropped)");
    }

    /// Adapts to a new drawable size, keeping ink and layers.
    pub fn resize(&mut self, width: u32, height: u32, scale: f32) -> Result<(), RasterError> {
        if width == self.raster.width() && height == self.raster.height() && scale == self.raster.scale() {
            return Ok(());
        }
        self.raster.resize(width, height, scale)?;
        self.raster.take_dirty();
        self.needs_present = true;
        self.damage = Damage::Full;
        Ok(())
    }

    /// Brush used for subsequent strokes and their vector layers.
    pub fn set_brush(&mut self, brush: Brush) {
        self.raster.set_brush(brush);
    }

    /// What the display shows once pending work is presented.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            clear: self.clear,
            raster: &self.raster,
            layers: &self.layers,
            damage: self.damage,
        }
    }

    /// Area the next presented frame repaints.
    #[inline]
    pub fn damage(&self) -> Damage {
        self.damage
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn raster(&self) -> &RasterTarget {
        &self.raster
    }

    #[inline]
    pub fn layers(&self) -> &[VectorLayer] {
        &self.layers
    }

    #[inline]
    pub fn stroke_phase(&self) -> StrokePhase {
        self.phase
    }

    #[inline]
    pub fn strokes_finalized(&self) -> u64 {
        self.strokes_finalized
    }

    /// Applies one operation. Returns `false` when it was skipped.
    fn execute(&mut self, queued: QueuedOp) -> bool {
        let QueuedOp { seq, op } = queued;
        log::trace!("op #{seq}: {}", op.kind());

        match op {
            DrawOp::Append(fragment) => {
                if fragment.is_empty() {
                    log::trace!("op #{seq}: empty fragment skipped");
                    return false;
                }
                if self.phase == StrokePhase::Ended {
                    log::debug!("op #{seq}: new stroke started before the previous one was committed");
                }
                self.raster.draw_fragment(&fragment);
                self.phase = self.phase.on_fragment(fragment.is_final);
            }
            DrawOp::Commit(path) => {
                // Antialiased edges reach one pixel past the outline.
                self.damage = self.damage.include(Some(path.bounds().inflate(1.0)));
                self.layers.push(VectorLayer::new(path, self.raster.brush().color));
                self.raster.clear();
                self.phase = self.phase.on_finish();
                self.strokes_finalized += 1;
            }
            DrawOp::Discard => {
                self.raster.clear();
                self.phase = self.phase.on_finish();
            }
        }

        self.damage = self.damage.include(self.raster.take_dirty());
        self.needs_present = true;
        true
    }

    fn report(&self, outcome: DrainOutcome, executed: usize, skipped_empty: usize) -> DrainReport {
        DrainReport {
            outcome,
            executed,
            skipped_empty,
            remaining: self.queue.len(),
        }
    }
}
