use crate::ink::{InkPoint, VectorPath};
use crate::ops::StrokeSink;

/// Receiver side of the capture contract.
///
/// Capture sources report `stroke_began` / `stroke_moved` / `stroke_ended`;
/// the builder forwards each chunk as a fragment, keeps the whole stroke, and
/// vectorizes it at the end so the raster ink can be replaced by a layer.
#[derive(Debug)]
pub struct StrokeBuilder {
    sink: StrokeSink,
    width: f32,
    points: Vec<InkPoint>,
    active: bool,
}

impl StrokeBuilder {
    /// `width` is the pen width used where points carry no width channel.
    pub fn new(sink: StrokeSink, width: f32) -> Self {
        Self {
            sink,
            width,
            points: Vec::new(),
            active: false,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stroke_began(&mut self, chunk: Vec<InkPoint>) {
        if self.active {
            log::debug!("stroke began while another was active; previous stroke discarded");
            self.sink.enqueue_discard();
        }
        self.points.clear();
        self.active = true;
        self.forward(chunk, false);
    }

    pub fn stroke_moved(&mut self, chunk: Vec<InkPoint>) {
        if !self.active {
            log::debug!("stroke moved without a begin; starting a new stroke");
            self.points.clear();
            self.active = true;
        }
        self.forward(chunk, false);
    }

    /// Ends the stroke. A cancelled stroke, or one with no usable geometry,
    /// is discarded instead of committed.
    pub fn stroke_ended(&mut self, chunk: Option<Vec<InkPoint>>, cancelled: bool) {
        if !self.active {
            log::debug!("stroke ended without a begin; ignored");
            return;
        }
        self.forward(chunk.unwrap_or_default(), true);
        self.active = false;

        let outline = if cancelled {
            None
        } else {
            VectorPath::outline(&self.points, self.mean_width())
        };

        match outline {
            Some(path) => self.sink.enqueue_final_stroke(path),
            None => self.sink.enqueue_discard(),
        }
        self.points.clear();
    }

    fn forward(&mut self, chunk: Vec<InkPoint>, is_final: bool) {
        self.points.extend_from_slice(&chunk);
        self.sink.enqueue_fragment(chunk, is_final);
    }

    fn mean_width(&self) -> f32 {
        if self.points.is_empty() {
            return self.width;
        }
        let sum: f32 = self.points.iter().map(|p| p.width_or(self.width)).sum();
        sum / self.points.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{op_channel, DrawOp, OpQueue};

    fn kinds(queue: &mut OpQueue) -> Vec<&'static str> {
        queue.pull();
        let kinds = queue.iter().map(|q| q.op.kind()).collect();
        queue.clear();
        kinds
    }

    fn pts(xs: &[f32]) -> Vec<InkPoint> {
        xs.iter().map(|&x| InkPoint::new(x, 10.0)).collect()
    }

    #[test]
    fn completed_stroke_is_committed() {
        let (sink, mut queue) = op_channel();
        let mut b = StrokeBuilder::new(sink, 2.0);

        b.stroke_began(pts(&[0.0, 1.0]));
        b.stroke_moved(pts(&[2.0, 3.0]));
        b.stroke_ended(Some(pts(&[4.0])), false);

        assert_eq!(kinds(&mut queue), vec!["append", "append", "append", "commit"]);
        assert!(!b.is_active());
    }

    #[test]
    fn final_fragment_is_flagged() {
        let (sink, mut queue) = op_channel();
        let mut b = StrokeBuilder::new(sink, 2.0);

        b.stroke_began(pts(&[0.0]));
        b.stroke_ended(None, false);

        queue.pull();
        let finals: Vec<bool> = queue
            .iter()
            .filter_map(|q| match &q.op {
                DrawOp::Append(f) => Some(f.is_final),
                _ => None,
            })
            .collect();
        assert_eq!(finals, vec![false, true]);
    }

    #[test]
    fn cancelled_stroke_is_discarded() {
        let (sink, mut queue) = op_channel();
        let mut b = StrokeBuilder::new(sink, 2.0);

        b.stroke_began(pts(&[0.0, 5.0]));
        b.stroke_ended(None, true);

        assert_eq!(kinds(&mut queue), vec!["append", "append", "discard"]);
    }

    #[test]
    fn committed_outline_uses_width_channel() {
        let (sink, mut queue) = op_channel();
        let mut b = StrokeBuilder::new(sink, 2.0);

        b.stroke_began(vec![InkPoint::with_width(0.0, 0.0, 10.0), InkPoint::with_width(20.0, 0.0, 10.0)]);
        b.stroke_ended(None, false);

        queue.pull();
        let Some(DrawOp::Commit(path)) = queue.iter().last().map(|q| q.op.clone()) else {
            panic!("expected a commit");
        };
        assert!((path.bounds().size.y - 10.0).abs() < 0.5);
    }

    #[test]
    fn restarting_discards_the_open_stroke() {
        let (sink, mut queue) = op_channel();
        let mut b = StrokeBuilder::new(sink, 2.0);

        b.stroke_began(pts(&[0.0]));
        b.stroke_began(pts(&[9.0]));

        assert_eq!(kinds(&mut queue), vec!["append", "discard", "append"]);
    }

    #[test]
    fn end_without_begin_is_ignored() {
        let (sink, mut queue) = op_channel();
        let mut b = StrokeBuilder::new(sink, 2.0);
        b.stroke_ended(Some(pts(&[1.0])), false);
        assert!(kinds(&mut queue).is_empty());
    }
}
