use anyhow::{bail, Result};
use inkflow_engine::capture::{InkCaptureSource, StrokeBuilder};
use inkflow_engine::input::PointerEvent;
use inkflow_engine::ink::InkPoint;
use inkflow_engine::ops::StrokeSink;

/// Draws with the mouse: press, drag, release.
///
/// Window positions are already view coordinates, so no device transform
/// applies.
pub struct PointerPen {
    width: f32,
    builder: Option<StrokeBuilder>,
}

impl PointerPen {
    pub fn new(width: f32) -> Self {
        Self { width, builder: None }
    }

    pub fn handle(&mut self, event: PointerEvent) {
        let Some(builder) = self.builder.as_mut() else { return };

        match event {
            PointerEvent::Pressed(pos) => builder.stroke_began(vec![InkPoint::from(pos)]),
            PointerEvent::Moved { pos, pressed: true } if builder.is_active() => {
                builder.stroke_moved(vec![InkPoint::from(pos)]);
            }
            PointerEvent::Moved { .. } => {}
            PointerEvent::Released(pos) => builder.stroke_ended(Some(vec![InkPoint::from(pos)]), false),
            PointerEvent::Cancelled => builder.stroke_ended(None, true),
        }
    }
}

impl InkCaptureSource for PointerPen {
    fn name(&self) -> &str {
        "pointer"
    }

    fn start(&mut self, sink: StrokeSink) -> Result<()> {
        if self.builder.is_some() {
            bail!("pointer pen already started");
        }
        self.builder = Some(StrokeBuilder::new(sink, self.width));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(mut builder) = self.builder.take()
            && builder.is_active()
        {
            builder.stroke_ended(None, true);
        }
        Ok(())
    }
}
