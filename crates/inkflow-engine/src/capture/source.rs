use anyhow::Result;

use crate::ops::StrokeSink;

/// Something that produces ink: a pen tablet, a smart pad, the mouse.
///
/// `start` hands the source a producer handle; from then on the source may
/// enqueue operations from any thread until `stop` returns.
pub trait InkCaptureSource {
    fn name(&self) -> &str;

    fn start(&mut self, sink: StrokeSink) -> Result<()>;

    fn stop(&mut self) -> Result<()>;
}
