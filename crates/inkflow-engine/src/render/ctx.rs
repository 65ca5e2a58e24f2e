use crate::device::{Gpu, GpuFrame};

/// What a renderer records into: the device objects plus the acquired
/// frame's encoder and color view.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub format: wgpu::TextureFormat,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
}

impl<'a> RenderCtx<'a> {
    pub fn for_frame(gpu: &'a Gpu<'_>, frame: &'a mut GpuFrame) -> Self {
        let GpuFrame { encoder, view, .. } = frame;
        Self {
            device: gpu.device(),
            queue: gpu.queue(),
            format: gpu.surface_format(),
            encoder,
            view,
        }
    }
}
