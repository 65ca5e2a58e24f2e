use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use tiny_skia::Pixmap;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::Vec2;
use crate::core::{viewport_of, App, AppControl, FrameCtx, GpuSurface, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::{PointerEvent, PointerState};
use crate::lifecycle::{AppPhase, Lifecycle};
use crate::render::BlitRenderer;
use crate::time::FrameClock;

/// How often a backgrounded loop wakes up while no frames are drawn.
const BACKGROUND_POLL: Duration = Duration::from_millis(250);

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "inkflow".to_string(),
            initial_size: LogicalSize::new(1024.0, 768.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the window closes or the app exits.
    ///
    /// `lifecycle` is written by the runtime only; hand clones of it to
    /// whatever needs to observe the host phase.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, lifecycle: Lifecycle, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, gpu_init, lifecycle, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.failure.map_or(Ok(()), Err)
    }
}

#[self_referencing]
struct WindowEntry {
    pointer: PointerState,
    clock: FrameClock,
    blit: BlitRenderer,
    canvas: Option<Pixmap>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct RuntimeState<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    lifecycle: Lifecycle,
    app: A,

    entry: Option<WindowEntry>,
    focused: bool,
    occluded: bool,
    failure: Option<anyhow::Error>,
}

impl<A: App + 'static> RuntimeState<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, lifecycle: Lifecycle, app: A) -> Self {
        Self {
            config,
            gpu_init,
            lifecycle,
            app,
            entry: None,
            focused: true,
            occluded: false,
            failure: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let id = window.id();

        let clock = match window
            .current_monitor()
            .and_then(|m| m.refresh_rate_millihertz())
        {
            Some(mhz) if mhz > 0 => {
                log::debug!("monitor refresh {:.2} Hz", mhz as f64 / 1000.0);
                FrameClock::with_refresh(Duration::from_secs_f64(1000.0 / mhz as f64))
            }
            _ => FrameClock::new(),
        };

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            pointer: PointerState::default(),
            clock,
            blit: BlitRenderer::new(),
            canvas: None,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.entry = Some(entry);
        Ok(id)
    }

    /// Detaches the app and destroys the window.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            self.app.on_detach();
            self.entry = None;
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.close(event_loop);
    }

    fn publish(&mut self, phase: AppPhase) {
        if self.lifecycle.set(phase) != phase {
            self.app.on_phase(phase);
        }
    }

    /// Phase implied by visibility and focus.
    fn visible_phase(&self) -> AppPhase {
        match (self.occluded, self.focused) {
            (true, _) => AppPhase::Background,
            (false, true) => AppPhase::Active,
            (false, false) => AppPhase::Inactive,
        }
    }

    fn pointer(&mut self, f: impl FnOnce(&mut PointerState) -> Option<PointerEvent>) {
        let Some(entry) = self.entry.as_mut() else { return };
        if let Some(ev) = entry.with_pointer_mut(f) {
            self.app.on_pointer(ev);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let phase = self.lifecycle.phase();
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else { return };

        let control = entry.with_mut(|fields| {
            let time = fields.clock.tick();
            if time.missed > 0 {
                log::trace!("frame {} missed {} refresh intervals", time.frame_index, time.missed);
            }

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                surface: GpuSurface::new(fields.gpu, fields.blit, fields.canvas, fields.window),
                phase,
                time,
            };
            app.on_frame(&mut ctx)
        });

        if control == AppControl::Exit {
            self.close(event_loop);
        }
    }
}

impl<A: App + 'static> ApplicationHandler for RuntimeState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                self.fail(event_loop, e);
                return;
            }
            let viewport = match self.entry.as_ref() {
                Some(entry) => entry.with_window(|w| viewport_of(w)),
                None => return,
            };
            if self.app.on_attach(viewport) == AppControl::Exit {
                self.close(event_loop);
                return;
            }
        }

        let phase = self.visible_phase();
        self.publish(phase);

        if let Some(entry) = self.entry.as_mut() {
            entry.with_clock_mut(|c| c.reset());
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.publish(AppPhase::Background);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_ref() else { return };

        if self.lifecycle.phase() == AppPhase::Background {
            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + BACKGROUND_POLL));
            return;
        }

        // FIFO presentation blocks on vblank, so this paces at the refresh rate.
        event_loop.set_control_flow(ControlFlow::Wait);
        entry.with_window(|w| w.request_redraw());
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.close(event_loop),

            WindowEvent::Resized(new_size) => {
                let Some(entry) = self.entry.as_mut() else { return };
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                let viewport = entry.with_window(|w| viewport_of(w));
                self.app.on_resize(viewport);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(entry) = self.entry.as_mut() else { return };
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                let viewport = entry.with_window(|w| viewport_of(w));
                self.app.on_resize(viewport);
            }

            WindowEvent::Occluded(occluded) => {
                self.occluded = occluded;
                let phase = self.visible_phase();
                self.publish(phase);
            }

            WindowEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    self.pointer(|p| p.focus_lost());
                }
                let phase = self.visible_phase();
                self.publish(phase);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let Some(entry) = self.entry.as_ref() else { return };
                let pos = entry.with_window(|w| to_logical(w, position));
                self.pointer(|p| Some(p.moved(pos)));
            }

            WindowEvent::CursorLeft { .. } => {
                self.pointer(|p| {
                    p.left();
                    None
                });
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.pointer(|p| p.button(state == ElementState::Pressed));
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.entry.take().is_some() {
            self.app.on_detach();
        }
    }
}

fn to_logical(window: &Window, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    Vec2::new(logical.x as f32, logical.y as f32)
}
