mod controls;

use anyhow::Result;
use winit::dpi::PhysicalSize;

use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::device::GpuInit;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::render::{Renderer, SceneConfig};
use lumen_engine::window::{Runtime, RuntimeConfig};
use lumen_engine::{ErrorKind, ErrorSink};

struct Demo {
    renderer: Renderer,
    errors: ErrorSink,
    frame: u64,
    surface_size: Option<PhysicalSize<u32>>,
}

impl Demo {
    fn new(errors: ErrorSink) -> Self {
        let mut renderer = Renderer::new(errors.clone());
        if !renderer.init(&SceneConfig::default()) {
            log::warn!("scene initialized with errors; failed objects are skipped");
        }
        Self {
            renderer,
            errors,
            frame: 0,
            surface_size: None,
        }
    }
}

impl App for Demo {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let size = ctx.gpu.size();
        if self.surface_size != Some(size) {
            if self.surface_size.is_none() {
                log::info!("adapter: {}", ctx.gpu.adapter_summary());
            }
            self.renderer.set_viewport(0, 0, size.width, size.height);
            self.surface_size = Some(size);
        }

        let camera = self.renderer.camera_mut();
        if controls::apply(camera, ctx.input, ctx.input_frame, size.height) {
            ctx.runtime.close_window(ctx.window.id);
            return AppControl::Continue;
        }
        camera.set_delta_time(ctx.time.dt);

        self.renderer.set_frame_count(self.frame);
        self.frame += 1;

        let renderer = &mut self.renderer;
        ctx.render(|rctx, target| renderer.render(rctx, target))
    }

    fn on_context_error(&mut self, error: &anyhow::Error) {
        self.errors.emit(ErrorKind::ContextUnsupported, format!("{error:#}"));
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "lumen".into(),
        ..Default::default()
    };
    Runtime::run(config, GpuInit::default(), Demo::new(ErrorSink::logging()))
}
