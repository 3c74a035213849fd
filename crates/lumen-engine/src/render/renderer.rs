use std::collections::HashMap;

use glam::{Mat4, Vec3};
use slotmap::SlotMap;

use crate::coords::Viewport;
use crate::error::{ErrorKind, ErrorSink};
use crate::paint::Color;
use crate::render::camera::Camera;
use crate::render::config::{MeshData, ProgramConfig, SceneConfig};
use crate::render::light::Light;
use crate::render::mesh::MeshBuffer;
use crate::render::program::Program;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawList, DrawMode, MeshKey, ProgramKey};

/// Keys of the objects built by [`Renderer::init`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SceneKeys {
    pub lit_program: ProgramKey,
    pub marker_program: ProgramKey,
    pub instance_mesh: MeshKey,
    pub backdrop_mesh: MeshKey,
    pub marker_mesh: MeshKey,
}

/// Per-frame parameters kept from the [`SceneConfig`].
#[derive(Debug, Clone)]
struct Scene {
    keys: SceneKeys,
    instance_indexed: bool,
    backdrop_indexed: bool,
    marker_indexed: bool,
    instance_positions: Vec<Vec3>,
    spin_axis: Vec3,
    spin_rate: f32,
    spin_step: f32,
    marker_scale: f32,
}

/// A recorded draw that passed validation and has GPU objects.
#[derive(Debug, Copy, Clone)]
struct PreparedDraw {
    program: ProgramKey,
    mesh: MeshKey,
    mode: DrawMode,
    /// Index of this draw among the draws of its program.
    slot: u32,
}

/// Composition root: owns every program, mesh and the camera.
///
/// Each frame is recorded into a [`DrawList`] (`record_frame`) and then
/// replayed into one render pass (`submit`); `render` does both.
pub struct Renderer {
    errors: ErrorSink,
    programs: SlotMap<ProgramKey, Program>,
    meshes: SlotMap<MeshKey, MeshBuffer>,
    camera: Camera,
    light: Light,
    clear_color: Color,
    viewport: Viewport,
    frame: u64,
    scene: Option<Scene>,
    list: DrawList,
}

impl Renderer {
    pub fn new(errors: ErrorSink) -> Self {
        Self {
            errors,
            programs: SlotMap::with_key(),
            meshes: SlotMap::with_key(),
            camera: Camera::default(),
            light: Light::default(),
            clear_color: Color::BLACK,
            viewport: Viewport::full(1, 1),
            frame: 0,
            scene: None,
            list: DrawList::new(),
        }
    }

    // ── setup ─────────────────────────────────────────────────────────────

    /// Builds both programs and all three meshes.
    ///
    /// Returns false if anything failed; whatever did succeed is still drawn.
    pub fn init(&mut self, config: &SceneConfig) -> bool {
        if self.scene.is_some() {
            log::warn!("renderer: init called twice; rebuilding scene");
            self.shutdown();
        }

        let mut ok = true;
        let lit_program = self.build_program(&config.lit_program, &mut ok);
        let marker_program = self.build_program(&config.marker_program, &mut ok);

        let instance_mesh = self.build_mesh(&config.instance_mesh, lit_program, &mut ok);
        let backdrop_mesh = self.build_mesh(&config.backdrop_mesh, lit_program, &mut ok);
        let marker_mesh = self.build_mesh(&config.marker_mesh, marker_program, &mut ok);

        self.light = config.light;
        self.clear_color = config.clear_color;
        self.scene = Some(Scene {
            keys: SceneKeys {
                lit_program,
                marker_program,
                instance_mesh,
                backdrop_mesh,
                marker_mesh,
            },
            instance_indexed: config.instance_mesh.is_indexed(),
            backdrop_indexed: config.backdrop_mesh.is_indexed(),
            marker_indexed: config.marker_mesh.is_indexed(),
            instance_positions: config.instance_positions.clone(),
            spin_axis: config.spin_axis.try_normalize().unwrap_or(Vec3::Y),
            spin_rate: config.spin_rate,
            spin_step: config.spin_step,
            marker_scale: config.marker_scale,
        });

        log::info!(
            "renderer: scene ready ({} program(s), {} mesh(es), {} instance(s)){}",
            self.programs.len(),
            self.meshes.len(),
            config.instance_positions.len(),
            if ok { "" } else { " with errors" }
        );
        ok
    }

    fn build_program(&mut self, config: &ProgramConfig, ok: &mut bool) -> ProgramKey {
        let errors = self.errors.clone();
        let key = self.programs.insert_with_key(|key| config.build(key, errors));
        *ok &= self.programs[key].init();
        key
    }

    fn build_mesh(&mut self, data: &MeshData, program: ProgramKey, ok: &mut bool) -> MeshKey {
        let errors = self.errors.clone();
        let key = self
            .meshes
            .insert_with_key(|key| MeshBuffer::new(key, data.label.clone(), errors));
        let uploaded = self.meshes[key].upload(
            &self.programs[program],
            data.vertex_count,
            data.triangle_count,
            data.arrays(),
        );
        *ok &= uploaded;
        key
    }

    /// Releases meshes, then programs. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.list.clear();
        for (_, mesh) in self.meshes.iter_mut() {
            mesh.clear();
        }
        self.meshes.clear();
        for (_, program) in self.programs.iter_mut() {
            program.clear();
        }
        self.programs.clear();
        self.scene = None;
    }

    // ── hooks ─────────────────────────────────────────────────────────────

    /// Sets the target rectangle (width/height clamped to at least 1) and
    /// the camera's aspect ratio.
    pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = Viewport::new(x, y, width, height);
        self.camera
            .set_viewport_size(self.viewport.width, self.viewport.height);
    }

    /// Frame counter driving the light orbit and the instance spin.
    pub fn set_frame_count(&mut self, frame: u64) {
        self.frame = frame;
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Records this frame's commands and returns them.
    pub fn record_frame(&mut self) -> &DrawList {
        self.list.clear();
        let Some(scene) = &self.scene else {
            return &self.list;
        };

        let (view, projection) = self.camera.view_and_projection();
        let light_pos = Light::orbit(self.frame, self.light.position.z);
        self.light.set(light_pos, self.light.intensity, self.light.color);
        let light_color = self.light.color;
        let view_pos = self.camera.position();

        let list = &mut self.list;
        let keys = scene.keys;

        if let Some(lit) = self.programs.get(keys.lit_program)
            && lit.use_program(list)
        {
            let lit_uniforms = |list: &mut DrawList, model: &Mat4| {
                lit.set_uniform(list, "projection", &projection);
                lit.set_uniform(list, "view", &view);
                lit.set_uniform(list, "model", model);
                lit.set_uniform(list, "lightColor", &light_color);
                lit.set_uniform(list, "lightPos", &light_pos);
                lit.set_uniform(list, "viewPos", &view_pos);
            };

            if let Some(mesh) = self.meshes.get(keys.instance_mesh) {
                let angles = spin_angles(self.frame, scene.spin_rate, scene.spin_step);
                for (position, angle) in scene.instance_positions.iter().zip(angles) {
                    let model = Mat4::from_translation(*position)
                        * Mat4::from_axis_angle(scene.spin_axis, angle.to_radians());
                    lit_uniforms(list, &model);
                    mesh.draw(list, scene.instance_indexed);
                }
            }

            if let Some(mesh) = self.meshes.get(keys.backdrop_mesh) {
                lit_uniforms(list, &Mat4::IDENTITY);
                mesh.draw(list, scene.backdrop_indexed);
            }
        }

        if let Some(marker) = self.programs.get(keys.marker_program)
            && marker.use_program(list)
        {
            let model =
                Mat4::from_translation(light_pos) * Mat4::from_scale(Vec3::splat(scene.marker_scale));
            let mvp = projection * view * model;
            marker.set_uniform(list, "MVP", &mvp);
            marker.set_uniform(list, "aColor", &light_color);
            if let Some(mesh) = self.meshes.get(keys.marker_mesh) {
                mesh.draw(list, scene.marker_indexed);
            }
            marker.stop_use(list);
        }

        &self.list
    }

    /// Records the frame and submits it into one render pass.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.record_frame();
        self.submit(ctx, target);
    }

    /// Replays the recorded list: clears color and depth, applies the
    /// viewport and issues every valid draw.
    pub fn submit(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let depth_format = target.depth_view.and(ctx.depth_format);
        let batch = self.prepare_draws(ctx, depth_format);

        let depth_stencil_attachment =
            target
                .depth_view
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let (target_w, target_h) = ctx.surface_size;
        let Some((x, y, w, h)) = self.viewport.fit(target_w, target_h) else {
            return;
        };
        rpass.set_viewport(x, y, w, h, 0.0, 1.0);

        for draw in &batch {
            let (Some(program), Some(mesh)) = (self.programs.get(draw.program), self.meshes.get(draw.mesh))
            else {
                continue;
            };
            let (Some(gpu), Some(buffers)) = (program.gpu(), mesh.gpu()) else {
                continue;
            };
            let Some(pipeline) = gpu.cached_pipeline(mesh.layout(), ctx.surface_format, depth_format)
            else {
                continue;
            };

            rpass.set_pipeline(pipeline);
            if let Some(bind_group) = gpu.bind_group() {
                rpass.set_bind_group(0, bind_group, &[gpu.uniform_offset(draw.slot)]);
            }
            rpass.set_vertex_buffer(0, buffers.vertex.slice(..));
            match draw.mode {
                DrawMode::Indexed { count } => {
                    let Some(index) = &buffers.index else { continue };
                    rpass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..count, 0, 0..1);
                }
                DrawMode::Arrays { count } => rpass.draw(0..count, 0..1),
            }
        }
    }

    /// Validates recorded draws, creates missing GPU objects and uploads
    /// uniform blocks. Draws that cannot be issued are reported and dropped.
    fn prepare_draws(
        &mut self,
        ctx: &RenderCtx<'_>,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Vec<PreparedDraw> {
        let mut batch = Vec::new();
        let mut blocks: HashMap<ProgramKey, Vec<&[u8]>> = HashMap::new();

        for call in self.list.draw_calls() {
            if call.mode.count() == 0 {
                continue;
            }
            let Some(program_key) = call.program else {
                self.errors
                    .emit(ErrorKind::DrawCall, "draw recorded without a current program");
                continue;
            };
            let (Some(program), Some(mesh)) = (
                self.programs.get_mut(program_key),
                self.meshes.get_mut(call.mesh),
            ) else {
                self.errors
                    .emit(ErrorKind::DrawCall, "draw refers to a released program or mesh");
                continue;
            };
            if let Err(msg) = program.check_layout(mesh.layout()) {
                self.errors.emit(ErrorKind::DrawCall, msg);
                continue;
            }
            if mesh.prepare(ctx.device).is_none()
                || !program.prepare_pipeline(ctx.device, mesh.layout(), ctx.surface_format, depth_format)
            {
                continue;
            }

            let program_blocks = blocks.entry(program_key).or_default();
            batch.push(PreparedDraw {
                program: program_key,
                mesh: call.mesh,
                mode: call.mode,
                slot: program_blocks.len() as u32,
            });
            program_blocks.push(&call.uniforms);
        }

        for (key, program_blocks) in blocks {
            if let Some(program) = self.programs.get_mut(key) {
                program.write_uniforms(ctx.device, ctx.queue, program_blocks.into_iter());
            }
        }
        batch
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn light(&self) -> &Light {
        &self.light
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Keys of the scene objects, once `init` has run.
    pub fn scene_keys(&self) -> Option<SceneKeys> {
        self.scene.as_ref().map(|s| s.keys)
    }

    pub fn program(&self, key: ProgramKey) -> Option<&Program> {
        self.programs.get(key)
    }

    pub fn mesh(&self, key: MeshKey) -> Option<&MeshBuffer> {
        self.meshes.get(key)
    }

    /// Commands of the most recently recorded frame.
    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Running spin angles (degrees) for consecutive instances at `frame`.
///
/// The accumulator is shared across instances: instance `i` gets
/// `(i + 1) * rate * frame + i * step`, so later instances spin faster.
pub fn spin_angles(frame: u64, rate: f32, step: f32) -> impl Iterator<Item = f32> {
    let per_instance = rate * frame as f32;
    (0u32..).map(move |i| (i + 1) as f32 * per_instance + i as f32 * step)
}
