//! Shader program lifecycle.
//!
//! A [`Program`] collects attribute and uniform declarations plus WGSL
//! sources, then `init()` compiles, binds attributes, links and resolves
//! uniforms on the CPU. GPU objects are created later, the first time the
//! program is submitted.
//!
//! ```text
//! Pending --init ok--> Ready --clear--> Released
//!    \----init err---> Failed --clear--/
//! ```

mod gpu;
mod link;
mod slots;
mod source;

use std::path::Path;

use bytemuck::Pod;

pub use slots::{AttributeSlot, ProgramState, UniformLocation, UniformSlot};
pub use source::{ShaderSource, ShaderStage};

use crate::error::{ErrorKind, ErrorSink, GpuError};
use crate::render::vertex::VertexLayout;
use crate::scene::{DrawList, ProgramKey};

use gpu::GpuProgram;
use link::Linked;

pub struct Program {
    key: ProgramKey,
    label: String,
    errors: ErrorSink,
    state: ProgramState,

    attributes: Vec<AttributeSlot>,
    uniforms: Vec<UniformSlot>,
    sources: Vec<ShaderSource>,

    linked: Option<Linked>,
    gpu: Option<GpuProgram>,
}

impl Program {
    pub fn new(key: ProgramKey, label: impl Into<String>, errors: ErrorSink) -> Self {
        Self {
            key,
            label: label.into(),
            errors,
            state: ProgramState::Pending,
            attributes: Vec::new(),
            uniforms: Vec::new(),
            sources: Vec::new(),
            linked: None,
            gpu: None,
        }
    }

    #[inline]
    pub fn key(&self) -> ProgramKey {
        self.key
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn state(&self) -> ProgramState {
        self.state
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == ProgramState::Ready
    }

    pub fn attributes(&self) -> &[AttributeSlot] {
        &self.attributes
    }

    /// Declared uniforms; locations are filled in once the program is ready.
    pub fn uniforms(&self) -> &[UniformSlot] {
        match &self.linked {
            Some(linked) => &linked.uniforms,
            None => &self.uniforms,
        }
    }

    // ── declaration ───────────────────────────────────────────────────────

    /// Declares a vertex input. Its index is the number of attributes
    /// declared before it.
    pub fn declare_attribute(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.accepts_declarations("attribute", &name) {
            return;
        }
        if self.attributes.iter().any(|a| a.name == name) {
            log::warn!("{}: attribute `{name}` declared twice", self.label);
            return;
        }
        let index = self.attributes.len() as u32;
        self.attributes.push(AttributeSlot { name, index });
    }

    /// Declares a uniform that must resolve for `init()` to succeed.
    pub fn declare_uniform(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.accepts_declarations("uniform", &name) {
            return;
        }
        if self.uniforms.iter().any(|u| u.name == name) {
            log::warn!("{}: uniform `{name}` declared twice", self.label);
            return;
        }
        self.uniforms.push(UniformSlot { name, location: None });
    }

    pub fn add_source(&mut self, stage: ShaderStage, text: impl Into<String>) {
        self.attach(ShaderSource::new(stage, text));
    }

    /// Reads a source unit from `path` and attaches it.
    pub fn load_source(&mut self, stage: ShaderStage, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let source = ShaderSource::from_path(stage, path).inspect_err(|e| {
            log::warn!("{}: {e:#}", self.label);
        })?;
        self.attach(source);
        Ok(())
    }

    pub fn attach(&mut self, source: ShaderSource) {
        if self.accepts_declarations("source", &source.stage().to_string()) {
            self.sources.push(source);
        }
    }

    fn accepts_declarations(&self, what: &str, name: &str) -> bool {
        if self.state == ProgramState::Pending {
            return true;
        }
        log::warn!(
            "{}: {what} `{name}` ignored; program is {:?}",
            self.label,
            self.state
        );
        false
    }

    // ── init ──────────────────────────────────────────────────────────────

    /// Compiles, links and resolves uniforms.
    ///
    /// Returns true when the program is ready. A failure is reported through
    /// the error sink and is permanent.
    pub fn init(&mut self) -> bool {
        match self.state {
            ProgramState::Ready => return true,
            ProgramState::Failed | ProgramState::Released => return false,
            ProgramState::Pending => {}
        }

        match link::link(&self.sources, &self.attributes, &self.uniforms) {
            Ok(linked) => {
                log::debug!(
                    "{}: linked, {} input(s), uniform block {} bytes",
                    self.label,
                    linked.inputs.len(),
                    linked.block_size()
                );
                self.linked = Some(linked);
                self.state = ProgramState::Ready;
                self.errors
                    .info(format!("{}: shaders successfully compiled and linked", self.label));
                true
            }
            Err(e) => {
                self.state = ProgramState::Failed;
                self.errors
                    .report(GpuError::new(e.kind(), format!("{}: {e}", self.label)));
                false
            }
        }
    }

    // ── activation ────────────────────────────────────────────────────────

    /// Makes this program current in `list`. Returns false (and records
    /// nothing) unless the program is ready.
    pub fn use_program(&self, list: &mut DrawList) -> bool {
        let Some(linked) = self.linked.as_ref().filter(|_| self.is_ready()) else {
            self.errors.emit(
                ErrorKind::DrawCall,
                format!("{}: cannot use program in state {:?}", self.label, self.state),
            );
            return false;
        };
        list.bind_program(self.key, linked.block_size() as usize);
        true
    }

    pub fn stop_use(&self, list: &mut DrawList) {
        list.unbind_program();
    }

    // ── lookup ────────────────────────────────────────────────────────────

    /// Bound index of an active vertex input, `None` if the linked program
    /// does not consume `name`.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.linked.as_ref()?.input(name).map(|i| i.location)
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.linked.as_ref()?.block.as_ref()?.find(name)
    }

    /// Writes `value` into uniform `name` of this program in `list`.
    ///
    /// The program must be current. An unknown name is reported as
    /// `UniformUnresolved`; a value wider than the uniform as `DrawCall`.
    pub fn set_uniform<T: Pod>(&self, list: &mut DrawList, name: &str, value: &T) -> bool {
        let Some(location) = self.uniform_location(name) else {
            self.errors.emit(
                ErrorKind::UniformUnresolved,
                format!("{}: uniform `{name}` has no location", self.label),
            );
            return false;
        };
        let bytes = bytemuck::bytes_of(value);
        if bytes.len() > location.size as usize {
            self.errors.emit(
                ErrorKind::DrawCall,
                format!(
                    "{}: {} byte value does not fit uniform `{name}` ({} bytes)",
                    self.label,
                    bytes.len(),
                    location.size
                ),
            );
            return false;
        }
        if !list.write_uniform(self.key, location.offset as usize, bytes) {
            self.errors.emit(
                ErrorKind::DrawCall,
                format!("{}: uniform `{name}` set while program is not current", self.label),
            );
            return false;
        }
        true
    }

    /// Checks that `layout` feeds every vertex input of this program with
    /// float data.
    pub fn check_layout(&self, layout: &VertexLayout) -> Result<(), String> {
        let Some(linked) = &self.linked else {
            return Err(format!("{}: program is not linked", self.label));
        };
        for input in &linked.inputs {
            if layout.location(input.location).is_none() {
                return Err(format!(
                    "{}: vertex input `{}` (location {}) is not provided by the mesh",
                    self.label, input.name, input.location
                ));
            }
            if input.shape.is_some_and(|s| s.kind != naga::ScalarKind::Float) {
                return Err(format!(
                    "{}: vertex input `{}` must be a float type",
                    self.label, input.name
                ));
            }
        }
        Ok(())
    }

    // ── release ───────────────────────────────────────────────────────────

    /// Releases the linked modules and GPU objects. Safe to call repeatedly.
    pub fn clear(&mut self) {
        if self.state == ProgramState::Released {
            return;
        }
        self.gpu = None;
        self.linked = None;
        self.sources.clear();
        self.state = ProgramState::Released;
        log::debug!("{}: released", self.label);
    }

    // ── gpu ───────────────────────────────────────────────────────────────

    /// Creates GPU objects on first use and makes sure a pipeline exists for
    /// `layout`. False if the program is not ready.
    pub(crate) fn prepare_pipeline(
        &mut self,
        device: &wgpu::Device,
        layout: &VertexLayout,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> bool {
        let Some(linked) = self.linked.as_ref().filter(|_| self.state == ProgramState::Ready) else {
            return false;
        };
        let gpu = self
            .gpu
            .get_or_insert_with(|| GpuProgram::new(device, &self.label, linked));
        gpu.pipeline(device, &self.label, layout, color_format, depth_format);
        true
    }

    /// Uploads the per-draw uniform blocks recorded for this program.
    pub(crate) fn write_uniforms<'b>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        blocks: impl ExactSizeIterator<Item = &'b [u8]>,
    ) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.write_uniforms(device, queue, &self.label, blocks);
        }
    }

    pub(crate) fn gpu(&self) -> Option<&GpuProgram> {
        self.gpu.as_ref()
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("label", &self.label)
            .field("state", &self.state)
            .field("attributes", &self.attributes)
            .field("uniforms", &self.uniforms())
            .finish_non_exhaustive()
    }
}
