use wgpu::util::DeviceExt;

use crate::error::{ErrorKind, ErrorSink};
use crate::render::program::Program;
use crate::render::vertex::{Vertex, VertexLayout};
use crate::scene::{DrawList, DrawMode, MeshKey, ProgramKey};

/// Flat host-side arrays handed to [`MeshBuffer::upload`].
///
/// `positions` and `normals` hold 3 floats per vertex, `colors` 4.
/// Absent arrays leave the matching [`Vertex`] fields zeroed. `uvs` is
/// accepted for call-site symmetry and not consumed.
#[derive(Debug, Copy, Clone, Default)]
pub struct MeshArrays<'a> {
    pub positions: &'a [f32],
    pub colors: Option<&'a [f32]>,
    pub normals: Option<&'a [f32]>,
    pub uvs: Option<&'a [f32]>,
    pub indices: Option<&'a [u32]>,
}

pub(crate) struct GpuMesh {
    pub vertex: wgpu::Buffer,
    pub index: Option<wgpu::Buffer>,
}

/// A mesh packed into [`Vertex`] records, bound to one program's layout.
///
/// GPU buffers are created on first submission and dropped by `clear()`.
pub struct MeshBuffer {
    key: MeshKey,
    label: String,
    errors: ErrorSink,

    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    layout: VertexLayout,
    program: Option<ProgramKey>,
    uploaded: bool,

    gpu: Option<GpuMesh>,
}

impl MeshBuffer {
    pub fn new(key: MeshKey, label: impl Into<String>, errors: ErrorSink) -> Self {
        Self {
            key,
            label: label.into(),
            errors,
            vertices: Vec::new(),
            indices: Vec::new(),
            layout: VertexLayout::default(),
            program: None,
            uploaded: false,
            gpu: None,
        }
    }

    /// Packs `arrays` and binds the result to `program`'s attribute layout.
    ///
    /// Fields the program does not consume are skipped. Short arrays and
    /// out-of-range indices are reported as `BufferAllocation` and leave the
    /// mesh undrawable.
    pub fn upload(
        &mut self,
        program: &Program,
        vertex_count: usize,
        triangle_count: usize,
        arrays: MeshArrays<'_>,
    ) -> bool {
        self.release();

        if !program.is_ready() {
            return self.fail(format!("program `{}` is not ready", program.label()));
        }
        if let Err(msg) = check_lengths(vertex_count, triangle_count, &arrays) {
            return self.fail(msg);
        }

        self.vertices = (0..vertex_count)
            .map(|i| Vertex {
                position: take::<3>(arrays.positions, i),
                color: arrays.colors.map_or([0.0; 4], |c| take::<4>(c, i)),
                normal: arrays.normals.map_or([0.0; 3], |n| take::<3>(n, i)),
            })
            .collect();
        self.indices = arrays
            .indices
            .map(|idx| idx[..triangle_count * 3].to_vec())
            .unwrap_or_default();
        self.layout = VertexLayout::resolve(|name| program.attribute_location(name));
        self.program = Some(program.key());
        self.uploaded = true;

        log::debug!(
            "{}: {} vertices, {} indices, {} bound attribute(s)",
            self.label,
            self.vertices.len(),
            self.indices.len(),
            self.layout.attributes().len()
        );
        true
    }

    /// Records a triangle-list draw. No-op until uploaded.
    ///
    /// The intended program must already be current in `list`.
    pub fn draw(&self, list: &mut DrawList, use_indices: bool) {
        if !self.uploaded {
            return;
        }
        let mode = if use_indices {
            if self.indices.is_empty() {
                self.errors.emit(
                    ErrorKind::DrawCall,
                    format!("{}: indexed draw requested without index data", self.label),
                );
                return;
            }
            DrawMode::Indexed {
                count: self.indices.len() as u32,
            }
        } else {
            DrawMode::Arrays {
                count: self.vertices.len() as u32,
            }
        };
        list.push_draw(self.key, mode);
    }

    /// Releases host data and GPU buffers. Safe to call repeatedly.
    pub fn clear(&mut self) {
        if self.uploaded || self.gpu.is_some() {
            log::debug!("{}: released", self.label);
        }
        self.release();
    }

    fn release(&mut self) {
        self.gpu = None;
        self.vertices = Vec::new();
        self.indices = Vec::new();
        self.layout = VertexLayout::default();
        self.program = None;
        self.uploaded = false;
    }

    fn fail(&self, msg: String) -> bool {
        self.errors
            .emit(ErrorKind::BufferAllocation, format!("{}: {msg}", self.label));
        false
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn key(&self) -> MeshKey {
        self.key
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn is_uploaded(&self) -> bool {
        self.uploaded
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Attribute layout resolved from the program at upload time.
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// Program the mesh was uploaded against.
    pub fn program(&self) -> Option<ProgramKey> {
        self.program
    }

    // ── gpu ───────────────────────────────────────────────────────────────

    pub(crate) fn prepare(&mut self, device: &wgpu::Device) -> Option<&GpuMesh> {
        if !self.uploaded {
            return None;
        }
        if self.gpu.is_none() {
            let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&self.label),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index = (!self.indices.is_empty()).then(|| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&self.label),
                    contents: bytemuck::cast_slice(&self.indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
            });
            self.gpu = Some(GpuMesh { vertex, index });
        }
        self.gpu.as_ref()
    }

    pub(crate) fn gpu(&self) -> Option<&GpuMesh> {
        self.gpu.as_ref()
    }
}

fn take<const N: usize>(data: &[f32], i: usize) -> [f32; N] {
    let mut out = [0.0; N];
    out.copy_from_slice(&data[i * N..(i + 1) * N]);
    out
}

fn check_lengths(vertex_count: usize, triangle_count: usize, a: &MeshArrays<'_>) -> Result<(), String> {
    let need = |what: &str, have: usize, per: usize| match vertex_count.checked_mul(per) {
        Some(want) if have >= want => Ok(()),
        Some(want) => Err(format!(
            "{what} array has {have} floats, {vertex_count} vertices need {want}"
        )),
        None => Err(format!("{vertex_count} vertices overflow the {what} array size")),
    };
    need("position", a.positions.len(), 3)?;
    if let Some(c) = a.colors {
        need("color", c.len(), 4)?;
    }
    if let Some(n) = a.normals {
        need("normal", n.len(), 3)?;
    }
    if let Some(idx) = a.indices {
        let want = triangle_count
            .checked_mul(3)
            .ok_or_else(|| format!("{triangle_count} triangles overflow the index array size"))?;
        if idx.len() < want {
            return Err(format!(
                "index array has {} entries, {triangle_count} triangles need {want}",
                idx.len()
            ));
        }
        if let Some(bad) = idx[..want].iter().find(|&&i| i as usize >= vertex_count) {
            return Err(format!("index {bad} out of range for {vertex_count} vertices"));
        }
    }
    Ok(())
}
