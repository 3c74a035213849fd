use std::borrow::Cow;
use std::collections::HashMap;

use super::link::{CompiledStage, Linked, UNIFORM_BINDING};
use crate::render::pipeline::{alpha_blend, depth_state};
use crate::render::vertex::VertexLayout;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    layout: VertexLayout,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
}

/// GPU objects backing a linked program.
///
/// Created lazily the first time the program is submitted. Pipelines are
/// cached per (vertex layout, target formats).
pub(crate) struct GpuProgram {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    vs_entry: String,
    fs_entry: String,
    pipeline_layout: wgpu::PipelineLayout,
    uniforms: Option<UniformRing>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl GpuProgram {
    pub(crate) fn new(device: &wgpu::Device, label: &str, linked: &Linked) -> Self {
        let vertex = shader_module(device, label, &linked.vertex);
        let fragment = shader_module(device, label, &linked.fragment);

        let uniforms = (linked.block_size() > 0)
            .then(|| UniformRing::new(device, label, u64::from(linked.block_size())));

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            uniforms.iter().map(|u| &u.layout).collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        Self {
            vertex,
            fragment,
            vs_entry: linked.vertex.entry_point.clone(),
            fs_entry: linked.fragment.entry_point.clone(),
            pipeline_layout,
            uniforms,
            pipelines: HashMap::new(),
        }
    }

    pub(crate) fn cached_pipeline(
        &self,
        layout: &VertexLayout,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&PipelineKey {
            layout: layout.clone(),
            color_format,
            depth_format,
        })
    }

    /// Returns the pipeline for `layout`, building it on first use.
    pub(crate) fn pipeline(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        layout: &VertexLayout,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> &wgpu::RenderPipeline {
        let key = PipelineKey {
            layout: layout.clone(),
            color_format,
            depth_format,
        };
        let Self {
            vertex,
            fragment,
            vs_entry,
            fs_entry,
            pipeline_layout,
            pipelines,
            ..
        } = self;
        pipelines.entry(key).or_insert_with(|| {
            log::debug!("{label}: building pipeline for {} attribute(s)", layout.attributes().len());
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(pipeline_layout),
                vertex: wgpu::VertexState {
                    module: vertex,
                    entry_point: Some(vs_entry),
                    buffers: &[layout.buffer_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment,
                    entry_point: Some(fs_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: color_format,
                        blend: Some(alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: depth_format.map(depth_state),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        })
    }

    /// Uploads one uniform block per draw; draw `i` then binds at
    /// [`GpuProgram::uniform_offset`]`(i)`.
    pub(crate) fn write_uniforms<'b>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        blocks: impl ExactSizeIterator<Item = &'b [u8]>,
    ) {
        let Some(ring) = self.uniforms.as_mut() else { return };
        ring.write(device, queue, label, blocks);
    }

    pub(crate) fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.uniforms.as_ref().map(|u| &u.bind_group)
    }

    pub(crate) fn uniform_offset(&self, draw: u32) -> u32 {
        self.uniforms.as_ref().map_or(0, |u| u.stride * draw)
    }

    #[cfg(test)]
    pub(crate) fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    #[cfg(test)]
    pub(crate) fn uniform_capacity(&self) -> u32 {
        self.uniforms.as_ref().map_or(0, |u| u.capacity)
    }
}

fn shader_module(device: &wgpu::Device, label: &str, stage: &CompiledStage) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Naga(Cow::Owned(stage.module.clone())),
    })
}

// ── uniform ring ──────────────────────────────────────────────────────────

/// Dynamic-offset uniform buffer holding one block per draw.
struct UniformRing {
    layout: wgpu::BindGroupLayout,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    block_size: u64,
    stride: u32,
    capacity: u32,
    staging: Vec<u8>,
}

impl UniformRing {
    fn new(device: &wgpu::Device, label: &str, block_size: u64) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment.max(1);
        let stride = align_to(block_size as u32, alignment);

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: UNIFORM_BINDING,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(block_size),
                },
                count: None,
            }],
        });
        let (buffer, bind_group) = Self::allocate(device, label, &layout, block_size, stride, 1);

        Self {
            layout,
            buffer,
            bind_group,
            block_size,
            stride,
            capacity: 1,
            staging: Vec::new(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        block_size: u64,
        stride: u32,
        capacity: u32,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: u64::from(stride) * u64::from(capacity),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: UNIFORM_BINDING,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(block_size),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn write<'b>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        blocks: impl ExactSizeIterator<Item = &'b [u8]>,
    ) {
        let count = blocks.len() as u32;
        if count == 0 {
            return;
        }
        if count > self.capacity {
            let mut capacity = self.capacity.max(1);
            while capacity < count {
                capacity = capacity.saturating_mul(2);
            }
            let (buffer, bind_group) =
                Self::allocate(device, label, &self.layout, self.block_size, self.stride, capacity);
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = capacity;
        }

        self.staging.clear();
        self.staging.resize(self.stride as usize * count as usize, 0);
        let block = self.block_size as usize;
        for (chunk, bytes) in self.staging.chunks_mut(self.stride as usize).zip(blocks) {
            let n = bytes.len().min(block);
            chunk[..n].copy_from_slice(&bytes[..n]);
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(align_to(240, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
        assert_eq!(align_to(12, 4), 12);
    }
}
