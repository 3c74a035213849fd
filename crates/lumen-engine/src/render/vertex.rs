use bytemuck::{Pod, Zeroable};

/// Packed per-vertex record shared by every mesh.
///
/// Layout is fixed: `position` at byte 0, `color` at 12, `normal` at 28,
/// stride 40. Programs bind shader inputs to these fields by attribute name
/// (see [`Vertex::ATTRIBUTE_NAMES`]).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
}

/// A field of [`Vertex`] that can feed a shader input.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexField {
    Position,
    Color,
    Normal,
}

impl VertexField {
    pub const ALL: [VertexField; 3] = [VertexField::Position, VertexField::Color, VertexField::Normal];

    /// Attribute name a program must declare to receive this field.
    pub fn attribute_name(self) -> &'static str {
        match self {
            VertexField::Position => "aPos",
            VertexField::Color => "aColor",
            VertexField::Normal => "aNormal",
        }
    }

    pub fn offset(self) -> u64 {
        match self {
            VertexField::Position => std::mem::offset_of!(Vertex, position) as u64,
            VertexField::Color => std::mem::offset_of!(Vertex, color) as u64,
            VertexField::Normal => std::mem::offset_of!(Vertex, normal) as u64,
        }
    }

    pub fn format(self) -> wgpu::VertexFormat {
        match self {
            VertexField::Position | VertexField::Normal => wgpu::VertexFormat::Float32x3,
            VertexField::Color => wgpu::VertexFormat::Float32x4,
        }
    }

    pub fn components(self) -> u32 {
        match self {
            VertexField::Position | VertexField::Normal => 3,
            VertexField::Color => 4,
        }
    }
}

impl Vertex {
    pub const STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;

    pub const ATTRIBUTE_NAMES: [&'static str; 3] = ["aPos", "aColor", "aNormal"];
}

/// Binding between the [`Vertex`] byte layout and a program's input slots.
///
/// Resolved once from the program at upload time. Two meshes uploaded
/// against programs that agree on attribute locations share a layout, and
/// so share a cached pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    /// Resolves every [`VertexField`] through `location_of`; fields the
    /// program does not consume are skipped.
    pub fn resolve(mut location_of: impl FnMut(&str) -> Option<u32>) -> Self {
        let attributes = VertexField::ALL
            .iter()
            .filter_map(|&field| {
                location_of(field.attribute_name()).map(|shader_location| wgpu::VertexAttribute {
                    format: field.format(),
                    offset: field.offset(),
                    shader_location,
                })
            })
            .collect();
        Self { attributes }
    }

    #[inline]
    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    pub fn location(&self, location: u32) -> Option<&wgpu::VertexAttribute> {
        self.attributes.iter().find(|a| a.shader_location == location)
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: Vertex::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 40);
        assert_eq!(VertexField::Position.offset(), 0);
        assert_eq!(VertexField::Color.offset(), 12);
        assert_eq!(VertexField::Normal.offset(), 28);
    }

    #[test]
    fn resolve_skips_missing_fields() {
        let layout = VertexLayout::resolve(|name| (name == "aPos").then_some(0));
        assert_eq!(layout.attributes().len(), 1);
        assert_eq!(layout.attributes()[0].format, wgpu::VertexFormat::Float32x3);
        assert!(layout.location(1).is_none());
    }

    #[test]
    fn resolve_uses_program_locations() {
        let layout = VertexLayout::resolve(|name| match name {
            "aPos" => Some(2),
            "aColor" => Some(0),
            "aNormal" => Some(1),
            _ => None,
        });
        let color = layout.location(0).unwrap();
        assert_eq!(color.offset, 12);
        assert_eq!(color.format, wgpu::VertexFormat::Float32x4);
        assert_eq!(layout.location(2).unwrap().offset, 0);
    }

    #[test]
    fn equal_bindings_hash_equal() {
        use std::collections::HashSet;
        let a = VertexLayout::resolve(|n| (n == "aPos").then_some(0));
        let b = VertexLayout::resolve(|n| (n == "aPos").then_some(0));
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
