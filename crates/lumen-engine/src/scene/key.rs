use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of a [`Program`](crate::render::Program) owned by a renderer.
    pub struct ProgramKey;

    /// Stable handle of a [`MeshBuffer`](crate::render::MeshBuffer) owned by a renderer.
    pub struct MeshKey;
}
