use super::{MeshKey, ProgramKey};

/// Primitive assembly for one draw (always a triangle list).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawMode {
    /// Indexed draw of `count` indices.
    Indexed { count: u32 },
    /// Non-indexed draw of `count` vertices.
    Arrays { count: u32 },
}

impl DrawMode {
    #[inline]
    pub fn count(self) -> u32 {
        match self {
            DrawMode::Indexed { count } | DrawMode::Arrays { count } => count,
        }
    }
}

/// A draw recorded against whatever program was active at the time.
///
/// `uniforms` is a snapshot of the active program's uniform block, so later
/// writes do not affect draws that were already recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: Option<ProgramKey>,
    pub mesh: MeshKey,
    pub mode: DrawMode,
    pub uniforms: Vec<u8>,
}

/// Renderer-agnostic command stream entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    UseProgram(ProgramKey),
    StopUse,
    Draw(DrawCall),
}
