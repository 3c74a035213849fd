use std::collections::HashMap;

use super::{DrawCall, DrawCmd, DrawMode, MeshKey, ProgramKey};

/// Recorded command stream for a frame.
///
/// Mirrors the state model of a classic GL context: one program is "current",
/// uniform writes go to the current program, and uniform values persist in a
/// program's block until overwritten (for the lifetime of the list).
///
/// Performance characteristics:
/// - `push` is O(1)
/// - `clear()` keeps allocated capacity, so steady-state recording does not allocate
///   except for per-draw uniform snapshots
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawCmd>,
    active: Option<ProgramKey>,
    blocks: HashMap<ProgramKey, Vec<u8>>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded commands, the current program and all uniform blocks.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.active = None;
        self.blocks.clear();
    }

    /// Returns commands in submission order.
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Program made current by the most recent `UseProgram`, if any.
    #[inline]
    pub fn active_program(&self) -> Option<ProgramKey> {
        self.active
    }

    /// Iterates recorded draws in submission order.
    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.items.iter().filter_map(|cmd| match cmd {
            DrawCmd::Draw(call) => Some(call),
            _ => None,
        })
    }

    /// Current uniform block contents for `program`.
    pub fn uniform_block(&self, program: ProgramKey) -> Option<&[u8]> {
        self.blocks.get(&program).map(Vec::as_slice)
    }

    /// Makes `program` current. Its block is created zero-filled on first use.
    pub(crate) fn bind_program(&mut self, program: ProgramKey, block_size: usize) {
        let block = self.blocks.entry(program).or_default();
        if block.len() < block_size {
            block.resize(block_size, 0);
        }
        self.active = Some(program);
        self.items.push(DrawCmd::UseProgram(program));
    }

    pub(crate) fn unbind_program(&mut self) {
        self.active = None;
        self.items.push(DrawCmd::StopUse);
    }

    /// Writes `bytes` at `offset` in the block of `program`.
    ///
    /// Returns false when `program` is not current or the write would fall
    /// outside its block.
    pub(crate) fn write_uniform(&mut self, program: ProgramKey, offset: usize, bytes: &[u8]) -> bool {
        if self.active != Some(program) {
            return false;
        }
        let Some(block) = self.blocks.get_mut(&program) else { return false };
        let Some(dst) = block.get_mut(offset..offset + bytes.len()) else { return false };
        dst.copy_from_slice(bytes);
        true
    }

    /// Records a draw against the current program (if any).
    pub(crate) fn push_draw(&mut self, mesh: MeshKey, mode: DrawMode) {
        let uniforms = self
            .active
            .and_then(|p| self.blocks.get(&p))
            .cloned()
            .unwrap_or_default();

        self.items.push(DrawCmd::Draw(DrawCall {
            program: self.active,
            mesh,
            mode,
            uniforms,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys() -> (ProgramKey, ProgramKey, MeshKey) {
        let mut programs: SlotMap<ProgramKey, ()> = SlotMap::with_key();
        let mut meshes: SlotMap<MeshKey, ()> = SlotMap::with_key();
        (programs.insert(()), programs.insert(()), meshes.insert(()))
    }

    // ── activation ────────────────────────────────────────────────────────

    #[test]
    fn bind_records_use_and_sets_active() {
        let (p, _, _) = keys();
        let mut list = DrawList::new();
        list.bind_program(p, 16);

        assert_eq!(list.active_program(), Some(p));
        assert_eq!(list.items(), &[DrawCmd::UseProgram(p)]);
        assert_eq!(list.uniform_block(p), Some(&[0u8; 16][..]));
    }

    #[test]
    fn unbind_clears_active() {
        let (p, _, _) = keys();
        let mut list = DrawList::new();
        list.bind_program(p, 0);
        list.unbind_program();

        assert_eq!(list.active_program(), None);
        assert_eq!(list.items().last(), Some(&DrawCmd::StopUse));
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn write_requires_current_program() {
        let (a, b, _) = keys();
        let mut list = DrawList::new();
        list.bind_program(a, 8);
        list.bind_program(b, 8);

        assert!(!list.write_uniform(a, 0, &[1, 2]));
        assert!(list.write_uniform(b, 0, &[1, 2]));
    }

    #[test]
    fn write_out_of_range_is_rejected() {
        let (p, _, _) = keys();
        let mut list = DrawList::new();
        list.bind_program(p, 4);

        assert!(!list.write_uniform(p, 2, &[0; 4]));
        assert_eq!(list.uniform_block(p), Some(&[0u8; 4][..]));
    }

    #[test]
    fn block_persists_across_rebinds() {
        let (a, b, _) = keys();
        let mut list = DrawList::new();
        list.bind_program(a, 4);
        assert!(list.write_uniform(a, 0, &[9, 9, 9, 9]));
        list.bind_program(b, 4);
        list.bind_program(a, 4);

        assert_eq!(list.uniform_block(a), Some(&[9u8; 4][..]));
    }

    // ── draws ─────────────────────────────────────────────────────────────

    #[test]
    fn draw_snapshots_current_block() {
        let (p, _, m) = keys();
        let mut list = DrawList::new();
        list.bind_program(p, 2);
        list.write_uniform(p, 0, &[1, 1]);
        list.push_draw(m, DrawMode::Arrays { count: 3 });
        list.write_uniform(p, 0, &[2, 2]);
        list.push_draw(m, DrawMode::Arrays { count: 3 });

        let snaps: Vec<_> = list.draw_calls().map(|c| c.uniforms.clone()).collect();
        assert_eq!(snaps, vec![vec![1, 1], vec![2, 2]]);
    }

    #[test]
    fn draw_without_program_has_no_uniforms() {
        let (_, _, m) = keys();
        let mut list = DrawList::new();
        list.push_draw(m, DrawMode::Indexed { count: 6 });

        let call = list.draw_calls().next().unwrap();
        assert_eq!(call.program, None);
        assert!(call.uniforms.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let (p, _, m) = keys();
        let mut list = DrawList::new();
        list.bind_program(p, 4);
        list.push_draw(m, DrawMode::Arrays { count: 1 });
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.active_program(), None);
        assert_eq!(list.uniform_block(p), None);
    }
}
