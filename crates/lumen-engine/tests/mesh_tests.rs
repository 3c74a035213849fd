//! Mesh Tests
//!
//! Tests for:
//! - Indexed vs array draw counts
//! - Upload validation against the bound program
//! - Idempotent release

use std::cell::RefCell;
use std::rc::Rc;

use lumen_engine::render::{MeshBuffer, MeshData, Program, ProgramConfig, VertexField};
use lumen_engine::scene::{DrawList, DrawMode, MeshKey, ProgramKey};
use lumen_engine::{ErrorKind, ErrorSink};

fn lit_program() -> Program {
    let mut program = ProgramConfig::lit().build(ProgramKey::default(), ErrorSink::silent());
    assert!(program.init());
    program
}

fn upload(program: &Program, data: &MeshData, errors: ErrorSink) -> (MeshBuffer, bool) {
    let mut mesh = MeshBuffer::new(MeshKey::default(), data.label.clone(), errors);
    let ok = mesh.upload(program, data.vertex_count, data.triangle_count, data.arrays());
    (mesh, ok)
}

// ============================================================================
// Draw counts
// ============================================================================

#[test]
fn indexed_draw_covers_every_triangle() {
    let program = lit_program();
    let tet = MeshData::tetrahedron();
    let (mesh, ok) = upload(&program, &tet, ErrorSink::silent());
    assert!(ok);

    let mut list = DrawList::new();
    program.use_program(&mut list);
    mesh.draw(&mut list, true);

    let draw = list.draw_calls().next().unwrap();
    assert_eq!(draw.mode, DrawMode::Indexed { count: 3 * tet.triangle_count as u32 });
}

#[test]
fn array_draw_covers_every_vertex() {
    let program = lit_program();
    let cube = MeshData::cube();
    let (mesh, ok) = upload(&program, &cube, ErrorSink::silent());
    assert!(ok);

    let mut list = DrawList::new();
    program.use_program(&mut list);
    mesh.draw(&mut list, false);

    let draw = list.draw_calls().next().unwrap();
    assert_eq!(draw.mode, DrawMode::Arrays { count: 36 });
    assert_eq!(mesh.index_count(), 0);
}

#[test]
fn indexed_draw_without_indices_is_reported() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = {
        let seen = Rc::clone(&seen);
        ErrorSink::new(move |e| seen.borrow_mut().push(e.kind))
    };
    let program = lit_program();
    let (mesh, _) = upload(&program, &MeshData::cube(), sink);

    let mut list = DrawList::new();
    program.use_program(&mut list);
    mesh.draw(&mut list, true);

    assert_eq!(list.draw_calls().count(), 0);
    assert_eq!(*seen.borrow(), vec![ErrorKind::DrawCall]);
}

// ============================================================================
// Upload
// ============================================================================

#[test]
fn layout_follows_program_locations() {
    let program = lit_program();
    let (mesh, _) = upload(&program, &MeshData::tetrahedron(), ErrorSink::silent());

    let layout = mesh.layout();
    assert_eq!(layout.location(0).map(|a| a.offset), Some(VertexField::Position.offset()));
    assert_eq!(layout.location(1).map(|a| a.offset), Some(VertexField::Color.offset()));
    assert_eq!(layout.location(2).map(|a| a.offset), Some(VertexField::Normal.offset()));
    assert!(program.check_layout(layout).is_ok());
}

#[test]
fn short_arrays_fail_with_buffer_allocation() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = {
        let seen = Rc::clone(&seen);
        ErrorSink::new(move |e| seen.borrow_mut().push(e.kind))
    };
    let program = lit_program();
    let mut tet = MeshData::tetrahedron();
    tet.vertex_count = 5;

    let (mesh, ok) = upload(&program, &tet, sink);
    assert!(!ok);
    assert!(!mesh.is_uploaded());
    assert_eq!(*seen.borrow(), vec![ErrorKind::BufferAllocation]);

    let mut list = DrawList::new();
    mesh.draw(&mut list, true);
    assert!(list.is_empty());
}

#[test]
fn upload_requires_a_ready_program() {
    let program = ProgramConfig::lit().build(ProgramKey::default(), ErrorSink::silent());
    let (mesh, ok) = upload(&program, &MeshData::cube(), ErrorSink::silent());
    assert!(!ok);
    assert_eq!(mesh.vertex_count(), 0);
}

#[test]
fn clear_is_idempotent() {
    let program = lit_program();
    let (mut mesh, _) = upload(&program, &MeshData::tetrahedron(), ErrorSink::silent());
    mesh.clear();
    mesh.clear();
    assert!(!mesh.is_uploaded());
    assert_eq!(mesh.vertex_count(), 0);

    let mut list = DrawList::new();
    mesh.draw(&mut list, false);
    assert!(list.is_empty());
}
