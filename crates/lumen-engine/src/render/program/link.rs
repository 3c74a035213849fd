//! CPU-side compile, attribute binding, link and reflection.
//!
//! Everything here runs on naga IR, before any GPU object exists, so a
//! program's outcome is known (and testable) without a device.

use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::source::{concat_stage, ShaderSource, ShaderStage};
use super::slots::{AttributeSlot, UniformLocation, UniformSlot};
use crate::error::ErrorKind;

/// Group/binding every program's uniform block lives at.
pub(crate) const UNIFORM_GROUP: u32 = 0;
pub(crate) const UNIFORM_BINDING: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LinkError {
    Compile { stage: ShaderStage, log: String },
    Link(String),
    Unresolved(String),
}

impl LinkError {
    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            LinkError::Compile { .. } => ErrorKind::ShaderCompile,
            LinkError::Link(_) => ErrorKind::ProgramLink,
            LinkError::Unresolved(_) => ErrorKind::UniformUnresolved,
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Compile { stage, log } => write!(f, "{stage} stage: {log}"),
            LinkError::Link(msg) => f.write_str(msg),
            LinkError::Unresolved(name) => write!(f, "uniform `{name}` not found in linked program"),
        }
    }
}

/// A validated single-stage module with exactly one entry point of its stage.
#[derive(Debug, Clone)]
pub(crate) struct CompiledStage {
    pub module: naga::Module,
    pub entry_point: String,
    ep_index: usize,
    text: String,
}

impl CompiledStage {
    fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.ep_index]
    }
}

/// Numeric shape of one vertex-stage input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct InputShape {
    pub kind: naga::ScalarKind,
    pub components: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VertexInput {
    pub name: String,
    pub location: u32,
    pub shape: Option<InputShape>,
}

/// Reflected layout of the uniform block at group 0 / binding 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UniformBlock {
    pub size: u32,
    members: Vec<(String, UniformLocation)>,
}

impl UniformBlock {
    pub(crate) fn find(&self, name: &str) -> Option<UniformLocation> {
        self.members.iter().find(|(n, _)| n == name).map(|(_, loc)| *loc)
    }
}

/// Result of a successful link.
#[derive(Debug, Clone)]
pub(crate) struct Linked {
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
    pub inputs: Vec<VertexInput>,
    pub block: Option<UniformBlock>,
    pub uniforms: Vec<UniformSlot>,
}

impl Linked {
    pub(crate) fn input(&self, name: &str) -> Option<&VertexInput> {
        self.inputs.iter().find(|i| i.name == name)
    }

    #[inline]
    pub(crate) fn block_size(&self) -> u32 {
        self.block.as_ref().map_or(0, |b| b.size)
    }
}

/// Compiles both stages, binds attributes, links and resolves uniforms.
pub(crate) fn link(
    sources: &[ShaderSource],
    attributes: &[AttributeSlot],
    uniforms: &[UniformSlot],
) -> Result<Linked, LinkError> {
    let vertex = compile(sources, ShaderStage::Vertex)?;
    let fragment = compile(sources, ShaderStage::Fragment)?;

    let vertex = vertex.select_entry(ShaderStage::Vertex)?;
    let fragment = fragment.select_entry(ShaderStage::Fragment)?;
    let (vertex, inputs) = bind_attributes(vertex, attributes)?;

    check_interface(&vertex, &fragment)?;
    let block = match (uniform_block(&vertex)?, uniform_block(&fragment)?) {
        (Some(v), Some(f)) if v != f => {
            return Err(LinkError::Link(
                "uniform block layout differs between vertex and fragment stages".into(),
            ));
        }
        (v, f) => v.or(f),
    };

    let mut resolved = Vec::with_capacity(uniforms.len());
    for slot in uniforms {
        let location = block
            .as_ref()
            .and_then(|b| b.find(&slot.name))
            .ok_or_else(|| LinkError::Unresolved(slot.name.clone()))?;
        resolved.push(UniformSlot {
            name: slot.name.clone(),
            location: Some(location),
        });
    }

    Ok(Linked {
        vertex,
        fragment,
        inputs,
        block,
        uniforms: resolved,
    })
}

// ── compile ───────────────────────────────────────────────────────────────

struct Unselected {
    stage: ShaderStage,
    module: naga::Module,
    text: String,
}

fn compile(sources: &[ShaderSource], stage: ShaderStage) -> Result<Unselected, LinkError> {
    let text = concat_stage(sources, stage)
        .ok_or_else(|| LinkError::Link(format!("no {stage} source attached")))?;

    let module = naga::front::wgsl::parse_str(&text).map_err(|e| LinkError::Compile {
        stage,
        log: e.emit_to_string(&text),
    })?;
    validate(&module, &text).map_err(|log| LinkError::Compile { stage, log })?;

    Ok(Unselected { stage, module, text })
}

impl Unselected {
    fn select_entry(self, expected: ShaderStage) -> Result<CompiledStage, LinkError> {
        let mut found = self
            .module
            .entry_points
            .iter()
            .enumerate()
            .filter(|(_, ep)| ep.stage == expected.naga());
        let Some((ep_index, ep)) = found.next() else {
            return Err(LinkError::Link(format!(
                "{} source has no @{expected} entry point",
                self.stage
            )));
        };
        if found.next().is_some() {
            return Err(LinkError::Link(format!(
                "{} source has more than one @{expected} entry point",
                self.stage
            )));
        }
        Ok(CompiledStage {
            entry_point: ep.name.clone(),
            ep_index,
            module: self.module,
            text: self.text,
        })
    }
}

fn validate(module: &naga::Module, text: &str) -> Result<(), String> {
    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(module)
        .map(|_| ())
        .map_err(|e| e.emit_to_string(text))
}

// ── attribute binding ─────────────────────────────────────────────────────

/// Where a vertex input lives in the entry point's signature.
#[derive(Debug, Copy, Clone)]
enum InputSite {
    Argument(usize),
    Member { argument: usize, member: usize },
}

/// Rewrites vertex-input `@location`s so declared attributes get their
/// declared index; remaining inputs take the next free indices in source
/// order. The rewritten module is validated again.
fn bind_attributes(
    mut stage: CompiledStage,
    attributes: &[AttributeSlot],
) -> Result<(CompiledStage, Vec<VertexInput>), LinkError> {
    let sites = collect_inputs(&stage);
    let mut next_free = attributes.iter().map(|a| a.index + 1).max().unwrap_or(0);

    let mut plan = Vec::with_capacity(sites.len());
    for (site, name, shape) in sites {
        let location = match attributes.iter().find(|a| a.name == name) {
            Some(slot) => slot.index,
            None => {
                let l = next_free;
                next_free += 1;
                l
            }
        };
        plan.push((site, VertexInput { name, location, shape }));
    }

    let module = &mut stage.module;
    let ep = stage.ep_index;
    for (site, input) in &plan {
        match *site {
            InputSite::Argument(i) => {
                let arg = &mut module.entry_points[ep].function.arguments[i];
                set_location(arg.binding.as_mut(), input.location);
            }
            InputSite::Member { argument, member } => {
                let arg_ty = module.entry_points[ep].function.arguments[argument].ty;
                let span = module.types.get_span(arg_ty);
                let mut ty = module.types[arg_ty].clone();
                if let naga::TypeInner::Struct { members, .. } = &mut ty.inner {
                    set_location(members[member].binding.as_mut(), input.location);
                }
                let new_ty = module.types.insert(ty, span);
                module.entry_points[ep].function.arguments[argument].ty = new_ty;
            }
        }
    }

    validate(&stage.module, &stage.text).map_err(|log| {
        LinkError::Link(format!("attribute binding produced an invalid vertex stage: {log}"))
    })?;

    Ok((stage, plan.into_iter().map(|(_, input)| input).collect()))
}

fn set_location(binding: Option<&mut naga::Binding>, to: u32) {
    if let Some(naga::Binding::Location { location, .. }) = binding {
        *location = to;
    }
}

fn collect_inputs(stage: &CompiledStage) -> Vec<(InputSite, String, Option<InputShape>)> {
    let module = &stage.module;
    let mut out = Vec::new();
    for (i, arg) in stage.entry().function.arguments.iter().enumerate() {
        match &arg.binding {
            Some(naga::Binding::Location { .. }) => {
                let name = arg.name.clone().unwrap_or_else(|| format!("_arg{i}"));
                out.push((InputSite::Argument(i), name, shape_of(&module.types[arg.ty].inner)));
            }
            Some(naga::Binding::BuiltIn(_)) => {}
            None => {
                let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner else {
                    continue;
                };
                for (m, member) in members.iter().enumerate() {
                    if matches!(member.binding, Some(naga::Binding::Location { .. })) {
                        let name = member.name.clone().unwrap_or_else(|| format!("_arg{i}_{m}"));
                        out.push((
                            InputSite::Member { argument: i, member: m },
                            name,
                            shape_of(&module.types[member.ty].inner),
                        ));
                    }
                }
            }
        }
    }
    out
}

fn shape_of(inner: &naga::TypeInner) -> Option<InputShape> {
    match *inner {
        naga::TypeInner::Scalar(scalar) => Some(InputShape {
            kind: scalar.kind,
            components: 1,
        }),
        naga::TypeInner::Vector { size, scalar } => Some(InputShape {
            kind: scalar.kind,
            components: size as u32,
        }),
        _ => None,
    }
}

// ── interface matching ────────────────────────────────────────────────────

/// Located values crossing an entry point boundary: (location, name, type).
fn located<'m>(
    module: &'m naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    name: Option<&'m str>,
    out: &mut Vec<(u32, String, &'m naga::TypeInner)>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.push((*location, name.unwrap_or("_").to_owned(), &module.types[ty].inner));
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    located(module, m.ty, m.binding.as_ref(), m.name.as_deref(), out);
                }
            }
        }
    }
}

fn check_interface(vertex: &CompiledStage, fragment: &CompiledStage) -> Result<(), LinkError> {
    let mut outputs = Vec::new();
    if let Some(result) = &vertex.entry().function.result {
        located(&vertex.module, result.ty, result.binding.as_ref(), None, &mut outputs);
    }

    let mut inputs = Vec::new();
    for arg in &fragment.entry().function.arguments {
        located(&fragment.module, arg.ty, arg.binding.as_ref(), arg.name.as_deref(), &mut inputs);
    }

    for (location, name, ty) in &inputs {
        let Some((_, _, out_ty)) = outputs.iter().find(|(l, _, _)| l == location) else {
            return Err(LinkError::Link(format!(
                "fragment input `{name}` (location {location}) is not written by the vertex stage"
            )));
        };
        if out_ty != ty {
            return Err(LinkError::Link(format!(
                "fragment input `{name}` (location {location}) does not match the vertex output type"
            )));
        }
    }

    let mut color = Vec::new();
    if let Some(result) = &fragment.entry().function.result {
        located(&fragment.module, result.ty, result.binding.as_ref(), None, &mut color);
    }
    if !color.iter().any(|(l, _, _)| *l == 0) {
        return Err(LinkError::Link(
            "fragment stage does not write a @location(0) color output".into(),
        ));
    }
    Ok(())
}

// ── uniform reflection ────────────────────────────────────────────────────

fn uniform_block(stage: &CompiledStage) -> Result<Option<UniformBlock>, LinkError> {
    let module = &stage.module;
    let mut block = None;

    for (_, var) in module.global_variables.iter() {
        let name = var.name.as_deref().unwrap_or("_");
        match var.space {
            naga::AddressSpace::Uniform => {}
            naga::AddressSpace::Private
            | naga::AddressSpace::Function
            | naga::AddressSpace::WorkGroup => continue,
            _ => {
                return Err(LinkError::Link(format!(
                    "resource `{name}` is not supported; programs take a single uniform block"
                )));
            }
        }

        let at_block = var
            .binding
            .as_ref()
            .is_some_and(|b| b.group == UNIFORM_GROUP && b.binding == UNIFORM_BINDING);
        if !at_block || block.is_some() {
            return Err(LinkError::Link(format!(
                "uniform `{name}` must be the only uniform, at @group({UNIFORM_GROUP}) @binding({UNIFORM_BINDING})"
            )));
        }

        let inner = &module.types[var.ty].inner;
        block = Some(match inner {
            naga::TypeInner::Struct { members, span } => UniformBlock {
                size: *span,
                members: members
                    .iter()
                    .filter_map(|m| {
                        let member_name = m.name.clone()?;
                        let size = module.types[m.ty].inner.size(module.to_ctx());
                        Some((member_name, UniformLocation { offset: m.offset, size }))
                    })
                    .collect(),
            },
            other => {
                let size = other.size(module.to_ctx());
                UniformBlock {
                    size,
                    members: vec![(name.to_owned(), UniformLocation { offset: 0, size })],
                }
            }
        });
    }
    Ok(block)
}
