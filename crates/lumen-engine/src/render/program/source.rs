use std::fmt;
use std::path::Path;

use anyhow::Context as _;

/// Pipeline stage a source unit belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// One WGSL source unit attached to a program.
///
/// Immutable once attached. Several units of the same stage are joined in
/// attach order before compilation, so a helper file can carry functions
/// used by the main unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    stage: ShaderStage,
    text: String,
    label: Option<String>,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, text: impl Into<String>) -> Self {
        Self {
            stage,
            text: text.into(),
            label: None,
        }
    }

    /// Reads a source unit from disk; the path becomes its label.
    pub fn from_path(stage: ShaderStage, path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {stage} shader source {}", path.display()))?;
        Ok(Self {
            stage,
            text,
            label: Some(path.display().to_string()),
        })
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Joins all units of `stage` into one translation unit.
pub(crate) fn concat_stage<'a>(
    sources: impl IntoIterator<Item = &'a ShaderSource>,
    stage: ShaderStage,
) -> Option<String> {
    let mut out: Option<String> = None;
    for src in sources.into_iter().filter(|s| s.stage == stage) {
        let buf = out.get_or_insert_with(String::new);
        if !buf.is_empty() && !buf.ends_with('\n') {
            buf.push('\n');
        }
        buf.push_str(&src.text);
    }
    out
}
