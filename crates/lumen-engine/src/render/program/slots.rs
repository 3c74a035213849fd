/// A named vertex input and the index it is bound to before linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSlot {
    pub name: String,
    pub index: u32,
}

/// Byte range of a uniform inside its program's uniform block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    pub offset: u32,
    pub size: u32,
}

impl UniformLocation {
    #[inline]
    pub fn end(self) -> u32 {
        self.offset + self.size
    }
}

/// A named uniform; `location` is filled in only after a successful link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    pub name: String,
    pub location: Option<UniformLocation>,
}

/// Lifecycle of a [`super::Program`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ProgramState {
    /// Declarations and sources may still be added.
    #[default]
    Pending,
    /// Compiled, linked and every uniform resolved.
    Ready,
    /// Compilation, link or uniform resolution failed. Never usable.
    Failed,
    /// Released by `clear()`.
    Released,
}
