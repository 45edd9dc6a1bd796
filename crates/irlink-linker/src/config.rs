//! Partial linkage configuration.

/// Whether partial linkage is installed for a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PartialLinkageMode {
    /// Unlinked usages are rewritten into runtime linkage errors.
    #[default]
    Enabled,
    /// Nothing is explored, stubbed or patched.
    Disabled,
}

/// Configuration of the partial linkage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialLinkageConfig {
    pub mode: PartialLinkageMode,
}

impl PartialLinkageConfig {
    /// Create the default (enabled) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with partial linkage turned off.
    pub fn disabled() -> Self {
        Self::new().with_mode(PartialLinkageMode::Disabled)
    }

    // === Builder Methods ===

    pub fn with_mode(mut self, mode: PartialLinkageMode) -> Self {
        self.mode = mode;
        self
    }

    // === Query Methods ===

    pub fn is_enabled(&self) -> bool {
        self.mode == PartialLinkageMode::Enabled
    }
}
