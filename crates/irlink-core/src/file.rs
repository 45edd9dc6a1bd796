//! Files and package fragments.
//!
//! Every declaration ultimately hangs off either an [`IrFile`] (it came from
//! source) or an [`ExternalPackageFragment`] (it was provided from outside,
//! e.g. built-ins or synthesized stubs). Only files have source coordinates.

use crate::SymbolId;

/// Maps byte offsets of one source file to lines and columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path of the file as recorded by the frontend.
    pub name: String,
    /// Offset of the first byte of every line; always starts with `0`.
    line_starts: Vec<u32>,
}

impl FileEntry {
    /// Build an entry by scanning the file contents for line breaks.
    pub fn from_source(name: impl Into<String>, source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self {
            name: name.into(),
            line_starts,
        }
    }

    /// Build an entry from precomputed line starts.
    pub fn with_line_starts(name: impl Into<String>, mut line_starts: Vec<u32>) -> Self {
        if line_starts.first() != Some(&0) {
            line_starts.insert(0, 0);
        }
        Self {
            name: name.into(),
            line_starts,
        }
    }

    /// 0-based line containing `offset`.
    pub fn line_number(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32,
            Err(next) => next.saturating_sub(1) as u32,
        }
    }

    /// 0-based column of `offset` within its line.
    pub fn column_number(&self, offset: u32) -> u32 {
        let line = self.line_number(offset) as usize;
        offset - self.line_starts[line]
    }
}

/// A source file of some module.
#[derive(Debug, Clone, PartialEq)]
pub struct IrFile {
    /// Name of the module the file belongs to.
    pub module_name: String,
    /// Package declared by the file.
    pub package_fq_name: String,
    /// Offset to line mapping.
    pub entry: FileEntry,
    /// Top-level declarations, in source order.
    pub declarations: Vec<SymbolId>,
}

impl IrFile {
    /// Create an empty file.
    pub fn new(module_name: impl Into<String>, package_fq_name: impl Into<String>, entry: FileEntry) -> Self {
        Self {
            module_name: module_name.into(),
            package_fq_name: package_fq_name.into(),
            entry,
            declarations: Vec::new(),
        }
    }
}

/// A synthetic parent for declarations that have no source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPackageFragment {
    /// Name of the (possibly fake) module that owns the fragment.
    pub module_name: String,
    /// Package of the fragment.
    pub package_fq_name: String,
}

impl ExternalPackageFragment {
    /// Create a fragment.
    pub fn new(module_name: impl Into<String>, package_fq_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            package_fq_name: package_fq_name.into(),
        }
    }

    /// The fragment stubs for missing declarations are parented under.
    pub fn error_module() -> Self {
        Self::new("<error module>", "")
    }
}
