//! Fake override candidates.
//!
//! Before fake overrides are built, every class that inherits members is
//! queued here together with the members it would inherit. Partial linkage
//! narrows the queue so that classes which are already broken never reach
//! override resolution.

use irlink_core::SymbolId;
use rustc_hash::FxHashMap;

/// Classes queued for fake override construction, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FakeOverrideBuilder {
    candidates: Vec<(SymbolId, Vec<SymbolId>)>,
    /// Position of each queued class in `candidates`.
    index: FxHashMap<SymbolId, usize>,
}

impl FakeOverrideBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `class` with the members it inherits. Queuing a class twice
    /// appends to its existing entry.
    pub fn enqueue(&mut self, class: SymbolId, members: impl IntoIterator<Item = SymbolId>) {
        match self.index.get(&class) {
            Some(&position) => {
                let existing = &mut self.candidates[position].1;
                for member in members {
                    if !existing.contains(&member) {
                        existing.push(member);
                    }
                }
            }
            None => {
                self.index.insert(class, self.candidates.len());
                self.candidates.push((class, members.into_iter().collect()));
            }
        }
    }

    // === Query Methods ===

    pub fn contains(&self, class: SymbolId) -> bool {
        self.index.contains_key(&class)
    }

    /// Members queued for `class`.
    pub fn members(&self, class: SymbolId) -> Option<&[SymbolId]> {
        let &position = self.index.get(&class)?;
        Some(self.candidates[position].1.as_slice())
    }

    /// Queued classes, in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.candidates.iter().map(|(class, _)| *class)
    }

    pub fn candidates(&self) -> &[(SymbolId, Vec<SymbolId>)] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    // === Narrowing ===

    /// Keep only the classes for which `keep` holds. Returns the removed classes.
    pub fn retain(&mut self, mut keep: impl FnMut(SymbolId) -> bool) -> Vec<SymbolId> {
        let mut removed = Vec::new();
        self.candidates.retain(|(class, _)| {
            let kept = keep(*class);
            if !kept {
                removed.push(*class);
            }
            kept
        });
        if !removed.is_empty() {
            self.reindex();
        }
        removed
    }

    /// Remove one class. Returns its queued members.
    pub fn remove(&mut self, class: SymbolId) -> Option<Vec<SymbolId>> {
        let position = self.index.remove(&class)?;
        let (_, members) = self.candidates.remove(position);
        for (class, _) in &self.candidates[position..] {
            if let Some(slot) = self.index.get_mut(class) {
                *slot -= 1;
            }
        }
        Some(members)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, (class, _)) in self.candidates.iter().enumerate() {
            self.index.insert(*class, position);
        }
    }
}
