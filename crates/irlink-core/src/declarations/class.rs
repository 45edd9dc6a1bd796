//! Class declarations.

use crate::{IrType, SymbolId};

use super::ValueParameter;

/// Flavour of class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Object,
    EnumClass,
}

/// Inheritance modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modality {
    #[default]
    Final,
    Open,
    Sealed,
    Abstract,
}

/// Payload of a class declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassDecl {
    pub class_kind: ClassKind,
    pub modality: Modality,

    // === Inheritance ===
    /// Super class and implemented interfaces, in declaration order.
    pub super_types: Vec<IrType>,

    // === Members ===
    /// Member declarations in declaration order.
    pub declarations: Vec<SymbolId>,
    /// Type parameter symbols.
    pub type_parameters: Vec<SymbolId>,
    /// Implicit `this` receiver.
    pub this_receiver: Option<ValueParameter>,
}

impl ClassDecl {
    /// Create a class payload.
    pub fn new(class_kind: ClassKind, modality: Modality) -> Self {
        Self {
            class_kind,
            modality,
            ..Default::default()
        }
    }

    // === Builder Methods ===

    /// Add a super type.
    pub fn with_super_type(mut self, super_type: IrType) -> Self {
        self.super_types.push(super_type);
        self
    }

    /// Add a member.
    pub fn with_member(mut self, member: SymbolId) -> Self {
        self.declarations.push(member);
        self
    }

    /// Set the implicit `this` receiver.
    pub fn with_this_receiver(mut self, receiver: ValueParameter) -> Self {
        self.this_receiver = Some(receiver);
        self
    }

    // === Query Methods ===

    /// Whether the class can be instantiated directly.
    pub fn is_abstract(&self) -> bool {
        self.modality == Modality::Abstract || self.class_kind == ClassKind::Interface
    }

    /// Whether the class is an interface.
    pub fn is_interface(&self) -> bool {
        self.class_kind == ClassKind::Interface
    }
}
