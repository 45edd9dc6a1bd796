//! Function and constructor declarations.

use bitflags::bitflags;

use crate::{Body, IrType, SymbolId};

use super::ValueParameter;

bitflags! {
    /// Modifiers of a function or constructor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionFlags: u8 {
        const INLINE = 1 << 0;
        const EXTERNAL = 1 << 1;
        /// Primary constructor of its class.
        const PRIMARY = 1 << 2;
        const EXPECT = 1 << 3;
        const ABSTRACT = 1 << 4;
    }
}

/// Payload shared by functions and constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub dispatch_receiver: Option<ValueParameter>,
    pub extension_receiver: Option<ValueParameter>,
    pub value_parameters: Vec<ValueParameter>,
    pub return_type: IrType,
    /// Type parameter symbols.
    pub type_parameters: Vec<SymbolId>,
    /// `None` for abstract and external functions.
    pub body: Option<Body>,
    /// Symbols of the declarations this one overrides.
    pub overridden_symbols: Vec<SymbolId>,
    pub flags: FunctionFlags,
}

impl FunctionDecl {
    /// Create a function with an empty body.
    pub fn new(return_type: IrType) -> Self {
        Self {
            dispatch_receiver: None,
            extension_receiver: None,
            value_parameters: Vec::new(),
            return_type,
            type_parameters: Vec::new(),
            body: Some(Body::default()),
            overridden_symbols: Vec::new(),
            flags: FunctionFlags::empty(),
        }
    }

    // === Builder Methods ===

    /// Set the dispatch receiver.
    pub fn with_dispatch_receiver(mut self, receiver: ValueParameter) -> Self {
        self.dispatch_receiver = Some(receiver);
        self
    }

    /// Set the extension receiver.
    pub fn with_extension_receiver(mut self, receiver: ValueParameter) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    /// Add a value parameter.
    pub fn with_parameter(mut self, parameter: ValueParameter) -> Self {
        self.value_parameters.push(parameter);
        self
    }

    /// Add a type parameter.
    pub fn with_type_parameter(mut self, type_parameter: SymbolId) -> Self {
        self.type_parameters.push(type_parameter);
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Drop the body (abstract/external).
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    /// Add an overridden symbol.
    pub fn with_overridden(mut self, overridden: SymbolId) -> Self {
        self.overridden_symbols.push(overridden);
        self
    }

    /// Add modifier flags.
    pub fn with_flags(mut self, flags: FunctionFlags) -> Self {
        self.flags |= flags;
        self
    }

    // === Query Methods ===

    /// Receivers and value parameters in evaluation order.
    pub fn all_parameters(&self) -> impl Iterator<Item = &ValueParameter> {
        self.dispatch_receiver
            .iter()
            .chain(self.extension_receiver.iter())
            .chain(self.value_parameters.iter())
    }

    /// Whether this overrides anything.
    pub fn is_override(&self) -> bool {
        !self.overridden_symbols.is_empty()
    }
}
