//! Tree Patcher - rewrites usages of unlinked symbols into linkage errors.
//!
//! One depth-first pass over the given roots, in declaration order. Every
//! usage that cannot work at runtime is replaced with a call to the
//! `throwLinkageError` intrinsic, and every such call is reported as a warning
//! through the [`MessageLogger`]. Nothing is deleted: declarations are
//! degraded in place and evaluated operands are kept, so the program still
//! loads and fails only where the missing piece is actually used.
//!
//! ## Policy
//!
//! | Element | Unlinked when | Rewrite |
//! |---|---|---|
//! | Function | unimplemented abstract member, or a signature type is unlinked | signature types become the marker type, the body becomes one throwing call |
//! | Function, property | - | overridden symbols that are unbound, stubs or private are dropped |
//! | Field, variable | its type is unlinked | type becomes the marker type, initializer is dropped, a warning is logged |
//! | Class | the class itself is unlinked | first initializer throws, unlinked super types are dropped |
//! | Type operator | the checked classifier is unlinked | `{ argument; throw }` |
//! | Member access | the symbol or the result type is unlinked | `{ receivers; arguments; throw }` |
//! | Field access | the field is unlinked | `{ receiver; value; throw }` |
//! | Class reference | the class is unlinked | `throw` |
//! | Any other expression | its type is unlinked or the marker type | `throw` |
//!
//! Operands kept in a `{ ...; throw }` composite are patched themselves
//! before they are kept.

mod declarations;
mod expressions;

use irlink_core::{
    DeclarationKind, DeclarationOrigin, Expr, FileId, IrType, Location, MessageLogger, RootElement,
    Severity, Span, StatementOrigin, SymbolId,
};
use irlink_registry::{IrBuiltIns, SymbolTable};

use crate::{ClassifierExplorer, MarkerTypeHandler};

/// Counts of what a patch pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOutput {
    /// Functions whose body was replaced with a linkage error.
    pub functions_patched: usize,
    /// Classes that received a throwing initializer.
    pub classes_patched: usize,
    /// Fields retyped to the marker type.
    pub fields_patched: usize,
    /// Local variables retyped to the marker type.
    pub variables_patched: usize,
    /// Expressions replaced with a linkage error.
    pub expressions_rewritten: usize,
    /// Overridden-symbol entries removed.
    pub overridden_symbols_dropped: usize,
}

impl PatchOutput {
    /// Whether the pass changed nothing.
    pub fn is_clean(&self) -> bool {
        *self == PatchOutput::default()
    }
}

/// Shape of a symbol as far as linkage is concerned.
enum SymbolShape {
    Classifier,
    Property(Vec<SymbolId>),
    /// Types that make up the signature.
    Typed(Vec<IrType>),
    Other,
}

/// The patch pass. Consumed by [`patch_roots`](Self::patch_roots).
pub struct TreePatcher<'a, L: MessageLogger + ?Sized> {
    table: &'a mut SymbolTable,
    builtins: &'a IrBuiltIns,
    marker: &'a MarkerTypeHandler,
    explorer: &'a mut ClassifierExplorer,
    logger: &'a mut L,
    /// File of the element being patched; locations of expressions are taken in it.
    current_file: Option<FileId>,
    output: PatchOutput,
}

impl<'a, L: MessageLogger + ?Sized> TreePatcher<'a, L> {
    /// Create a patcher.
    pub fn new(
        table: &'a mut SymbolTable,
        builtins: &'a IrBuiltIns,
        marker: &'a MarkerTypeHandler,
        explorer: &'a mut ClassifierExplorer,
        logger: &'a mut L,
    ) -> Self {
        Self {
            table,
            builtins,
            marker,
            explorer,
            logger,
            current_file: None,
            output: PatchOutput::default(),
        }
    }

    /// Patch every root, in order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn patch_roots(mut self, roots: &[RootElement]) -> PatchOutput {
        let _span = tracing::debug_span!("patch_unlinked_usages", roots = roots.len()).entered();

        for root in roots {
            match *root {
                RootElement::File(file) => self.visit_file(file),
                RootElement::Declaration(symbol) => {
                    self.current_file = self.table.file_of(symbol);
                    self.visit_declaration(symbol);
                    self.current_file = None;
                }
            }
        }

        tracing::debug!(output = ?self.output, "patched unlinked usages");
        self.output
    }

    fn visit_file(&mut self, file: FileId) {
        let Some(declarations) = self.table.file(file).map(|f| f.declarations.clone()) else {
            tracing::warn!(?file, "patch root refers to an unknown file");
            return;
        };

        self.current_file = Some(file);
        for declaration in declarations {
            self.visit_declaration(declaration);
        }
        self.current_file = None;
    }

    // ==========================================================================
    // Unlinked Predicates
    // ==========================================================================

    /// Whether a usage of `symbol` cannot work.
    fn is_unlinked_symbol(&mut self, symbol: SymbolId) -> bool {
        let shape = {
            let Some(declaration) = self.table.declaration(symbol) else {
                return true;
            };
            if declaration.origin == DeclarationOrigin::MissingDeclaration {
                return true;
            }
            match &declaration.kind {
                DeclarationKind::Class(_) | DeclarationKind::TypeParameter(_) => SymbolShape::Classifier,
                DeclarationKind::Property(property) => SymbolShape::Property(property.parts().collect()),
                DeclarationKind::Function(function) | DeclarationKind::Constructor(function) => {
                    let mut types: Vec<IrType> = Vec::new();
                    for parameter in function.all_parameters() {
                        types.push(parameter.ty.clone());
                        types.extend(parameter.vararg_element_type.iter().cloned());
                    }
                    types.push(function.return_type.clone());
                    for type_parameter in &function.type_parameters {
                        if let Some(type_parameter) = self.table.type_parameter(*type_parameter) {
                            types.extend(type_parameter.super_types.iter().cloned());
                        }
                    }
                    SymbolShape::Typed(types)
                }
                DeclarationKind::Field(field) => SymbolShape::Typed(vec![field.ty.clone()]),
                DeclarationKind::AnonymousInitializer(_) => SymbolShape::Other,
            }
        };

        match shape {
            SymbolShape::Classifier => self.explorer.is_partially_linked_classifier(self.table, symbol),
            SymbolShape::Property(parts) => parts.into_iter().any(|part| self.is_unlinked_symbol(part)),
            SymbolShape::Typed(types) => types
                .iter()
                .any(|ty| self.marker.is_marker_type(ty) || self.is_unlinked_type(ty)),
            SymbolShape::Other => false,
        }
    }

    /// Whether a type mentions a partially linked classifier. The marker type
    /// itself is not unlinked in this sense.
    fn is_unlinked_type(&mut self, ty: &IrType) -> bool {
        let IrType::Simple(simple) = ty else {
            return false;
        };
        if self
            .explorer
            .is_partially_linked_classifier(self.table, simple.classifier)
        {
            return true;
        }
        simple
            .arguments
            .iter()
            .filter_map(|argument| argument.ty())
            .any(|argument| self.is_unlinked_type(argument))
    }

    // ==========================================================================
    // Linkage Errors
    // ==========================================================================

    /// Build the throwing call for `messages`, reporting each as a warning.
    fn throw_linkage_error(&mut self, messages: Vec<String>, location: Option<Location>, span: Span) -> Expr {
        debug_assert!(!messages.is_empty());
        for message in &messages {
            self.logger.report(Severity::Warning, message, location.as_ref());
        }

        let message = Expr::string(messages.join("\n"), self.builtins.string_type()).with_span(span);
        Expr::call(self.builtins.linkage_error_symbol, self.builtins.nothing_type())
            .with_argument(message)
            .with_span(span)
            .with_origin(StatementOrigin::PartialLinkageRuntimeError)
    }

    fn report(&mut self, message: &str, location: Option<&Location>) {
        self.logger.report(Severity::Warning, message, location);
    }
}
