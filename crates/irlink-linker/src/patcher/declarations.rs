//! Declaration visitors.

use irlink_core::{
    Body, Declaration, DeclarationKind, DeclarationOrigin, DeclarationParent, InitializerDecl,
    IrType, MessageLogger, SymbolId, SymbolKind, ValueParameter,
};

use super::TreePatcher;
use crate::{location, render};

/// Receivers and value parameters taken out of a function while they are patched.
#[derive(Default)]
struct Parameters {
    dispatch_receiver: Option<ValueParameter>,
    extension_receiver: Option<ValueParameter>,
    value_parameters: Vec<ValueParameter>,
}

impl Parameters {
    fn iter_mut(&mut self) -> impl Iterator<Item = &mut ValueParameter> {
        self.dispatch_receiver
            .iter_mut()
            .chain(self.extension_receiver.iter_mut())
            .chain(self.value_parameters.iter_mut())
    }
}

impl<L: MessageLogger + ?Sized> TreePatcher<'_, L> {
    pub(super) fn visit_declaration(&mut self, symbol: SymbolId) {
        let Some(kind) = self.table.declaration(symbol).map(Declaration::symbol_kind) else {
            tracing::trace!(?symbol, "skipping unbound declaration");
            return;
        };

        match kind {
            SymbolKind::Class => self.visit_class(symbol),
            SymbolKind::Function | SymbolKind::Constructor => self.visit_function(symbol),
            SymbolKind::Property => self.visit_property(symbol),
            SymbolKind::Field => self.visit_field(symbol),
            SymbolKind::AnonymousInitializer => self.visit_initializer(symbol),
            SymbolKind::TypeParameter => {}
        }
    }

    // ==========================================================================
    // Classes
    // ==========================================================================

    fn visit_class(&mut self, class: SymbolId) {
        if self.is_unlinked_symbol(class) {
            self.degrade_class(class);
        }

        let members = self
            .table
            .class(class)
            .map(|c| c.declarations.clone())
            .unwrap_or_default();
        for member in members {
            self.visit_declaration(member);
        }
    }

    /// Make the class throw on initialization and drop its unlinked super types.
    fn degrade_class(&mut self, class: SymbolId) {
        let message = render::unlinked_symbols_message(&render::declaration(self.table, class), self.table, &[]);
        let location = location::declaration_location(self.table, class);
        let span = self.table.declaration(class).map(|d| d.span).unwrap_or_default();
        let throw = self.throw_linkage_error(vec![message], location, span);

        match self.class_initializer(class, span) {
            Some(initializer) => {
                if let Some(initializer) = self.table.initializer_mut(initializer) {
                    initializer.body = Body::new(vec![throw.into()]);
                }
            }
            None => tracing::error!(?class, "could not create an initializer for unlinked class"),
        }

        let super_types = self
            .table
            .class_mut(class)
            .map(|c| std::mem::take(&mut c.super_types))
            .unwrap_or_default();
        let mut kept = Vec::with_capacity(super_types.len());
        for super_type in super_types {
            if !self.is_unlinked_type(&super_type) {
                kept.push(super_type);
            }
        }
        if let Some(c) = self.table.class_mut(class) {
            c.super_types = kept;
        }

        self.output.classes_patched += 1;
    }

    /// First anonymous initializer of the class, created when there is none.
    fn class_initializer(&mut self, class: SymbolId, span: irlink_core::Span) -> Option<SymbolId> {
        let members = self.table.class(class)?.declarations.clone();
        let existing = members.into_iter().find(|&member| {
            self.table.kind(member) == Some(SymbolKind::AnonymousInitializer) && self.table.is_bound(member)
        });
        if existing.is_some() {
            return existing;
        }

        let initializer = self
            .table
            .define(SymbolKind::AnonymousInitializer, None, |symbol| {
                Declaration::new(
                    symbol,
                    "<anonymous>",
                    DeclarationParent::Declaration(class),
                    DeclarationKind::AnonymousInitializer(InitializerDecl::default()),
                )
                .with_span(span)
            })
            .ok()?;
        self.table.class_mut(class)?.declarations.push(initializer);
        Some(initializer)
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    fn visit_function(&mut self, function: SymbolId) {
        self.filter_overridden_symbols(function);

        let is_missing_implementation = self
            .table
            .declaration(function)
            .is_some_and(|d| d.origin == DeclarationOrigin::UnimplementedAbstractCallableMember);
        let removed_types = self.fix_unlinked_types(function);

        if !is_missing_implementation && removed_types.is_empty() {
            self.patch_function_contents(function);
            return;
        }

        let mut messages = Vec::new();
        if is_missing_implementation {
            messages.push(render::abstract_not_implemented_message(self.table, function));
        }
        if !removed_types.is_empty() {
            let mut classifiers: Vec<SymbolId> = Vec::new();
            for classifier in removed_types.iter().filter_map(IrType::classifier) {
                if !classifiers.contains(&classifier) {
                    classifiers.push(classifier);
                }
            }
            messages.push(render::unlinked_symbols_message(
                &render::declaration(self.table, function),
                self.table,
                &classifiers,
            ));
        }

        // Abstract and external functions keep having no body.
        if self.table.function(function).is_some_and(|f| f.body.is_some()) {
            let location = location::declaration_location(self.table, function);
            let span = self.table.declaration(function).map(|d| d.span).unwrap_or_default();
            let throw = self.throw_linkage_error(messages, location, span);
            if let Some(f) = self.table.function_mut(function) {
                f.body = Some(Body::new(vec![throw.into()]));
            }
            self.output.functions_patched += 1;
        }
    }

    /// Replace every unlinked type of the signature with the marker type.
    /// Returns the replaced types, in signature order.
    fn fix_unlinked_types(&mut self, function: SymbolId) -> Vec<IrType> {
        let mut removed = Vec::new();
        let Some(mut parameters) = self.take_parameters(function) else {
            return removed;
        };
        for parameter in parameters.iter_mut() {
            self.fix_parameter_type(parameter, &mut removed);
        }
        self.restore_parameters(function, parameters);

        let return_type = self.table.function(function).map(|f| f.return_type.clone());
        if let Some(return_type) = return_type {
            if self.is_unlinked_type(&return_type) {
                removed.push(return_type);
                if let Some(f) = self.table.function_mut(function) {
                    f.return_type = self.marker.marker_type();
                }
            }
        }

        let type_parameters = self
            .table
            .function(function)
            .map(|f| f.type_parameters.clone())
            .unwrap_or_default();
        for type_parameter in type_parameters {
            let bounds = self
                .table
                .type_parameter(type_parameter)
                .map(|t| t.super_types.clone())
                .unwrap_or_default();
            if let Some(unlinked) = bounds.into_iter().find(|bound| self.is_unlinked_type(bound)) {
                removed.push(unlinked);
                if let Some(t) = self.table.type_parameter_mut(type_parameter) {
                    t.super_types = vec![self.marker.marker_type()];
                }
            }
        }

        removed
    }

    fn fix_parameter_type(&mut self, parameter: &mut ValueParameter, removed: &mut Vec<IrType>) {
        if self.is_unlinked_type(&parameter.ty) {
            let ty = std::mem::replace(&mut parameter.ty, self.marker.marker_type());
            removed.push(ty);
            parameter.default_value = None;
        }
        let vararg_unlinked = parameter
            .vararg_element_type
            .as_ref()
            .is_some_and(|element| self.is_unlinked_type(element));
        if vararg_unlinked {
            if let Some(element) = parameter.vararg_element_type.replace(self.marker.marker_type()) {
                removed.push(element);
            }
        }
    }

    /// Patch parameter default values and the body.
    fn patch_function_contents(&mut self, function: SymbolId) {
        if let Some(mut parameters) = self.take_parameters(function) {
            for parameter in parameters.iter_mut() {
                if let Some(default) = parameter.default_value.take() {
                    parameter.default_value = Some(self.patch_expr(default));
                }
            }
            self.restore_parameters(function, parameters);
        }

        let body = self.table.function_mut(function).and_then(|f| f.body.take());
        if let Some(body) = body {
            let body = self.patch_body(body);
            if let Some(f) = self.table.function_mut(function) {
                f.body = Some(body);
            }
        }
    }

    fn take_parameters(&mut self, function: SymbolId) -> Option<Parameters> {
        let f = self.table.function_mut(function)?;
        Some(Parameters {
            dispatch_receiver: f.dispatch_receiver.take(),
            extension_receiver: f.extension_receiver.take(),
            value_parameters: std::mem::take(&mut f.value_parameters),
        })
    }

    fn restore_parameters(&mut self, function: SymbolId, parameters: Parameters) {
        if let Some(f) = self.table.function_mut(function) {
            f.dispatch_receiver = parameters.dispatch_receiver;
            f.extension_receiver = parameters.extension_receiver;
            f.value_parameters = parameters.value_parameters;
        }
    }

    /// Drop overridden symbols that are unbound, bound to a stub, or whose
    /// declaration became private.
    fn filter_overridden_symbols(&mut self, symbol: SymbolId) {
        let Some(overridden) = self
            .table
            .declaration_mut(symbol)
            .and_then(|d| d.overridden_symbols_mut())
            .map(std::mem::take)
        else {
            return;
        };

        let before = overridden.len();
        let kept: Vec<SymbolId> = overridden
            .into_iter()
            .filter(|&overridden| {
                self.table
                    .declaration(overridden)
                    .is_some_and(|d| {
                        d.origin != DeclarationOrigin::MissingDeclaration && !d.visibility.is_private()
                    })
            })
            .collect();
        self.output.overridden_symbols_dropped += before - kept.len();

        if let Some(slot) = self
            .table
            .declaration_mut(symbol)
            .and_then(|d| d.overridden_symbols_mut())
        {
            *slot = kept;
        }
    }

    // ==========================================================================
    // Properties, Fields and Initializers
    // ==========================================================================

    fn visit_property(&mut self, property: SymbolId) {
        self.filter_overridden_symbols(property);

        let parts: Vec<SymbolId> = self
            .table
            .property(property)
            .map(|p| p.parts().collect())
            .unwrap_or_default();
        for part in parts {
            self.visit_declaration(part);
        }
    }

    fn visit_field(&mut self, field: SymbolId) {
        let Some(ty) = self.table.field(field).map(|f| f.ty.clone()) else {
            return;
        };

        if self.is_unlinked_type(&ty) {
            let message = render::unlinked_symbols_message(
                &render::declaration(self.table, field),
                self.table,
                &ty.classifier().into_iter().collect::<Vec<_>>(),
            );
            let location = location::declaration_location(self.table, field);
            self.report(&message, location.as_ref());

            if let Some(f) = self.table.field_mut(field) {
                f.ty = self.marker.marker_type();
                f.initializer = None;
            }
            self.output.fields_patched += 1;
            return;
        }

        let initializer = self.table.field_mut(field).and_then(|f| f.initializer.take());
        if let Some(initializer) = initializer {
            let initializer = self.patch_expr(initializer);
            if let Some(f) = self.table.field_mut(field) {
                f.initializer = Some(initializer);
            }
        }
    }

    fn visit_initializer(&mut self, initializer: SymbolId) {
        let body = self
            .table
            .initializer_mut(initializer)
            .map(|i| std::mem::take(&mut i.body));
        if let Some(body) = body {
            let body = self.patch_body(body);
            if let Some(i) = self.table.initializer_mut(initializer) {
                i.body = body;
            }
        }
    }
}
