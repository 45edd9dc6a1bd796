//! Classifier exploration.
//!
//! A classifier is *partially linked* when it is unbound, when it is bound to
//! a declaration synthesized by partial linkage, or when any classifier
//! mentioned by its super types (or, for type parameters, its bounds) is
//! partially linked.
//!
//! ## Cycles
//!
//! Hierarchies may be cyclic through type arguments (`class A : Base<B>`,
//! `class B : Base<A>`). Classifiers that reach each other form one strongly
//! connected component and share one answer. Exploration keeps Tarjan's
//! stack: a classifier met again while it is still on the stack contributes
//! nothing yet, and when the root of a component finishes, every member still
//! on the stack above it is memoized with the root's answer. A positive answer
//! commits everything above the classifier that found it, since all of those
//! reach it. Each classifier is therefore explored once per link.

use rustc_hash::FxHashMap;

use irlink_core::{
    Body, DeclarationKind, Expr, ExprKind, IrType, Statement, SymbolId, SymbolKind,
};
use irlink_registry::SymbolTable;

use crate::MissingDeclarationStubGenerator;

/// No classifier in progress was reached.
const NO_BACK_EDGE: usize = usize::MAX;

/// Decides and memoizes whether classifiers are partially linked.
///
/// Owns the stub generator: an unbound class gets its stub the first time it
/// is explored.
#[derive(Debug)]
pub struct ClassifierExplorer {
    stub_generator: MissingDeclarationStubGenerator,
    /// Final answers.
    memo: FxHashMap<SymbolId, bool>,
    /// Explored classifiers whose component is not decided yet.
    stack: Vec<SymbolId>,
    /// Position of each classifier in `stack`.
    on_stack: FxHashMap<SymbolId, usize>,
}

impl ClassifierExplorer {
    /// Create an explorer around a stub generator.
    pub fn new(stub_generator: MissingDeclarationStubGenerator) -> Self {
        Self {
            stub_generator,
            memo: FxHashMap::default(),
            stack: Vec::new(),
            on_stack: FxHashMap::default(),
        }
    }

    pub fn stub_generator(&self) -> &MissingDeclarationStubGenerator {
        &self.stub_generator
    }

    pub fn stub_generator_mut(&mut self) -> &mut MissingDeclarationStubGenerator {
        &mut self.stub_generator
    }

    /// Whether `symbol` is a partially linked classifier.
    ///
    /// Symbols that are not classifiers are only judged by their own binding
    /// and origin.
    pub fn is_partially_linked_classifier(&mut self, table: &mut SymbolTable, symbol: SymbolId) -> bool {
        self.visit(table, symbol).0
    }

    /// Explore every classifier mentioned by a declaration, its members and
    /// its body. Returns the partially linked ones, in order of first mention.
    pub fn explore_declaration(&mut self, table: &mut SymbolTable, symbol: SymbolId) -> Vec<SymbolId> {
        let mut classifiers = Vec::new();
        collect_declaration_classifiers(table, symbol, &mut classifiers);
        self.partially_linked_among(table, classifiers)
    }

    fn partially_linked_among(&mut self, table: &mut SymbolTable, mut classifiers: Vec<SymbolId>) -> Vec<SymbolId> {
        dedup_in_order(&mut classifiers);
        classifiers.retain(|&classifier| self.is_partially_linked_classifier(table, classifier));
        classifiers
    }

    /// Returns the answer and the lowest stack position reached.
    fn visit(&mut self, table: &mut SymbolTable, symbol: SymbolId) -> (bool, usize) {
        if let Some(&partial) = self.memo.get(&symbol) {
            return (partial, NO_BACK_EDGE);
        }
        if let Some(&position) = self.on_stack.get(&symbol) {
            tracing::trace!(?symbol, position, "classifier cycle");
            return (false, position);
        }

        let position = self.stack.len();
        self.stack.push(symbol);
        self.on_stack.insert(symbol, position);
        let (partial, low) = self.explore(table, symbol);

        if partial || low >= position {
            if partial {
                tracing::debug!(?symbol, "partially linked classifier");
            }
            self.commit(position, partial);
            (partial, NO_BACK_EDGE)
        } else {
            (partial, low)
        }
    }

    /// Memoize every classifier from `position` to the top of the stack.
    fn commit(&mut self, position: usize, partial: bool) {
        for member in self.stack.drain(position..) {
            self.on_stack.remove(&member);
            self.memo.insert(member, partial);
        }
    }

    fn explore(&mut self, table: &mut SymbolTable, symbol: SymbolId) -> (bool, usize) {
        let Some(declaration) = table.declaration(symbol) else {
            if table.kind(symbol) == Some(SymbolKind::Class) {
                if let Err(error) = self.stub_generator.get_declaration(table, symbol) {
                    tracing::error!(?symbol, %error, "failed to generate classifier stub");
                }
            }
            return (true, NO_BACK_EDGE);
        };
        if declaration.origin.is_partially_linked() {
            return (true, NO_BACK_EDGE);
        }

        let mut referenced = Vec::new();
        match &declaration.kind {
            DeclarationKind::Class(class) => {
                for super_type in &class.super_types {
                    super_type.collect_classifiers(&mut referenced);
                }
            }
            DeclarationKind::TypeParameter(type_parameter) => {
                for bound in &type_parameter.super_types {
                    bound.collect_classifiers(&mut referenced);
                }
            }
            _ => {}
        }

        let mut low = NO_BACK_EDGE;
        for classifier in referenced {
            let (partial, reached) = self.visit(table, classifier);
            low = low.min(reached);
            if partial {
                return (true, low);
            }
        }
        (false, low)
    }
}

fn dedup_in_order(symbols: &mut Vec<SymbolId>) {
    let mut seen = rustc_hash::FxHashSet::default();
    symbols.retain(|symbol| seen.insert(*symbol));
}

fn collect_type(ty: &IrType, out: &mut Vec<SymbolId>) {
    ty.collect_classifiers(out);
}

/// Classifiers mentioned by a declaration, recursing into members,
/// accessors, parameters, type parameters and bodies.
fn collect_declaration_classifiers(table: &SymbolTable, symbol: SymbolId, out: &mut Vec<SymbolId>) {
    let mut pending = vec![symbol];
    let mut seen = rustc_hash::FxHashSet::default();

    while let Some(symbol) = pending.pop() {
        if !seen.insert(symbol) {
            continue;
        }
        let Some(declaration) = table.declaration(symbol) else {
            continue;
        };
        match &declaration.kind {
            DeclarationKind::Class(class) => {
                for super_type in &class.super_types {
                    collect_type(super_type, out);
                }
                out.extend(class.type_parameters.iter().copied());
                pending.extend(class.type_parameters.iter().rev().copied());
                pending.extend(class.declarations.iter().rev().copied());
            }
            DeclarationKind::Function(function) | DeclarationKind::Constructor(function) => {
                for parameter in function.all_parameters() {
                    collect_type(&parameter.ty, out);
                    if let Some(element) = &parameter.vararg_element_type {
                        collect_type(element, out);
                    }
                    if let Some(default) = &parameter.default_value {
                        collect_expr_classifiers(default, out);
                    }
                }
                collect_type(&function.return_type, out);
                out.extend(function.type_parameters.iter().copied());
                pending.extend(function.type_parameters.iter().rev().copied());
                if let Some(body) = &function.body {
                    collect_body_classifiers(body, out);
                }
            }
            DeclarationKind::Property(property) => {
                let parts: Vec<_> = property.parts().collect();
                pending.extend(parts.into_iter().rev());
            }
            DeclarationKind::Field(field) => {
                collect_type(&field.ty, out);
                if let Some(initializer) = &field.initializer {
                    collect_expr_classifiers(initializer, out);
                }
            }
            DeclarationKind::TypeParameter(type_parameter) => {
                for bound in &type_parameter.super_types {
                    collect_type(bound, out);
                }
            }
            DeclarationKind::AnonymousInitializer(initializer) => {
                collect_body_classifiers(&initializer.body, out);
            }
        }
    }
}

fn collect_body_classifiers(body: &Body, out: &mut Vec<SymbolId>) {
    for statement in &body.statements {
        collect_statement_classifiers(statement, out);
    }
}

fn collect_statement_classifiers(statement: &Statement, out: &mut Vec<SymbolId>) {
    match statement {
        Statement::Expr(expr) => collect_expr_classifiers(expr, out),
        Statement::Variable(variable) => {
            collect_type(&variable.ty, out);
            if let Some(initializer) = &variable.initializer {
                collect_expr_classifiers(initializer, out);
            }
        }
    }
}

/// Classifiers mentioned by an expression tree: static types, type operands,
/// type arguments and class references.
fn collect_expr_classifiers(expr: &Expr, out: &mut Vec<SymbolId>) {
    collect_type(&expr.ty, out);
    match &expr.kind {
        ExprKind::Const(_) | ExprKind::GetValue { .. } => {}
        ExprKind::ClassReference { symbol } => out.push(*symbol),
        ExprKind::SetValue { value, .. } => collect_expr_classifiers(value, out),
        ExprKind::MemberAccess(access) => {
            for ty in &access.type_arguments {
                collect_type(ty, out);
            }
            for receiver in [&access.dispatch_receiver, &access.extension_receiver]
                .into_iter()
                .flatten()
            {
                collect_expr_classifiers(receiver, out);
            }
            for argument in access.arguments.iter().flatten() {
                collect_expr_classifiers(argument, out);
            }
        }
        ExprKind::GetField { receiver, .. } => {
            if let Some(receiver) = receiver {
                collect_expr_classifiers(receiver, out);
            }
        }
        ExprKind::SetField { receiver, value, .. } => {
            if let Some(receiver) = receiver {
                collect_expr_classifiers(receiver, out);
            }
            collect_expr_classifiers(value, out);
        }
        ExprKind::TypeOperator(call) => {
            collect_type(&call.type_operand, out);
            collect_expr_classifiers(&call.argument, out);
        }
        ExprKind::Composite(statements) | ExprKind::Block(statements) => {
            for statement in statements {
                collect_statement_classifiers(statement, out);
            }
        }
        ExprKind::Return { value, .. } | ExprKind::Throw { value } => {
            collect_expr_classifiers(value, out)
        }
        ExprKind::When(branches) => {
            for branch in branches {
                collect_expr_classifiers(&branch.condition, out);
                collect_expr_classifiers(&branch.result, out);
            }
        }
    }
}
