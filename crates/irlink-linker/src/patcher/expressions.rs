//! Expression and statement rewriting.

use irlink_core::{
    Body, Expr, ExprKind, MemberAccess, MessageLogger, Statement, SymbolId, TypeOperatorCall,
    Variable, WhenBranch,
};

use super::TreePatcher;
use crate::{location, render};

/// What to do with one expression.
enum Verdict {
    Keep,
    /// Replace the whole expression with a throwing call.
    ThrowWhole(Vec<SymbolId>),
    /// Evaluate the operands, then throw.
    PreserveOperands(Vec<SymbolId>),
}

impl<L: MessageLogger + ?Sized> TreePatcher<'_, L> {
    pub(super) fn patch_body(&mut self, body: Body) -> Body {
        Body::new(self.patch_statements(body.statements))
    }

    fn patch_statements(&mut self, statements: Vec<Statement>) -> Vec<Statement> {
        statements
            .into_iter()
            .map(|statement| self.patch_statement(statement))
            .collect()
    }

    fn patch_statement(&mut self, statement: Statement) -> Statement {
        match statement {
            Statement::Expr(expr) => Statement::Expr(self.patch_expr(expr)),
            Statement::Variable(variable) => Statement::Variable(self.patch_variable(variable)),
        }
    }

    fn patch_variable(&mut self, mut variable: Variable) -> Variable {
        if self.is_unlinked_type(&variable.ty) {
            let element = format!("variable '{}'", variable.name);
            let classifiers: Vec<SymbolId> = variable.ty.classifier().into_iter().collect();
            let message = render::unlinked_symbols_message(&element, self.table, &classifiers);
            let location = location::location_in(self.table, self.current_file, variable.span);
            self.report(&message, location.as_ref());

            variable.ty = self.marker.marker_type();
            variable.initializer = None;
            self.output.variables_patched += 1;
            return variable;
        }

        variable.initializer = variable.initializer.map(|initializer| self.patch_expr(initializer));
        variable
    }

    /// Patch one expression tree, pre-order.
    pub(super) fn patch_expr(&mut self, expr: Expr) -> Expr {
        match self.classify(&expr) {
            Verdict::Keep => self.patch_children(expr),
            Verdict::ThrowWhole(symbols) => {
                self.output.expressions_rewritten += 1;
                self.throw_for(&expr, &symbols)
            }
            Verdict::PreserveOperands(symbols) => {
                self.output.expressions_rewritten += 1;
                let throw = self.throw_for(&expr, &symbols);
                let Expr { span, kind, origin, .. } = expr;

                let mut statements: Vec<Statement> = into_operands(kind)
                    .into_iter()
                    .map(|operand| self.patch_expr(operand).into())
                    .collect();
                statements.push(throw.into());

                let mut composite = Expr::composite(statements, self.builtins.nothing_type()).with_span(span);
                composite.origin = origin;
                composite
            }
        }
    }

    fn classify(&mut self, expr: &Expr) -> Verdict {
        match &expr.kind {
            ExprKind::TypeOperator(call) => {
                if let Some(classifier) = call.type_operand_classifier() {
                    if self.is_unlinked_type(&call.type_operand) {
                        return Verdict::PreserveOperands(vec![classifier]);
                    }
                }
            }
            ExprKind::MemberAccess(access) => {
                if self.is_unlinked_symbol(access.symbol) {
                    return Verdict::PreserveOperands(Vec::new());
                }
            }
            ExprKind::GetField { symbol, .. } | ExprKind::SetField { symbol, .. } => {
                if self.is_unlinked_symbol(*symbol) {
                    return Verdict::PreserveOperands(vec![*symbol]);
                }
            }
            ExprKind::ClassReference { symbol } => {
                if self.is_unlinked_symbol(*symbol) {
                    return Verdict::ThrowWhole(vec![*symbol]);
                }
            }
            _ => {}
        }

        if self.marker.is_marker_type(&expr.ty) || self.is_unlinked_type(&expr.ty) {
            return match expr.kind {
                // Member accesses still evaluate their operands.
                ExprKind::MemberAccess(_) => Verdict::PreserveOperands(Vec::new()),
                _ => Verdict::ThrowWhole(Vec::new()),
            };
        }
        Verdict::Keep
    }

    fn throw_for(&mut self, expr: &Expr, symbols: &[SymbolId]) -> Expr {
        let message = render::unlinked_symbols_message(&render::expression(self.table, expr), self.table, symbols);
        let location = location::location_in(self.table, self.current_file, expr.span);
        self.throw_linkage_error(vec![message], location, expr.span)
    }

    fn patch_boxed(&mut self, expr: Box<Expr>) -> Box<Expr> {
        Box::new(self.patch_expr(*expr))
    }

    /// Rebuild an expression that is kept, patching its children in evaluation order.
    fn patch_children(&mut self, expr: Expr) -> Expr {
        let Expr { span, ty, kind, origin } = expr;
        let kind = match kind {
            kind @ (ExprKind::Const(_) | ExprKind::GetValue { .. } | ExprKind::ClassReference { .. }) => kind,
            ExprKind::SetValue { name, value } => ExprKind::SetValue {
                name,
                value: self.patch_boxed(value),
            },
            ExprKind::MemberAccess(access) => {
                let MemberAccess {
                    access,
                    symbol,
                    dispatch_receiver,
                    extension_receiver,
                    arguments,
                    type_arguments,
                } = access;
                let dispatch_receiver = dispatch_receiver.map(|receiver| self.patch_boxed(receiver));
                let extension_receiver = extension_receiver.map(|receiver| self.patch_boxed(receiver));
                let arguments = arguments
                    .into_iter()
                    .map(|argument| argument.map(|argument| self.patch_expr(argument)))
                    .collect();
                ExprKind::MemberAccess(MemberAccess {
                    access,
                    symbol,
                    dispatch_receiver,
                    extension_receiver,
                    arguments,
                    type_arguments,
                })
            }
            ExprKind::GetField { symbol, receiver } => ExprKind::GetField {
                symbol,
                receiver: receiver.map(|receiver| self.patch_boxed(receiver)),
            },
            ExprKind::SetField { symbol, receiver, value } => {
                let receiver = receiver.map(|receiver| self.patch_boxed(receiver));
                ExprKind::SetField {
                    symbol,
                    receiver,
                    value: self.patch_boxed(value),
                }
            }
            ExprKind::TypeOperator(call) => ExprKind::TypeOperator(TypeOperatorCall {
                operator: call.operator,
                type_operand: call.type_operand,
                argument: self.patch_boxed(call.argument),
            }),
            ExprKind::Composite(statements) => ExprKind::Composite(self.patch_statements(statements)),
            ExprKind::Block(statements) => ExprKind::Block(self.patch_statements(statements)),
            ExprKind::Return { target, value } => ExprKind::Return {
                target,
                value: self.patch_boxed(value),
            },
            ExprKind::Throw { value } => ExprKind::Throw {
                value: self.patch_boxed(value),
            },
            ExprKind::When(branches) => ExprKind::When(
                branches
                    .into_iter()
                    .map(|branch| WhenBranch {
                        condition: self.patch_expr(branch.condition),
                        result: self.patch_expr(branch.result),
                    })
                    .collect(),
            ),
        };
        Expr { span, ty, kind, origin }
    }
}

/// Operands of an expression in evaluation order.
fn into_operands(kind: ExprKind) -> Vec<Expr> {
    match kind {
        ExprKind::MemberAccess(access) => access
            .dispatch_receiver
            .into_iter()
            .chain(access.extension_receiver)
            .map(|receiver| *receiver)
            .chain(access.arguments.into_iter().flatten())
            .collect(),
        ExprKind::GetField { receiver, .. } => receiver.map(|receiver| *receiver).into_iter().collect(),
        ExprKind::SetField { receiver, value, .. } => receiver
            .into_iter()
            .chain(std::iter::once(value))
            .map(|operand| *operand)
            .collect(),
        ExprKind::TypeOperator(call) => vec![*call.argument],
        _ => Vec::new(),
    }
}
