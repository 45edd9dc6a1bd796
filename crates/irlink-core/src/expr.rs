//! Expressions, statements and bodies.
//!
//! Expressions form owned trees: every child is held by value, so a pass can
//! take a subtree apart and rebuild it without touching the symbol table.
//! Local variables live inline as [`Statement::Variable`]; everything that can
//! be referenced across declarations goes through a [`SymbolId`].

use crate::{IrType, Span, SymbolId};

/// Tags expressions synthesized by a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementOrigin {
    /// A call to the runtime linkage-error intrinsic, or the compound wrapping one.
    PartialLinkageRuntimeError,
    /// Implicit receiver or argument inserted by the frontend.
    Implicit,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
}

/// Which flavour of member access an expression is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberAccessKind {
    Call,
    ConstructorCall,
    DelegatingConstructorCall,
    FunctionReference,
    PropertyReference,
}

/// A call or reference to a function, constructor or property.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub access: MemberAccessKind,
    /// The accessed function, constructor or property.
    pub symbol: SymbolId,
    pub dispatch_receiver: Option<Box<Expr>>,
    pub extension_receiver: Option<Box<Expr>>,
    /// Value arguments; `None` means "use the default value".
    pub arguments: Vec<Option<Expr>>,
    pub type_arguments: Vec<IrType>,
}

/// Type operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeOperator {
    Cast,
    ImplicitCast,
    SafeCast,
    InstanceOf,
    NotInstanceOf,
}

/// A cast or type check of `argument` against `type_operand`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeOperatorCall {
    pub operator: TypeOperator,
    pub type_operand: IrType,
    pub argument: Box<Expr>,
}

impl TypeOperatorCall {
    /// Head classifier of the checked-against type.
    pub fn type_operand_classifier(&self) -> Option<SymbolId> {
        self.type_operand.classifier()
    }
}

/// One arm of a `when`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenBranch {
    pub condition: Expr,
    pub result: Expr,
}

/// Expression node payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Const(ConstValue),
    GetValue {
        name: String,
    },
    SetValue {
        name: String,
        value: Box<Expr>,
    },
    MemberAccess(MemberAccess),
    GetField {
        symbol: SymbolId,
        receiver: Option<Box<Expr>>,
    },
    SetField {
        symbol: SymbolId,
        receiver: Option<Box<Expr>>,
        value: Box<Expr>,
    },
    TypeOperator(TypeOperatorCall),
    ClassReference {
        symbol: SymbolId,
    },
    /// Statements evaluated in order; the value is the last statement's.
    Composite(Vec<Statement>),
    /// Like [`ExprKind::Composite`] but opens a variable scope.
    Block(Vec<Statement>),
    Return {
        target: SymbolId,
        value: Box<Expr>,
    },
    Throw {
        value: Box<Expr>,
    },
    When(Vec<WhenBranch>),
}

/// An expression with its static type.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub span: Span,
    pub ty: IrType,
    pub kind: ExprKind,
    pub origin: Option<StatementOrigin>,
}

impl Expr {
    /// Create an expression with an undefined span and no origin.
    pub fn new(kind: ExprKind, ty: IrType) -> Self {
        Self {
            span: Span::UNDEFINED,
            ty,
            kind,
            origin: None,
        }
    }

    /// String literal.
    pub fn string(value: impl Into<String>, ty: IrType) -> Self {
        Self::new(ExprKind::Const(ConstValue::String(value.into())), ty)
    }

    /// Integer literal.
    pub fn int(value: i64, ty: IrType) -> Self {
        Self::new(ExprKind::Const(ConstValue::Int(value)), ty)
    }

    /// Boolean literal.
    pub fn bool(value: bool, ty: IrType) -> Self {
        Self::new(ExprKind::Const(ConstValue::Bool(value)), ty)
    }

    /// Read of a local value.
    pub fn get_value(name: impl Into<String>, ty: IrType) -> Self {
        Self::new(ExprKind::GetValue { name: name.into() }, ty)
    }

    /// Write of a local value.
    pub fn set_value(name: impl Into<String>, value: Expr, unit: IrType) -> Self {
        Self::new(
            ExprKind::SetValue {
                name: name.into(),
                value: Box::new(value),
            },
            unit,
        )
    }

    /// Member access without receivers or arguments.
    pub fn member_access(access: MemberAccessKind, symbol: SymbolId, ty: IrType) -> Self {
        Self::new(
            ExprKind::MemberAccess(MemberAccess {
                access,
                symbol,
                dispatch_receiver: None,
                extension_receiver: None,
                arguments: Vec::new(),
                type_arguments: Vec::new(),
            }),
            ty,
        )
    }

    /// Function call.
    pub fn call(function: SymbolId, ty: IrType) -> Self {
        Self::member_access(MemberAccessKind::Call, function, ty)
    }

    /// Constructor call.
    pub fn constructor_call(constructor: SymbolId, ty: IrType) -> Self {
        Self::member_access(MemberAccessKind::ConstructorCall, constructor, ty)
    }

    /// Field read.
    pub fn get_field(field: SymbolId, receiver: Option<Expr>, ty: IrType) -> Self {
        Self::new(
            ExprKind::GetField {
                symbol: field,
                receiver: receiver.map(Box::new),
            },
            ty,
        )
    }

    /// Field write.
    pub fn set_field(field: SymbolId, receiver: Option<Expr>, value: Expr, unit: IrType) -> Self {
        Self::new(
            ExprKind::SetField {
                symbol: field,
                receiver: receiver.map(Box::new),
                value: Box::new(value),
            },
            unit,
        )
    }

    /// Cast or type check.
    pub fn type_operator(operator: TypeOperator, type_operand: IrType, argument: Expr, ty: IrType) -> Self {
        Self::new(
            ExprKind::TypeOperator(TypeOperatorCall {
                operator,
                type_operand,
                argument: Box::new(argument),
            }),
            ty,
        )
    }

    /// Class literal.
    pub fn class_reference(class: SymbolId, ty: IrType) -> Self {
        Self::new(ExprKind::ClassReference { symbol: class }, ty)
    }

    /// Compound expression.
    pub fn composite(statements: Vec<Statement>, ty: IrType) -> Self {
        Self::new(ExprKind::Composite(statements), ty)
    }

    /// Scoped block.
    pub fn block(statements: Vec<Statement>, ty: IrType) -> Self {
        Self::new(ExprKind::Block(statements), ty)
    }

    /// Return from `target`.
    pub fn ret(target: SymbolId, value: Expr, nothing: IrType) -> Self {
        Self::new(
            ExprKind::Return {
                target,
                value: Box::new(value),
            },
            nothing,
        )
    }

    /// Throw.
    pub fn throw(value: Expr, nothing: IrType) -> Self {
        Self::new(
            ExprKind::Throw {
                value: Box::new(value),
            },
            nothing,
        )
    }

    /// When expression.
    pub fn when(branches: Vec<WhenBranch>, ty: IrType) -> Self {
        Self::new(ExprKind::When(branches), ty)
    }

    // === Builder Methods ===

    /// Set the source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set the origin.
    pub fn with_origin(mut self, origin: StatementOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Set the dispatch receiver of a member access. No-op on other kinds.
    pub fn with_dispatch_receiver(mut self, receiver: Expr) -> Self {
        if let ExprKind::MemberAccess(access) = &mut self.kind {
            access.dispatch_receiver = Some(Box::new(receiver));
        }
        self
    }

    /// Set the extension receiver of a member access. No-op on other kinds.
    pub fn with_extension_receiver(mut self, receiver: Expr) -> Self {
        if let ExprKind::MemberAccess(access) = &mut self.kind {
            access.extension_receiver = Some(Box::new(receiver));
        }
        self
    }

    /// Append a value argument to a member access. No-op on other kinds.
    pub fn with_argument(mut self, argument: Expr) -> Self {
        if let ExprKind::MemberAccess(access) = &mut self.kind {
            access.arguments.push(Some(argument));
        }
        self
    }

    /// Append a type argument to a member access. No-op on other kinds.
    pub fn with_type_argument(mut self, ty: IrType) -> Self {
        if let ExprKind::MemberAccess(access) = &mut self.kind {
            access.type_arguments.push(ty);
        }
        self
    }

    // === Query Methods ===

    /// Get as a member access.
    pub fn as_member_access(&self) -> Option<&MemberAccess> {
        match &self.kind {
            ExprKind::MemberAccess(access) => Some(access),
            _ => None,
        }
    }

    /// Statements of a composite or block.
    pub fn statements(&self) -> Option<&[Statement]> {
        match &self.kind {
            ExprKind::Composite(statements) | ExprKind::Block(statements) => Some(statements),
            _ => None,
        }
    }
}

/// A local variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: IrType,
    pub initializer: Option<Expr>,
    pub span: Span,
}

impl Variable {
    /// Create a variable.
    pub fn new(name: impl Into<String>, ty: IrType, initializer: Option<Expr>) -> Self {
        Self {
            name: name.into(),
            ty,
            initializer,
            span: Span::UNDEFINED,
        }
    }

    /// Set the source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expr(Expr),
    Variable(Variable),
}

impl Statement {
    /// Get as an expression statement.
    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Statement::Expr(expr) => Some(expr),
            Statement::Variable(_) => None,
        }
    }
}

impl From<Expr> for Statement {
    fn from(expr: Expr) -> Self {
        Statement::Expr(expr)
    }
}

impl From<Variable> for Statement {
    fn from(variable: Variable) -> Self {
        Statement::Variable(variable)
    }
}

/// A block body of a function or initializer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    pub statements: Vec<Statement>,
}

impl Body {
    /// Create a body.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}
