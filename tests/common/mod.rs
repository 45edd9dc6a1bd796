//! Shared integration test infrastructure.
//!
//! [`Program`] builds a two-module program (`lib` and `app`) inside a
//! [`LinkSession`]; [`Evaluator`] runs functions of the linked IR, records
//! which functions were entered and surfaces linkage errors.

#![allow(dead_code)]

use irlink::ir::{ConstValue, ExprKind, FunctionFlags, MemberAccessKind, Span, TypeOperator};
use irlink::prelude::*;
use rustc_hash::FxHashMap;

/// Every line of a test file is 100 bytes wide.
const LINE_WIDTH: u32 = 100;

/// Span at 0-based `line` and `column`.
pub fn at(line: u32, column: u32) -> Span {
    let start = line * LINE_WIDTH + column;
    Span::new(start, start + 1)
}

fn test_file(module: &str, name: &str) -> IrFile {
    let entry = FileEntry::with_line_starts(name, (0..64).map(|line| line * LINE_WIDTH).collect());
    IrFile::new(module, module, entry)
}

// =============================================================================
// Program Builder
// =============================================================================

/// A library module `lib` (file `lib.kt`) and a client module `app` (file `main.kt`).
pub struct Program {
    pub session: LinkSession,
    pub lib: FileId,
    pub app: FileId,
}

impl Program {
    pub fn new() -> Self {
        Self::with_config(PartialLinkageConfig::default())
    }

    pub fn with_config(config: PartialLinkageConfig) -> Self {
        let mut session = LinkSession::with_config(config).unwrap();
        let lib = session.add_file(test_file("lib", "lib.kt")).unwrap();
        let app = session.add_file(test_file("app", "main.kt")).unwrap();
        Self { session, lib, app }
    }

    pub fn table(&self) -> &SymbolTable {
        self.session.table()
    }

    pub fn table_mut(&mut self) -> &mut SymbolTable {
        self.session.table_mut()
    }

    pub fn builtins(&self) -> IrBuiltIns {
        *self.session.builtins()
    }

    pub fn unit(&self) -> IrType {
        self.builtins().unit_type()
    }

    fn package_of(&self, file: FileId) -> String {
        self.table().file(file).unwrap().package_fq_name.clone()
    }

    fn define(&mut self, kind: SymbolKind, signature: IdSignature, declaration: impl FnOnce(SymbolId) -> Declaration) -> SymbolId {
        let symbol = self.table_mut().define(kind, Some(signature), declaration).unwrap();
        let parent = self.table().declaration(symbol).unwrap().parent;
        match parent {
            DeclarationParent::File(file) => self.table_mut().file_mut(file).unwrap().declarations.push(symbol),
            DeclarationParent::Declaration(class) => {
                self.table_mut().class_mut(class).unwrap().declarations.push(symbol)
            }
            DeclarationParent::ExternalFragment(_) => {}
        }
        symbol
    }

    /// Open class `<package>/<name>` at the top level of `file`.
    pub fn class(&mut self, file: FileId, name: &str, super_types: Vec<IrType>) -> SymbolId {
        let signature = IdSignature::common(self.package_of(file), name);
        self.define(SymbolKind::Class, signature, |symbol| {
            let mut class = ClassDecl::new(ClassKind::Class, Modality::Open)
                .with_this_receiver(ValueParameter::new("<this>", IrType::simple(symbol)));
            class.super_types = super_types;
            Declaration::new(symbol, name, DeclarationParent::File(file), DeclarationKind::Class(class))
        })
    }

    /// Primary constructor of `class` with an empty body.
    pub fn constructor(&mut self, class: SymbolId) -> SymbolId {
        let (package, class_name) = self.names_of(class);
        let signature = IdSignature::member(&package, &format!("{class_name}.<init>"), &[]);
        self.define(SymbolKind::Constructor, signature, |symbol| {
            let constructor = FunctionDecl::new(IrType::simple(class)).with_flags(FunctionFlags::PRIMARY);
            Declaration::new(
                symbol,
                "<init>",
                DeclarationParent::Declaration(class),
                DeclarationKind::Constructor(constructor),
            )
        })
    }

    /// Member function `class.name()`.
    pub fn method(&mut self, class: SymbolId, name: &str, return_type: IrType, body: Vec<Statement>) -> SymbolId {
        let (package, class_name) = self.names_of(class);
        let signature = IdSignature::member(&package, &format!("{class_name}.{name}"), &[]);
        self.define(SymbolKind::Function, signature, |symbol| {
            let function = FunctionDecl::new(return_type)
                .with_dispatch_receiver(ValueParameter::new("<this>", IrType::simple(class)))
                .with_body(Body::new(body));
            Declaration::new(symbol, name, DeclarationParent::Declaration(class), DeclarationKind::Function(function))
        })
    }

    /// Field `class.name`.
    pub fn field(&mut self, class: SymbolId, name: &str, ty: IrType) -> SymbolId {
        let (package, class_name) = self.names_of(class);
        let signature = IdSignature::common(package, format!("{class_name}.{name}"));
        self.define(SymbolKind::Field, signature, |symbol| {
            Declaration::new(
                symbol,
                name,
                DeclarationParent::Declaration(class),
                DeclarationKind::Field(FieldDecl::new(ty)),
            )
        })
    }

    /// Top-level function `name()` in `file`.
    pub fn function(&mut self, file: FileId, name: &str, return_type: IrType, body: Vec<Statement>) -> SymbolId {
        let signature = IdSignature::common(self.package_of(file), name);
        self.define(SymbolKind::Function, signature, |symbol| {
            let function = FunctionDecl::new(return_type).with_body(Body::new(body));
            Declaration::new(symbol, name, DeclarationParent::File(file), DeclarationKind::Function(function))
        })
    }

    /// Remove a declaration, as a recompiled library that dropped it would.
    /// Its symbol stays referenced by the client.
    pub fn remove(&mut self, symbol: SymbolId) {
        let declaration = self.table_mut().unbind(symbol).unwrap();
        match declaration.parent {
            DeclarationParent::File(file) => {
                self.table_mut().file_mut(file).unwrap().declarations.retain(|&d| d != symbol)
            }
            DeclarationParent::Declaration(class) => {
                self.table_mut().class_mut(class).unwrap().declarations.retain(|&d| d != symbol)
            }
            DeclarationParent::ExternalFragment(_) => {}
        }
    }

    /// Link and collect the diagnostics.
    pub fn link(&mut self) -> (LinkageOutput, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let output = self.session.link(&mut diagnostics).unwrap();
        (output, diagnostics)
    }

    pub fn body(&self, function: SymbolId) -> &[Statement] {
        &self.table().function(function).unwrap().body.as_ref().unwrap().statements
    }

    fn names_of(&self, class: SymbolId) -> (String, String) {
        let file = self.table().file_of(class).unwrap();
        (self.package_of(file), self.table().fq_name(class).unwrap())
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    /// An instance of a class.
    Object(SymbolId),
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// The linkage-error intrinsic was called with this message.
    Linkage(String),
    /// A `throw` expression was evaluated.
    Thrown,
    /// A function without body was called.
    NoBody(String),
}

/// Runs functions of a linked program.
pub struct Evaluator<'p> {
    table: &'p SymbolTable,
    builtins: IrBuiltIns,
    /// Fully qualified names of the functions entered, in order.
    pub trace: Vec<String>,
}

type Locals = FxHashMap<String, Value>;

impl<'p> Evaluator<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            table: program.table(),
            builtins: program.builtins(),
            trace: Vec::new(),
        }
    }

    /// Call a function without arguments.
    pub fn run(&mut self, function: SymbolId) -> Result<Value, Failure> {
        self.invoke(function, None)
    }

    fn invoke(&mut self, function: SymbolId, this: Option<Value>) -> Result<Value, Failure> {
        let table = self.table;
        let name = table.fq_name(function).unwrap_or_default();
        self.trace.push(name.clone());

        let Some(body) = table.function(function).and_then(|f| f.body.as_ref()) else {
            return Err(Failure::NoBody(name));
        };
        let mut locals = Locals::default();
        if let Some(this) = this {
            locals.insert("<this>".to_owned(), this);
        }
        self.statements(&body.statements, &mut locals)
    }

    fn statements(&mut self, statements: &[Statement], locals: &mut Locals) -> Result<Value, Failure> {
        let mut last = Value::Unit;
        for statement in statements {
            last = match statement {
                Statement::Expr(expr) => self.expr(expr, locals)?,
                Statement::Variable(variable) => {
                    let value = match &variable.initializer {
                        Some(initializer) => self.expr(initializer, locals)?,
                        None => Value::Null,
                    };
                    locals.insert(variable.name.clone(), value);
                    Value::Unit
                }
            };
        }
        Ok(last)
    }

    fn expr(&mut self, expr: &Expr, locals: &mut Locals) -> Result<Value, Failure> {
        match &expr.kind {
            ExprKind::Const(value) => Ok(match value {
                ConstValue::Null => Value::Null,
                ConstValue::Bool(b) => Value::Bool(*b),
                ConstValue::Int(i) => Value::Int(*i),
                ConstValue::String(s) => Value::Str(s.clone()),
            }),
            ExprKind::GetValue { name } => Ok(locals.get(name).cloned().unwrap_or(Value::Null)),
            ExprKind::SetValue { name, value } => {
                let value = self.expr(value, locals)?;
                locals.insert(name.clone(), value);
                Ok(Value::Unit)
            }
            ExprKind::MemberAccess(access) => {
                let dispatch = match &access.dispatch_receiver {
                    Some(receiver) => Some(self.expr(receiver, locals)?),
                    None => None,
                };
                if let Some(receiver) = &access.extension_receiver {
                    self.expr(receiver, locals)?;
                }
                let mut arguments = Vec::new();
                for argument in access.arguments.iter().flatten() {
                    arguments.push(self.expr(argument, locals)?);
                }

                if access.symbol == self.builtins.linkage_error_symbol {
                    let message = match arguments.into_iter().next() {
                        Some(Value::Str(message)) => message,
                        other => format!("{other:?}"),
                    };
                    return Err(Failure::Linkage(message));
                }

                match access.access {
                    MemberAccessKind::Call => self.invoke(access.symbol, dispatch),
                    MemberAccessKind::ConstructorCall | MemberAccessKind::DelegatingConstructorCall => {
                        self.construct(access.symbol)
                    }
                    MemberAccessKind::FunctionReference | MemberAccessKind::PropertyReference => {
                        Ok(Value::Unit)
                    }
                }
            }
            ExprKind::GetField { receiver, .. } => {
                if let Some(receiver) = receiver {
                    self.expr(receiver, locals)?;
                }
                Ok(Value::Null)
            }
            ExprKind::SetField { receiver, value, .. } => {
                if let Some(receiver) = receiver {
                    self.expr(receiver, locals)?;
                }
                self.expr(value, locals)?;
                Ok(Value::Unit)
            }
            ExprKind::TypeOperator(call) => {
                let argument = self.expr(&call.argument, locals)?;
                Ok(match call.operator {
                    TypeOperator::InstanceOf => Value::Bool(true),
                    TypeOperator::NotInstanceOf => Value::Bool(false),
                    TypeOperator::Cast | TypeOperator::ImplicitCast | TypeOperator::SafeCast => argument,
                })
            }
            ExprKind::ClassReference { symbol } => Ok(Value::Object(*symbol)),
            ExprKind::Composite(statements) => self.statements(statements, locals),
            ExprKind::Block(statements) => {
                let mut scope = locals.clone();
                self.statements(statements, &mut scope)
            }
            ExprKind::Return { value, .. } => self.expr(value, locals),
            ExprKind::Throw { value } => {
                self.expr(value, locals)?;
                Err(Failure::Thrown)
            }
            ExprKind::When(branches) => {
                for branch in branches {
                    if self.expr(&branch.condition, locals)? == Value::Bool(true) {
                        return self.expr(&branch.result, locals);
                    }
                }
                Ok(Value::Unit)
            }
        }
    }

    /// Run a constructor, then the initializers of its class.
    fn construct(&mut self, constructor: SymbolId) -> Result<Value, Failure> {
        let table = self.table;
        let class = table.parent_class(constructor);
        self.invoke(constructor, None)?;

        let Some(class) = class else {
            return Ok(Value::Unit);
        };
        let members = table.class(class).map(|c| c.declarations.as_slice()).unwrap_or_default();
        for &member in members {
            if let Some(initializer) = table.initializer(member) {
                let mut locals = Locals::default();
                self.statements(&initializer.body.statements, &mut locals)?;
            }
        }
        Ok(Value::Object(class))
    }
}
