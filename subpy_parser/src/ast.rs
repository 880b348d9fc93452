//! Syntax tree for the supported Python subset.
//!
//! Node shapes follow the conventional Python AST so that analysis rules can
//! be phrased in familiar terms. Two legacy statements are represented
//! directly: `print >>f, a, b,` ([`StmtKind::Print`]) and
//! `exec code in g, l` ([`StmtKind::Exec`]).

use subpy_core::Span;

// =============================================================================
// Module Level
// =============================================================================

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct Module {
    /// Top-level statements.
    pub body: Vec<Stmt>,
    /// Source span.
    pub span: Span,
}

impl Module {
    /// Create a new module.
    #[must_use]
    pub fn new(body: Vec<Stmt>, span: Span) -> Self {
        Self { body, span }
    }
}

// =============================================================================
// Statements
// =============================================================================

/// A statement node.
#[derive(Debug, Clone)]
pub struct Stmt {
    /// The statement kind.
    pub kind: StmtKind,
    /// Source span.
    pub span: Span,
}

impl Stmt {
    /// Create a new statement.
    #[must_use]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds.
#[derive(Debug, Clone)]
pub enum StmtKind {
    // === Simple Statements ===
    /// Expression statement.
    Expr(Box<Expr>),
    /// Assignment: `a = b = value`
    Assign {
        /// Assignment targets, left to right.
        targets: Vec<Expr>,
        /// Value being assigned.
        value: Box<Expr>,
    },
    /// Augmented assignment: `target += value`
    AugAssign {
        /// Target.
        target: Box<Expr>,
        /// Operator.
        op: AugOp,
        /// Value.
        value: Box<Expr>,
    },
    /// Annotated assignment: `target: annotation = value`
    AnnAssign {
        /// Target.
        target: Box<Expr>,
        /// Annotation.
        annotation: Box<Expr>,
        /// Optional value.
        value: Option<Box<Expr>>,
        /// Whether the target is a bare name.
        simple: bool,
    },
    /// Return statement.
    Return(Option<Box<Expr>>),
    /// Delete statement.
    Delete(Vec<Expr>),
    /// Pass statement.
    Pass,
    /// Break statement.
    Break,
    /// Continue statement.
    Continue,
    /// Raise statement.
    Raise {
        /// Exception to raise.
        exc: Option<Box<Expr>>,
        /// Cause (`raise X from Y`).
        cause: Option<Box<Expr>>,
    },
    /// Assert statement.
    Assert {
        /// Test expression.
        test: Box<Expr>,
        /// Optional message.
        msg: Option<Box<Expr>>,
    },
    /// Global statement.
    Global(Vec<String>),
    /// Nonlocal statement.
    Nonlocal(Vec<String>),
    /// Legacy print statement: `print >>dest, a, b,`
    Print {
        /// Redirection target after `>>`.
        dest: Option<Box<Expr>>,
        /// Printed values.
        values: Vec<Expr>,
        /// False when the statement ends with a trailing comma.
        nl: bool,
    },
    /// Legacy exec statement: `exec body in globals, locals`
    Exec {
        /// Code to execute.
        body: Box<Expr>,
        /// Global namespace.
        globals: Option<Box<Expr>>,
        /// Local namespace.
        locals: Option<Box<Expr>>,
    },

    // === Import Statements ===
    /// Import statement: `import x, y.z`
    Import(Vec<Alias>),
    /// From import: `from x import y, z`
    ImportFrom {
        /// Module name (None for `from . import x`).
        module: Option<String>,
        /// Imported names; `*` for a star import.
        names: Vec<Alias>,
        /// Number of leading dots.
        level: u32,
    },

    // === Compound Statements ===
    /// If statement.
    If {
        /// Test expression.
        test: Box<Expr>,
        /// Body.
        body: Vec<Stmt>,
        /// Elif and else clauses.
        orelse: Vec<Stmt>,
    },
    /// For loop.
    For {
        /// Loop target.
        target: Box<Expr>,
        /// Iterable.
        iter: Box<Expr>,
        /// Body.
        body: Vec<Stmt>,
        /// Else clause.
        orelse: Vec<Stmt>,
    },
    /// Async for loop.
    AsyncFor {
        /// Loop target.
        target: Box<Expr>,
        /// Iterable.
        iter: Box<Expr>,
        /// Body.
        body: Vec<Stmt>,
        /// Else clause.
        orelse: Vec<Stmt>,
    },
    /// While loop.
    While {
        /// Test expression.
        test: Box<Expr>,
        /// Body.
        body: Vec<Stmt>,
        /// Else clause.
        orelse: Vec<Stmt>,
    },
    /// With statement.
    With {
        /// Context items.
        items: Vec<WithItem>,
        /// Body.
        body: Vec<Stmt>,
    },
    /// Async with statement.
    AsyncWith {
        /// Context items.
        items: Vec<WithItem>,
        /// Body.
        body: Vec<Stmt>,
    },
    /// Try statement.
    Try {
        /// Try body.
        body: Vec<Stmt>,
        /// Exception handlers.
        handlers: Vec<ExceptHandler>,
        /// Else clause.
        orelse: Vec<Stmt>,
        /// Finally clause.
        finalbody: Vec<Stmt>,
    },

    // === Definitions ===
    /// Function definition.
    FunctionDef {
        /// Function name.
        name: String,
        /// Parameters.
        args: Box<Arguments>,
        /// Body.
        body: Vec<Stmt>,
        /// Decorators.
        decorator_list: Vec<Expr>,
        /// Return annotation.
        returns: Option<Box<Expr>>,
    },
    /// Async function definition.
    AsyncFunctionDef {
        /// Function name.
        name: String,
        /// Parameters.
        args: Box<Arguments>,
        /// Body.
        body: Vec<Stmt>,
        /// Decorators.
        decorator_list: Vec<Expr>,
        /// Return annotation.
        returns: Option<Box<Expr>>,
    },
    /// Class definition.
    ClassDef {
        /// Class name.
        name: String,
        /// Base classes.
        bases: Vec<Expr>,
        /// Class keywords such as `metaclass=`.
        keywords: Vec<Keyword>,
        /// Body.
        body: Vec<Stmt>,
        /// Decorators.
        decorator_list: Vec<Expr>,
    },
}

impl StmtKind {
    /// Node tag used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Expr(_) => "Expr",
            Self::Assign { .. } => "Assign",
            Self::AugAssign { .. } => "AugAssign",
            Self::AnnAssign { .. } => "AnnAssign",
            Self::Return(_) => "Return",
            Self::Delete(_) => "Delete",
            Self::Pass => "Pass",
            Self::Break => "Break",
            Self::Continue => "Continue",
            Self::Raise { .. } => "Raise",
            Self::Assert { .. } => "Assert",
            Self::Global(_) => "Global",
            Self::Nonlocal(_) => "Nonlocal",
            Self::Print { .. } => "Print",
            Self::Exec { .. } => "Exec",
            Self::Import(_) => "Import",
            Self::ImportFrom { .. } => "ImportFrom",
            Self::If { .. } => "If",
            Self::For { .. } => "For",
            Self::AsyncFor { .. } => "AsyncFor",
            Self::While { .. } => "While",
            Self::With { .. } => "With",
            Self::AsyncWith { .. } => "AsyncWith",
            Self::Try { .. } => "Try",
            Self::FunctionDef { .. } => "FunctionDef",
            Self::AsyncFunctionDef { .. } => "AsyncFunctionDef",
            Self::ClassDef { .. } => "ClassDef",
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// An expression node.
#[derive(Debug, Clone)]
pub struct Expr {
    /// The expression kind.
    pub kind: ExprKind,
    /// Source span.
    pub span: Span,
}

impl Expr {
    /// Create a new expression.
    #[must_use]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The bare name this expression refers to, if it is a `Name`.
    #[inline]
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// Expression kinds.
#[derive(Debug, Clone)]
pub enum ExprKind {
    // === Literals ===
    /// Integer literal.
    Int(i64),
    /// Integer literal too large for `i64`, kept as written.
    BigInt(String),
    /// Float literal.
    Float(f64),
    /// Imaginary literal.
    Complex(f64),
    /// String literal (adjacent literals already joined).
    String(StringLiteral),
    /// Bytes literal.
    Bytes(Vec<u8>),
    /// `True` or `False`.
    Bool(bool),
    /// `None`.
    None,
    /// `...`
    Ellipsis,

    // === Names ===
    /// Identifier reference.
    Name(String),
    /// Assignment expression: `x := value`
    NamedExpr {
        /// Target name.
        target: Box<Expr>,
        /// Value.
        value: Box<Expr>,
    },

    // === Container Literals ===
    /// List display: `[1, 2, 3]`
    List(Vec<Expr>),
    /// Tuple display: `(1, 2, 3)`
    Tuple(Vec<Expr>),
    /// Set display: `{1, 2, 3}`
    Set(Vec<Expr>),
    /// Dict display: `{k: v, **rest}`
    Dict {
        /// Keys (None for `**d` unpacking).
        keys: Vec<Option<Expr>>,
        /// Values.
        values: Vec<Expr>,
    },

    // === Comprehensions ===
    /// List comprehension.
    ListComp {
        /// Element expression.
        elt: Box<Expr>,
        /// `for` clauses.
        generators: Vec<Comprehension>,
    },
    /// Set comprehension.
    SetComp {
        /// Element expression.
        elt: Box<Expr>,
        /// `for` clauses.
        generators: Vec<Comprehension>,
    },
    /// Dict comprehension.
    DictComp {
        /// Key expression.
        key: Box<Expr>,
        /// Value expression.
        value: Box<Expr>,
        /// `for` clauses.
        generators: Vec<Comprehension>,
    },
    /// Generator expression.
    GeneratorExp {
        /// Element expression.
        elt: Box<Expr>,
        /// `for` clauses.
        generators: Vec<Comprehension>,
    },

    // === Operations ===
    /// Binary operation.
    BinOp {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Unary operation.
    UnaryOp {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// `and` / `or` chain.
    BoolOp {
        /// Operator.
        op: BoolOp,
        /// Operands (at least 2).
        values: Vec<Expr>,
    },
    /// Comparison, possibly chained.
    Compare {
        /// Left operand.
        left: Box<Expr>,
        /// Operators.
        ops: Vec<CmpOp>,
        /// Right operands, one per operator.
        comparators: Vec<Expr>,
    },

    // === Access ===
    /// Attribute access: `x.attr`
    Attribute {
        /// Object.
        value: Box<Expr>,
        /// Attribute name.
        attr: String,
    },
    /// Subscript: `x[index]`
    Subscript {
        /// Object.
        value: Box<Expr>,
        /// Index, slice or tuple of them.
        slice: Box<Expr>,
    },
    /// Slice: `lower:upper:step` (only valid inside a subscript).
    Slice {
        /// Start.
        lower: Option<Box<Expr>>,
        /// Stop.
        upper: Option<Box<Expr>>,
        /// Step.
        step: Option<Box<Expr>>,
    },
    /// Starred expression: `*args`
    Starred(Box<Expr>),

    // === Calls ===
    /// Function call.
    Call {
        /// Callee.
        func: Box<Expr>,
        /// Positional arguments, including `*args`.
        args: Vec<Expr>,
        /// Keyword arguments, including `**kwargs`.
        keywords: Vec<Keyword>,
    },

    // === Lambda and Conditionals ===
    /// Lambda expression.
    Lambda {
        /// Parameters.
        args: Box<Arguments>,
        /// Body.
        body: Box<Expr>,
    },
    /// Conditional expression: `body if test else orelse`
    IfExp {
        /// Test.
        test: Box<Expr>,
        /// Value when true.
        body: Box<Expr>,
        /// Value when false.
        orelse: Box<Expr>,
    },

    // === Async/Yield ===
    /// Await expression.
    Await(Box<Expr>),
    /// Yield expression.
    Yield(Option<Box<Expr>>),
    /// Yield from expression.
    YieldFrom(Box<Expr>),
}

impl ExprKind {
    /// Node tag used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int(_) | Self::BigInt(_) => "Int",
            Self::Float(_) => "Float",
            Self::Complex(_) => "Complex",
            Self::String(_) => "Str",
            Self::Bytes(_) => "Bytes",
            Self::Bool(_) => "Bool",
            Self::None => "None",
            Self::Ellipsis => "Ellipsis",
            Self::Name(_) => "Name",
            Self::NamedExpr { .. } => "NamedExpr",
            Self::List(_) => "List",
            Self::Tuple(_) => "Tuple",
            Self::Set(_) => "Set",
            Self::Dict { .. } => "Dict",
            Self::ListComp { .. } => "ListComp",
            Self::SetComp { .. } => "SetComp",
            Self::DictComp { .. } => "DictComp",
            Self::GeneratorExp { .. } => "GeneratorExp",
            Self::BinOp { .. } => "BinOp",
            Self::UnaryOp { .. } => "UnaryOp",
            Self::BoolOp { .. } => "BoolOp",
            Self::Compare { .. } => "Compare",
            Self::Attribute { .. } => "Attribute",
            Self::Subscript { .. } => "Subscript",
            Self::Slice { .. } => "Slice",
            Self::Starred(_) => "Starred",
            Self::Call { .. } => "Call",
            Self::Lambda { .. } => "Lambda",
            Self::IfExp { .. } => "IfExp",
            Self::Await(_) => "Await",
            Self::Yield(_) => "Yield",
            Self::YieldFrom(_) => "YieldFrom",
        }
    }
}

// =============================================================================
// Operators
// =============================================================================

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mult,
    /// `@`
    MatMult,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `&`
    BitAnd,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+x`
    UAdd,
    /// `-x`
    USub,
    /// `~x`
    Invert,
    /// `not x`
    Not,
}

/// Augmented assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugOp {
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mult,
    /// `@=`
    MatMult,
    /// `/=`
    Div,
    /// `//=`
    FloorDiv,
    /// `%=`
    Mod,
    /// `**=`
    Pow,
    /// `<<=`
    LShift,
    /// `>>=`
    RShift,
    /// `|=`
    BitOr,
    /// `^=`
    BitXor,
    /// `&=`
    BitAnd,
}

/// Boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// `and`
    And,
    /// `or`
    Or,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtE,
    /// `>`
    Gt,
    /// `>=`
    GtE,
    /// `is`
    Is,
    /// `is not`
    IsNot,
    /// `in`
    In,
    /// `not in`
    NotIn,
}

// =============================================================================
// String Literals
// =============================================================================

/// A string literal, possibly several adjacent pieces joined.
#[derive(Debug, Clone)]
pub struct StringLiteral {
    /// The joined value. Format strings keep their replacement fields as text.
    pub value: String,
}

impl StringLiteral {
    /// Create a new string literal.
    #[must_use]
    pub fn new(value: String) -> Self {
        Self { value }
    }
}

// =============================================================================
// Function Arguments
// =============================================================================

/// Parameter list of a `def` or `lambda`.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    /// Positional-only parameters (before `/`).
    pub posonlyargs: Vec<Arg>,
    /// Regular parameters.
    pub args: Vec<Arg>,
    /// `*args`.
    pub vararg: Option<Arg>,
    /// Keyword-only parameters (after `*` or `*args`).
    pub kwonlyargs: Vec<Arg>,
    /// Defaults for keyword-only parameters, one slot per parameter.
    pub kw_defaults: Vec<Option<Expr>>,
    /// `**kwargs`.
    pub kwarg: Option<Arg>,
    /// Defaults for the trailing positional parameters.
    pub defaults: Vec<Expr>,
}

/// A single parameter.
#[derive(Debug, Clone)]
pub struct Arg {
    /// Parameter name.
    pub arg: String,
    /// Annotation.
    pub annotation: Option<Box<Expr>>,
    /// Source span.
    pub span: Span,
}

/// A keyword argument in a call or class header.
#[derive(Debug, Clone)]
pub struct Keyword {
    /// Argument name (None for `**kwargs`).
    pub arg: Option<String>,
    /// Value.
    pub value: Expr,
    /// Source span.
    pub span: Span,
}

// =============================================================================
// Import Aliases
// =============================================================================

/// An import alias: `name as asname`
#[derive(Debug, Clone)]
pub struct Alias {
    /// Dotted name as written.
    pub name: String,
    /// Alias.
    pub asname: Option<String>,
    /// Source span.
    pub span: Span,
}

// =============================================================================
// Comprehensions
// =============================================================================

/// One `for ... in ... if ...` clause.
#[derive(Debug, Clone)]
pub struct Comprehension {
    /// Loop target.
    pub target: Expr,
    /// Iterable.
    pub iter: Expr,
    /// Filter conditions.
    pub ifs: Vec<Expr>,
    /// `async for`.
    pub is_async: bool,
}

// =============================================================================
// Exception Handling
// =============================================================================

/// An `except` clause.
#[derive(Debug, Clone)]
pub struct ExceptHandler {
    /// Exception type to catch.
    pub typ: Option<Expr>,
    /// Binding name.
    pub name: Option<String>,
    /// Handler body.
    pub body: Vec<Stmt>,
    /// Source span.
    pub span: Span,
}

// =============================================================================
// With Items
// =============================================================================

/// A context manager item in a `with` statement.
#[derive(Debug, Clone)]
pub struct WithItem {
    /// Context expression.
    pub context_expr: Expr,
    /// `as` target.
    pub optional_vars: Option<Expr>,
}
