use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Eq,
    NotEq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEq => "<=",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Add | BinaryOp::Sub => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(i64),
    Float(f64),
    String(Rc<str>),
    Var(Rc<str>),
    BinOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Invocation of a built-in or a user-defined function
    Call { name: Rc<str>, args: Vec<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { name: Rc<str>, value: Expr },
    Print(Expr),
    If { condition: Expr, body: Block },
    While { condition: Expr, body: Block },
    Function(Rc<FunctionDecl>),
    Return(Expr),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Rc<str>,
    pub params: Vec<Rc<str>>,
    pub body: Block,
}

/// An ordered statement sequence. The parser returns the whole program as one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

impl Block {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}

// Surface-syntax printing. Output re-parses to an equal tree.

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

// All operators are left-associative, so a right operand at the same level
// needs parentheses while a left one does not.
fn needs_parens(expr: &Expr, parent: BinaryOp, is_right: bool) -> bool {
    match expr {
        Expr::BinOp { op, .. } => {
            op.precedence() < parent.precedence()
                || (is_right && op.precedence() == parent.precedence())
        }
        _ => false,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parent: BinaryOp, is_right: bool) -> fmt::Result {
    if needs_parens(expr, parent, is_right) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Whether the printed expression ends in a bare identifier, which a
/// following `(` would turn into a call.
fn ends_with_identifier(expr: &Expr) -> bool {
    match expr {
        Expr::Var(_) => true,
        Expr::BinOp { op, right, .. } => !needs_parens(right, *op, true) && ends_with_identifier(right),
        _ => false,
    }
}

fn write_trailing(f: &mut fmt::Formatter<'_>, expr: &Expr, guard: bool) -> fmt::Result {
    if guard && ends_with_identifier(expr) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Float(n) if n.fract() == 0.0 => write!(f, "{:.1}", n),
            Expr::Float(n) => write!(f, "{}", n),
            Expr::String(s) => write_escaped(f, s),
            Expr::Var(name) => f.write_str(name),
            Expr::BinOp { left, op, right } => {
                write_operand(f, left, *op, false)?;
                write!(f, " {} ", op)?;
                write_operand(f, right, *op, true)
            }
            Expr::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Block {
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            let next_opens_paren = self
                .statements
                .get(i + 1)
                .is_some_and(Stmt::starts_with_paren);
            stmt.write_indented(f, depth, next_opens_paren)?;
        }
        Ok(())
    }

    fn write_braced(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        f.write_str("{\n")?;
        self.write_indented(f, depth + 1)?;
        write!(f, "{}}}", "    ".repeat(depth))
    }
}

impl Stmt {
    fn starts_with_paren(&self) -> bool {
        matches!(self, Stmt::Expr(expr) if expr.to_string().starts_with('('))
    }

    /// `guard_tail` is set when the next statement opens with `(`.
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize, guard_tail: bool) -> fmt::Result {
        f.write_str(&"    ".repeat(depth))?;
        match self {
            Stmt::Assign { name, value } => {
                write!(f, "let {} = ", name)?;
                write_trailing(f, value, guard_tail)?;
            }
            Stmt::Print(value) => {
                f.write_str("print ")?;
                write_trailing(f, value, guard_tail)?;
            }
            Stmt::Return(value) => {
                f.write_str("return ")?;
                write_trailing(f, value, guard_tail)?;
            }
            Stmt::Expr(expr) => write_trailing(f, expr, guard_tail)?,
            Stmt::If { condition, body } => {
                write!(f, "if {} ", condition)?;
                body.write_braced(f, depth)?;
            }
            Stmt::While { condition, body } => {
                write!(f, "while {} ", condition)?;
                body.write_braced(f, depth)?;
            }
            Stmt::Function(decl) => {
                write!(f, "func {}({}) ", decl.name, decl.params.join(", "))?;
                decl.body.write_braced(f, depth)?;
            }
        }
        f.write_str("\n")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0, false)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
