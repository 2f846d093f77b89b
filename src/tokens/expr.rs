use std::fmt::Display;

use indexmap::IndexMap;

/// Values bound to a production's variables for one rewrite.
///
/// Keys are the declared variable names, values the numeric arguments of the
/// triggering module, in declaration order.
pub type Bindings = IndexMap<String, f64>;

/// An arithmetic expression inside module parameters or rule conditions.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Number(f64),
    Variable(String),
    BiOperation(Box<Expr>, BiOperator, Box<Expr>),
    UnOperation(UnOperator, Box<Expr>),
}

impl Expr {
    /// Evaluate this expression under the given bindings.
    ///
    /// Pure and deterministic; the only failures are unbound variables and
    /// operations on values of the wrong type. Division by zero follows
    /// IEEE 754 and is not an error.
    pub fn eval(&self, bindings: &Bindings) -> Result<Value, EvalError> {
        match self {
            Expr::Number(num) => Ok(Value::Number(*num)),
            Expr::Variable(name) => bindings
                .get(name)
                .map(|val| Value::Number(*val))
                .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
            Expr::BiOperation(lhs, op, rhs) => op.eval(&lhs.eval(bindings)?, &rhs.eval(bindings)?),
            Expr::UnOperation(op, expr) => op.eval(&expr.eval(bindings)?),
        }
    }

    /// Evaluate to a number, rejecting boolean results.
    pub fn eval_num(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        match self.eval(bindings)? {
            Value::Number(num) => Ok(num),
            val => Err(EvalError::Expected(ValType::Number, val.val_type())),
        }
    }

    /// Whether parentheses are needed around this expression when it appears
    /// as an operand of `parent` (on the right-hand side if `right`).
    fn parenthesized(&self, parent: BiOperator, right: bool) -> bool {
        let Expr::BiOperation(_, op, _) = self else {
            return false;
        };
        let (prec, parent_prec) = (op.precedence(), parent.precedence());
        prec < parent_prec || (prec == parent_prec && right != (parent == BiOperator::Exp))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Number(num) => write!(f, "{num}"),
            Expr::Variable(name) => write!(f, "{name}"),
            Expr::BiOperation(lhs, op, rhs) => {
                for (expr, right) in [(lhs, false), (rhs, true)] {
                    if right {
                        write!(f, "{op}")?;
                    }
                    if expr.parenthesized(*op, right) {
                        write!(f, "({expr})")?;
                    } else {
                        write!(f, "{expr}")?;
                    }
                }
                Ok(())
            }
            Expr::UnOperation(op, expr) => {
                if matches!(**expr, Expr::BiOperation(..)) {
                    write!(f, "{op}({expr})")
                } else {
                    write!(f, "{op}{expr}")
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BiOperator {
    Add,
    Sub,
    Mul,
    Div,
    Exp,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    UnEqual,
}

impl BiOperator {
    /// Binding strength; comparisons are weakest, `^` strongest.
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            BiOperator::Exp => 3,
            BiOperator::Mul | BiOperator::Div => 2,
            BiOperator::Add | BiOperator::Sub => 1,
            _ => 0,
        }
    }

    pub fn eval(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        let (&Value::Number(lhs), &Value::Number(rhs)) = (lhs, rhs) else {
            let ty = match lhs {
                Value::Number(_) => rhs.val_type(),
                _ => lhs.val_type(),
            };
            return Err(EvalError::Operator(*self, ty));
        };
        Ok(match self {
            BiOperator::Add => Value::Number(lhs + rhs),
            BiOperator::Sub => Value::Number(lhs - rhs),
            BiOperator::Mul => Value::Number(lhs * rhs),
            BiOperator::Div => Value::Number(lhs / rhs),
            BiOperator::Exp => Value::Number(lhs.powf(rhs)),
            BiOperator::Less => Value::Boolean(lhs < rhs),
            BiOperator::LessEqual => Value::Boolean(lhs <= rhs),
            BiOperator::Greater => Value::Boolean(lhs > rhs),
            BiOperator::GreaterEqual => Value::Boolean(lhs >= rhs),
            BiOperator::Equal => Value::Boolean(lhs == rhs),
            BiOperator::UnEqual => Value::Boolean(lhs != rhs),
        })
    }
}

impl Display for BiOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BiOperator::Add => write!(f, "+"),
            BiOperator::Sub => write!(f, "-"),
            BiOperator::Mul => write!(f, "*"),
            BiOperator::Div => write!(f, "/"),
            BiOperator::Exp => write!(f, "^"),
            BiOperator::Less => write!(f, "<"),
            BiOperator::LessEqual => write!(f, "<="),
            BiOperator::Greater => write!(f, ">"),
            BiOperator::GreaterEqual => write!(f, ">="),
            BiOperator::Equal => write!(f, "="),
            BiOperator::UnEqual => write!(f, "<>"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnOperator {
    Negate,
}

impl UnOperator {
    pub fn eval(&self, val: &Value) -> Result<Value, EvalError> {
        match (self, val) {
            (UnOperator::Negate, Value::Number(num)) => Ok(Value::Number(-num)),
            (UnOperator::Negate, val) => Err(EvalError::Expected(ValType::Number, val.val_type())),
        }
    }
}

impl Display for UnOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOperator::Negate => write!(f, "-"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ValType {
    Number,
    Boolean,
}

impl Display for ValType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValType::Number => write!(f, "number"),
            ValType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Result of evaluating an expression.
///
/// Comparisons produce booleans, everything else numbers. Parameters must be
/// numeric, conditions must be boolean.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Value {
    Number(f64),
    Boolean(bool),
}

impl Value {
    pub fn val_type(&self) -> ValType {
        match self {
            Value::Number(_) => ValType::Number,
            Value::Boolean(_) => ValType::Boolean,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(num) => write!(f, "{num}"),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unbound variable `{0}`")]
    UnboundVariable(String),
    #[error("operator `{0}` not defined for {1} values")]
    Operator(BiOperator, ValType),
    #[error("expected a {0} value, got {1}")]
    Expected(ValType, ValType),
}
