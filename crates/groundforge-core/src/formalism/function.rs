//! Numeric function syntax used by action costs.

use super::{FunctionId, ObjectId, ObjectTuple, Term};
use crate::error::Result;

/// A numeric function symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSkeleton {
    pub name: String,
    pub arity: usize,
}

/// A function symbol applied to terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionTerm {
    pub function: FunctionId,
    pub terms: Vec<Term>,
}

impl FunctionTerm {
    /// Resolves the arguments under a binding.
    pub fn ground(&self, binding: &[ObjectId]) -> ObjectTuple {
        self.terms.iter().map(|t| t.ground(binding)).collect()
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

/// Variadic arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiOperator {
    Add,
    Mul,
}

/// An arithmetic expression over numeric fluents.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionExpression {
    Number(f64),
    Binary {
        op: BinaryOperator,
        lhs: Box<FunctionExpression>,
        rhs: Box<FunctionExpression>,
    },
    Multi {
        op: MultiOperator,
        args: Vec<FunctionExpression>,
    },
    Minus(Box<FunctionExpression>),
    Function(FunctionTerm),
}

impl FunctionExpression {
    /// Evaluates the expression under `binding`.
    ///
    /// `lookup` resolves a ground function application to its value and
    /// reports a missing value as an error.
    pub fn evaluate<L>(&self, binding: &[ObjectId], lookup: &L) -> Result<f64>
    where
        L: Fn(FunctionId, &[ObjectId]) -> Result<f64>,
    {
        match self {
            FunctionExpression::Number(value) => Ok(*value),
            FunctionExpression::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate(binding, lookup)?;
                let rhs = rhs.evaluate(binding, lookup)?;
                Ok(match op {
                    BinaryOperator::Add => lhs + rhs,
                    BinaryOperator::Sub => lhs - rhs,
                    BinaryOperator::Mul => lhs * rhs,
                    BinaryOperator::Div => lhs / rhs,
                })
            }
            FunctionExpression::Multi { op, args } => {
                let mut acc = match op {
                    MultiOperator::Add => 0.0,
                    MultiOperator::Mul => 1.0,
                };
                for arg in args {
                    let value = arg.evaluate(binding, lookup)?;
                    match op {
                        MultiOperator::Add => acc += value,
                        MultiOperator::Mul => acc *= value,
                    }
                }
                Ok(acc)
            }
            FunctionExpression::Minus(inner) => Ok(-inner.evaluate(binding, lookup)?),
            FunctionExpression::Function(term) => lookup(term.function, &term.ground(binding)),
        }
    }
}
