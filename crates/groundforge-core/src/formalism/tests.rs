//! Tests for the lifted formalism helpers.

use super::*;
use crate::error::GroundForgeError;

#[test]
fn test_term_grounding() {
    let binding = [ObjectId(4), ObjectId(7)];
    assert_eq!(Term::Parameter(1).ground(&binding), ObjectId(7));
    assert_eq!(Term::Object(ObjectId(2)).ground(&binding), ObjectId(2));
}

#[test]
fn test_atom_parameters_and_groundness() {
    let atom = Atom::new(
        PredicateId(0),
        [Term::Parameter(1), Term::Object(ObjectId(0)), Term::Parameter(1)],
    );
    assert!(!atom.is_ground());
    assert_eq!(atom.parameters().collect::<Vec<_>>(), vec![1, 1]);

    let ground = Atom::new(PredicateId(0), [Term::Object(ObjectId(0))]);
    assert!(ground.is_ground());
}

#[test]
fn test_category_slots_are_distinct() {
    let slots: Vec<_> = PredicateCategory::ALL.iter().map(|c| c.slot()).collect();
    assert_eq!(slots, vec![0, 1, 2]);
}

#[test]
fn test_expression_evaluation() {
    let expression = FunctionExpression::Multi {
        op: MultiOperator::Add,
        args: vec![
            FunctionExpression::Number(1.0),
            FunctionExpression::Minus(Box::new(FunctionExpression::Number(0.5))),
            FunctionExpression::Binary {
                op: BinaryOperator::Div,
                lhs: Box::new(FunctionExpression::Number(9.0)),
                rhs: Box::new(FunctionExpression::Number(3.0)),
            },
        ],
    };
    let lookup = |_: FunctionId, _: &[ObjectId]| -> crate::Result<f64> { Ok(0.0) };
    assert_eq!(expression.evaluate(&[], &lookup).unwrap(), 3.5);
}

#[test]
fn test_expression_lookup_error_propagates() {
    let expression = FunctionExpression::Function(FunctionTerm {
        function: FunctionId(0),
        terms: vec![Term::Parameter(0)],
    });
    let lookup = |_: FunctionId, objects: &[ObjectId]| -> crate::Result<f64> {
        Err(GroundForgeError::UndefinedFunction {
            function: format!("f({})", objects[0]),
        })
    };
    let err = expression.evaluate(&[ObjectId(3)], &lookup).unwrap_err();
    assert_eq!(err.to_string(), "Undefined numeric value for ground function f(3)");
}
