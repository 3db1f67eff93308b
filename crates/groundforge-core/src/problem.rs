//! Planning problems as handed over by the front-end.

use std::collections::HashMap;

use crate::atoms::{GroundAtom, GroundFunction, GroundLiteral};
use crate::error::{GroundForgeError, Result};
use crate::formalism::{
    ActionSchema, Atom, Axiom, AxiomId, Condition, Effect, FunctionExpression, FunctionId,
    FunctionSkeleton, Object, ObjectId, Predicate, PredicateCategory, PredicateId, SchemaId, Term,
};

/// A fully parsed planning problem together with its domain.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    pub name: String,
    pub objects: Vec<Object>,
    pub predicates: Vec<Predicate>,
    pub functions: Vec<FunctionSkeleton>,
    pub schemas: Vec<ActionSchema>,
    pub axioms: Vec<Axiom>,
    /// Initial literals over static and fluent predicates.
    pub initial: Vec<GroundLiteral>,
    /// Values of ground numeric functions referenced by action costs.
    pub numeric_fluents: HashMap<GroundFunction, f64>,
    /// Goal as a conjunction of ground literals.
    pub goal: Vec<GroundLiteral>,
    /// If false, every action costs 1 and cost increases are ignored.
    pub uses_action_costs: bool,
}

impl Problem {
    #[inline]
    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn predicate(&self, id: PredicateId) -> &Predicate {
        &self.predicates[id.index()]
    }

    #[inline]
    pub fn schema(&self, id: SchemaId) -> &ActionSchema {
        &self.schemas[id.index()]
    }

    #[inline]
    pub fn axiom(&self, id: AxiomId) -> &Axiom {
        &self.axioms[id.index()]
    }

    #[inline]
    pub fn has_axioms(&self) -> bool {
        !self.axioms.is_empty()
    }

    /// Iterates the schema ids in order.
    pub fn schema_ids(&self) -> impl Iterator<Item = SchemaId> {
        (0..self.schemas.len()).map(SchemaId)
    }

    /// Looks up the value of a ground numeric function.
    pub fn function_value(&self, function: FunctionId, objects: &[ObjectId]) -> Result<f64> {
        let key = GroundFunction::new(function, objects.iter().copied());
        self.numeric_fluents
            .get(&key)
            .copied()
            .ok_or_else(|| GroundForgeError::UndefinedFunction {
                function: self.display_function(function, objects),
            })
    }

    /// Evaluates a cost expression under `binding`.
    pub fn evaluate(&self, expression: &FunctionExpression, binding: &[ObjectId]) -> Result<f64> {
        expression.evaluate(binding, &|function, objects| self.function_value(function, objects))
    }

    /// Renders a ground atom as `name(obj, ...)`.
    pub fn display_atom(&self, atom: &GroundAtom) -> String {
        let args: Vec<&str> = atom
            .objects
            .iter()
            .map(|o| self.objects[o.index()].name.as_str())
            .collect();
        format!("{}({})", self.predicate(atom.predicate).name, args.join(", "))
    }

    /// Renders a ground function application as `name(obj, ...)`.
    pub fn display_function(&self, function: FunctionId, objects: &[ObjectId]) -> String {
        let args: Vec<&str> = objects
            .iter()
            .map(|o| self.objects[o.index()].name.as_str())
            .collect();
        format!("{}({})", self.functions[function.index()].name, args.join(", "))
    }

    /// Checks that every id is in range and every atom matches its predicate's arity.
    ///
    /// Grounding assumes a validated problem; violations found later are
    /// treated as programmer errors.
    pub fn validate(&self) -> Result<()> {
        for (i, schema) in self.schemas.iter().enumerate() {
            let location = format!("schema {} ({})", i, schema.name);
            self.validate_condition(&schema.precondition, schema.arity, &location)?;
            self.validate_effect(&schema.effect, schema.arity, &location)?;
        }
        for (i, axiom) in self.axioms.iter().enumerate() {
            let location = format!("axiom {}", i);
            self.validate_condition(&axiom.body, axiom.arity, &location)?;
            self.validate_atom(&axiom.head, axiom.arity, &location)?;
        }
        for literal in self.initial.iter().chain(&self.goal) {
            self.validate_ground_atom(&literal.atom)?;
        }
        for key in self.numeric_fluents.keys() {
            let skeleton = self.functions.get(key.function.index()).ok_or_else(|| {
                GroundForgeError::Malformed(format!("unknown function id {}", key.function))
            })?;
            if skeleton.arity != key.objects.len() {
                return Err(GroundForgeError::Malformed(format!(
                    "function {} has arity {} but a value was given for {} objects",
                    skeleton.name,
                    skeleton.arity,
                    key.objects.len()
                )));
            }
        }
        Ok(())
    }

    fn validate_condition(&self, condition: &Condition, scope: usize, location: &str) -> Result<()> {
        match condition {
            Condition::Literal(literal) => self.validate_atom(&literal.atom, scope, location),
            Condition::And(parts) | Condition::Or(parts) => parts
                .iter()
                .try_for_each(|c| self.validate_condition(c, scope, location)),
            Condition::Not(inner) => self.validate_condition(inner, scope, location),
            Condition::Imply(lhs, rhs) => {
                self.validate_condition(lhs, scope, location)?;
                self.validate_condition(rhs, scope, location)
            }
            Condition::Exists {
                parameters,
                condition,
            }
            | Condition::Forall {
                parameters,
                condition,
            } => self.validate_condition(condition, scope + parameters, location),
        }
    }

    fn validate_effect(&self, effect: &Effect, scope: usize, location: &str) -> Result<()> {
        match effect {
            Effect::Literal(literal) => self.validate_atom(&literal.atom, scope, location),
            Effect::And(parts) => parts
                .iter()
                .try_for_each(|e| self.validate_effect(e, scope, location)),
            Effect::When { condition, effect } => {
                self.validate_condition(condition, scope, location)?;
                self.validate_effect(effect, scope, location)
            }
            Effect::Forall { parameters, effect } => {
                self.validate_effect(effect, scope + parameters, location)
            }
            Effect::IncreaseCost(expression) => self.validate_expression(expression, scope, location),
        }
    }

    fn validate_expression(
        &self,
        expression: &FunctionExpression,
        scope: usize,
        location: &str,
    ) -> Result<()> {
        match expression {
            FunctionExpression::Number(_) => Ok(()),
            FunctionExpression::Binary { lhs, rhs, .. } => {
                self.validate_expression(lhs, scope, location)?;
                self.validate_expression(rhs, scope, location)
            }
            FunctionExpression::Multi { args, .. } => args
                .iter()
                .try_for_each(|a| self.validate_expression(a, scope, location)),
            FunctionExpression::Minus(inner) => self.validate_expression(inner, scope, location),
            FunctionExpression::Function(term) => {
                let skeleton = self.functions.get(term.function.index()).ok_or_else(|| {
                    GroundForgeError::Malformed(format!(
                        "{}: unknown function id {}",
                        location, term.function
                    ))
                })?;
                if skeleton.arity != term.terms.len() {
                    return Err(GroundForgeError::Malformed(format!(
                        "{}: function {} expects {} arguments, got {}",
                        location,
                        skeleton.name,
                        skeleton.arity,
                        term.terms.len()
                    )));
                }
                term.terms
                    .iter()
                    .try_for_each(|t| self.validate_term(*t, scope, location))
            }
        }
    }

    fn validate_atom(&self, atom: &Atom, scope: usize, location: &str) -> Result<()> {
        let predicate = self.predicates.get(atom.predicate.index()).ok_or_else(|| {
            GroundForgeError::Malformed(format!("{}: unknown predicate id {}", location, atom.predicate))
        })?;
        if predicate.arity != atom.terms.len() {
            return Err(GroundForgeError::Malformed(format!(
                "{}: predicate {} expects {} arguments, got {}",
                location,
                predicate.name,
                predicate.arity,
                atom.terms.len()
            )));
        }
        atom.terms
            .iter()
            .try_for_each(|t| self.validate_term(*t, scope, location))
    }

    fn validate_term(&self, term: Term, scope: usize, location: &str) -> Result<()> {
        match term {
            Term::Object(object) if object.index() >= self.objects.len() => Err(
                GroundForgeError::Malformed(format!("{}: unknown object id {}", location, object)),
            ),
            Term::Parameter(p) if p >= scope => Err(GroundForgeError::Malformed(format!(
                "{}: parameter {} out of scope (arity {})",
                location, p, scope
            ))),
            _ => Ok(()),
        }
    }

    fn validate_ground_atom(&self, atom: &GroundAtom) -> Result<()> {
        let predicate = self.predicates.get(atom.predicate.index()).ok_or_else(|| {
            GroundForgeError::Malformed(format!("unknown predicate id {}", atom.predicate))
        })?;
        if predicate.arity != atom.objects.len() {
            return Err(GroundForgeError::Malformed(format!(
                "ground atom over {} has {} objects, expected {}",
                predicate.name,
                atom.objects.len(),
                predicate.arity
            )));
        }
        if let Some(object) = atom.objects.iter().find(|o| o.index() >= self.objects.len()) {
            return Err(GroundForgeError::Malformed(format!(
                "ground atom over {} mentions unknown object id {}",
                predicate.name, object
            )));
        }
        Ok(())
    }
}

/// Incremental constructor for [`Problem`]s.
///
/// # Example
///
/// ```
/// use groundforge_core::{ActionSchema, Atom, Condition, Effect, Literal, PredicateCategory, ProblemBuilder, Term};
///
/// let mut builder = ProblemBuilder::new("move");
/// let r1 = builder.object("r1");
/// let at = builder.predicate("at", 1, PredicateCategory::Fluent);
/// builder.schema(ActionSchema::new(
///     "move",
///     1,
///     Condition::atom(Atom::new(at, [Term::Parameter(0)])),
///     Effect::Literal(Literal::negative(Atom::new(at, [Term::Parameter(0)]))),
/// ));
/// builder.initial_atom(at, [r1]);
///
/// let problem = builder.build().unwrap();
/// assert_eq!(problem.schemas.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    problem: Problem,
}

impl ProblemBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            problem: Problem {
                name: name.into(),
                ..Problem::default()
            },
        }
    }

    /// Adds an object and returns its id.
    pub fn object(&mut self, name: impl Into<String>) -> ObjectId {
        self.problem.objects.push(Object { name: name.into() });
        ObjectId(self.problem.objects.len() - 1)
    }

    /// Adds a predicate and returns its id.
    pub fn predicate(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        category: PredicateCategory,
    ) -> PredicateId {
        self.problem.predicates.push(Predicate {
            name: name.into(),
            arity,
            category,
        });
        PredicateId(self.problem.predicates.len() - 1)
    }

    /// Adds a numeric function symbol and returns its id.
    pub fn function(&mut self, name: impl Into<String>, arity: usize) -> FunctionId {
        self.problem.functions.push(FunctionSkeleton {
            name: name.into(),
            arity,
        });
        FunctionId(self.problem.functions.len() - 1)
    }

    /// Adds an action schema and returns its id.
    pub fn schema(&mut self, schema: ActionSchema) -> SchemaId {
        self.problem.schemas.push(schema);
        SchemaId(self.problem.schemas.len() - 1)
    }

    /// Adds an axiom and returns its id.
    pub fn axiom(&mut self, axiom: Axiom) -> AxiomId {
        self.problem.axioms.push(axiom);
        AxiomId(self.problem.axioms.len() - 1)
    }

    /// Adds a positive initial atom.
    pub fn initial_atom(
        &mut self,
        predicate: PredicateId,
        objects: impl IntoIterator<Item = ObjectId>,
    ) -> &mut Self {
        self.initial_literal(GroundLiteral::positive(GroundAtom::new(predicate, objects)))
    }

    /// Adds an initial literal.
    pub fn initial_literal(&mut self, literal: GroundLiteral) -> &mut Self {
        self.problem.initial.push(literal);
        self
    }

    /// Adds a goal literal.
    pub fn goal_literal(&mut self, literal: GroundLiteral) -> &mut Self {
        self.problem.goal.push(literal);
        self
    }

    /// Adds a positive goal atom.
    pub fn goal_atom(
        &mut self,
        predicate: PredicateId,
        objects: impl IntoIterator<Item = ObjectId>,
    ) -> &mut Self {
        self.goal_literal(GroundLiteral::positive(GroundAtom::new(predicate, objects)))
    }

    /// Sets the value of a ground numeric function.
    pub fn numeric_fluent(
        &mut self,
        function: FunctionId,
        objects: impl IntoIterator<Item = ObjectId>,
        value: f64,
    ) -> &mut Self {
        self.problem
            .numeric_fluents
            .insert(GroundFunction::new(function, objects), value);
        self
    }

    /// Enables cost evaluation from `IncreaseCost` effects.
    pub fn use_action_costs(&mut self) -> &mut Self {
        self.problem.uses_action_costs = true;
        self
    }

    /// Validates and returns the problem.
    pub fn build(self) -> Result<Problem> {
        self.problem.validate()?;
        Ok(self.problem)
    }
}
