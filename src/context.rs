//! Evaluation context
//!
//! A context pairs a read-only [`Domain`] (the view of the transaction and
//! chain a script validates against) with a lexical [`Environment`] of named
//! definitions.
//!
//! Environments are immutable. Extending one for a `let` binding shares the
//! parent scopes and leaves them untouched, so independent evaluations can
//! hold the same base environment without copying it.

use std::rc::Rc;

use crate::types::ScriptType;
use crate::value::Value;

/// Read-only view of the transaction and chain being validated.
///
/// Supplied by the transaction validator; the evaluator treats it as opaque
/// data and never writes through it.
pub trait Domain {
    fn height(&self) -> i64;
    fn id(&self) -> &[u8];
    fn tx_type(&self) -> i64;
    fn sender_pk(&self) -> &[u8];
    fn body_bytes(&self) -> &[u8];
    /// Proof slot by index; `None` when the slot is absent
    fn proof(&self, index: u8) -> Option<Vec<u8>>;
}

/// Owned transaction view, the ready-made [`Domain`] implementation for
/// hosts and tests
#[derive(Debug, Clone, Default)]
pub struct TxSnapshot {
    pub height: i64,
    pub id: Vec<u8>,
    pub tx_type: i64,
    pub sender_pk: Vec<u8>,
    pub body_bytes: Vec<u8>,
    pub proofs: Vec<Vec<u8>>,
}

impl Domain for TxSnapshot {
    fn height(&self) -> i64 {
        self.height
    }

    fn id(&self) -> &[u8] {
        &self.id
    }

    fn tx_type(&self) -> i64 {
        self.tx_type
    }

    fn sender_pk(&self) -> &[u8] {
        &self.sender_pk
    }

    fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    fn proof(&self, index: u8) -> Option<Vec<u8>> {
        self.proofs.get(index as usize).cloned()
    }
}

/// A named definition: its resolved type and, during evaluation, its value.
///
/// The value slot stays empty while the type resolver visits
/// sub-environments; only the evaluator binds values.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub tpe: ScriptType,
    pub value: Option<Value>,
}

impl Binding {
    /// Type-only binding, as entered by the resolver
    pub fn typed(tpe: ScriptType) -> Self {
        Binding { tpe, value: None }
    }

    /// Fully defined binding, as entered by the evaluator
    pub fn defined(tpe: ScriptType, value: Value) -> Self {
        Binding {
            tpe,
            value: Some(value),
        }
    }
}

/// Immutable mapping from names to bindings, extended lexically by `let`.
///
/// Represented as a shared association list: extension is O(1), lookup
/// walks from the latest binding outward.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    head: Option<Rc<Scope>>,
}

#[derive(Debug)]
struct Scope {
    name: String,
    binding: Binding,
    parent: Option<Rc<Scope>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment { head: None }
    }

    /// Latest binding for `name`, if any
    pub fn binding(&self, name: &str) -> Option<&Binding> {
        let mut scope = self.head.as_deref();
        while let Some(current) = scope {
            if current.name == name {
                return Some(&current.binding);
            }
            scope = current.parent.as_deref();
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.binding(name).is_some()
    }

    /// Extended environment with `name` bound; the receiver is unchanged
    pub fn bind(&self, name: impl Into<String>, binding: Binding) -> Environment {
        Environment {
            head: Some(Rc::new(Scope {
                name: name.into(),
                binding,
                parent: self.head.clone(),
            })),
        }
    }
}

impl Drop for Environment {
    // Unwinds uniquely-owned scope chains iteratively; a deep script would
    // otherwise recurse through drop glue.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(scope) = next {
            match Rc::try_unwrap(scope) {
                Ok(mut owned) => next = owned.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Everything an evaluation needs: the domain view plus the definition
/// environment the script starts from
pub struct Context<'a> {
    pub domain: &'a dyn Domain,
    pub env: Environment,
}

impl<'a> Context<'a> {
    pub fn new(domain: &'a dyn Domain) -> Self {
        Context {
            domain,
            env: Environment::new(),
        }
    }

    pub fn with_env(domain: &'a dyn Domain, env: Environment) -> Self {
        Context { domain, env }
    }
}
