//! JSON Schema $ref resolver for schema documents

use serde_json::Value;
use tracing::debug;

use crate::types::{SchemaDocument, TypeDefinition};

/// `$ref` pointers currently being expanded on the active recursion path.
///
/// Walkers push the pointers they followed before descending into a
/// definition's `properties`/`items` and pop them on the way back, so a
/// self-referencing type is reported as unresolved instead of looping.
#[derive(Debug, Default, Clone)]
pub struct RefTrail {
    active: Vec<String>,
}

impl RefTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.active.iter().any(|r| r == reference)
    }

    /// Push the pointers followed to reach a definition
    pub fn enter(&mut self, refs: &[String]) {
        self.active.extend(refs.iter().cloned());
    }

    /// Pop what the matching `enter` pushed
    pub fn leave(&mut self, refs: &[String]) {
        let keep = self.active.len().saturating_sub(refs.len());
        self.active.truncate(keep);
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.active.len()
    }
}

/// A definition reached by following zero or more `$ref` pointers
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedType {
    pub definition: TypeDefinition,
    /// Pointers followed, outermost first
    pub refs: Vec<String>,
}

impl ResolvedType {
    /// Stand-in for a dangling or cyclic reference: no declared schema
    pub fn unresolved() -> Self {
        Self {
            definition: TypeDefinition::default(),
            refs: Vec::new(),
        }
    }
}

/// Resolves `#/a/b/c` pointers against a single document
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
    document: &'a Value,
}

impl<'a> SchemaResolver<'a> {
    /// Create a new resolver over the given document
    pub fn new(document: &'a SchemaDocument) -> Self {
        Self {
            document: document.as_value(),
        }
    }

    /// Look up the value a pointer names. Only local `#/` pointers are
    /// supported; anything else, or a pointer that runs off the tree,
    /// yields `None`.
    pub fn resolve_ref(&self, reference: &str) -> Option<&'a Value> {
        let fragment = reference.strip_prefix("#/")?;

        fragment
            .split('/')
            .try_fold(self.document, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                _ => None,
            })
    }

    /// Follow `$ref` pointers from `schema` until an inline definition is
    /// reached. Returns `None` when a pointer dangles or when it names a
    /// type already being expanded on `trail`.
    pub fn resolve<'s>(&self, schema: &'s Value, trail: &RefTrail) -> Option<ResolvedType>
    where
        'a: 's,
    {
        let mut current = schema;
        let mut refs: Vec<String> = Vec::new();

        while let Some(reference) = current.get("$ref").and_then(Value::as_str) {
            if trail.contains(reference) || refs.iter().any(|r| r == reference) {
                debug!("Cyclic reference {} treated as unresolved", reference);
                return None;
            }

            current = match self.resolve_ref(reference) {
                Some(target) => target,
                None => {
                    debug!("Unresolved reference {}", reference);
                    return None;
                }
            };
            refs.push(reference.to_string());
        }

        Some(ResolvedType {
            definition: TypeDefinition::from_value(current),
            refs,
        })
    }

    /// Like [`resolve`](Self::resolve) but degrading to an untyped definition
    pub fn resolve_or_untyped<'s>(&self, schema: &'s Value, trail: &RefTrail) -> ResolvedType
    where
        'a: 's,
    {
        self.resolve(schema, trail)
            .unwrap_or_else(ResolvedType::unresolved)
    }
}
