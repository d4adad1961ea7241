//! Variables and the ordered context they are bound in.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::path::parent_dir_string;

/// Where a binding was last written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: PathBuf,
    /// 0-based line index
    pub line: usize,
    pub column_start: usize,
    pub column_end: usize,
}

/// A bound Makefile variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    /// Right-hand side text of the most recent applicable assignment
    pub recipe: String,
    pub location: Location,
}

/// Ordered variable bindings, unique by name.
///
/// Insertion order is visibility order. Rebinding an existing name updates
/// it in place and keeps its original slot.
#[derive(Debug, Clone, Serialize)]
pub struct Context {
    source: PathBuf,
    variables: Vec<Variable>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Context {
    /// Empty context for the root Makefile `source`.
    pub fn new(source: PathBuf) -> Self {
        Self {
            source,
            variables: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Root Makefile this context was built from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Directory substituted for `$(PWD)`.
    pub fn source_dir(&self) -> String {
        parent_dir_string(&self.source)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.variables[i]),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Append a new binding. An existing binding with the same name is
    /// replaced in place instead.
    pub fn push(&mut self, variable: Variable) {
        if let Some(&i) = self.index.get(&variable.name) {
            self.variables[i] = variable;
            return;
        }
        self.index.insert(variable.name.clone(), self.variables.len());
        self.variables.push(variable);
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
