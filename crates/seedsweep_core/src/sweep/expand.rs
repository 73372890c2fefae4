//! Cartesian-product expansion of a [`Schema`] into parameter sets.

use std::fmt;
use std::iter::FusedIterator;

use serde::Serialize;

use super::{GridIndices, Schema};

/// One concrete assignment of a value to every parameter of a schema.
///
/// Equality is by assignment only; where the set came from in the expansion
/// order does not matter.
#[derive(Debug, Clone)]
pub struct ParameterSet<T> {
    assignments: Vec<(String, T)>,
    /// Candidate index per parameter, i.e. the cell in the sweep grid
    indices: Vec<usize>,
}

impl<T> ParameterSet<T> {
    /// Value assigned to `name`
    pub fn get(&self, name: &str) -> Option<&T> {
        self.assignments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.assignments.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Candidate indices into the originating schema
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Values whose plain form is longer than this are written in exponent form
const MAX_PLAIN_VALUE_LEN: usize = 16;

impl<T: fmt::Display + fmt::LowerExp> ParameterSet<T> {
    /// Filesystem-safe identifier derived from the assignment,
    /// e.g. `global_seed-0.25` or `a-1_b-10`.
    ///
    /// Very large or very small values use exponent form (`1e-300`) so the
    /// slug stays a usable file name. Distinct values within one schema give
    /// distinct slugs, so it can key output files.
    pub fn slug(&self) -> String {
        self.assignments
            .iter()
            .map(|(name, value)| format!("{}-{}", sanitize(name), sanitize(&slug_value(value))))
            .collect::<Vec<_>>()
            .join("_")
    }
}

fn slug_value<T: fmt::Display + fmt::LowerExp>(value: &T) -> String {
    let plain = value.to_string();
    if plain.len() > MAX_PLAIN_VALUE_LEN {
        format!("{value:e}")
    } else {
        plain
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '.' | '+' | '-' => c,
            _ => '~',
        })
        .collect()
}

impl<T: fmt::Display> fmt::Display for ParameterSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl<T: PartialEq> PartialEq for ParameterSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.assignments.len() == other.assignments.len()
            && self
                .assignments
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl<T: Serialize> Serialize for ParameterSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.assignments.len()))?;
        for (name, value) in &self.assignments {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Lazy iterator over every parameter set of a schema.
///
/// Odometer order: the last-declared parameter varies fastest. Cloning the
/// iterator restarts from the clone's position; the schema is only borrowed.
#[derive(Debug, Clone)]
pub struct ParameterSets<'a, T> {
    schema: &'a Schema<T>,
    indices: GridIndices,
    remaining: usize,
}

impl<'a, T> ParameterSets<'a, T> {
    pub(crate) fn new(schema: &'a Schema<T>) -> Self {
        Self {
            schema,
            indices: GridIndices::new(schema.shape()),
            remaining: schema.total_points(),
        }
    }

    /// The schema being expanded
    pub fn schema(&self) -> &'a Schema<T> {
        self.schema
    }
}

impl<T: Clone> Iterator for ParameterSets<'_, T> {
    type Item = ParameterSet<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.indices.next()?;
        self.remaining = self.remaining.saturating_sub(1);

        let assignments = self
            .schema
            .parameters()
            .iter()
            .zip(&indices)
            .map(|(param, &i)| (param.name.clone(), param.values[i].clone()))
            .collect();

        Some(ParameterSet {
            assignments,
            indices,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for ParameterSets<'_, T> {}

impl<T: Clone> FusedIterator for ParameterSets<'_, T> {}
