//! Declarative parameter schemas.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{InterchangeError, SchemaError};

use super::ParameterSets;

/// Name of the mesh seed parameter in the interchange format.
pub const GLOBAL_SEED: &str = "global_seed";

/// Default seed candidates: successive halvings for a mesh convergence study.
pub const DEFAULT_GLOBAL_SEED: [f64; 4] = [1.0, 0.5, 0.25, 0.125];

/// One named parameter and its ordered candidate values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepParameter<T> {
    pub name: String,
    pub values: Vec<T>,
}

impl<T> SweepParameter<T> {
    /// Number of candidate values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered mapping from parameter name to candidate values.
///
/// Declaration order matters: it fixes the expansion order and the
/// interchange key order. Two schemas holding the same values in a different
/// order are not equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema<T = f64> {
    parameters: Vec<SweepParameter<T>>,
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self {
            parameters: Vec::new(),
        }
    }
}

/// Build the mesh seed schema `{"global_seed": [...]}` from `global_seed`.
///
/// The values are copied; the schema does not alias the caller's buffer.
/// Nothing is validated here. Untrusted values go through
/// [`validate_positive_float`](crate::validate_positive_float) first.
///
/// # Example
/// ```
/// use seedsweep_core::sweep::{build_schema, GLOBAL_SEED};
///
/// let schema = build_schema(&[2.0, 1.0]);
/// assert_eq!(schema.get(GLOBAL_SEED), Some(&[2.0, 1.0][..]));
/// ```
pub fn build_schema(global_seed: &[f64]) -> Schema {
    Schema::new().parameter(GLOBAL_SEED, global_seed)
}

/// [`build_schema`] over [`DEFAULT_GLOBAL_SEED`].
pub fn build_default_schema() -> Schema {
    build_schema(&DEFAULT_GLOBAL_SEED)
}

impl<T> Schema<T> {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter without checking it.
    ///
    /// Use [`Schema::try_parameter`] when names come from outside the program.
    pub fn parameter(mut self, name: impl Into<String>, values: &[T]) -> Self
    where
        T: Clone,
    {
        self.parameters.push(SweepParameter {
            name: name.into(),
            values: values.to_vec(),
        });
        self
    }

    /// Append a parameter, rejecting empty and already-declared names.
    pub fn try_parameter(
        mut self,
        name: impl Into<String>,
        values: Vec<T>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if self.get(&name).is_some() {
            return Err(SchemaError::DuplicateParameter(name));
        }
        self.parameters.push(SweepParameter { name, values });
        Ok(self)
    }

    /// Parameters in declaration order
    pub fn parameters(&self) -> &[SweepParameter<T>] {
        &self.parameters
    }

    /// Candidate values for `name`
    pub fn get(&self, name: &str) -> Option<&[T]> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.values.as_slice())
    }

    /// Position of `name` in declaration order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// Number of parameters (grid dimensions)
    pub fn ndim(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Candidate counts per parameter, in declaration order
    pub fn shape(&self) -> Vec<usize> {
        self.parameters.iter().map(SweepParameter::len).collect()
    }

    /// Number of parameter sets the schema expands to
    pub fn total_points(&self) -> usize {
        if self.parameters.is_empty() {
            return 0;
        }
        self.parameters.iter().map(SweepParameter::len).product()
    }
}

impl<T: PartialEq> Schema<T> {
    /// Check that the schema can be expanded.
    ///
    /// A schema with no parameters, a parameter with no candidates, or a
    /// repeated candidate would otherwise produce zero or duplicate sets.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.parameters.is_empty() {
            return Err(SchemaError::EmptySchema);
        }
        for (i, param) in self.parameters.iter().enumerate() {
            if param.name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if self.parameters[..i].iter().any(|p| p.name == param.name) {
                return Err(SchemaError::DuplicateParameter(param.name.clone()));
            }
            if param.values.is_empty() {
                return Err(SchemaError::EmptyDomain(param.name.clone()));
            }
            let repeated = param
                .values
                .iter()
                .enumerate()
                .any(|(j, v)| param.values[..j].contains(v));
            if repeated {
                return Err(SchemaError::DuplicateValue(param.name.clone()));
            }
        }
        Ok(())
    }

    /// Enumerate the Cartesian product of all candidates.
    ///
    /// The result is lazy and restartable: calling `expand` again, or cloning
    /// the iterator before consuming it, yields the same sequence.
    pub fn expand(&self) -> Result<ParameterSets<'_, T>, SchemaError> {
        self.validate()?;
        Ok(ParameterSets::new(self))
    }
}

impl<T: Serialize> Schema<T> {
    pub fn to_json(&self) -> Result<String, InterchangeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, InterchangeError> {
        Ok(serde_saphyr::to_string(self)?)
    }
}

impl<T: DeserializeOwned + PartialEq> Schema<T> {
    /// Parse and validate a JSON schema
    pub fn from_json(json: &str) -> Result<Self, InterchangeError> {
        let schema: Self = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Parse and validate a YAML schema
    pub fn from_yaml(yaml: &str) -> Result<Self, InterchangeError> {
        let schema: Self = serde_saphyr::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }
}

// Serialized as a plain mapping so the interchange form is
// `{"global_seed": [1.0, 0.5]}`, keyed in declaration order.
impl<T: Serialize> Serialize for Schema<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.parameters.len()))?;
        for param in &self.parameters {
            map.serialize_entry(&param.name, &param.values)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Schema<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SchemaVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for SchemaVisitor<T> {
            type Value = Schema<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map from parameter name to a list of values")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut schema = Schema::new();
                while let Some((name, values)) = map.next_entry::<String, Vec<T>>()? {
                    schema = schema.try_parameter(name, values).map_err(de::Error::custom)?;
                }
                Ok(schema)
            }
        }

        deserializer.deserialize_map(SchemaVisitor(PhantomData))
    }
}
