//! Direction-field generation and direction assignments.
//!
//! The set of direction inputs is a pure function of the tripline count:
//!
//! | triplines | fields                                   |
//! |-----------|------------------------------------------|
//! | 0         | none (dependent sections hidden)         |
//! | 1         | `direction1`, `direction2`: the two ways traffic can cross the single line |
//! | N >= 2    | `direction1` .. `directionN`, one per line |
//!
//! Crossing the 1/2 boundary changes what each field means, so
//! [`DirectionForm`] discards entered values whenever the count changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One direction input to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionField {
    /// DOM id and form name, e.g. `direction2`.
    pub id: String,
    /// Key of this field in the [`DirectionAssignment`].
    pub key: u32,
    /// Human-readable label.
    pub label: String,
}

/// The assignment keys required for `count` triplines.
///
/// `{1, 2}` for a single tripline, `{1..=N}` otherwise.
#[must_use]
pub fn expected_keys(count: usize) -> Vec<u32> {
    let upper = match count {
        0 => 0,
        1 => 2,
        n => u32::try_from(n).unwrap_or(u32::MAX),
    };
    (1..=upper).collect()
}

/// Field descriptors for `count` triplines.
#[must_use]
pub fn direction_fields(count: usize) -> Vec<DirectionField> {
    let single = count == 1;
    expected_keys(count)
        .into_iter()
        .map(|key| DirectionField {
            id: format!("direction{key}"),
            key,
            label: if single {
                format!("Direction {key}")
            } else {
                format!("Direction for Tripline {key}")
            },
        })
        .collect()
}

/// Free-text direction labels keyed by 1-based index.
///
/// Serializes as a JSON object keyed by the stringified index:
/// `{"1": "northbound", "2": "southbound"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionAssignment(BTreeMap<u32, String>);

impl DirectionAssignment {
    /// Build an assignment from `(key, label)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, String)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    /// Label for `key`, if assigned.
    #[must_use]
    pub fn get(&self, key: u32) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    /// Assigned keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    /// Number of assigned keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that the key set matches `tripline_count` exactly and that
    /// no label is blank.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DirectionKeysMismatch`] if the key set differs
    /// from [`expected_keys`]; [`ValidationError::MissingDirection`] for
    /// the first blank label.
    pub fn validate_for(&self, tripline_count: usize) -> Result<(), ValidationError> {
        let expected = expected_keys(tripline_count);
        if !self.keys().eq(expected.iter().copied()) {
            return Err(ValidationError::DirectionKeysMismatch {
                expected: expected.len(),
                found: self.len(),
            });
        }
        if let Some((&key, _)) = self.0.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ValidationError::MissingDirection { key });
        }
        Ok(())
    }
}

/// Direction inputs and their current values.
///
/// Rebuilt from scratch whenever the tripline count changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectionForm {
    count: usize,
    fields: Vec<DirectionField>,
    values: Vec<String>,
}

impl DirectionForm {
    /// A form for `count` triplines with every value empty.
    #[must_use]
    pub fn for_count(count: usize) -> Self {
        let fields = direction_fields(count);
        let values = vec![String::new(); fields.len()];
        Self {
            count,
            fields,
            values,
        }
    }

    /// Follow a tripline-count change.
    ///
    /// Returns `true` if the form was rebuilt (values discarded). An
    /// unchanged count keeps entered values.
    pub fn sync(&mut self, count: usize) -> bool {
        if count == self.count {
            return false;
        }
        *self = Self::for_count(count);
        tracing::debug!(count, fields = self.fields.len(), "direction fields rebuilt");
        true
    }

    /// Tripline count the fields were built for.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Whether the direction section should be shown at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.fields.is_empty()
    }

    /// The field descriptors, in display order.
    #[must_use]
    pub fn fields(&self) -> &[DirectionField] {
        &self.fields
    }

    /// Current value of the field with DOM id `id`.
    #[must_use]
    pub fn value(&self, id: &str) -> Option<&str> {
        self.position(id).map(|i| self.values[i].as_str())
    }

    /// Store a typed value. Unknown ids are ignored and reported as `false`.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.position(id) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    /// Collect the entered values into a validated assignment.
    ///
    /// # Errors
    ///
    /// See [`DirectionAssignment::validate_for`].
    pub fn assignment(&self) -> Result<DirectionAssignment, ValidationError> {
        let assignment = DirectionAssignment::from_pairs(
            self.fields
                .iter()
                .zip(&self.values)
                .map(|(field, value)| (field.key, value.trim().to_owned())),
        );
        assignment.validate_for(self.count)?;
        Ok(assignment)
    }

    /// Entered values without validation; blank fields are left out.
    #[must_use]
    pub fn draft(&self) -> DirectionAssignment {
        DirectionAssignment::from_pairs(
            self.fields
                .iter()
                .zip(&self.values)
                .map(|(field, value)| (field.key, value.trim()))
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key, value.to_owned())),
        )
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }
}
