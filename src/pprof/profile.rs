//! In-memory profile in the pprof data model.
//!
//! Functions and locations are referenced by ID. IDs handed out by
//! [`ProfileBuilder`](super::builder::ProfileBuilder) are dense, start at 1
//! and only mean something inside the profile that owns them.

use crate::trace::Frame;
use crate::utils::config::{PERIOD, PERIOD_TYPE, SAMPLE_TYPES};
use crate::utils::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A `(type, unit)` descriptor, e.g. `delay` / `nanoseconds`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueType {
    #[serde(rename = "type")]
    pub r#type: String,
    pub unit: String,
}

impl ValueType {
    pub fn new(r#type: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Function {
    pub id: u64,
    pub name: String,
    pub system_name: String,
    pub filename: String,
}

/// Function + source line a location resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub function_id: u64,
    pub line: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub address: u64,
    pub line: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    /// One value per sample type: `[count, delay]`
    pub value: Vec<i64>,

    /// Stack as location IDs, top of stack first
    pub location_id: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub period_type: ValueType,
    pub period: i64,
    pub sample_type: Vec<ValueType>,

    /// Collection time, nanoseconds since the epoch; 0 when unset
    #[serde(default)]
    pub time_nanos: i64,

    pub function: Vec<Function>,
    pub location: Vec<Location>,
    pub sample: Vec<Sample>,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl Profile {
    /// Empty profile carrying the fixed trace header
    pub fn new() -> Self {
        Self {
            period_type: ValueType::new(PERIOD_TYPE.0, PERIOD_TYPE.1),
            period: PERIOD,
            sample_type: SAMPLE_TYPES
                .iter()
                .map(|(ty, unit)| ValueType::new(*ty, *unit))
                .collect(),
            time_nanos: 0,
            function: Vec::new(),
            location: Vec::new(),
            sample: Vec::new(),
        }
    }

    pub fn with_time_nanos(mut self, time_nanos: i64) -> Self {
        self.time_nanos = time_nanos;
        self
    }

    pub fn function(&self, id: u64) -> Option<&Function> {
        lookup(&self.function, id, |f| f.id)
    }

    pub fn location(&self, id: u64) -> Option<&Location> {
        lookup(&self.location, id, |l| l.id)
    }

    /// Reconstruct the frames of `sample`, top of stack first
    ///
    /// Returns `None` if any reference fails to resolve.
    pub fn frames(&self, sample: &Sample) -> Option<Vec<Frame>> {
        sample
            .location_id
            .iter()
            .map(|id| -> Option<Frame> {
                let loc = self.location(*id)?;
                match loc.line.first() {
                    Some(line) => {
                        let func = self.function(line.function_id)?;
                        Some(Frame::new(
                            loc.address,
                            func.filename.clone(),
                            func.name.clone(),
                            line.line,
                        ))
                    }
                    None => Some(Frame::new(loc.address, "", "", 0)),
                }
            })
            .collect()
    }

    /// Sum of one value column across all samples
    pub fn total(&self, column: usize) -> i64 {
        self.sample
            .iter()
            .filter_map(|s| s.value.get(column))
            .fold(0i64, |acc, v| acc.wrapping_add(*v))
    }

    /// Check the structural invariants of the profile
    ///
    /// # Errors
    /// * `ProfileError::Invalid` - duplicate or zero IDs, dangling references,
    ///   or samples whose value count differs from the sample types
    pub fn check_valid(&self) -> Result<(), ProfileError> {
        if self.sample_type.is_empty() && !self.sample.is_empty() {
            return Err(ProfileError::Invalid("missing sample type information".to_string()));
        }

        let function_ids = unique_ids(self.function.iter().map(|f| f.id), "function")?;
        let location_ids = unique_ids(self.location.iter().map(|l| l.id), "location")?;

        for loc in &self.location {
            for line in &loc.line {
                if !function_ids.contains(&line.function_id) {
                    return Err(ProfileError::Invalid(format!(
                        "location {} references unknown function {}",
                        loc.id, line.function_id
                    )));
                }
            }
        }

        for (idx, sample) in self.sample.iter().enumerate() {
            if sample.value.len() != self.sample_type.len() {
                return Err(ProfileError::Invalid(format!(
                    "sample {} has {} values, expected {}",
                    idx,
                    sample.value.len(),
                    self.sample_type.len()
                )));
            }
            if let Some(id) = sample.location_id.iter().find(|id| !location_ids.contains(*id)) {
                return Err(ProfileError::Invalid(format!(
                    "sample {} references unknown location {}",
                    idx, id
                )));
            }
        }

        Ok(())
    }
}

/// Find by ID, trying the dense position first
fn lookup<T>(items: &[T], id: u64, id_of: impl Fn(&T) -> u64) -> Option<&T> {
    let dense = usize::try_from(id)
        .ok()
        .and_then(|id| id.checked_sub(1))
        .and_then(|idx| items.get(idx))
        .filter(|item| id_of(*item) == id);

    dense.or_else(|| items.iter().find(|item| id_of(*item) == id))
}

fn unique_ids(ids: impl Iterator<Item = u64>, what: &str) -> Result<HashSet<u64>, ProfileError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id == 0 {
            return Err(ProfileError::Invalid(format!("{} with zero ID", what)));
        }
        if !seen.insert(id) {
            return Err(ProfileError::Invalid(format!("duplicate {} ID {}", what, id)));
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_profile() -> Profile {
        let mut profile = Profile::new();
        profile.function.push(Function {
            id: 1,
            name: "f".to_string(),
            system_name: "f".to_string(),
            filename: "a.go".to_string(),
        });
        profile.location.push(Location {
            id: 1,
            address: 0x10,
            line: vec![Line { function_id: 1, line: 10 }],
        });
        profile.sample.push(Sample {
            value: vec![2, 250],
            location_id: vec![1],
        });
        profile
    }

    #[test]
    fn test_new_profile_header() {
        let profile = Profile::new();
        assert_eq!(profile.period_type, ValueType::new("trace", "count"));
        assert_eq!(profile.period, 1);
        assert_eq!(
            profile.sample_type,
            vec![
                ValueType::new("contentions", "count"),
                ValueType::new("delay", "nanoseconds"),
            ]
        );
        assert!(profile.check_valid().is_ok());
    }

    #[test]
    fn test_frames() {
        let profile = small_profile();
        let frames = profile.frames(&profile.sample[0]).unwrap();
        assert_eq!(frames, vec![Frame::new(0x10, "a.go", "f", 10)]);
    }

    #[test]
    fn test_lookup_sparse_ids() {
        let mut profile = small_profile();
        profile.function[0].id = 42;
        profile.location[0].line[0].function_id = 42;
        assert_eq!(profile.function(42).map(|f| f.name.as_str()), Some("f"));
        assert!(profile.function(1).is_none());
    }

    #[test]
    fn test_check_valid_dangling_location() {
        let mut profile = small_profile();
        profile.sample[0].location_id.push(9);
        assert!(matches!(profile.check_valid(), Err(ProfileError::Invalid(_))));
    }

    #[test]
    fn test_check_valid_duplicate_function() {
        let mut profile = small_profile();
        let dup = profile.function[0].clone();
        profile.function.push(dup);
        assert!(profile.check_valid().is_err());
    }

    #[test]
    fn test_check_valid_value_arity() {
        let mut profile = small_profile();
        profile.sample[0].value.pop();
        assert!(profile.check_valid().is_err());
    }

    #[test]
    fn test_total() {
        let profile = small_profile();
        assert_eq!(profile.total(0), 2);
        assert_eq!(profile.total(1), 250);
        assert_eq!(profile.total(5), 0);
    }
}
