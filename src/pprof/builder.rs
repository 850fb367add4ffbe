//! Build a profile from aggregated stack records.
//!
//! Frames are deduplicated into shared entries: locations by program
//! counter, functions by `(file, name)`. The indexes live in the builder, so
//! every build starts from empty tables.

use super::profile::{Function, Line, Location, Profile, Sample};
use crate::aggregator::StackRecords;
use crate::trace::Frame;
use log::debug;
use std::collections::HashMap;

/// Accumulates samples into one [`Profile`]
///
/// **Public** - use [`build_profile`] for the common case
#[derive(Debug)]
pub struct ProfileBuilder<'a> {
    profile: Profile,
    functions: HashMap<(&'a str, &'a str), u64>,
    locations: HashMap<u64, u64>,
}

impl Default for ProfileBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ProfileBuilder<'a> {
    pub fn new() -> Self {
        Self {
            profile: Profile::new(),
            functions: HashMap::new(),
            locations: HashMap::new(),
        }
    }

    /// Append one sample for `stack` with values `[count, delay]`
    pub fn add_sample(&mut self, stack: &'a [Frame], count: u64, delay: i64) {
        let location_id = stack.iter().map(|frame| self.location_id(frame)).collect();

        self.profile.sample.push(Sample {
            value: vec![i64::try_from(count).unwrap_or(i64::MAX), delay],
            location_id,
        });
    }

    /// Append one sample per record, in ascending stack identity order
    pub fn add_records(&mut self, records: &StackRecords<'a>) {
        for (_, rec) in records {
            self.add_sample(rec.stack, rec.count, rec.delay);
        }
    }

    pub fn finish(self) -> Profile {
        debug!(
            "Built profile: {} functions, {} locations, {} samples",
            self.profile.function.len(),
            self.profile.location.len(),
            self.profile.sample.len()
        );
        self.profile
    }

    /// Location for `frame.pc`, created on first sight
    fn location_id(&mut self, frame: &'a Frame) -> u64 {
        if let Some(id) = self.locations.get(&frame.pc) {
            return *id;
        }

        let function_id = self.function_id(frame);
        let id = self.profile.location.len() as u64 + 1;
        self.profile.location.push(Location {
            id,
            address: frame.pc,
            line: vec![Line {
                function_id,
                line: frame.line,
            }],
        });
        self.locations.insert(frame.pc, id);
        id
    }

    /// Function for `(frame.file, frame.func)`, created on first sight
    fn function_id(&mut self, frame: &'a Frame) -> u64 {
        let key = (frame.file.as_str(), frame.func.as_str());
        if let Some(id) = self.functions.get(&key) {
            return *id;
        }

        let id = self.profile.function.len() as u64 + 1;
        self.profile.function.push(Function {
            id,
            name: frame.func.clone(),
            system_name: frame.func.clone(),
            filename: frame.file.clone(),
        });
        self.functions.insert(key, id);
        id
    }
}

/// Build a profile with one sample per record
///
/// **Public** - main entry point for profile construction
///
/// Never fails; an empty mapping yields a profile with only the header.
pub fn build_profile(records: &StackRecords<'_>) -> Profile {
    let mut builder = ProfileBuilder::new();
    builder.add_records(records);
    builder.finish()
}
