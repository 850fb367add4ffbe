//! Encoding profiles to the pprof wire format and back.
//!
//! Encoded profiles are gzip-compressed protobuf, which is what the pprof
//! toolchain writes and expects. Decoding also accepts raw protobuf.

use super::profile::{Function, Line, Location, Profile, Sample, ValueType};
use super::proto;
use crate::utils::config::GZIP_MAGIC;
use crate::utils::error::ProfileError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use prost::Message;
use std::collections::HashMap;
use std::io::{Read, Write};

/// Deduplicating string table; index 0 is always `""`
#[derive(Debug)]
struct StringTable {
    strings: Vec<String>,
    index: HashMap<String, i64>,
}

impl StringTable {
    fn new() -> Self {
        let mut table = Self {
            strings: Vec::new(),
            index: HashMap::new(),
        };
        table.intern("");
        table
    }

    fn intern(&mut self, s: &str) -> i64 {
        if let Some(idx) = self.index.get(s) {
            return *idx;
        }
        let idx = self.strings.len() as i64;
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), idx);
        idx
    }

    fn value_type(&mut self, vt: &ValueType) -> proto::ValueType {
        proto::ValueType {
            r#type: self.intern(&vt.r#type),
            unit: self.intern(&vt.unit),
        }
    }

    fn into_strings(self) -> Vec<String> {
        self.strings
    }
}

/// Lower a profile into its wire messages
pub fn to_proto(profile: &Profile) -> proto::Profile {
    let mut strings = StringTable::new();

    let sample_type = profile
        .sample_type
        .iter()
        .map(|vt| strings.value_type(vt))
        .collect();
    let period_type = Some(strings.value_type(&profile.period_type));

    let function = profile
        .function
        .iter()
        .map(|f| proto::Function {
            id: f.id,
            name: strings.intern(&f.name),
            system_name: strings.intern(&f.system_name),
            filename: strings.intern(&f.filename),
            start_line: 0,
        })
        .collect();

    let location = profile
        .location
        .iter()
        .map(|l| proto::Location {
            id: l.id,
            mapping_id: 0,
            address: l.address,
            line: l
                .line
                .iter()
                .map(|line| proto::Line {
                    function_id: line.function_id,
                    line: line.line,
                })
                .collect(),
            is_folded: false,
        })
        .collect();

    let sample = profile
        .sample
        .iter()
        .map(|s| proto::Sample {
            location_id: s.location_id.clone(),
            value: s.value.clone(),
        })
        .collect();

    proto::Profile {
        sample_type,
        sample,
        location,
        function,
        string_table: strings.into_strings(),
        drop_frames: 0,
        keep_frames: 0,
        time_nanos: profile.time_nanos,
        duration_nanos: 0,
        period_type,
        period: profile.period,
        comment: Vec::new(),
        default_sample_type: 0,
    }
}

/// Raise wire messages back into a profile, resolving string indexes
///
/// # Errors
/// * `ProfileError::Invalid` - bad string table or out-of-range string index
pub fn from_proto(message: proto::Profile) -> Result<Profile, ProfileError> {
    let strings = message.string_table;
    if strings.first().map(String::as_str) != Some("") {
        return Err(ProfileError::Invalid(
            "string table must start with an empty string".to_string(),
        ));
    }

    let lookup = |idx: i64| -> Result<String, ProfileError> {
        usize::try_from(idx)
            .ok()
            .and_then(|idx| strings.get(idx))
            .cloned()
            .ok_or_else(|| ProfileError::Invalid(format!("string index {} out of range", idx)))
    };
    let value_type = |vt: &proto::ValueType| -> Result<ValueType, ProfileError> {
        Ok(ValueType::new(lookup(vt.r#type)?, lookup(vt.unit)?))
    };

    let sample_type = message
        .sample_type
        .iter()
        .map(value_type)
        .collect::<Result<Vec<_>, _>>()?;
    let period_type = match &message.period_type {
        Some(vt) => value_type(vt)?,
        None => ValueType::new("", ""),
    };

    let function = message
        .function
        .iter()
        .map(|f| -> Result<Function, ProfileError> {
            Ok(Function {
                id: f.id,
                name: lookup(f.name)?,
                system_name: lookup(f.system_name)?,
                filename: lookup(f.filename)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let location = message
        .location
        .into_iter()
        .map(|l| Location {
            id: l.id,
            address: l.address,
            line: l
                .line
                .into_iter()
                .map(|line| Line {
                    function_id: line.function_id,
                    line: line.line,
                })
                .collect(),
        })
        .collect();

    let sample = message
        .sample
        .into_iter()
        .map(|s| Sample {
            value: s.value,
            location_id: s.location_id,
        })
        .collect();

    Ok(Profile {
        period_type,
        period: message.period,
        sample_type,
        time_nanos: message.time_nanos,
        function,
        location,
        sample,
    })
}

impl Profile {
    /// Write the gzip-compressed wire form to `writer`
    pub fn write<W: Write>(&self, writer: W) -> Result<(), ProfileError> {
        let raw = to_proto(self).encode_to_vec();

        let mut encoder = GzEncoder::new(writer, Compression::default());
        encoder.write_all(&raw)?;
        encoder.finish()?;

        debug!("Encoded profile: {} bytes of protobuf", raw.len());
        Ok(())
    }

    /// Encode to the gzip-compressed wire form
    pub fn encode(&self) -> Result<Vec<u8>, ProfileError> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }

    /// Decode a profile from gzip-compressed or raw protobuf bytes
    ///
    /// # Errors
    /// * `ProfileError::Io` - corrupt gzip stream
    /// * `ProfileError::Decode` - not a protobuf profile
    /// * `ProfileError::Invalid` - decoded, but structurally broken
    pub fn decode(bytes: &[u8]) -> Result<Profile, ProfileError> {
        let message = if bytes.starts_with(&GZIP_MAGIC) {
            let mut raw = Vec::new();
            GzDecoder::new(bytes).read_to_end(&mut raw)?;
            proto::Profile::decode(raw.as_slice())?
        } else {
            proto::Profile::decode(bytes)?
        };

        let profile = from_proto(message)?;
        profile.check_valid()?;
        Ok(profile)
    }
}
