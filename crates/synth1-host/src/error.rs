use std::path::PathBuf;

use thiserror::Error;

use crate::layout::ChannelSet;
use crate::ParameterId;

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("unknown parameter `{0}`")]
    UnknownParameter(ParameterId),
    #[error("parameter index {0} is outside the layout")]
    UnknownIndex(usize),
    #[error("parameter `{id}` received value {value} outside of range {min}..={max}")]
    OutOfRange {
        id: ParameterId,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("parameter `{0}` received a non-finite value")]
    NotFinite(ParameterId),
    #[error("parameter `{id}` has an empty or non-finite range {min}..={max}")]
    InvalidRange { id: ParameterId, min: f32, max: f32 },
}

/// Reasons a host-proposed bus layout is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("main output must be mono or stereo, host offered {0}")]
    UnsupportedOutput(ChannelSet),
    #[error("main input {input} does not match main output {output}")]
    MismatchedInput {
        input: ChannelSet,
        output: ChannelSet,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid wrapper config")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("failed to encode wrapper config")]
    Encode(#[from] serde_json::Error),
    #[error("no user config directory is available on this system")]
    NoConfigDir,
}
