use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("ruloc: Transform from {source} to {target} is unavailable")]
    TransformUnavailable { target: String, source: String },
    #[error("ruloc: No transform history for frame pair {source} -> {target}")]
    UnknownFramePair { target: String, source: String },
    #[error("ruloc: Transform from {source} to {target} is not available at the requested time")]
    TransformTimeNotAvailable { target: String, source: String },
    #[error("ruloc: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}
