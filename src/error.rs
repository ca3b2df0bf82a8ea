use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The render pass could not obtain a drawable target. Recovered by
    /// skipping the frame.
    #[error("no drawable surface")]
    Unavailable,
    /// Zero-sized surfaces are treated as "not ready", never drawn into.
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}
