use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectralError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Operator {0} has no known Fourier dual")]
    NoDual(&'static str),
}

pub type Result<T> = std::result::Result<T, SpectralError>;
