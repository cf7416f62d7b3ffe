use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("key not found.")]
    NotFound,
    #[error("duplicate key.")]
    Duplicate,
    #[error("Invalid Configuration: {0}")]
    Config(String),
}

pub type IResult<T> = std::result::Result<T, Error>;
