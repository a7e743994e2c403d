use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("travel time data unavailable: {0}")]
    DataUnavailable(String),
    #[error("pickup and delivery collapse onto node {node}: {context}")]
    DuplicateCoordinate { node: usize, context: String },
    #[error("no feasible assignment after {attempts} attempts, last fleet size {vehicles}")]
    Exhausted { vehicles: usize, attempts: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::DataUnavailable(message.into())
    }
}
