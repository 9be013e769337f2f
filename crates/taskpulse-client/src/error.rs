//! Client error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid origin '{0}': expected http://host[:port] or https://host[:port]")]
    InvalidOrigin(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
