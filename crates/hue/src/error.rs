use thiserror::Error;

#[derive(Error, Debug)]
pub enum HueError {
    #[error("Light {0} not found")]
    LightNotFound(String),
}

pub type HueResult<T> = Result<T, HueError>;
