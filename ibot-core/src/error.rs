use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Empty content")]
    EmptyContent,
}

pub type Result<T> = std::result::Result<T, BotError>;
