use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("word list is empty")]
    EmptyWordList,
}
