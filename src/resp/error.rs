use std::fmt::Display;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),
    #[error("response file inclusion cycle: {}", ChainProxy(chain))]
    Cycle { chain: Vec<String> },
    #[error("search path scope depth exceeds {limit}")]
    DepthExceeded { limit: usize },
}

struct ChainProxy<'a>(&'a Vec<String>);

impl Display for ChainProxy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut i = self.0.iter();

        if let Some(file) = i.next() {
            write!(f, "{file}")?;
        }

        for file in i {
            write!(f, " -> {file}")?;
        }

        Ok(())
    }
}
