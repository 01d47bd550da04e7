use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The store that fed this subscription has been dropped.
    #[error("state store closed, context: {context}")]
    StoreClosed { context: &'static str },
}

impl Error {
    pub fn store_closed(context: &'static str) -> Self {
        Self::StoreClosed { context }
    }
}
