use thiserror::Error;

/// Validation failures for user-supplied market identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("market symbol must not be empty")]
    EmptySymbol,

    #[error("market symbol is {len} characters, maximum is {max}")]
    SymbolTooLong { len: usize, max: usize },

    #[error("market symbol must start with a letter, got '{ch}'")]
    SymbolInvalidStart { ch: char },

    #[error("market symbol contains invalid character '{ch}' at position {index}")]
    SymbolInvalidChar { ch: char, index: usize },
}
