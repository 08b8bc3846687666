use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("cell data overflow: {0} bits exceed the 1023 bit limit")]
    BitOverflow(usize),

    #[error("cell reference overflow")]
    RefOverflow,

    #[error("cell depth overflow")]
    DepthOverflow,

    #[error("not enough bits: needed {needed}, remaining {remaining}")]
    NotEnoughBits { needed: usize, remaining: usize },

    #[error("not enough references")]
    NotEnoughRefs,

    #[error("value does not fit in {0} bits")]
    ValueTooWide(usize),

    #[error("dictionary key is wider than {0} bits")]
    KeyTooWide(usize),

    #[error("invalid dictionary label")]
    InvalidLabel,

    #[error("invalid address: {0}")]
    InvalidAddress(&'static str),

    #[error("unsupported exotic cell type {0}")]
    UnsupportedExotic(u8),

    #[error("invalid bag of cells: {0}")]
    InvalidBoc(&'static str),
}

pub type CellResult<T> = std::result::Result<T, CellError>;
