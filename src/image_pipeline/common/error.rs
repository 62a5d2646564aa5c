use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Singular matrix: {0} is not invertible")]
    SingularMatrix(&'static str),

    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unable to read image file \"{path}\":\n{}", .reasons.join("\n"))]
    UnrecognizedImage { path: String, reasons: Vec<String> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
