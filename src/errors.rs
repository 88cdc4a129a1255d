use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Cell codec failures
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Command-line input that cannot be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Base64 decoding
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Hex decoding
    #[error("Hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Which resource of a cell ran out or overflowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellResource {
    Bits,
    Refs,
}

impl std::fmt::Display for CellResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellResource::Bits => write!(f, "bits"),
            CellResource::Refs => write!(f, "refs"),
        }
    }
}

/// Cell codec error types
///
/// Every variant reflects malformed input or a programming error; none are
/// transient, so callers should never retry on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Value does not fit the declared width
    #[error("Value {value} does not fit in {bits} bits")]
    Range { value: String, bits: usize },

    /// Append would exceed the 1023-bit / 4-ref cell limits
    #[error("Cell overflow: {requested} {resource} requested, {available} available")]
    CellOverflow {
        resource: CellResource,
        requested: usize,
        available: usize,
    },

    /// Read past the end of a slice
    #[error("Cell underflow: {requested} {resource} requested, {remaining} remaining")]
    Underflow {
        resource: CellResource,
        requested: usize,
        remaining: usize,
    },

    #[error("Malformed dictionary: {0}")]
    MalformedDictionary(String),

    #[error("Malformed snake string: {0}")]
    MalformedSnake(String),

    #[error(
        "Expected on-chain content marker 0x00, found {}",
        .found.map(|tag| format!("0x{:02x}", tag)).unwrap_or_else(|| "an empty cell".to_string())
    )]
    ExpectedOnchainMarker { found: Option<u8> },

    #[error("Unsupported metadata value format 0x{found:02x}, only snake (0x00) is supported")]
    UnsupportedValueFormat { found: u8 },

    #[error("Unsupported on-chain metadata key: {0}")]
    UnsupportedKey(String),

    #[error("Invalid text in field {field}: {reason}")]
    InvalidText { field: &'static str, reason: String },

    #[error("Unsupported message type: {0}")]
    UnsupportedMessageType(String),

    #[error("Unknown opcode {opcode} (0x{opcode:08x}) for {family} messages")]
    UnknownOpcode { family: &'static str, opcode: u32 },

    #[error("Unexpected opcode 0x{found:08x}, expected 0x{expected:08x}")]
    UnexpectedOpcode { expected: u32, found: u32 },

    #[error("Missing address: {0} must not be addr_none")]
    MissingAddress(&'static str),

    #[error("Unsupported address encoding: {0}")]
    UnsupportedAddress(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid bag of cells: {0}")]
    InvalidBoc(String),

    #[error("Bag of cells checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    BocChecksumMismatch { stored: u32, computed: u32 },
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
