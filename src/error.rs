//! Error types for hash-notarizer.

use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the notarization and verification engines.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required environment variable is missing or empty.
    #[error("environment variable '{0}' not set")]
    EnvVarNotSet(String),

    /// Mnemonic parsing or key derivation failed.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// The indexer could not be acquired or a page could not be read.
    #[error("indexer error: {0}")]
    Indexer(String),

    /// An external call exceeded its deadline.
    #[error("{0} timed out")]
    Timeout(String),

    /// The eligible inputs cannot cover the notarization deposit.
    #[error("insufficient funds: available {available}, required {required}")]
    InsufficientFunds {
        /// Total deposit of the eligible inputs.
        available: u64,
        /// Deposit the notarization output requires.
        required: u64,
    },

    /// The transaction could not be assembled or signed.
    #[error("failed to build transaction: {0}")]
    TransactionBuild(String),

    /// Tip selection on the node failed. Nothing was sent.
    #[error("failed to fetch tips: {0}")]
    TipFetch(String),

    /// The block could not be built. Nothing was sent.
    #[error("failed to build block: {0}")]
    BlockBuild(String),

    /// Block submission failed. The block may have reached the node.
    #[error("failed to submit block: {0}")]
    Submit(String),

    /// An output identifier could not be parsed.
    #[error("invalid output id: {0}")]
    InvalidOutputId(String),

    /// A resolved output is not of the expected kind.
    #[error("unexpected output type: {0}")]
    UnexpectedOutputType(String),

    /// Any other node API failure.
    #[error("node error: {0}")]
    Node(String),

    /// Binary or JSON wire data could not be decoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request stage an error occurred in.
///
/// The HTTP layer reports only the stage to callers; the wrapped [`Error`]
/// is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading protocol parameters from the node.
    ProtocolParameters,
    /// Reading the seed phrase.
    LoadSeedPhrase,
    /// Deriving the wallet address and signer.
    PrepareWallet,
    /// Fetching unspent outputs from the indexer.
    FetchOutputs,
    /// Building and signing the transaction.
    PrepareTransaction,
    /// Fetching tips, building and submitting the block.
    SendBlock,
    /// Decoding a request body.
    DecodeRequest,
    /// Parsing an output id.
    ParseOutputId,
    /// Inspecting a resolved output.
    InspectOutput,
}

impl Stage {
    /// Caller-facing message for a failure in this stage.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::ProtocolParameters => "Error fetching protocol parameters",
            Self::LoadSeedPhrase => "Error loading mnemonic",
            Self::PrepareWallet => "Error preparing wallet",
            Self::FetchOutputs => "Error fetching outputs",
            Self::PrepareTransaction => "Error preparing transaction payload",
            Self::SendBlock => "Error preparing and sending block",
            Self::DecodeRequest => "Error decoding request body",
            Self::ParseOutputId => "Error converting outputID string",
            Self::InspectOutput => "Unexpected output type",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// An [`Error`] tagged with the stage that produced it.
#[derive(Debug, Error)]
#[error("{stage}: {source}")]
pub struct StageError {
    /// Failing stage.
    pub stage: Stage,
    /// Underlying error.
    #[source]
    pub source: Error,
}

/// Attach a [`Stage`] to a crate result.
pub trait StageExt<T> {
    /// Tag the error, if any, with `stage`.
    ///
    /// # Errors
    ///
    /// Returns the tagged error.
    fn stage(self, stage: Stage) -> std::result::Result<T, StageError>;
}

impl<T> StageExt<T> for Result<T> {
    fn stage(self, stage: Stage) -> std::result::Result<T, StageError> {
        self.map_err(|source| StageError { stage, source })
    }
}
