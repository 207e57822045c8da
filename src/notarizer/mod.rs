//! Notarization and verification engines.
//!
//! # Notarization
//!
//! 1. Read protocol parameters from the node
//! 2. Load the seed phrase and derive the wallet identity
//! 3. Fetch the wallet's unspent outputs ([`UtxoFetcher`])
//! 4. Keep the spendable ones ([`OutputFilter`])
//! 5. Build and sign the transaction ([`TransactionAssembler`])
//! 6. Attach it to the tips and submit it ([`BlockSubmitter`])
//!
//! Nothing is cached between requests: every call re-reads the seed phrase,
//! re-derives the wallet and re-queries the ledger.
//!
//! # Verification
//!
//! [`Verifier`] resolves an output id and compares its metadata with the
//! claimed hash.

mod assembler;
pub mod deposit;
mod fetcher;
mod filter;
mod submitter;
mod verifier;

pub use assembler::TransactionAssembler;
pub use fetcher::UtxoFetcher;
pub use filter::{is_eligible, EligibleOutput, OutputFilter};
pub use submitter::BlockSubmitter;
pub use verifier::Verifier;

use crate::client::{HttpIndexerProvider, HttpNodeClient, IndexerProvider, NodeClient};
use crate::config::{NotarizerConfig, WalletConfig};
use crate::error::{Result, Stage, StageError, StageExt};
use crate::ledger::BlockId;
use crate::wallet::{load_seed_phrase, WalletIdentity};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info_span, Instrument, Span};

/// Default deadline for the indexer to become available.
pub const DEFAULT_INDEXER_AVAILABLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for one indexer query.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Request-scoped orchestration of the engines.
///
/// Safe to share across concurrent requests.
pub struct Notarizer {
    node: Arc<dyn NodeClient>,
    wallet: WalletConfig,
    fetcher: UtxoFetcher,
    filter: OutputFilter,
    assembler: TransactionAssembler,
    submitter: BlockSubmitter,
    verifier: Verifier,
    span: Span,
}

impl Notarizer {
    /// Anchor `hash` in a new output and return the id of the block
    /// carrying the transaction.
    ///
    /// # Errors
    ///
    /// Returns the first failure, tagged with the stage it occurred in.
    pub async fn notarize(&self, hash: &str) -> std::result::Result<BlockId, StageError> {
        async {
            debug!("Notarization Hash: {hash}");

            let params = self
                .node
                .protocol_parameters()
                .await
                .stage(Stage::ProtocolParameters)?;

            let words = load_seed_phrase(&self.wallet.mnemonic_env).stage(Stage::LoadSeedPhrase)?;
            debug!("Mnemonic loaded successfully");

            let identity =
                WalletIdentity::derive(&params, &words, &self.wallet).stage(Stage::PrepareWallet)?;

            let unspent = self
                .fetcher
                .fetch(&identity.bech32_address)
                .await
                .stage(Stage::FetchOutputs)?;
            let eligible = self.filter.filter(unspent);

            let transaction = self
                .assembler
                .assemble(&params, &eligible, &identity, hash)
                .stage(Stage::PrepareTransaction)?;

            self.submitter
                .submit(params.version, transaction)
                .await
                .stage(Stage::SendBlock)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Whether the output at `output_id` carries `hash`.
    ///
    /// # Errors
    ///
    /// Fails for a malformed output id or a non-basic output. A missing
    /// output is `Ok(false)`.
    pub async fn verify(&self, hash: &str, output_id: &str) -> std::result::Result<bool, StageError> {
        self.verifier
            .verify(hash, output_id)
            .instrument(self.span.clone())
            .await
            .map_err(|source| {
                let stage = match &source {
                    crate::Error::InvalidOutputId(_) => Stage::ParseOutputId,
                    _ => Stage::InspectOutput,
                };
                StageError { stage, source }
            })
    }
}

/// Builds a [`Notarizer`], handing each component its own child span.
pub struct NotarizerBuilder {
    node: Arc<dyn NodeClient>,
    indexer: Arc<dyn IndexerProvider>,
    wallet: WalletConfig,
    indexer_available_timeout: Duration,
    request_timeout: Duration,
    span: Span,
}

impl NotarizerBuilder {
    /// Start from the node and indexer collaborators.
    #[must_use]
    pub fn new(node: Arc<dyn NodeClient>, indexer: Arc<dyn IndexerProvider>) -> Self {
        Self {
            node,
            indexer,
            wallet: WalletConfig::default(),
            indexer_available_timeout: DEFAULT_INDEXER_AVAILABLE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            span: Span::none(),
        }
    }

    /// HTTP clients and settings taken from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &NotarizerConfig) -> Result<Self> {
        let node = HttpNodeClient::new(&config.node.url, config.node.request_timeout())?;
        let indexer = HttpIndexerProvider::new(node.clone());
        Ok(Self::new(Arc::new(node), Arc::new(indexer))
            .wallet(config.wallet.clone())
            .indexer_available_timeout(config.node.indexer_available_timeout())
            .request_timeout(config.node.request_timeout()))
    }

    /// Wallet settings.
    #[must_use]
    pub fn wallet(mut self, wallet: WalletConfig) -> Self {
        self.wallet = wallet;
        self
    }

    /// Deadline for the indexer to become available.
    #[must_use]
    pub fn indexer_available_timeout(mut self, timeout: Duration) -> Self {
        self.indexer_available_timeout = timeout;
        self
    }

    /// Deadline for one indexer query.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Parent span of everything the notarizer logs.
    #[must_use]
    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Assemble the notarizer.
    #[must_use]
    pub fn build(self) -> Notarizer {
        let parent = &self.span;
        Notarizer {
            fetcher: UtxoFetcher::new(
                self.indexer,
                self.indexer_available_timeout,
                self.request_timeout,
                info_span!(parent: parent, "fetcher"),
            ),
            filter: OutputFilter::new(info_span!(parent: parent, "filter")),
            assembler: TransactionAssembler::new(info_span!(parent: parent, "assembler")),
            submitter: BlockSubmitter::new(
                self.node.clone(),
                info_span!(parent: parent, "submitter"),
            ),
            verifier: Verifier::new(self.node.clone(), info_span!(parent: parent, "verifier")),
            node: self.node,
            wallet: self.wallet,
            span: self.span.clone(),
        }
    }
}
