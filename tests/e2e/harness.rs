//! In-memory ledger standing in for a node and its indexer.
//!
//! `TestLedger` validates submitted blocks the way a node would for the
//! transactions the notarizer produces: inputs must be unspent basic
//! outputs, every unlock must verify against the owner, amounts must
//! balance and each created output must cover its minimum deposit. Accepted
//! transactions are applied immediately.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use hash_notarizer::client::{Indexer, IndexerProvider, NodeClient, OutputPages, UnspentOutput};
use hash_notarizer::config::WalletConfig;
use hash_notarizer::ledger::{
    Address, BasicOutput, Block, BlockId, Output, OutputId, ProtocolParameters, RentStructure,
    Transaction, TransactionId, Unlock, UnlockCondition,
};
use hash_notarizer::{Error, Notarizer, NotarizerBuilder, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Seed phrase of the test wallet.
pub const PHRASE: &str = "pass improve fitness dress range orphan mass story tree meat evidence ostrich render shock ancient minute hip feature split rigid way figure wasp property";

/// Bech32 address the test wallet derives with default settings.
pub const WALLET_BECH32: &str = "tst1qzguhtxyuhgp4aklfkyd5ek3wtnta649pqvccrep95kesjf5kxuzvexrv6n";

/// Protocol parameters of the test network.
#[must_use]
pub fn test_params() -> ProtocolParameters {
    ProtocolParameters {
        version: 2,
        network_name: "private_tangle1".to_string(),
        bech32_hrp: "tst".to_string(),
        min_pow_score: 0,
        below_max_depth: 15,
        rent_structure: RentStructure {
            v_byte_cost: 500,
            v_byte_factor_data: 1,
            v_byte_factor_key: 10,
        },
        token_supply: 2_779_530_283_277_761,
    }
}

/// Raw address of the test wallet.
#[must_use]
pub fn wallet_address() -> Address {
    Address::try_from_bech32(WALLET_BECH32)
        .map(|(_, address)| address)
        .unwrap_or(Address::Ed25519([0; 32]))
}

#[derive(Default)]
struct LedgerState {
    outputs: HashMap<OutputId, Output>,
    order: Vec<OutputId>,
    spent: HashMap<OutputId, TransactionId>,
    blocks: Vec<Block>,
    tips: Vec<BlockId>,
    next_genesis: u8,
}

/// Shared in-memory ledger. Clones see the same state.
#[derive(Clone)]
pub struct TestLedger {
    state: Arc<RwLock<LedgerState>>,
    params: ProtocolParameters,
    page_size: usize,
}

impl Default for TestLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLedger {
    /// Empty ledger with one genesis tip.
    #[must_use]
    pub fn new() -> Self {
        let state = LedgerState {
            tips: vec![BlockId([0xee; 32])],
            ..Default::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            params: test_params(),
            page_size: 100,
        }
    }

    /// Serve indexer results in pages of `page_size`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Add an output from outside any transaction.
    pub fn insert(&self, output: Output) -> OutputId {
        let mut state = self.state.write();
        state.next_genesis = state.next_genesis.wrapping_add(1);
        let id = OutputId::new(TransactionId([state.next_genesis; 32]), 0);
        state.outputs.insert(id, output);
        state.order.push(id);
        id
    }

    /// Add a plain basic output of `amount` owned by `address`.
    pub fn fund(&self, address: Address, amount: u64) -> OutputId {
        self.insert(Output::Basic(BasicOutput::with_address(amount, address)))
    }

    /// Unspent outputs owned by `address`, in creation order.
    #[must_use]
    pub fn unspent_of(&self, address: &Address) -> Vec<(OutputId, Output)> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter(|id| !state.spent.contains_key(id))
            .filter_map(|id| state.outputs.get(id).map(|o| (*id, o.clone())))
            .filter(|(_, output)| owner_of(output).as_ref() == Some(address))
            .collect()
    }

    /// Sum of unspent deposits owned by `address`.
    #[must_use]
    pub fn balance(&self, address: &Address) -> u64 {
        self.unspent_of(address)
            .iter()
            .map(|(_, output)| output.amount())
            .sum()
    }

    /// Whether `id` has been consumed.
    #[must_use]
    pub fn is_spent(&self, id: &OutputId) -> bool {
        self.state.read().spent.contains_key(id)
    }

    /// Accepted blocks, oldest first.
    #[must_use]
    pub fn blocks(&self) -> Vec<Block> {
        self.state.read().blocks.clone()
    }

    fn validate(&self, state: &LedgerState, transaction: &Transaction) -> Result<()> {
        let essence = &transaction.essence;
        if essence.network_id != self.params.network_id() {
            return Err(reject("wrong network id"));
        }
        if essence.inputs.len() != transaction.unlocks.len() {
            return Err(reject("unlock count differs from input count"));
        }

        let message = essence.signing_message();
        let mut consumed = 0u64;
        for (index, input) in essence.inputs.iter().enumerate() {
            if state.spent.contains_key(&input.0) {
                return Err(reject("input already spent"));
            }
            let output = state
                .outputs
                .get(&input.0)
                .ok_or_else(|| reject("input does not exist"))?;
            let basic = output
                .as_basic()
                .ok_or_else(|| reject("input is not a basic output"))?;
            let owner = basic
                .sole_address()
                .ok_or_else(|| reject("input carries extra unlock conditions"))?;

            let signature = match transaction.unlocks[index] {
                Unlock::Signature(signature) => {
                    if !signature.verify(&message) {
                        return Err(reject("invalid signature"));
                    }
                    signature
                }
                Unlock::Reference(at) => match transaction.unlocks.get(usize::from(at)) {
                    Some(Unlock::Signature(signature)) if usize::from(at) < index => *signature,
                    _ => return Err(reject("dangling reference unlock")),
                },
            };
            if signature.address() != *owner {
                return Err(reject("unlock signed by a foreign key"));
            }
            consumed += basic.amount;
        }

        let mut created = 0u64;
        for output in &essence.outputs {
            if output.amount < self.params.rent_structure.min_deposit(output) {
                return Err(reject("output below minimum deposit"));
            }
            created += output.amount;
        }
        if consumed != created {
            return Err(reject("amounts do not balance"));
        }
        Ok(())
    }
}

fn reject(reason: &str) -> Error {
    Error::Node(format!("400 transaction rejected: {reason}"))
}

fn owner_of(output: &Output) -> Option<Address> {
    let conditions = match output {
        Output::Basic(o) => &o.unlock_conditions,
        Output::Alias(o) => &o.unlock_conditions,
        Output::Foundry(o) => &o.unlock_conditions,
        Output::Nft(o) => &o.unlock_conditions,
    };
    conditions.iter().find_map(|c| match c {
        UnlockCondition::Address(a) => Some(*a),
        _ => None,
    })
}

#[async_trait]
impl NodeClient for TestLedger {
    async fn protocol_parameters(&self) -> Result<ProtocolParameters> {
        Ok(self.params.clone())
    }

    async fn tips(&self) -> Result<Vec<BlockId>> {
        Ok(self.state.read().tips.clone())
    }

    async fn submit_block(&self, block: &Block) -> Result<BlockId> {
        let block_id = block.id()?;
        let mut state = self.state.write();
        self.validate(&state, &block.payload)?;

        let transaction_id = block.payload.id();
        for input in &block.payload.essence.inputs {
            state.spent.insert(input.0, transaction_id);
        }
        for (index, output) in block.payload.essence.outputs.iter().enumerate() {
            let index = u16::try_from(index).map_err(|_| reject("too many outputs"))?;
            let id = block.payload.output_id(index);
            state.outputs.insert(id, Output::Basic(output.clone()));
            state.order.push(id);
        }
        state.blocks.push(block.clone());
        state.tips = vec![block_id];
        Ok(block_id)
    }

    async fn output(&self, output_id: &OutputId) -> Result<Output> {
        self.state
            .read()
            .outputs
            .get(output_id)
            .cloned()
            .ok_or_else(|| Error::Node(format!("404 output {output_id} not found")))
    }
}

#[async_trait]
impl IndexerProvider for TestLedger {
    async fn indexer(&self) -> Result<Arc<dyn Indexer>> {
        Ok(Arc::new(self.clone()))
    }
}

impl Indexer for TestLedger {
    fn basic_outputs_by_address<'a>(&'a self, bech32: &'a str) -> OutputPages<'a> {
        let address = match Address::try_from_bech32(bech32) {
            Ok((_, address)) => address,
            Err(e) => return stream::once(async move { Err::<Vec<UnspentOutput>, Error>(e) }).boxed(),
        };
        let items: Vec<UnspentOutput> = self
            .unspent_of(&address)
            .into_iter()
            .filter(|(_, output)| output.as_basic().is_some())
            .map(|(output_id, output)| UnspentOutput {
                output_id,
                output,
                owner: address,
            })
            .collect();
        let pages: Vec<Result<Vec<UnspentOutput>>> = items
            .chunks(self.page_size)
            .map(|page| Ok(page.to_vec()))
            .collect();
        stream::iter(pages).boxed()
    }
}

/// Notarizer over `ledger` reading its seed phrase from `mnemonic_env`.
///
/// The variable is set to [`PHRASE`]; use a name unique to the test.
#[must_use]
pub fn notarizer(ledger: &TestLedger, mnemonic_env: &str) -> Notarizer {
    std::env::set_var(mnemonic_env, PHRASE);
    notarizer_without_seed(ledger, mnemonic_env)
}

/// Notarizer over `ledger` whose seed phrase variable is left untouched.
#[must_use]
pub fn notarizer_without_seed(ledger: &TestLedger, mnemonic_env: &str) -> Notarizer {
    let wallet = WalletConfig {
        mnemonic_env: mnemonic_env.to_string(),
        ..WalletConfig::default()
    };
    NotarizerBuilder::new(Arc::new(ledger.clone()), Arc::new(ledger.clone()))
        .wallet(wallet)
        .indexer_available_timeout(Duration::from_secs(2))
        .request_timeout(Duration::from_secs(2))
        .build()
}
