use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::abi::{Abi, Detokenize, Tokenize};
use ethers::contract::Contract;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::LocalWallet;
use ethers::types::{Address, TxHash, H256, U256};
use tracing::debug;

use crate::client::with_timeout;
use crate::error::ChainError;
use crate::format::bytes32_to_string;
use crate::wallet::SessionWallet;

/// Provider wrapped with a local signer, used for state-changing calls.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// One entry of the ballot's `proposals` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub index: usize,
    pub name: String,
    pub vote_count: U256,
}

// ---------------------------------------------------------------------------
// Binding traits
// ---------------------------------------------------------------------------

/// ERC20Votes token bound to an address, an ABI and (optionally) a signer.
#[async_trait]
pub trait TokenBinding: Send + Sync {
    fn address(&self) -> Address;

    async fn balance_of(&self, account: Address) -> Result<U256, ChainError>;

    async fn get_votes(&self, account: Address) -> Result<U256, ChainError>;

    /// Send `delegate(delegatee)`; returns once the node accepted the transaction.
    async fn delegate(&self, delegatee: Address) -> Result<TxHash, ChainError>;
}

/// Tokenized ballot bound to an address, an ABI and (optionally) a signer.
#[async_trait]
pub trait BallotBinding: Send + Sync {
    fn address(&self) -> Address;

    /// Send `vote(proposal, amount)`.
    async fn vote(&self, proposal: U256, amount: U256) -> Result<TxHash, ChainError>;

    async fn winner_name(&self) -> Result<String, ChainError>;

    async fn winning_proposal(&self) -> Result<U256, ChainError>;

    async fn target_block(&self) -> Result<U256, ChainError>;

    async fn proposal(&self, index: usize) -> Result<Proposal, ChainError>;

    async fn voting_power(&self, account: Address) -> Result<U256, ChainError>;
}

// ---------------------------------------------------------------------------
// ethers-backed bindings
// ---------------------------------------------------------------------------

/// Reader over the plain provider plus an optional signing writer.
struct ContractHandle {
    address: Address,
    reader: Contract<Provider<Http>>,
    writer: Option<Contract<SignerClient>>,
    timeout: Duration,
}

impl ContractHandle {
    fn new(
        address: Address,
        abi: &Abi,
        provider: &Provider<Http>,
        signer: Option<&SessionWallet>,
        timeout: Duration,
    ) -> Self {
        let reader = Contract::new(address, abi.clone(), Arc::new(provider.clone()));
        let writer = signer.map(|wallet| {
            let client = SignerMiddleware::new(provider.clone(), wallet.signer().clone());
            Contract::new(address, abi.clone(), Arc::new(client))
        });
        Self {
            address,
            reader,
            writer,
            timeout,
        }
    }

    async fn read<T, D>(&self, method: &str, args: T) -> Result<D, ChainError>
    where
        T: Tokenize,
        D: Detokenize + Send + Sync,
    {
        let call = self
            .reader
            .method::<T, D>(method, args)
            .map_err(|e| ChainError::Abi(format!("{method}: {e}")))?;
        with_timeout(self.timeout, method, call.call())
            .await?
            .map_err(|e| ChainError::contract(method, e))
    }

    async fn send<T: Tokenize>(&self, method: &str, args: T) -> Result<TxHash, ChainError> {
        let writer = self
            .writer
            .as_ref()
            .ok_or_else(|| ChainError::NoSigner(method.to_string()))?;
        let call = writer
            .method::<T, ()>(method, args)
            .map_err(|e| ChainError::Abi(format!("{method}: {e}")))?;
        let pending = with_timeout(self.timeout, method, call.send())
            .await?
            .map_err(|e| ChainError::contract(method, e))?;
        let tx_hash = pending.tx_hash();
        debug!(contract = ?self.address, method, tx = ?tx_hash, "transaction sent");
        Ok(tx_hash)
    }
}

/// Token binding backed by an HTTP provider.
pub struct EthersToken {
    handle: ContractHandle,
}

impl EthersToken {
    pub fn new(
        address: Address,
        abi: &Abi,
        provider: &Provider<Http>,
        signer: Option<&SessionWallet>,
        timeout: Duration,
    ) -> Self {
        Self {
            handle: ContractHandle::new(address, abi, provider, signer, timeout),
        }
    }
}

#[async_trait]
impl TokenBinding for EthersToken {
    fn address(&self) -> Address {
        self.handle.address
    }

    async fn balance_of(&self, account: Address) -> Result<U256, ChainError> {
        self.handle.read("balanceOf", account).await
    }

    async fn get_votes(&self, account: Address) -> Result<U256, ChainError> {
        self.handle.read("getVotes", account).await
    }

    async fn delegate(&self, delegatee: Address) -> Result<TxHash, ChainError> {
        self.handle.send("delegate", delegatee).await
    }
}

/// Ballot binding backed by an HTTP provider.
pub struct EthersBallot {
    handle: ContractHandle,
}

impl EthersBallot {
    pub fn new(
        address: Address,
        abi: &Abi,
        provider: &Provider<Http>,
        signer: Option<&SessionWallet>,
        timeout: Duration,
    ) -> Self {
        Self {
            handle: ContractHandle::new(address, abi, provider, signer, timeout),
        }
    }
}

#[async_trait]
impl BallotBinding for EthersBallot {
    fn address(&self) -> Address {
        self.handle.address
    }

    async fn vote(&self, proposal: U256, amount: U256) -> Result<TxHash, ChainError> {
        self.handle.send("vote", (proposal, amount)).await
    }

    async fn winner_name(&self) -> Result<String, ChainError> {
        let raw: H256 = self.handle.read("winnerName", ()).await?;
        bytes32_to_string(raw)
    }

    async fn winning_proposal(&self) -> Result<U256, ChainError> {
        self.handle.read("winningProposal", ()).await
    }

    async fn target_block(&self) -> Result<U256, ChainError> {
        self.handle.read("targetBlock", ()).await
    }

    async fn proposal(&self, index: usize) -> Result<Proposal, ChainError> {
        let (name, vote_count): (H256, U256) =
            self.handle.read("proposals", U256::from(index)).await?;
        Ok(Proposal {
            index,
            name: bytes32_to_string(name)?,
            vote_count,
        })
    }

    async fn voting_power(&self, account: Address) -> Result<U256, ChainError> {
        self.handle.read("votingPower", account).await
    }
}
