use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider};
use ethers::types::{Address, TxHash, U256};
use tracing::{debug, info};

use crate::abi::ContractArtifact;
use crate::contracts::{BallotBinding, EthersBallot, EthersToken, TokenBinding};
use crate::error::ChainError;
use crate::network::Network;
use crate::rpc_config::RpcConfig;
use crate::wallet::SessionWallet;

const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(180);

/// Everything the dashboard needs from the chain, behind one seam.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Network the provider is connected to.
    fn network(&self) -> Network;

    /// Native ether balance of `account`.
    async fn native_balance(&self, account: Address) -> Result<U256, ChainError>;

    /// Latest block number.
    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Wait for `tx_hash` to be mined. Returns the block it landed in, or
    /// `None` if the node dropped it.
    async fn wait_for_transaction(&self, tx_hash: TxHash) -> Result<Option<u64>, ChainError>;

    /// Bind the voting token at `address`. Without a signer, writes fail.
    fn bind_token(
        &self,
        address: Address,
        signer: Option<&SessionWallet>,
    ) -> Result<Arc<dyn TokenBinding>, ChainError>;

    /// Bind the ballot at `address`. Without a signer, `vote` fails.
    fn bind_ballot(
        &self,
        address: Address,
        signer: Option<&SessionWallet>,
    ) -> Result<Arc<dyn BallotBinding>, ChainError>;
}

/// [`ChainClient`] over an `ethers` HTTP provider.
pub struct EthersChainClient {
    network: Network,
    provider: Provider<Http>,
    request_timeout: Duration,
    token: ContractArtifact,
    ballot: ContractArtifact,
}

impl EthersChainClient {
    pub fn new(
        rpc: &RpcConfig,
        token: ContractArtifact,
        ballot: ContractArtifact,
    ) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(rpc.url.as_str())
            .map_err(|e| ChainError::InvalidRpcUrl(format!("{}: {e}", rpc.url)))?
            .interval(Duration::from_millis(rpc.poll_interval_ms));

        info!(
            network = %rpc.network,
            url = %rpc.url,
            custom = rpc.is_custom,
            "provider configured"
        );

        Ok(Self {
            network: rpc.network,
            provider,
            request_timeout: Duration::from_secs(rpc.timeout_secs),
            token,
            ballot,
        })
    }

    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }
}

#[async_trait]
impl ChainClient for EthersChainClient {
    fn network(&self) -> Network {
        self.network
    }

    async fn native_balance(&self, account: Address) -> Result<U256, ChainError> {
        with_timeout(self.request_timeout, "eth_getBalance", self.provider.get_balance(account, None))
            .await?
            .map_err(|e| ChainError::Provider(e.to_string()))
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        with_timeout(self.request_timeout, "eth_blockNumber", self.provider.get_block_number())
            .await?
            .map(|n| n.as_u64())
            .map_err(|e| ChainError::Provider(e.to_string()))
    }

    async fn wait_for_transaction(&self, tx_hash: TxHash) -> Result<Option<u64>, ChainError> {
        debug!(tx = ?tx_hash, "waiting for receipt");
        let pending = PendingTransaction::new(tx_hash, &self.provider);
        let receipt = tokio::time::timeout(CONFIRMATION_TIMEOUT, pending)
            .await
            .map_err(|_| {
                ChainError::Provider(format!(
                    "timed out after {}s waiting for {tx_hash:?}",
                    CONFIRMATION_TIMEOUT.as_secs()
                ))
            })?
            .map_err(|e| ChainError::Provider(e.to_string()))?;

        Ok(receipt.and_then(|r| r.block_number).map(|n| n.as_u64()))
    }

    fn bind_token(
        &self,
        address: Address,
        signer: Option<&SessionWallet>,
    ) -> Result<Arc<dyn TokenBinding>, ChainError> {
        check_signer_network(self.network, signer)?;
        debug!(token = ?address, signed = signer.is_some(), "binding token contract");
        Ok(Arc::new(EthersToken::new(
            address,
            &self.token.abi,
            &self.provider,
            signer,
            self.request_timeout,
        )))
    }

    fn bind_ballot(
        &self,
        address: Address,
        signer: Option<&SessionWallet>,
    ) -> Result<Arc<dyn BallotBinding>, ChainError> {
        check_signer_network(self.network, signer)?;
        debug!(ballot = ?address, signed = signer.is_some(), "binding ballot contract");
        Ok(Arc::new(EthersBallot::new(
            address,
            &self.ballot.abi,
            &self.provider,
            signer,
            self.request_timeout,
        )))
    }
}

/// Bound a single RPC round trip.
pub(crate) async fn with_timeout<F: std::future::Future>(
    limit: Duration,
    what: &str,
    fut: F,
) -> Result<F::Output, ChainError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| ChainError::Provider(format!("{what} timed out after {}s", limit.as_secs())))
}

/// A wallet connected to another network would sign with the wrong chain ID.
fn check_signer_network(network: Network, signer: Option<&SessionWallet>) -> Result<(), ChainError> {
    match signer.and_then(SessionWallet::network) {
        Some(connected) if connected != network => Err(ChainError::Wallet(format!(
            "wallet is connected to {connected}, provider is on {network}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc_config::RpcConfigStore;

    fn local_client() -> EthersChainClient {
        let rpc = RpcConfigStore::with_defaults()
            .resolve(Network::Localhost, None)
            .unwrap();
        EthersChainClient::new(
            &rpc,
            ContractArtifact::token(None).unwrap(),
            ContractArtifact::ballot(None).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn binding_is_offline() {
        let client = local_client();
        let address: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap();

        let token = client.bind_token(address, None).unwrap();
        assert_eq!(token.address(), address);

        let wallet = SessionWallet::random().connect(Network::Localhost);
        let ballot = client.bind_ballot(address, Some(&wallet)).unwrap();
        assert_eq!(ballot.address(), address);
        assert_eq!(client.network(), Network::Localhost);
    }

    #[test]
    fn binding_rejects_wallet_on_other_network() {
        let client = local_client();
        let wallet = SessionWallet::random().connect(Network::Mainnet);
        let err = client.bind_token(Address::zero(), Some(&wallet)).err().unwrap();
        assert!(err.to_string().contains("connected to"));
    }

    #[tokio::test]
    async fn vote_without_signer_fails_before_network() {
        let client = local_client();
        let ballot = client.bind_ballot(Address::zero(), None).unwrap();
        let err = ballot.vote(U256::zero(), U256::one()).await.unwrap_err();
        assert!(matches!(err, ChainError::NoSigner(ref m) if m == "vote"));
    }

    #[test]
    fn invalid_rpc_url_is_rejected() {
        let mut rpc = RpcConfigStore::with_defaults()
            .resolve(Network::Localhost, None)
            .unwrap();
        rpc.url = "not a url".into();
        let result = EthersChainClient::new(
            &rpc,
            ContractArtifact::token(None).unwrap(),
            ContractArtifact::ballot(None).unwrap(),
        );
        assert!(matches!(result, Err(ChainError::InvalidRpcUrl(_))));
    }
}
