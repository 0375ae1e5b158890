//! Drives the dashboard: every user action is one async method that talks to
//! the chain and the faucet backend and writes the results into
//! [`DashboardData`].
//!
//! Validation failures and library errors become alerts in the
//! [`NotificationStore`]; HTTP failures and transaction results are only
//! logged.

use std::str::FromStr;
use std::sync::Arc;

use ballot_backend::BackendApi;
use ballot_chain::format::{ether_to_f64, parse_uint};
use ballot_chain::{
    Address, BallotBinding, ChainClient, KeyKind, SessionWallet, TokenBinding, TxHash, checksum,
    is_valid_address, parse_address,
};
use ballot_core::{AppNotification, BallotError, NotificationStore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::panels::dashboard::{
    DashboardData, MSG_BALLOT_ADDRESS_INVALID, MSG_KEY_TYPE_REQUIRED, MSG_WALLET_REQUIRED,
    format_alert,
};

pub struct DashboardService {
    chain: Arc<dyn ChainClient>,
    backend: Arc<dyn BackendApi>,
    data: DashboardData,
    wallet: Option<SessionWallet>,
    token: Option<Arc<dyn TokenBinding>>,
    ballot: Option<Arc<dyn BallotBinding>>,
    notifications: NotificationStore,
    max_proposals: usize,
    background: Vec<JoinHandle<()>>,
}

impl DashboardService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        backend: Arc<dyn BackendApi>,
        max_proposals: usize,
    ) -> Self {
        let data = DashboardData::new(chain.network());
        Self {
            chain,
            backend,
            data,
            wallet: None,
            token: None,
            ballot: None,
            notifications: NotificationStore::new(),
            max_proposals,
            background: Vec::new(),
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    pub fn wallet(&self) -> Option<&SessionWallet> {
        self.wallet.as_ref()
    }

    pub fn has_ballot(&self) -> bool {
        self.ballot.is_some()
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationStore {
        &mut self.notifications
    }

    pub fn render(&self) -> String {
        self.data.render()
    }

    fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(alert = %message.trim_end(), "user alert");
        self.notifications.push(AppNotification::alert(message));
    }

    /// Alert a library failure with its own message; the category goes to the log.
    fn alert_error(&mut self, err: impl Into<BallotError>) {
        let err = err.into();
        warn!(category = ?err.category(), "{err}");
        self.notifications.push(AppNotification::alert(err.detail()));
    }

    /// Background requests still tracked; finished ones are dropped on the
    /// next `connect_ballot`.
    pub fn tracked_requests(&self) -> usize {
        self.background.len()
    }

    /// Wait for fire-and-forget backend requests started by earlier actions.
    pub async fn flush_background(&mut self) {
        for handle in self.background.drain(..) {
            if let Err(e) = handle.await {
                warn!("background request task failed: {e}");
            }
        }
    }

    // -- Import form --------------------------------------------------------

    pub fn toggle_import_form(&mut self) {
        self.data.toggle_import();
        debug!(open = self.data.import_toggle, "import form toggled");
    }

    /// Record which kind of key material the user will paste.
    pub fn select_key_kind(&mut self, raw: &str) -> Option<KeyKind> {
        match KeyKind::from_str(raw) {
            Ok(kind) => {
                self.data.select_key_kind(kind);
                debug!(%kind, "key type selected");
                Some(kind)
            }
            Err(e) => {
                self.alert_error(e);
                None
            }
        }
    }

    // -- Wallet -------------------------------------------------------------

    /// Validate the import form, derive the wallet and look up the token.
    /// Returns `true` when a wallet was imported.
    pub async fn import_wallet(&mut self, address: &str, material: &str) -> bool {
        let errors = self.data.validate_import(address, material);
        if !errors.is_empty() {
            self.alert(format_alert(&errors));
            return false;
        }
        let Some(kind) = self.data.key_kind else {
            self.alert(format_alert(&[MSG_KEY_TYPE_REQUIRED]));
            return false;
        };

        let wallet = match SessionWallet::import(kind, material) {
            Ok(w) => w.connect(self.chain.network()),
            Err(e) => {
                self.alert_error(e);
                return false;
            }
        };

        if let Ok(typed) = parse_address(address) {
            if typed != wallet.address() {
                warn!(
                    typed = ?typed,
                    derived = ?wallet.address(),
                    "imported key does not match the typed address"
                );
            }
        }

        info!(address = ?wallet.address(), %kind, "wallet imported");
        self.set_wallet(wallet);
        self.connect_default_token().await;
        true
    }

    /// Generate a random wallet, replacing the current one.
    pub async fn create_wallet(&mut self) -> Address {
        let wallet = SessionWallet::random().connect(self.chain.network());
        let address = wallet.address();
        info!(address = ?address, "wallet created");
        self.set_wallet(wallet);
        self.connect_default_token().await;
        address
    }

    fn set_wallet(&mut self, wallet: SessionWallet) {
        self.data.reset_wallet_fields(wallet.address());
        self.token = None;

        // A bound ballot keeps working but must sign with the new key.
        if let Some(ballot) = self.ballot.take() {
            match self.chain.bind_ballot(ballot.address(), Some(&wallet)) {
                Ok(rebound) => self.ballot = Some(rebound),
                Err(e) => warn!(ballot = ?ballot.address(), "could not rebind ballot: {e}"),
            }
        }
        self.wallet = Some(wallet);
    }

    /// Ask the backend for the faucet token and bind it to the wallet.
    pub async fn connect_default_token(&mut self) {
        let raw = match self.backend.token_address().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("backend has no token address");
                return;
            }
            Err(e) => {
                log_failure("token address lookup", e);
                return;
            }
        };

        let address = match parse_address(&raw) {
            Ok(a) => a,
            Err(e) => {
                warn!(raw = %raw, "backend returned a bad token address: {e}");
                return;
            }
        };

        match self.chain.bind_token(address, self.wallet.as_ref()) {
            Ok(token) => {
                info!(token = ?address, "token contract connected");
                self.data.token_address = Some(address);
                self.token = Some(token);
                self.refresh_balances().await;
            }
            Err(e) => self.alert_error(e),
        }
    }

    /// Re-read ether balance, token balance and vote power concurrently.
    pub async fn refresh_balances(&mut self) {
        let (Some(wallet), Some(token)) = (&self.wallet, &self.token) else {
            debug!("balances not refreshed: wallet or token missing");
            return;
        };
        let account = wallet.address();

        let (ether, tokens, votes) = tokio::join!(
            self.chain.native_balance(account),
            token.balance_of(account),
            token.get_votes(account),
        );

        match ether {
            Ok(v) => self.data.ether_balance = Some(ether_to_f64(v)),
            Err(e) => warn!("ether balance fetch failed: {e}"),
        }
        match tokens {
            Ok(v) => self.data.token_balance = Some(ether_to_f64(v)),
            Err(e) => warn!("token balance fetch failed: {e}"),
        }
        match votes {
            Ok(v) => self.data.vote_power = Some(ether_to_f64(v)),
            Err(e) => warn!("vote power fetch failed: {e}"),
        }
    }

    // -- Faucet -------------------------------------------------------------

    /// Ask the backend to send tokens to the wallet, wait for the transfer
    /// when a transaction hash comes back, then refresh balances once.
    pub async fn claim_tokens(&mut self) {
        let Some(address) = self.wallet.as_ref().map(SessionWallet::address) else {
            self.alert(MSG_WALLET_REQUIRED);
            return;
        };

        let response = match self.backend.claim_tokens(&checksum(address)).await {
            Ok(r) => r,
            Err(e) => {
                log_failure("claim request", e);
                return;
            }
        };
        info!(response = %response.raw, "claim request answered");

        if let Some(hash) = response.tx_hash().and_then(|h| TxHash::from_str(h).ok()) {
            self.data.last_transaction = Some(hash);
            match self.chain.wait_for_transaction(hash).await {
                Ok(Some(block)) => info!(tx = ?hash, block, "claim confirmed"),
                Ok(None) => warn!(tx = ?hash, "claim transaction dropped"),
                Err(e) => warn!(tx = ?hash, "waiting for claim failed: {e}"),
            }
        }

        self.refresh_balances().await;
    }

    // -- Ballot -------------------------------------------------------------

    /// Validate and bind the ballot at `address`, then load its state.
    /// Returns `true` when the ballot is bound.
    pub async fn connect_ballot(&mut self, address: &str) -> bool {
        if !is_valid_address(address) {
            self.alert(MSG_BALLOT_ADDRESS_INVALID);
            return false;
        }
        let parsed = match parse_address(address) {
            Ok(a) => a,
            Err(e) => {
                self.alert_error(e);
                return false;
            }
        };

        let backend = Arc::clone(&self.backend);
        let posted = checksum(parsed);
        self.background.retain(|h| !h.is_finished());
        self.background.push(tokio::spawn(async move {
            match backend.connect_ballot_contract(&posted).await {
                Ok(result) => info!(ballot = %posted, %result, "backend recorded ballot"),
                Err(e) => log_failure("connect-ballot request", e),
            }
        }));

        match self.chain.bind_ballot(parsed, self.wallet.as_ref()) {
            Ok(ballot) => {
                info!(ballot = ?parsed, "ballot contract connected");
                self.ballot = Some(ballot);
                self.data.ballot_address = Some(parsed);
                self.data.winner_name = None;
                self.data.winning_index = None;
                self.data.target_block = None;
                self.data.proposals.clear();
                self.data.ballot_voting_power = None;
                self.refresh_ballot_info().await;
                true
            }
            Err(e) => {
                self.alert_error(e);
                false
            }
        }
    }

    /// Re-read winner, winning index, target block, current block, proposals
    /// and the wallet's ballot voting power.
    pub async fn refresh_ballot_info(&mut self) {
        let Some(ballot) = self.ballot.clone() else {
            return;
        };

        let (winner, index, target, latest) = tokio::join!(
            ballot.winner_name(),
            ballot.winning_proposal(),
            ballot.target_block(),
            self.chain.block_number(),
        );
        match winner {
            Ok(v) => self.data.winner_name = Some(v),
            Err(e) => warn!("winner name fetch failed: {e}"),
        }
        match index {
            Ok(v) => self.data.winning_index = Some(v),
            Err(e) => warn!("winning proposal fetch failed: {e}"),
        }
        match target {
            Ok(v) => self.data.target_block = Some(v),
            Err(e) => warn!("target block fetch failed: {e}"),
        }
        match latest {
            Ok(v) => self.data.latest_block = Some(v),
            Err(e) => warn!("block number fetch failed: {e}"),
        }

        // The contract does not expose the array length; read until a call
        // reverts.
        let mut proposals = Vec::new();
        for index in 0..self.max_proposals {
            match ballot.proposal(index).await {
                Ok(p) => proposals.push(p),
                Err(e) => {
                    debug!(index, "proposal listing stopped: {e}");
                    break;
                }
            }
        }
        self.data.proposals = proposals;

        if let Some(account) = self.wallet.as_ref().map(SessionWallet::address) {
            match ballot.voting_power(account).await {
                Ok(v) => self.data.ballot_voting_power = Some(ether_to_f64(v)),
                Err(e) => warn!("ballot voting power fetch failed: {e}"),
            }
        }
    }

    /// Send `vote(id, amount)`. Does nothing without a bound ballot; the
    /// outcome is only logged.
    pub async fn cast_vote(&mut self, vote_id: &str, amount: &str) -> Option<TxHash> {
        let ballot = self.ballot.clone()?;

        let (proposal, amount) = match (parse_uint(vote_id), parse_uint(amount)) {
            (Ok(p), Ok(a)) => (p, a),
            (Err(e), _) | (_, Err(e)) => {
                warn!("vote not sent: {e}");
                return None;
            }
        };

        match ballot.vote(proposal, amount).await {
            Ok(tx) => {
                info!(tx = ?tx, %proposal, %amount, "vote sent");
                self.data.last_transaction = Some(tx);
                Some(tx)
            }
            Err(e) => {
                log_failure("vote", e);
                None
            }
        }
    }

    /// Delegate the wallet's voting power, to itself when `delegatee` is
    /// `None`, then refresh balances after confirmation.
    pub async fn delegate(&mut self, delegatee: Option<&str>) -> Option<TxHash> {
        let (Some(wallet), Some(token)) = (&self.wallet, self.token.clone()) else {
            warn!("delegation needs a wallet and a token contract");
            return None;
        };

        let target = match delegatee {
            Some(raw) => match parse_address(raw) {
                Ok(a) => a,
                Err(e) => {
                    warn!("delegation not sent: {e}");
                    return None;
                }
            },
            None => wallet.address(),
        };

        let tx = match token.delegate(target).await {
            Ok(tx) => tx,
            Err(e) => {
                log_failure("delegation", e);
                return None;
            }
        };
        info!(tx = ?tx, delegatee = ?target, "delegation sent");
        self.data.last_transaction = Some(tx);

        match self.chain.wait_for_transaction(tx).await {
            Ok(Some(block)) => info!(tx = ?tx, block, "delegation confirmed"),
            Ok(None) => warn!(tx = ?tx, "delegation transaction dropped"),
            Err(e) => warn!(tx = ?tx, "waiting for delegation failed: {e}"),
        }
        self.refresh_balances().await;
        Some(tx)
    }

    /// Re-read every display field.
    pub async fn refresh(&mut self) {
        self.refresh_balances().await;
        self.refresh_ballot_info().await;
    }
}

/// Log a failure that is not surfaced as an alert.
fn log_failure(action: &str, err: impl Into<BallotError>) {
    let err = err.into();
    warn!(category = ?err.category(), "{action} failed: {}", err.detail());
}
