use std::fmt::Write as _;

use ballot_chain::format::ether_to_f64;
use ballot_chain::{
    Address, KeyKind, Network, Proposal, TxHash, U256, checksum, is_valid_address,
};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const MSG_KEY_TYPE_REQUIRED: &str = "A type of key must be selected.";
pub const MSG_ADDRESS_INVALID: &str = "Address is invalid.";
pub const MSG_KEY_EMPTY: &str = "Mnemonic/Private key input should not be empty.";
pub const MSG_BALLOT_ADDRESS_INVALID: &str = "Enter a valid ballot address.";
pub const MSG_WALLET_REQUIRED: &str = "Import or create a wallet before claiming tokens.";

/// Join validation failures into a single alert, one `* <msg>` line each.
pub fn format_alert(messages: &[&str]) -> String {
    let mut full = String::new();
    for message in messages {
        let _ = writeln!(full, "* {message}");
    }
    full
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything the dashboard shows. Display fields are `None` until their
/// first successful fetch and keep their last value when a later fetch fails.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub network: Network,

    // Import form
    pub import_toggle: bool,
    pub import_flag: bool,
    pub key_kind: Option<KeyKind>,
    pub key_selected: bool,
    pub valid_address_flag: bool,
    pub valid_key_flag: bool,

    // Wallet and token
    pub wallet_address: Option<Address>,
    pub token_address: Option<Address>,
    pub ether_balance: Option<f64>,
    pub token_balance: Option<f64>,
    pub vote_power: Option<f64>,

    // Ballot
    pub ballot_address: Option<Address>,
    pub winner_name: Option<String>,
    pub winning_index: Option<U256>,
    pub target_block: Option<U256>,
    pub latest_block: Option<u64>,
    pub proposals: Vec<Proposal>,
    pub ballot_voting_power: Option<f64>,

    pub last_transaction: Option<TxHash>,
}

impl DashboardData {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            import_toggle: false,
            import_flag: false,
            key_kind: None,
            key_selected: false,
            valid_address_flag: false,
            valid_key_flag: false,
            wallet_address: None,
            token_address: None,
            ether_balance: None,
            token_balance: None,
            vote_power: None,
            ballot_address: None,
            winner_name: None,
            winning_index: None,
            target_block: None,
            latest_block: None,
            proposals: Vec::new(),
            ballot_voting_power: None,
            last_transaction: None,
        }
    }

    /// Show or hide the import form.
    pub fn toggle_import(&mut self) {
        self.import_toggle = !self.import_toggle;
        self.import_flag = !self.import_flag;
    }

    pub fn select_key_kind(&mut self, kind: KeyKind) {
        self.key_kind = Some(kind);
        self.key_selected = true;
    }

    /// Check the import form, updating the validity flags. Returns the
    /// failures in display order; empty means the import may proceed.
    pub fn validate_import(&mut self, address: &str, material: &str) -> Vec<&'static str> {
        self.valid_address_flag = is_valid_address(address);
        self.valid_key_flag = !material.is_empty();

        let mut errors = Vec::new();
        if !self.key_selected {
            errors.push(MSG_KEY_TYPE_REQUIRED);
        }
        if !self.valid_address_flag {
            errors.push(MSG_ADDRESS_INVALID);
        }
        if !self.valid_key_flag {
            errors.push(MSG_KEY_EMPTY);
        }
        errors
    }

    /// Forget every value derived from the previous wallet.
    pub fn reset_wallet_fields(&mut self, address: Address) {
        self.wallet_address = Some(address);
        self.ether_balance = None;
        self.token_balance = None;
        self.vote_power = None;
        self.ballot_voting_power = None;
        self.last_transaction = None;
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet_address.is_some()
    }

    /// Plain-text view of the dashboard.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== Tokenized Ballot ({}) ==", self.network);

        if self.import_toggle {
            let kind = self.key_kind.map(|k| k.as_str()).unwrap_or("none selected");
            let _ = writeln!(out, "[import form open, key type: {kind}]");
        }

        let _ = writeln!(out, "Wallet:        {}", opt_address(self.wallet_address));
        let _ = writeln!(out, "ETH balance:   {}", opt_amount(self.ether_balance));
        let _ = writeln!(out, "Token:         {}", opt_address(self.token_address));
        let _ = writeln!(out, "Token balance: {}", opt_amount(self.token_balance));
        let _ = writeln!(out, "Vote power:    {}", opt_amount(self.vote_power));

        if let Some(ballot) = self.ballot_address {
            let _ = writeln!(out, "Ballot:        {}", checksum(ballot));
            let _ = writeln!(
                out,
                "Winner:        {} (#{})",
                self.winner_name.as_deref().unwrap_or("-"),
                opt_display(self.winning_index.as_ref())
            );
            let _ = write!(out, "Target block:  {}", opt_display(self.target_block.as_ref()));
            if let Some(latest) = self.latest_block {
                let _ = write!(out, " (chain at {latest})");
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "Ballot power:  {}", opt_amount(self.ballot_voting_power));
            if !self.proposals.is_empty() {
                let _ = writeln!(out, "Proposals:");
                for p in &self.proposals {
                    let _ = writeln!(
                        out,
                        "  [{}] {:<24} {} votes",
                        p.index,
                        p.name,
                        ether_to_f64(p.vote_count)
                    );
                }
            }
        }

        if let Some(tx) = self.last_transaction {
            let _ = writeln!(out, "Last tx:       {tx:?}");
        }
        out
    }
}

impl Default for DashboardData {
    fn default() -> Self {
        Self::new(Network::Sepolia)
    }
}

fn opt_address(value: Option<Address>) -> String {
    value.map_or_else(|| "-".to_string(), checksum)
}

fn opt_amount(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}"))
}

fn opt_display(value: Option<&U256>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}
