use ballot_chain::{Address, KeyKind, Network, Proposal, U256};
use ballot_ui::panels::dashboard::*;

const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

#[test]
fn new_starts_empty() {
    let data = DashboardData::new(Network::Goerli);
    assert_eq!(data.network, Network::Goerli);
    assert!(!data.import_toggle);
    assert!(!data.import_flag);
    assert!(!data.key_selected);
    assert_eq!(data.key_kind, None);
    assert!(!data.has_wallet());
    assert_eq!(data.token_address, None);
    assert_eq!(data.ballot_address, None);
    assert!(data.proposals.is_empty());
}

#[test]
fn default_uses_sepolia() {
    assert_eq!(DashboardData::default().network, Network::Sepolia);
}

#[test]
fn toggle_flips_both_flags() {
    let mut data = DashboardData::default();
    data.toggle_import();
    assert!(data.import_toggle && data.import_flag);
    data.toggle_import();
    assert!(!data.import_toggle && !data.import_flag);
}

#[test]
fn select_key_kind_marks_selected() {
    let mut data = DashboardData::default();
    data.select_key_kind(KeyKind::Mnemonic);
    assert!(data.key_selected);
    assert_eq!(data.key_kind, Some(KeyKind::Mnemonic));
}

#[test]
fn validate_without_key_type() {
    let mut data = DashboardData::default();
    let errors = data.validate_import(ADDRESS, "some key");
    assert_eq!(errors, vec![MSG_KEY_TYPE_REQUIRED]);
    assert!(data.valid_address_flag);
    assert!(data.valid_key_flag);
}

#[test]
fn validate_reports_every_failure_in_order() {
    let mut data = DashboardData::default();
    let errors = data.validate_import("0x123", "");
    assert_eq!(
        errors,
        vec![MSG_KEY_TYPE_REQUIRED, MSG_ADDRESS_INVALID, MSG_KEY_EMPTY]
    );
    assert!(!data.valid_address_flag);
    assert!(!data.valid_key_flag);
}

#[test]
fn validate_passes_with_complete_form() {
    let mut data = DashboardData::default();
    data.select_key_kind(KeyKind::Private);
    assert!(data.validate_import(ADDRESS, "0xabc").is_empty());
}

#[test]
fn format_alert_prefixes_each_line() {
    assert_eq!(
        format_alert(&[MSG_ADDRESS_INVALID, MSG_KEY_EMPTY]),
        "* Address is invalid.\n* Mnemonic/Private key input should not be empty.\n"
    );
    assert_eq!(format_alert(&[]), "");
}

#[test]
fn reset_wallet_fields_clears_derived_values() {
    let mut data = DashboardData::default();
    data.ether_balance = Some(1.0);
    data.token_balance = Some(2.0);
    data.vote_power = Some(3.0);
    data.ballot_voting_power = Some(4.0);

    let address: Address = ADDRESS.parse().unwrap();
    data.reset_wallet_fields(address);

    assert_eq!(data.wallet_address, Some(address));
    assert_eq!(data.ether_balance, None);
    assert_eq!(data.token_balance, None);
    assert_eq!(data.vote_power, None);
    assert_eq!(data.ballot_voting_power, None);
}

#[test]
fn render_shows_placeholders_then_values() {
    let mut data = DashboardData::new(Network::Localhost);
    let empty = data.render();
    assert!(empty.contains("Wallet:        -"));
    assert!(!empty.contains("Ballot:"));

    data.wallet_address = Some(ADDRESS.parse().unwrap());
    data.token_balance = Some(12.5);
    data.ballot_address = Some(Address::repeat_byte(0x11));
    data.winner_name = Some("Chocolate".into());
    data.winning_index = Some(U256::from(1));
    data.proposals = vec![Proposal {
        index: 0,
        name: "Vanilla".into(),
        vote_count: U256::exp10(18),
    }];

    let text = data.render();
    assert!(text.contains("Wallet:        0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    assert!(text.contains("Token balance: 12.5"));
    assert!(text.contains("Winner:        Chocolate (#1)"));
    assert!(text.contains("[0] Vanilla"));
}

#[test]
fn render_mentions_open_import_form() {
    let mut data = DashboardData::default();
    data.toggle_import();
    assert!(data.render().contains("key type: none selected"));
    data.select_key_kind(KeyKind::Private);
    assert!(data.render().contains("key type: private"));
}
