use ballot_chain::*;

const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const BALLOT: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

fn client_for(network: Network, custom: Option<&str>) -> EthersChainClient {
    let rpc = RpcConfigStore::with_defaults().resolve(network, custom).unwrap();
    EthersChainClient::new(
        &rpc,
        ContractArtifact::token(None).unwrap(),
        ContractArtifact::ballot(None).unwrap(),
    )
    .unwrap()
}

#[test]
fn custom_rpc_is_validated_before_connecting() {
    let store = RpcConfigStore::with_defaults();
    let err = store.resolve(Network::Sepolia, Some("ftp://node")).unwrap_err();
    assert!(matches!(err, ChainError::InvalidRpcUrl(_)));

    let rpc = RpcConfigStore::with_defaults()
        .resolve(Network::Sepolia, Some("  https://sepolia.example.org  "))
        .unwrap();
    assert!(rpc.is_custom);
    assert_eq!(rpc.url, "https://sepolia.example.org");
}

#[test]
fn imported_wallet_binds_ballot_on_same_network() {
    let client = client_for(Network::Goerli, None);
    let wallet = SessionWallet::import(KeyKind::Private, DEV_KEY)
        .unwrap()
        .connect(client.network());
    assert_eq!(wallet.chain_id(), 5);

    let ballot = client
        .bind_ballot(parse_address(BALLOT).unwrap(), Some(&wallet))
        .unwrap();
    assert_eq!(ballot.address(), BALLOT.parse::<Address>().unwrap());
}

#[test]
fn unconnected_wallet_is_accepted_by_any_network() {
    let client = client_for(Network::Localhost, None);
    let wallet = SessionWallet::random();
    assert!(client.bind_token(Address::zero(), Some(&wallet)).is_ok());
}

#[test]
fn ballot_address_rules() {
    assert!(is_valid_address(BALLOT));
    assert!(is_valid_address("0xABCDEF0123456789ABCDEF0123456789ABCDEF01"));
    assert!(!is_valid_address("0x123"));
    assert!(!is_valid_address(&format!("{BALLOT} ")));
    assert!(matches!(parse_address("0x123"), Err(ChainError::InvalidAddress(_))));
}

#[tokio::test]
async fn delegate_without_signer_is_rejected() {
    let client = client_for(Network::Localhost, Some("http://127.0.0.1:9"));
    let token = client.bind_token(Address::zero(), None).unwrap();
    let err = token.delegate(Address::zero()).await.unwrap_err();
    assert!(matches!(err, ChainError::NoSigner(ref m) if m == "delegate"));
}

#[tokio::test]
async fn unreachable_node_reports_provider_error() {
    let client = client_for(Network::Localhost, Some("http://127.0.0.1:9"));
    let err = client.block_number().await.unwrap_err();
    assert!(matches!(err, ChainError::Provider(_)), "got {err:?}");
}
