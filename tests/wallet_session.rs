use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use wallet_engine::{
    EmptyState, FileStore, KeyValueStore, LedgerError, TransactionKind, Wallet, WalletConfig,
    WalletError, BALANCE_KEY, HISTORY_KEY,
};

fn open(path: &std::path::Path) -> Wallet<FileStore> {
    let store = FileStore::open(path).expect("open store");
    Wallet::open(store, WalletConfig::default()).expect("open wallet")
}

#[test]
fn session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet.json");

    let mut wallet = open(&path);
    wallet.deposit(dec!(5000)).unwrap();
    wallet.withdraw(dec!(3000)).unwrap();
    wallet.transfer(dec!(1000), "Jean", "Dupont").unwrap();
    let history = wallet.history().clone();
    drop(wallet);

    let wallet = open(&path);
    assert_eq!(wallet.balance(), dec!(120990));
    assert_eq!(wallet.history(), &history);

    let kinds: Vec<_> = wallet.history().records().iter().map(|r| r.kind()).collect();
    assert_eq!(
        kinds,
        vec![TransactionKind::Transfer, TransactionKind::Withdrawal, TransactionKind::Deposit],
    );
}

#[test]
fn stored_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet.json");

    let mut wallet = open(&path);
    wallet.transfer(dec!(1000), "Jean", "Dupont").unwrap();
    drop(wallet);

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(BALANCE_KEY).unwrap().as_deref(), Some("118990"));

    let history: serde_json::Value =
        serde_json::from_str(&store.get(HISTORY_KEY).unwrap().unwrap()).unwrap();
    let head = &history[0];
    assert_eq!(head["type"], "Transfert");
    assert_eq!(head["montant"], "1000");
    assert_eq!(head["frais"], "10");
    assert_eq!(head["destinatairePrenom"], "Jean");
    assert_eq!(head["destinataireNom"], "Dupont");
}

#[test]
fn insufficient_funds_are_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet.json");
    let config = WalletConfig {
        initial_balance: dec!(100),
        ..WalletConfig::default()
    };

    let mut wallet = Wallet::open(FileStore::open(&path).unwrap(), config.clone()).unwrap();
    let error = wallet.withdraw(dec!(150)).unwrap_err();
    assert!(matches!(&error, WalletError::Ledger(error) if error.is_insufficient_funds()));
    assert_eq!(wallet.balance(), dec!(100));
    drop(wallet);

    // nothing was ever written
    assert!(!path.exists());
    let wallet = Wallet::open(FileStore::open(&path).unwrap(), config).unwrap();
    assert!(wallet.history().is_empty());
}

#[test]
fn missing_recipient() {
    let dir = tempfile::tempdir().unwrap();
    let mut wallet = open(&dir.path().join("wallet.json"));

    let error = wallet.transfer(dec!(10), " ", "").unwrap_err();
    assert!(matches!(error, WalletError::Ledger(LedgerError::MissingRecipient)));
    assert_eq!(
        error.to_string(),
        "Please enter at least the first or the last name of the recipient",
    );
}

#[test]
fn browsing_a_long_history() {
    let dir = tempfile::tempdir().unwrap();
    let mut wallet = open(&dir.path().join("wallet.json"));
    for amount in 1..=8 {
        wallet.deposit(Decimal::from(amount)).unwrap();
    }
    wallet.transfer(dec!(50), "Awa", "Diop").unwrap();

    let mut seen = Vec::new();
    loop {
        let page = wallet.load_more();
        seen.extend(page.records().iter().map(|r| r.amount()));
        if !page.has_more() {
            break;
        }
    }
    assert_eq!(seen.len(), 9);
    assert_eq!(seen[0], dec!(50));
    assert_eq!(seen[8], dec!(1));

    wallet.search("awa");
    let page = wallet.load_more();
    assert_eq!(page.matching(), 1);
    assert!(!page.has_more());

    wallet.search("zz");
    assert_eq!(wallet.load_more().empty_state(), Some(EmptyState::NoMatches));
}
