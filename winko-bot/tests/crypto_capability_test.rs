//! Crypto capability dispatch: one output per call, failures rendered as output text.

mod common;

use std::sync::Arc;

use common::{call, FakeBalance};
use winko_bot::crypto::{CapabilityError, CryptoCapability};
use winko_bot::store::UserRecord;

const WALLET: &str = "0xAf0476C27A15b2A6C7b9BDFe410fe0E59Ef7bEAA";

fn user(wallet: Option<&str>) -> UserRecord {
    UserRecord {
        id: 1,
        tg_user_id: 504459620,
        last_thread_id: Some("thread_abc".to_string()),
        wallet_address: wallet.map(str::to_string),
    }
}

fn capability() -> (Arc<FakeBalance>, CryptoCapability) {
    let balance = Arc::new(FakeBalance::new("1.500000000000000000"));
    (balance.clone(), CryptoCapability::new(balance))
}

/// **Test: get_bnb_allocation queries the user's wallet and returns the amount.**
#[tokio::test]
async fn test_allocation_uses_stored_wallet() {
    let (balance, crypto) = capability();

    let output = crypto
        .dispatch(&user(Some(WALLET)), &call("call_1", "get_bnb_allocation", "{}"))
        .await;

    assert_eq!(output.call_id, "call_1");
    assert_eq!(output.output, "1.500000000000000000");
    assert_eq!(*balance.queried.lock().unwrap(), vec![WALLET.to_string()]);
}

/// **Test: no stored wallet yields an error output and never calls the balance API.**
#[tokio::test]
async fn test_allocation_without_wallet_skips_balance_client() {
    let (balance, crypto) = capability();

    let output = crypto
        .dispatch(&user(None), &call("call_1", "get_bnb_allocation", ""))
        .await;

    assert_eq!(output.output, "bnb wallet address is not set");
    assert_eq!(balance.calls(), 0);
}

/// **Test: sending to the caller's own wallet is rejected, whatever the address casing.**
#[tokio::test]
async fn test_self_transfer_is_rejected() {
    let (_, crypto) = capability();
    let args = format!(
        r#"{{"recipient_address":"{}","amount":0.5}}"#,
        WALLET.to_lowercase()
    );

    let err = crypto
        .execute(&user(Some(WALLET)), &call("call_1", "send_bnb_to_address", &args))
        .await
        .unwrap_err();
    assert!(matches!(err, CapabilityError::PolicyRejection));

    let output = crypto
        .dispatch(&user(Some(WALLET)), &call("call_1", "send_bnb_to_address", &args))
        .await;
    assert_eq!(output.output, "sending bnb to the same address is not allowed");
    assert!(!output.output.contains("Sending"));
}

/// **Test: surrounding whitespace on either address does not bypass the self-transfer check.**
#[tokio::test]
async fn test_self_transfer_with_padded_addresses_is_rejected() {
    let (_, crypto) = capability();
    let padded = format!(" {} ", WALLET);
    let args = format!(r#"{{"recipient_address":"{}","amount":1}}"#, padded);

    let output = crypto
        .dispatch(&user(Some(padded.as_str())), &call("call_1", "send_bnb_to_address", &args))
        .await;
    assert_eq!(output.output, "sending bnb to the same address is not allowed");

    let args = format!(r#"{{"recipient_address":"{}","amount":1}}"#, WALLET);
    let output = crypto
        .dispatch(&user(Some(padded.as_str())), &call("call_2", "send_bnb_to_address", &args))
        .await;
    assert_eq!(output.output, "sending bnb to the same address is not allowed");
}

/// **Test: a padded stored wallet is queried without the padding.**
#[tokio::test]
async fn test_allocation_trims_stored_wallet() {
    let (balance, crypto) = capability();

    crypto
        .dispatch(
            &user(Some(format!("{}\n", WALLET).as_str())),
            &call("call_1", "get_bnb_allocation", "{}"),
        )
        .await;

    assert_eq!(*balance.queried.lock().unwrap(), vec![WALLET.to_string()]);
}

/// **Test: a transfer to another address returns the canned confirmation.**
#[tokio::test]
async fn test_transfer_confirmation() {
    let (balance, crypto) = capability();

    let output = crypto
        .dispatch(
            &user(Some(WALLET)),
            &call(
                "call_2",
                "send_bnb_to_address",
                r#"{"recipient_address":"0x1111111111111111111111111111111111111111","amount":"0.1"}"#,
            ),
        )
        .await;

    assert_eq!(
        output.output,
        "Sending 0.1 BNB to 0x1111111111111111111111111111111111111111 via blockchain..."
    );
    assert_eq!(balance.calls(), 0);
}

/// **Test: malformed arguments become an argument-parse error output.**
#[tokio::test]
async fn test_malformed_arguments() {
    let (_, crypto) = capability();

    let output = crypto
        .dispatch(&user(Some(WALLET)), &call("call_3", "send_bnb_to_address", "{not json"))
        .await;

    assert_eq!(output.output, "failed to parse function arguments");
}

/// **Test: an unknown function name still produces exactly one output, naming the function.**
#[tokio::test]
async fn test_unknown_function_gets_error_output() {
    let (balance, crypto) = capability();

    let output = crypto
        .dispatch(&user(Some(WALLET)), &call("call_4", "stake_bnb", "{}"))
        .await;

    assert_eq!(output.call_id, "call_4");
    assert_eq!(output.output, "unknown function: stake_bnb");
    assert_eq!(balance.calls(), 0);
}

/// **Test: a batch with a failing call still returns one output per call, in order.**
#[tokio::test]
async fn test_dispatch_all_keeps_one_output_per_call() {
    let (_, crypto) = capability();
    let calls = vec![
        call("call_a", "get_bnb_allocation", "{}"),
        call("call_b", "unknown", "{}"),
        call("call_c", "send_bnb_to_address", "[]"),
    ];

    let outputs = crypto.dispatch_all(&user(Some(WALLET)), &calls).await;

    let ids: Vec<_> = outputs.iter().map(|o| o.call_id.as_str()).collect();
    assert_eq!(ids, vec!["call_a", "call_b", "call_c"]);
    assert_eq!(outputs[0].output, "1.500000000000000000");
    assert_eq!(outputs[1].output, "unknown function: unknown");
    assert_eq!(outputs[2].output, "failed to parse function arguments");
}
