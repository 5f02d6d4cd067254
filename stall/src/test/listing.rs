#![cfg(test)]

use super::StallTest;
use crate::types::Item;
use common::policy::types::{PolicyError, TradeReceipt};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Symbol};

#[test]
fn test_list_purchase_exact_price() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();
    let price: i128 = 100_0000000;
    let item: Item = test.artwork(1);

    test.stall_client.place(&test.alice, &cap_id, &stall_id, &item);
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &price);
    assert!(test.stall_client.is_listed(&stall_id, &1u64));

    let bob_before: i128 = test.token_client.balance(&test.bob);
    let (bought, receipt): (Item, TradeReceipt) =
        test.stall_client.purchase(&test.bob, &stall_id, &1u64, &price);

    assert_eq!(bought, item);
    assert_eq!(receipt.stall_id, stall_id);
    assert_eq!(receipt.item_id, 1);
    assert_eq!(receipt.paid, price);

    assert!(!test.stall_client.has_item(&stall_id, &1u64));
    assert!(!test.stall_client.is_listed(&stall_id, &1u64));
    assert_eq!(test.stall_client.item_count(&stall_id), 0);
    assert_eq!(test.stall_client.profits(&stall_id), price);
    assert_eq!(test.token_client.balance(&test.bob), bob_before - price);
    assert_eq!(
        test.token_client.balance(&test.stall_client.address),
        price
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #10)")]
fn test_purchase_underpayment_panics() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();

    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &100_0000000);
    test.stall_client
        .purchase(&test.bob, &stall_id, &1u64, &99_0000000);
}

#[test]
#[should_panic(expected = "Error(Contract, #10)")]
fn test_purchase_overpayment_panics() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();

    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &100_0000000);
    test.stall_client
        .purchase(&test.bob, &stall_id, &1u64, &101_0000000);
}

#[test]
#[should_panic(expected = "Error(Contract, #9)")]
fn test_purchase_unlisted_item_panics() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();

    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
    test.stall_client
        .purchase(&test.bob, &stall_id, &1u64, &100_0000000);
}

#[test]
#[should_panic(expected = "Error(Contract, #4)")]
fn test_list_missing_item_panics() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();

    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &100_0000000);
}

#[test]
#[should_panic(expected = "Error(Contract, #7)")]
fn test_list_twice_panics() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();

    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &100_0000000);
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &90_0000000);
}

#[test]
fn test_delist_makes_item_takeable() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();

    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &100_0000000);
    test.stall_client.delist(&test.alice, &cap_id, &stall_id, &1u64);

    assert!(!test.stall_client.is_listed(&stall_id, &1u64));
    test.stall_client.take(&test.alice, &cap_id, &stall_id, &1u64);
    assert_eq!(test.stall_client.item_count(&stall_id), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #9)")]
fn test_delist_unlisted_item_panics() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();

    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
    test.stall_client.delist(&test.alice, &cap_id, &stall_id, &1u64);
}

#[test]
fn test_take_drops_plain_listing() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();

    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &100_0000000);
    test.stall_client.take(&test.alice, &cap_id, &stall_id, &1u64);

    assert!(!test.stall_client.is_listed(&stall_id, &1u64));
    assert!(!test.stall_client.has_item(&stall_id, &1u64));
}

#[test]
fn test_purchase_of_locked_item_clears_lock() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();
    let price: i128 = 50_0000000;

    test.policy_client.allow(&Symbol::new(&test.env, "artwork"));
    test.stall_client.lock(
        &test.alice,
        &cap_id,
        &stall_id,
        &test.artwork(1),
        &test.policy_client.address,
    );
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &price);
    test.stall_client.purchase(&test.bob, &stall_id, &1u64, &price);

    assert!(!test.stall_client.is_locked(&stall_id, &1u64));
    // the slot is free again
    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
}

#[test]
fn test_receipt_confirmed_by_policy() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();
    let price: i128 = 100_0000000;

    test.policy_client.allow(&Symbol::new(&test.env, "artwork"));
    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &price);
    let (_, receipt): (Item, TradeReceipt) =
        test.stall_client.purchase(&test.bob, &stall_id, &1u64, &price);

    test.policy_client.confirm(&receipt);
}

#[test]
fn test_receipt_of_uncovered_kind_rejected() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();
    let price: i128 = 10_0000000;

    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.ticket(1));
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &price);
    let (_, receipt): (Item, TradeReceipt) =
        test.stall_client.purchase(&test.bob, &stall_id, &1u64, &price);

    assert_eq!(
        test.policy_client.try_confirm(&receipt),
        Err(Ok(PolicyError::KindNotCovered))
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #22)")]
fn test_purchase_without_funds_panics() {
    let test: StallTest = StallTest::setup();
    let (stall_id, cap_id) = test.open_stall();
    let broke: Address = Address::generate(&test.env);

    test.stall_client
        .place(&test.alice, &cap_id, &stall_id, &test.artwork(1));
    test.stall_client
        .list(&test.alice, &cap_id, &stall_id, &1u64, &100_0000000);
    test.stall_client
        .purchase(&broke, &stall_id, &1u64, &100_0000000);
}
