use common::policy::interface::TransferPolicyClient;
use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::storage::{
    get_data, get_persistent, has_persistent, remove_persistent, store_data, store_persistent,
};
use crate::types::{DataKey, Error, Extension, Item, OwnerCap, PurchaseCap, Stall, PAYMENT_TOKEN};

pub fn next_id(env: &Env) -> u64 {
    let seq: u64 = get_data(env, &DataKey::Sequence).unwrap_or(0);
    let id: u64 = seq + 1;
    store_data(env, &DataKey::Sequence, &id);
    id
}

pub fn get_stall_by_id(env: &Env, stall_id: u64) -> Stall {
    match get_persistent(env, &DataKey::Stall(stall_id)) {
        Some(stall) => stall,
        None => panic_with_error!(env, Error::StallNotFound),
    }
}

// Possession of the matching capability is the whole authorization proof:
// the holder signs, and the capability must be bound to the target stall.
pub fn require_cap(env: &Env, holder: &Address, cap_id: u64, stall_id: u64) -> Stall {
    holder.require_auth();

    let cap: OwnerCap = match get_persistent(env, &DataKey::OwnerCap(cap_id)) {
        Some(cap) => cap,
        None => panic_with_error!(env, Error::NotOwner),
    };
    if cap.holder != *holder || cap.stall_id != stall_id {
        panic_with_error!(env, Error::NotOwner);
    }

    get_stall_by_id(env, stall_id)
}

pub fn require_purchase_cap(env: &Env, holder: &Address, pcap_id: u64) -> PurchaseCap {
    holder.require_auth();

    let cap: PurchaseCap = match get_persistent(env, &DataKey::PurchaseCap(pcap_id)) {
        Some(cap) => cap,
        None => panic_with_error!(env, Error::NotOwner),
    };
    if cap.holder != *holder {
        panic_with_error!(env, Error::NotOwner);
    }

    cap
}

pub fn require_extension(env: &Env, stall_id: u64, ext: &Address) -> Extension {
    match get_persistent(env, &DataKey::Extension(stall_id, ext.clone())) {
        Some(record) => record,
        None => panic_with_error!(env, Error::ExtensionNotInstalled),
    }
}

pub fn place_internal(env: &Env, stall: &mut Stall, item: &Item) {
    // A borrowed item keeps its slot reserved until it is returned.
    if has_persistent(env, &DataKey::Item(stall.id, item.id))
        || has_persistent(env, &DataKey::Borrowed(stall.id, item.id))
    {
        panic_with_error!(env, Error::ItemAlreadyPlaced);
    }

    store_persistent(env, &DataKey::Item(stall.id, item.id), item);
    stall.item_count += 1;
    store_persistent(env, &DataKey::Stall(stall.id), stall);
}

// Locking is only allowed when a policy covers the item's kind, otherwise
// the item would have no legal exit path out of the stall.
pub fn lock_internal(env: &Env, stall: &mut Stall, item: &Item, policy: &Address) {
    let policy_client = TransferPolicyClient::new(env, policy);
    if !policy_client.covers(&item.kind) {
        panic_with_error!(env, Error::PolicyNotCovered);
    }

    place_internal(env, stall, item);
    store_persistent(env, &DataKey::Lock(stall.id, item.id), &true);
}

// Remove the item together with whatever listing and lock records hang off
// it. Used by both purchase paths.
pub fn detach_item(env: &Env, stall: &mut Stall, item_id: u64) -> Item {
    let item: Item = match get_persistent(env, &DataKey::Item(stall.id, item_id)) {
        Some(item) => item,
        None => panic_with_error!(env, Error::ItemNotFound),
    };

    remove_persistent(env, &DataKey::Item(stall.id, item_id));
    remove_persistent(env, &DataKey::Listing(stall.id, item_id));
    remove_persistent(env, &DataKey::Lock(stall.id, item_id));
    stall.item_count -= 1;

    item
}

pub fn collect_payment(env: &Env, from: &Address, amount: i128) {
    let token_addr: Address = get_data(env, &PAYMENT_TOKEN).unwrap();
    let token_client: token::Client<'_> = token::Client::new(env, &token_addr);

    if token_client.balance(from) < amount {
        panic_with_error!(env, Error::InsufficientBalance);
    }
    token_client.transfer(from, &env.current_contract_address(), &amount);
}

pub fn pay_out(env: &Env, to: &Address, amount: i128) {
    let token_addr: Address = get_data(env, &PAYMENT_TOKEN).unwrap();
    let token_client: token::Client<'_> = token::Client::new(env, &token_addr);
    token_client.transfer(&env.current_contract_address(), to, &amount);
}
