#![no_std]

mod events;
mod storage;
mod types;
mod utils;

use common::policy::types::TradeReceipt;
use events::StallEvent;
use soroban_sdk::{
    contract, contractimpl, panic_with_error, Address, Bytes, BytesN, Env, Symbol,
};
use storage::{
    get_data, get_persistent, has_data, has_persistent, remove_persistent, store_data,
    store_persistent,
};
use types::{
    BorrowReceipt, DataKey, Error, Extension, Item, Listing, OwnerCap, PurchaseCap, Stall, ADMIN,
    PAYMENT_TOKEN, PERM_LOCK, PERM_PLACE,
};
use utils::{
    collect_payment, detach_item, get_stall_by_id, lock_internal, next_id, pay_out,
    place_internal, require_cap, require_extension, require_purchase_cap,
};

#[contract]
pub struct StallContract;

#[allow(dead_code)]
#[contractimpl]
impl StallContract {
    pub fn initialize(env: Env, admin: Address, payment_token: Address) -> Result<(), Error> {
        admin.require_auth();
        if has_data::<Symbol>(&env, &ADMIN) {
            return Err(Error::AlreadyInitialized);
        }
        store_data(&env, &ADMIN, &admin);
        store_data(&env, &PAYMENT_TOKEN, &payment_token);
        store_data(&env, &DataKey::Sequence, &0u64);

        StallEvent::Initialized(payment_token).publish(&env);
        Ok(())
    }

    pub fn version() -> u32 {
        1
    }

    pub fn upgrade(env: Env, new_wasm_hash: BytesN<32>) {
        let admin: Address = get_data(&env, &ADMIN).unwrap();
        admin.require_auth();
        env.deployer().update_current_contract_wasm(new_wasm_hash);
        StallEvent::Upgraded(Self::version()).publish(&env);
    }

    pub fn set_payment_token(env: Env, token_addr: Address) {
        let admin: Address = get_data(&env, &ADMIN).unwrap();
        admin.require_auth();
        store_data(&env, &PAYMENT_TOKEN, &token_addr);
    }

    // Mints a stall together with the one owner capability bound to it.
    pub fn create_stall(env: Env, owner: Address) -> (u64, u64) {
        owner.require_auth();

        let stall_id: u64 = next_id(&env);
        let cap_id: u64 = next_id(&env);

        let stall: Stall = Stall {
            id: stall_id,
            owner: owner.clone(),
            profits: 0,
            item_count: 0,
            allow_extensions: false,
        };
        let cap: OwnerCap = OwnerCap {
            id: cap_id,
            stall_id,
            holder: owner.clone(),
        };

        store_persistent(&env, &DataKey::Stall(stall_id), &stall);
        store_persistent(&env, &DataKey::OwnerCap(cap_id), &cap);

        StallEvent::StallCreated(stall_id, owner).publish(&env);

        (stall_id, cap_id)
    }

    // Destroys an empty stall and its capability, paying out the profits.
    pub fn close_stall(env: Env, holder: Address, cap_id: u64, stall_id: u64) -> i128 {
        let stall: Stall = require_cap(&env, &holder, cap_id, stall_id);
        if stall.item_count > 0 {
            panic_with_error!(&env, Error::NotEmpty);
        }

        let profits: i128 = stall.profits;
        if profits > 0 {
            pay_out(&env, &holder, profits);
        }
        remove_persistent(&env, &DataKey::Stall(stall_id));
        remove_persistent(&env, &DataKey::OwnerCap(cap_id));

        StallEvent::StallClosed(stall_id).publish(&env);

        profits
    }

    pub fn set_owner(env: Env, holder: Address, cap_id: u64, stall_id: u64, new_owner: Address) {
        let mut stall: Stall = require_cap(&env, &holder, cap_id, stall_id);
        stall.owner = new_owner;
        store_persistent(&env, &DataKey::Stall(stall_id), &stall);
    }

    pub fn set_allow_extensions(
        env: Env,
        holder: Address,
        cap_id: u64,
        stall_id: u64,
        allow: bool,
    ) {
        let mut stall: Stall = require_cap(&env, &holder, cap_id, stall_id);
        stall.allow_extensions = allow;
        store_persistent(&env, &DataKey::Stall(stall_id), &stall);
    }

    // Hands the owner capability to another party. There is no revocation:
    // whoever holds the capability owns the stall's privileged surface.
    pub fn transfer_capability(env: Env, holder: Address, cap_id: u64, new_holder: Address) {
        holder.require_auth();

        let mut cap: OwnerCap = match get_persistent(&env, &DataKey::OwnerCap(cap_id)) {
            Some(cap) => cap,
            None => panic_with_error!(&env, Error::NotOwner),
        };
        if cap.holder != holder {
            panic_with_error!(&env, Error::NotOwner);
        }

        cap.holder = new_holder;
        store_persistent(&env, &DataKey::OwnerCap(cap_id), &cap);
    }

    pub fn transfer_purchase_cap(env: Env, holder: Address, pcap_id: u64, new_holder: Address) {
        let mut cap: PurchaseCap = require_purchase_cap(&env, &holder, pcap_id);
        cap.holder = new_holder;
        store_persistent(&env, &DataKey::PurchaseCap(pcap_id), &cap);
    }

    // `None` drains the whole collected balance.
    pub fn withdraw(
        env: Env,
        holder: Address,
        cap_id: u64,
        stall_id: u64,
        amount: Option<i128>,
    ) -> i128 {
        let mut stall: Stall = require_cap(&env, &holder, cap_id, stall_id);

        let amount: i128 = amount.unwrap_or(stall.profits);
        if amount < 0 || amount > stall.profits {
            panic_with_error!(&env, Error::NotEnough);
        }

        stall.profits -= amount;
        store_persistent(&env, &DataKey::Stall(stall_id), &stall);
        pay_out(&env, &holder, amount);

        StallEvent::ProfitsWithdrawn(stall_id, amount).publish(&env);

        amount
    }

    pub fn place(env: Env, holder: Address, cap_id: u64, stall_id: u64, item: Item) {
        let mut stall: Stall = require_cap(&env, &holder, cap_id, stall_id);
        place_internal(&env, &mut stall, &item);
    }

    // Place plus a lock marker: the item can only ever leave through a
    // listing and sale, never through `take`.
    pub fn lock(
        env: Env,
        holder: Address,
        cap_id: u64,
        stall_id: u64,
        item: Item,
        policy: Address,
    ) {
        let mut stall: Stall = require_cap(&env, &holder, cap_id, stall_id);
        lock_internal(&env, &mut stall, &item, &policy);
    }

    pub fn take(env: Env, holder: Address, cap_id: u64, stall_id: u64, item_id: u64) -> Item {
        let mut stall: Stall = require_cap(&env, &holder, cap_id, stall_id);

        if has_persistent(&env, &DataKey::Lock(stall_id, item_id)) {
            panic_with_error!(&env, Error::ItemLocked);
        }
        match get_persistent(&env, &DataKey::Listing(stall_id, item_id)) {
            Some(Listing::Exclusive(..)) => panic_with_error!(&env, Error::ListedExclusively),
            // taking an item drops its plain listing with it
            Some(Listing::Plain(_)) => remove_persistent(&env, &DataKey::Listing(stall_id, item_id)),
            None => {}
        }

        let item: Item = match get_persistent(&env, &DataKey::Item(stall_id, item_id)) {
            Some(item) => item,
            None => panic_with_error!(&env, Error::ItemNotFound),
        };
        remove_persistent(&env, &DataKey::Item(stall_id, item_id));
        stall.item_count -= 1;
        store_persistent(&env, &DataKey::Stall(stall_id), &stall);

        item
    }

    pub fn list(
        env: Env,
        holder: Address,
        cap_id: u64,
        stall_id: u64,
        item_id: u64,
        price: i128,
    ) {
        require_cap(&env, &holder, cap_id, stall_id);

        if !has_persistent(&env, &DataKey::Item(stall_id, item_id)) {
            panic_with_error!(&env, Error::ItemNotFound);
        }
        match get_persistent(&env, &DataKey::Listing(stall_id, item_id)) {
            Some(Listing::Exclusive(..)) => panic_with_error!(&env, Error::ListedExclusively),
            Some(Listing::Plain(_)) => panic_with_error!(&env, Error::AlreadyListed),
            None => {}
        }

        store_persistent(
            &env,
            &DataKey::Listing(stall_id, item_id),
            &Listing::Plain(price),
        );

        StallEvent::ItemListed(stall_id, item_id, price).publish(&env);
    }

    pub fn delist(env: Env, holder: Address, cap_id: u64, stall_id: u64, item_id: u64) {
        require_cap(&env, &holder, cap_id, stall_id);

        match get_persistent(&env, &DataKey::Listing(stall_id, item_id)) {
            Some(Listing::Plain(_)) => remove_persistent(&env, &DataKey::Listing(stall_id, item_id)),
            Some(Listing::Exclusive(..)) => panic_with_error!(&env, Error::ListedExclusively),
            None => panic_with_error!(&env, Error::NotListed),
        }

        StallEvent::ItemDelisted(stall_id, item_id).publish(&env);
    }

    // Open to anyone holding the exact payment. The returned receipt must be
    // confirmed by the transfer policy covering the item's kind.
    pub fn purchase(
        env: Env,
        buyer: Address,
        stall_id: u64,
        item_id: u64,
        payment: i128,
    ) -> (Item, TradeReceipt) {
        buyer.require_auth();

        let mut stall: Stall = get_stall_by_id(&env, stall_id);
        let price: i128 = match get_persistent(&env, &DataKey::Listing(stall_id, item_id)) {
            Some(Listing::Plain(price)) => price,
            Some(Listing::Exclusive(..)) => panic_with_error!(&env, Error::ListedExclusively),
            None => panic_with_error!(&env, Error::NotListed),
        };
        if payment != price {
            panic_with_error!(&env, Error::IncorrectAmount);
        }

        collect_payment(&env, &buyer, price);
        let item: Item = detach_item(&env, &mut stall, item_id);
        stall.profits += price;
        store_persistent(&env, &DataKey::Stall(stall_id), &stall);

        StallEvent::ItemPurchased(stall_id, item_id, price).publish(&env);

        let receipt: TradeReceipt = TradeReceipt {
            stall_id,
            item_id,
            kind: item.kind.clone(),
            paid: price,
        };
        (item, receipt)
    }

    // The exclusive listing record exists exactly as long as the purchase
    // capability minted here does.
    pub fn list_exclusive(
        env: Env,
        holder: Address,
        cap_id: u64,
        stall_id: u64,
        item_id: u64,
        min_price: i128,
        to: Address,
    ) -> u64 {
        require_cap(&env, &holder, cap_id, stall_id);

        if !has_persistent(&env, &DataKey::Item(stall_id, item_id)) {
            panic_with_error!(&env, Error::ItemNotFound);
        }
        match get_persistent(&env, &DataKey::Listing(stall_id, item_id)) {
            Some(Listing::Exclusive(..)) => panic_with_error!(&env, Error::ListedExclusively),
            Some(Listing::Plain(_)) => panic_with_error!(&env, Error::AlreadyListed),
            None => {}
        }

        let pcap_id: u64 = next_id(&env);
        let pcap: PurchaseCap = PurchaseCap {
            id: pcap_id,
            stall_id,
            item_id,
            min_price,
            holder: to,
        };
        store_persistent(&env, &DataKey::PurchaseCap(pcap_id), &pcap);
        store_persistent(
            &env,
            &DataKey::Listing(stall_id, item_id),
            &Listing::Exclusive(min_price, pcap_id),
        );

        StallEvent::ItemListed(stall_id, item_id, min_price).publish(&env);

        pcap_id
    }

    pub fn purchase_with_cap(
        env: Env,
        buyer: Address,
        pcap_id: u64,
        stall_id: u64,
        item_id: u64,
        payment: i128,
    ) -> (Item, TradeReceipt) {
        let pcap: PurchaseCap = require_purchase_cap(&env, &buyer, pcap_id);
        if pcap.stall_id != stall_id {
            panic_with_error!(&env, Error::WrongStall);
        }
        if pcap.item_id != item_id {
            panic_with_error!(&env, Error::WrongItem);
        }
        if payment < pcap.min_price {
            panic_with_error!(&env, Error::NotEnough);
        }

        let mut stall: Stall = get_stall_by_id(&env, stall_id);
        collect_payment(&env, &buyer, payment);
        let item: Item = detach_item(&env, &mut stall, item_id);
        stall.profits += payment;
        store_persistent(&env, &DataKey::Stall(stall_id), &stall);
        remove_persistent(&env, &DataKey::PurchaseCap(pcap_id));

        StallEvent::ItemPurchased(stall_id, item_id, payment).publish(&env);

        let receipt: TradeReceipt = TradeReceipt {
            stall_id,
            item_id,
            kind: item.kind.clone(),
            paid: payment,
        };
        (item, receipt)
    }

    // Cancels the exclusive sale. Lock status and item count are untouched;
    // the item becomes listable and takeable again.
    pub fn return_purchase_cap(env: Env, holder: Address, pcap_id: u64, stall_id: u64) {
        let pcap: PurchaseCap = require_purchase_cap(&env, &holder, pcap_id);
        if pcap.stall_id != stall_id {
            panic_with_error!(&env, Error::WrongStall);
        }

        remove_persistent(&env, &DataKey::Listing(stall_id, pcap.item_id));
        remove_persistent(&env, &DataKey::PurchaseCap(pcap_id));
    }

    // Detach for in-place mutation. The receipt must come back through
    // `return_item` against the same stall and item.
    pub fn borrow_item(
        env: Env,
        holder: Address,
        cap_id: u64,
        stall_id: u64,
        item_id: u64,
    ) -> (Item, BorrowReceipt) {
        require_cap(&env, &holder, cap_id, stall_id);

        if has_persistent(&env, &DataKey::Borrowed(stall_id, item_id)) {
            panic_with_error!(&env, Error::ItemBorrowed);
        }
        let item: Item = match get_persistent(&env, &DataKey::Item(stall_id, item_id)) {
            Some(item) => item,
            None => panic_with_error!(&env, Error::ItemNotFound),
        };

        remove_persistent(&env, &DataKey::Item(stall_id, item_id));
        store_persistent(&env, &DataKey::Borrowed(stall_id, item_id), &true);

        let receipt: BorrowReceipt = BorrowReceipt { stall_id, item_id };
        (item, receipt)
    }

    pub fn return_item(env: Env, stall_id: u64, item: Item, receipt: BorrowReceipt) {
        if receipt.stall_id != stall_id {
            panic_with_error!(&env, Error::WrongStall);
        }
        if receipt.item_id != item.id {
            panic_with_error!(&env, Error::WrongItem);
        }
        if !has_persistent(&env, &DataKey::Borrowed(stall_id, item.id)) {
            panic_with_error!(&env, Error::NotBorrowed);
        }

        remove_persistent(&env, &DataKey::Borrowed(stall_id, item.id));
        store_persistent(&env, &DataKey::Item(stall_id, item.id), &item);
    }

    // Extensions are other contracts. Permissions are granted once at
    // install time and can only be cut off wholesale afterwards.
    pub fn install_extension(
        env: Env,
        holder: Address,
        cap_id: u64,
        stall_id: u64,
        ext: Address,
        permissions: u128,
    ) {
        require_cap(&env, &holder, cap_id, stall_id);

        if has_persistent(&env, &DataKey::Extension(stall_id, ext.clone())) {
            panic_with_error!(&env, Error::ExtensionAlreadyInstalled);
        }
        let record: Extension = Extension {
            permissions,
            enabled: true,
            entries: 0,
        };
        store_persistent(&env, &DataKey::Extension(stall_id, ext.clone()), &record);

        StallEvent::ExtensionInstalled(stall_id, ext, permissions).publish(&env);
    }

    pub fn enable_extension(env: Env, holder: Address, cap_id: u64, stall_id: u64, ext: Address) {
        require_cap(&env, &holder, cap_id, stall_id);
        let mut record: Extension = require_extension(&env, stall_id, &ext);
        record.enabled = true;
        store_persistent(&env, &DataKey::Extension(stall_id, ext), &record);
    }

    // Cuts off the extension's privileged calls. Its scratch storage stays
    // accessible.
    pub fn disable_extension(env: Env, holder: Address, cap_id: u64, stall_id: u64, ext: Address) {
        require_cap(&env, &holder, cap_id, stall_id);
        let mut record: Extension = require_extension(&env, stall_id, &ext);
        record.enabled = false;
        store_persistent(&env, &DataKey::Extension(stall_id, ext), &record);
    }

    pub fn remove_extension(env: Env, holder: Address, cap_id: u64, stall_id: u64, ext: Address) {
        require_cap(&env, &holder, cap_id, stall_id);

        let record: Extension = require_extension(&env, stall_id, &ext);
        if record.entries > 0 {
            panic_with_error!(&env, Error::NotEmpty);
        }
        remove_persistent(&env, &DataKey::Extension(stall_id, ext.clone()));

        StallEvent::ExtensionRemoved(stall_id, ext).publish(&env);
    }

    pub fn ext_place(env: Env, ext: Address, stall_id: u64, item: Item) {
        ext.require_auth();

        let record: Extension = require_extension(&env, stall_id, &ext);
        if !record.enabled {
            panic_with_error!(&env, Error::ExtensionDisabled);
        }
        // the lock permission carries the place permission with it
        if record.permissions & (PERM_PLACE | PERM_LOCK) == 0 {
            panic_with_error!(&env, Error::ExtensionNotAllowed);
        }

        let mut stall: Stall = get_stall_by_id(&env, stall_id);
        place_internal(&env, &mut stall, &item);
    }

    pub fn ext_lock(env: Env, ext: Address, stall_id: u64, item: Item, policy: Address) {
        ext.require_auth();

        let record: Extension = require_extension(&env, stall_id, &ext);
        if !record.enabled {
            panic_with_error!(&env, Error::ExtensionDisabled);
        }
        if record.permissions & PERM_LOCK == 0 {
            panic_with_error!(&env, Error::ExtensionNotAllowed);
        }

        let mut stall: Stall = get_stall_by_id(&env, stall_id);
        lock_internal(&env, &mut stall, &item, &policy);
    }

    // Scratch storage stays usable regardless of the enabled flag.
    pub fn ext_storage_set(
        env: Env,
        ext: Address,
        stall_id: u64,
        key: Bytes,
        value: Bytes,
    ) {
        ext.require_auth();

        let mut record: Extension = require_extension(&env, stall_id, &ext);
        let data_key = DataKey::ExtData(stall_id, ext.clone(), key);
        if !has_persistent(&env, &data_key) {
            record.entries += 1;
            store_persistent(&env, &DataKey::Extension(stall_id, ext), &record);
        }
        store_persistent(&env, &data_key, &value);
    }

    pub fn ext_storage_get(env: Env, ext: Address, stall_id: u64, key: Bytes) -> Option<Bytes> {
        get_persistent(&env, &DataKey::ExtData(stall_id, ext, key))
    }

    pub fn ext_storage_has(env: Env, ext: Address, stall_id: u64, key: Bytes) -> bool {
        has_persistent(&env, &DataKey::ExtData(stall_id, ext, key))
    }

    pub fn ext_storage_remove(env: Env, ext: Address, stall_id: u64, key: Bytes) {
        ext.require_auth();

        let mut record: Extension = require_extension(&env, stall_id, &ext);
        let data_key = DataKey::ExtData(stall_id, ext.clone(), key);
        if has_persistent(&env, &data_key) {
            remove_persistent(&env, &data_key);
            record.entries -= 1;
            store_persistent(&env, &DataKey::Extension(stall_id, ext), &record);
        }
    }

    pub fn has_item(env: Env, stall_id: u64, item_id: u64) -> bool {
        has_persistent(&env, &DataKey::Item(stall_id, item_id))
    }

    pub fn has_item_with_type(env: Env, stall_id: u64, item_id: u64, kind: Symbol) -> bool {
        match get_persistent::<DataKey, Item>(&env, &DataKey::Item(stall_id, item_id)) {
            Some(item) => item.kind == kind,
            None => false,
        }
    }

    pub fn is_locked(env: Env, stall_id: u64, item_id: u64) -> bool {
        has_persistent(&env, &DataKey::Lock(stall_id, item_id))
    }

    pub fn is_listed(env: Env, stall_id: u64, item_id: u64) -> bool {
        has_persistent(&env, &DataKey::Listing(stall_id, item_id))
    }

    pub fn is_listed_exclusively(env: Env, stall_id: u64, item_id: u64) -> bool {
        matches!(
            get_persistent(&env, &DataKey::Listing(stall_id, item_id)),
            Some(Listing::Exclusive(..))
        )
    }

    pub fn has_access(env: Env, cap_id: u64, stall_id: u64) -> bool {
        match get_persistent::<DataKey, OwnerCap>(&env, &DataKey::OwnerCap(cap_id)) {
            Some(cap) => cap.stall_id == stall_id,
            None => false,
        }
    }

    pub fn get_stall(env: Env, stall_id: u64) -> Stall {
        get_stall_by_id(&env, stall_id)
    }

    pub fn stall_owner(env: Env, stall_id: u64) -> Address {
        get_stall_by_id(&env, stall_id).owner
    }

    pub fn item_count(env: Env, stall_id: u64) -> u32 {
        get_stall_by_id(&env, stall_id).item_count
    }

    pub fn profits(env: Env, stall_id: u64) -> i128 {
        get_stall_by_id(&env, stall_id).profits
    }

    pub fn is_extension_installed(env: Env, stall_id: u64, ext: Address) -> bool {
        has_persistent(&env, &DataKey::Extension(stall_id, ext))
    }

    pub fn is_extension_enabled(env: Env, stall_id: u64, ext: Address) -> bool {
        match get_persistent::<DataKey, Extension>(&env, &DataKey::Extension(stall_id, ext)) {
            Some(record) => record.enabled,
            None => false,
        }
    }

    pub fn ext_can_place(env: Env, stall_id: u64, ext: Address) -> bool {
        match get_persistent::<DataKey, Extension>(&env, &DataKey::Extension(stall_id, ext)) {
            Some(record) => record.enabled && record.permissions & (PERM_PLACE | PERM_LOCK) != 0,
            None => false,
        }
    }

    pub fn ext_can_lock(env: Env, stall_id: u64, ext: Address) -> bool {
        match get_persistent::<DataKey, Extension>(&env, &DataKey::Extension(stall_id, ext)) {
            Some(record) => record.enabled && record.permissions & PERM_LOCK != 0,
            None => false,
        }
    }
}

#[cfg(test)]
mod test;
