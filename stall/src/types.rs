use soroban_sdk::{contracterror, contracttype, symbol_short, Address, Bytes, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    StallNotFound = 2,
    NotOwner = 3,
    ItemNotFound = 4,
    ItemAlreadyPlaced = 5,
    ItemLocked = 6,
    AlreadyListed = 7,
    ListedExclusively = 8,
    NotListed = 9,
    IncorrectAmount = 10,
    NotEnough = 11,
    WrongStall = 12,
    WrongItem = 13,
    NotEmpty = 14,
    PolicyNotCovered = 15,
    ExtensionAlreadyInstalled = 16,
    ExtensionNotInstalled = 17,
    ExtensionDisabled = 18,
    ExtensionNotAllowed = 19,
    ItemBorrowed = 20,
    NotBorrowed = 21,
    InsufficientBalance = 22,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Stall {
    pub id: u64,
    pub owner: Address, // informational, never an authorization input
    pub profits: i128,
    pub item_count: u32,
    pub allow_extensions: bool, // legacy flag, kept for older indexers
}

/// The one token whose possession authorizes owner-level calls on the stall
/// it is bound to. Minted once, together with the stall.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerCap {
    pub id: u64,
    pub stall_id: u64,
    pub holder: Address,
}

/// Single-use right to buy one exclusively listed item at or above
/// `min_price`. Consumed by `purchase_with_cap` or `return_purchase_cap`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PurchaseCap {
    pub id: u64,
    pub stall_id: u64,
    pub item_id: u64,
    pub min_price: i128,
    pub holder: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    pub id: u64,
    pub kind: Symbol,
    pub data: Bytes,
}

/// Proof that an item was detached for in-place mutation. Must be handed
/// back to `return_item` against the same stall and item.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowReceipt {
    pub stall_id: u64,
    pub item_id: u64,
}

/// Listing state of an item. A single tagged value, so a plain and an
/// exclusive listing can never coexist for one item.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Listing {
    Plain(i128),
    // minimum price plus the id of the purchase capability backing it
    Exclusive(i128, u64),
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Extension {
    pub permissions: u128,
    pub enabled: bool,
    pub entries: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Sequence,
    Stall(u64),
    OwnerCap(u64),
    Item(u64, u64),    // (stall, item)
    Lock(u64, u64),    // (stall, item), presence disables `take`
    Listing(u64, u64), // (stall, item)
    PurchaseCap(u64),
    Borrowed(u64, u64),          // (stall, item), outstanding borrow marker
    Extension(u64, Address),     // (stall, extension contract)
    ExtData(u64, Address, Bytes), // (stall, extension contract, key)
}

pub const PERM_PLACE: u128 = 1;
pub const PERM_LOCK: u128 = 2;

pub const ADMIN: Symbol = symbol_short!("ADMIN");
pub const PAYMENT_TOKEN: Symbol = symbol_short!("PAY_TOKEN");
