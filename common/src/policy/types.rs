use soroban_sdk::{contracterror, contracttype, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PolicyError {
    KindNotCovered = 1,
    ReceiptRejected = 2,
}

/// Pending-approval value produced by a completed sale. The stall contract
/// fills it in and hands it to the buyer; the transfer policy for the item's
/// kind must confirm it before the trade counts as fully authorized.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TradeReceipt {
    pub stall_id: u64,
    pub item_id: u64,
    pub kind: Symbol,
    pub paid: i128,
}
