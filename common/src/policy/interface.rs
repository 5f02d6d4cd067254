use soroban_sdk::{contractclient, Env, Symbol};

use super::types::{PolicyError, TradeReceipt};

#[contractclient(name = "TransferPolicyClient")]
pub trait TransferPolicyInterface {
    /// Register trade rules for an item kind. Until a kind is covered,
    /// stalls refuse to lock items of that kind.
    fn allow(env: Env, kind: Symbol);
    fn covers(env: Env, kind: Symbol) -> bool;
    fn confirm(env: Env, receipt: TradeReceipt) -> Result<(), PolicyError>;
}
