#![no_std]
use common::policy::{
    interface::TransferPolicyInterface,
    types::{PolicyError, TradeReceipt},
};
use soroban_sdk::{contract, contractimpl, contracttype, Env, Symbol};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Covered(Symbol),
    Confirmations,
}

#[contract]
pub struct MockTransferPolicyContract;

#[contractimpl]
impl TransferPolicyInterface for MockTransferPolicyContract {
    fn allow(env: Env, kind: Symbol) {
        env.storage().instance().set(&DataKey::Covered(kind), &true);
    }

    fn covers(env: Env, kind: Symbol) -> bool {
        env.storage().instance().has(&DataKey::Covered(kind))
    }

    fn confirm(env: Env, receipt: TradeReceipt) -> Result<(), PolicyError> {
        if !env.storage().instance().has(&DataKey::Covered(receipt.kind)) {
            return Err(PolicyError::KindNotCovered);
        }
        let count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::Confirmations)
            .unwrap_or(0);
        env.storage().instance().set(&DataKey::Confirmations, &(count + 1));
        Ok(())
    }
}
