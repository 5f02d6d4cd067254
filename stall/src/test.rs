#![cfg(test)]
extern crate std;

use super::*;
use common::policy::interface::TransferPolicyClient;
use soroban_sdk::testutils::{Address as _, StellarAssetContract};
use soroban_sdk::{token, Address};
use transfer_policy_mock::MockTransferPolicyContract;

fn create_stall_contract<'a>(env: &Env) -> StallContractClient<'a> {
    let contract_id = env.register(StallContract, ());
    let contract_client = StallContractClient::new(&env, &contract_id);
    contract_client
}

fn create_policy_contract<'a>(env: &Env) -> TransferPolicyClient<'a> {
    let contract_id: Address = env.register(MockTransferPolicyContract, ());
    let contract_client: TransferPolicyClient<'a> = TransferPolicyClient::new(&env, &contract_id);
    contract_client
}

fn create_token_contract<'a>(
    e: &Env,
    admin: &Address,
) -> (token::Client<'a>, token::StellarAssetClient<'a>) {
    let sac: StellarAssetContract = e.register_stellar_asset_contract_v2(admin.clone());
    (
        token::Client::new(e, &sac.address()),
        token::StellarAssetClient::new(e, &sac.address()),
    )
}

pub struct StallTest {
    env: Env,
    stall_client: StallContractClient<'static>,
    policy_client: TransferPolicyClient<'static>,
    token_client: token::Client<'static>,
    alice: Address,
    bob: Address,
    admin: Address,
}

impl StallTest {
    fn setup() -> Self {
        let env: Env = Env::default();
        env.mock_all_auths();

        let stall_client: StallContractClient<'_> = create_stall_contract(&env);
        let policy_client: TransferPolicyClient<'_> = create_policy_contract(&env);

        // Generate the accounts (users)
        let alice: Address = Address::generate(&env);
        let bob: Address = Address::generate(&env);
        let admin: Address = Address::generate(&env);

        assert_ne!(alice, bob);
        assert_ne!(alice, admin);
        assert_ne!(bob, admin);

        let (token_client, token_admin_client) = create_token_contract(&env, &admin);
        token_admin_client.mint(&bob, &10_000_0000000_i128);

        stall_client.initialize(&admin, &token_client.address);

        StallTest {
            env,
            stall_client,
            policy_client,
            token_client,
            alice,
            bob,
            admin,
        }
    }

    // A stall owned by alice, ready for use.
    fn open_stall(&self) -> (u64, u64) {
        self.stall_client.create_stall(&self.alice)
    }

    fn artwork(&self, id: u64) -> Item {
        Item {
            id,
            kind: Symbol::new(&self.env, "artwork"),
            data: Bytes::from_slice(&self.env, b"ipfs://bafy-artwork-record"),
        }
    }

    fn ticket(&self, id: u64) -> Item {
        Item {
            id,
            kind: Symbol::new(&self.env, "ticket"),
            data: Bytes::from_slice(&self.env, b"row-4-seat-12"),
        }
    }
}

mod listing;
