use soroban_sdk::{Address, Env, IntoVal, Val, Vec};

pub enum StallEvent {
    Initialized(Address),
    Upgraded(u32),
    StallCreated(u64, Address),
    StallClosed(u64),
    ItemListed(u64, u64, i128),
    ItemDelisted(u64, u64),
    ItemPurchased(u64, u64, i128),
    ProfitsWithdrawn(u64, i128),
    ExtensionInstalled(u64, Address, u128),
    ExtensionRemoved(u64, Address),
}

impl StallEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StallEvent::Initialized(..) => stringify!(Initialized),
            StallEvent::Upgraded(..) => stringify!(Upgraded),
            StallEvent::StallCreated(..) => stringify!(StallCreated),
            StallEvent::StallClosed(..) => stringify!(StallClosed),
            StallEvent::ItemListed(..) => stringify!(ItemListed),
            StallEvent::ItemDelisted(..) => stringify!(ItemDelisted),
            StallEvent::ItemPurchased(..) => stringify!(ItemPurchased),
            StallEvent::ProfitsWithdrawn(..) => stringify!(ProfitsWithdrawn),
            StallEvent::ExtensionInstalled(..) => stringify!(ExtensionInstalled),
            StallEvent::ExtensionRemoved(..) => stringify!(ExtensionRemoved),
        }
    }

    pub fn publish(&self, env: &Env) {
        let mut v: Vec<Val> = Vec::new(&env);

        match self {
            StallEvent::Initialized(payment_token) => {
                v.push_back(payment_token.into_val(env));
            }
            StallEvent::Upgraded(version) => {
                v.push_back(version.into_val(env));
            }
            StallEvent::StallCreated(stall_id, owner) => {
                v.push_back(stall_id.into_val(env));
                v.push_back(owner.into_val(env));
            }
            StallEvent::StallClosed(stall_id) => {
                v.push_back(stall_id.into_val(env));
            }
            StallEvent::ItemListed(stall_id, item_id, price) => {
                v.push_back(stall_id.into_val(env));
                v.push_back(item_id.into_val(env));
                v.push_back(price.into_val(env));
            }
            StallEvent::ItemDelisted(stall_id, item_id) => {
                v.push_back(stall_id.into_val(env));
                v.push_back(item_id.into_val(env));
            }
            StallEvent::ItemPurchased(stall_id, item_id, price) => {
                v.push_back(stall_id.into_val(env));
                v.push_back(item_id.into_val(env));
                v.push_back(price.into_val(env));
            }
            StallEvent::ProfitsWithdrawn(stall_id, amount) => {
                v.push_back(stall_id.into_val(env));
                v.push_back(amount.into_val(env));
            }
            StallEvent::ExtensionInstalled(stall_id, ext, permissions) => {
                v.push_back(stall_id.into_val(env));
                v.push_back(ext.into_val(env));
                v.push_back(permissions.into_val(env));
            }
            StallEvent::ExtensionRemoved(stall_id, ext) => {
                v.push_back(stall_id.into_val(env));
                v.push_back(ext.into_val(env));
            }
        }

        env.events().publish((self.name(),), v)
    }
}
