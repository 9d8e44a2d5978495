use soroban_sdk::{log, token, Address, Env};

use crate::storage_types::Error;

/// Pull a contribution from `from` into the contract's custody.
pub fn collect(env: &Env, token_address: &Address, from: &Address, amount: i128) -> Result<(), Error> {
    let to = env.current_contract_address();
    transfer(env, token_address, from, &to, amount)
}

/// Pay `amount` out of custody to `to`. Ledger effects must already be
/// persisted when this is called.
pub fn disburse(env: &Env, token_address: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    let from = env.current_contract_address();
    transfer(env, token_address, &from, to, amount)
}

fn transfer(
    env: &Env,
    token_address: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), Error> {
    let token_client = token::TokenClient::new(env, token_address);

    // A failed token call comes back as an error instead of trapping, so the
    // caller can return `TransferFailed` and let the host drop its writes.
    match token_client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "token transfer rejected: {} from {} to {}", amount, from.clone(), to.clone());
            Err(Error::TransferFailed)
        }
    }
}
