use soroban_sdk::Env;

use crate::storage_types::{Error, RegistryConfig, PERCENT, SECONDS_PER_DAY};

/// Convert seconds to whole days, rounding down
pub fn seconds_to_days(seconds: u64) -> u32 {
    (seconds / SECONDS_PER_DAY).min(u32::MAX as u64) as u32
}

/// Get current timestamp
pub fn get_current_timestamp(env: &Env) -> u64 {
    env.ledger().timestamp()
}

/// Integer percentage of `part` in `whole`, capped at 100. Zero when `whole`
/// is not positive.
pub fn percentage_of(part: i128, whole: i128) -> u32 {
    if whole <= 0 || part <= 0 {
        return 0;
    }
    (part.saturating_mul(PERCENT) / whole).min(PERCENT) as u32
}

pub fn validate_config(config: &RegistryConfig) -> Result<(), Error> {
    if config.min_contribution < 1
        || config.max_milestones == 0
        || config.max_duration == 0
        || config.max_page_size == 0
    {
        return Err(Error::InvalidConfig);
    }
    Ok(())
}
