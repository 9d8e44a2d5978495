use soroban_sdk::{Address, Env, Vec};

use crate::storage_types::*;

pub fn extend_instance(e: &Env) {
    e.storage().instance().extend_ttl(TTL_INSTANCE, TTL_INSTANCE);
}

pub fn extend_persistent(e: &Env, key: &PersistentKey) {
    e.storage().persistent().extend_ttl(key, TTL_PERSISTENT, TTL_PERSISTENT);
}

pub fn is_initialized(e: &Env) -> bool {
    e.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(e: &Env) -> Result<Address, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn get_token(e: &Env) -> Result<Address, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub fn get_config(e: &Env) -> Result<RegistryConfig, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(e: &Env, config: &RegistryConfig) {
    e.storage().instance().set(&DataKey::Config, config);
}

/// Hands out the next campaign id. Ids start at 1.
pub fn take_next_campaign_id(e: &Env) -> CampaignId {
    let id: CampaignId = e
        .storage()
        .instance()
        .get(&DataKey::NextCampaignId)
        .unwrap_or(1);
    e.storage().instance().set(&DataKey::NextCampaignId, &(id + 1));
    id
}

pub fn load_campaign(e: &Env, campaign_id: CampaignId) -> Result<Campaign, Error> {
    e.storage()
        .persistent()
        .get(&PersistentKey::Campaign(campaign_id))
        .ok_or(Error::CampaignNotFound)
}

pub fn save_campaign(e: &Env, campaign: &Campaign) {
    let key = PersistentKey::Campaign(campaign.id);
    e.storage().persistent().set(&key, campaign);
    extend_persistent(e, &key);
}

pub fn is_known(e: &Env, campaign_id: CampaignId) -> bool {
    e.storage()
        .persistent()
        .has(&PersistentKey::Campaign(campaign_id))
}

// Contribution ledger

pub fn contribution_of(e: &Env, campaign_id: CampaignId, contributor: &Address) -> i128 {
    e.storage()
        .persistent()
        .get(&PersistentKey::Contribution(campaign_id, contributor.clone()))
        .unwrap_or(0)
}

pub fn set_contribution(e: &Env, campaign_id: CampaignId, contributor: &Address, amount: i128) {
    let key = PersistentKey::Contribution(campaign_id, contributor.clone());
    e.storage().persistent().set(&key, &amount);
    extend_persistent(e, &key);
}

pub fn contributors(e: &Env, campaign_id: CampaignId) -> Vec<Address> {
    e.storage()
        .persistent()
        .get(&PersistentKey::Contributors(campaign_id))
        .unwrap_or(Vec::new(e))
}

pub fn contributors_count(e: &Env, campaign_id: CampaignId) -> u32 {
    contributors(e, campaign_id).len()
}

/// Appends `contributor` to the campaign's contributor list unless it is
/// already there. The ledger entry of a listed contributor always exists, so
/// the entry doubles as the membership check.
pub fn record_contributor(e: &Env, campaign_id: CampaignId, contributor: &Address) {
    if e.storage()
        .persistent()
        .has(&PersistentKey::Contribution(campaign_id, contributor.clone()))
    {
        return;
    }

    let key = PersistentKey::Contributors(campaign_id);
    let mut list = contributors(e, campaign_id);
    list.push_back(contributor.clone());
    e.storage().persistent().set(&key, &list);
    extend_persistent(e, &key);
}

// Campaign index

pub fn index_campaign(e: &Env, creator: &Address, campaign_id: CampaignId) {
    let mut all = list_all(e);
    all.push_back(campaign_id);
    e.storage().persistent().set(&PersistentKey::CampaignIndex, &all);
    extend_persistent(e, &PersistentKey::CampaignIndex);

    let creator_key = PersistentKey::CreatorCampaigns(creator.clone());
    let mut by_creator = list_by_creator(e, creator);
    by_creator.push_back(campaign_id);
    e.storage().persistent().set(&creator_key, &by_creator);
    extend_persistent(e, &creator_key);
}

pub fn list_all(e: &Env) -> Vec<CampaignId> {
    e.storage()
        .persistent()
        .get(&PersistentKey::CampaignIndex)
        .unwrap_or(Vec::new(e))
}

pub fn list_by_creator(e: &Env, creator: &Address) -> Vec<CampaignId> {
    e.storage()
        .persistent()
        .get(&PersistentKey::CreatorCampaigns(creator.clone()))
        .unwrap_or(Vec::new(e))
}

pub fn paginate(e: &Env, offset: u32, limit: u32, max_page_size: u32) -> Vec<CampaignId> {
    let all = list_all(e);
    let len = all.len();
    let limit = limit.min(max_page_size);
    if offset >= len || limit == 0 {
        return Vec::new(e);
    }

    let end = offset.saturating_add(limit).min(len);
    all.slice(offset..end)
}

/// Aggregates over every campaign using the status each one would have after
/// a refresh at `now`. Nothing is written.
pub fn stats(e: &Env, now: u64) -> Result<RegistryStats, Error> {
    let mut stats = RegistryStats {
        total: 0,
        active: 0,
        successful: 0,
        failed: 0,
        cancelled: 0,
        total_raised: 0,
    };

    for campaign_id in list_all(e).iter() {
        let campaign = load_campaign(e, campaign_id)?;
        stats.total += 1;
        match campaign.effective_status(now) {
            CampaignStatus::Active => stats.active += 1,
            CampaignStatus::Successful => stats.successful += 1,
            CampaignStatus::Failed => stats.failed += 1,
            CampaignStatus::Cancelled => stats.cancelled += 1,
        }
        stats.total_raised = stats
            .total_raised
            .checked_add(campaign.total_raised)
            .ok_or(Error::Overflow)?;
    }

    Ok(stats)
}
