#![no_std]

mod campaign;
mod custody;
pub mod events;
mod registry;
mod storage_types;
mod utils;

#[cfg(test)]
mod test_registry;

use soroban_sdk::{contract, contractimpl, log, Address, Env, String, Vec};

pub use campaign::CampaignParams;
pub use storage_types::*;
pub use utils::*;

#[contract]
pub struct CrowdfundContract;

#[contractimpl]
impl CrowdfundContract {
    /// Initialize the registry with its admin, the custody token and optional
    /// configuration overrides
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        config: Option<RegistryConfig>,
    ) -> Result<(), Error> {
        if registry::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        let config = config.unwrap_or_default();
        utils::validate_config(&config)?;

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::NextCampaignId, &1u64);
        registry::set_config(&env, &config);
        registry::extend_instance(&env);

        Ok(())
    }

    /// Replace the registry configuration. Existing campaigns keep the goal,
    /// deadline, milestones and contribution floor they were created with.
    pub fn update_config(env: Env, config: RegistryConfig) -> Result<(), Error> {
        let admin = registry::get_admin(&env)?;
        admin.require_auth();

        utils::validate_config(&config)?;
        registry::set_config(&env, &config);
        registry::extend_instance(&env);

        Ok(())
    }

    /// Create a new campaign owned by `creator`
    pub fn create_campaign(
        env: Env,
        creator: Address,
        beneficiary: Address,
        title: String,
        description: String,
        goal: i128,
        duration: u64,
        milestone_descriptions: Vec<String>,
        milestone_amounts: Vec<i128>,
    ) -> Result<CampaignId, Error> {
        creator.require_auth();

        let config = registry::get_config(&env)?;
        let token = registry::get_token(&env)?;
        let params = CampaignParams {
            beneficiary,
            title,
            description,
            goal,
            duration,
            milestone_descriptions,
            milestone_amounts,
        };

        let campaign_id = registry::take_next_campaign_id(&env);
        let campaign = Campaign::new(&env, campaign_id, creator.clone(), token, params, &config)?;

        registry::save_campaign(&env, &campaign);
        registry::index_campaign(&env, &creator, campaign_id);
        registry::extend_instance(&env);

        log!(&env, "campaign {} created by {}", campaign_id, creator);
        events::emit_campaign_created(
            &env,
            events::CampaignCreatedEvent {
                campaign_id,
                beneficiary: campaign.beneficiary,
                title: campaign.title,
                goal: campaign.goal,
                deadline: campaign.deadline,
                created_at: campaign.created_at,
            },
        );

        Ok(campaign_id)
    }

    /// Contribute `amount` to an open campaign
    pub fn contribute(
        env: Env,
        campaign_id: CampaignId,
        sender: Address,
        amount: i128,
    ) -> Result<(), Error> {
        sender.require_auth();

        let now = utils::get_current_timestamp(&env);
        let mut campaign = registry::load_campaign(&env, campaign_id)?;
        let transition = campaign.accept_contribution(amount, now)?;

        registry::record_contributor(&env, campaign_id, &sender);
        let held = registry::contribution_of(&env, campaign_id, &sender)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        registry::set_contribution(&env, campaign_id, &sender, held);
        registry::save_campaign(&env, &campaign);
        registry::extend_instance(&env);

        custody::collect(&env, &campaign.token, &sender, amount)?;

        log!(&env, "campaign {} raised {} of {}", campaign_id, campaign.total_raised, campaign.goal);
        events::emit_contribution_made(
            &env,
            events::ContributionMadeEvent {
                campaign_id,
                sender,
                amount,
                total_raised: campaign.total_raised,
            },
        );
        if let Some(status) = transition {
            events::emit_state_changed(&env, campaign_id, status);
        }

        Ok(())
    }

    /// Mark the next pending milestone as completed (beneficiary only)
    pub fn complete_milestone(
        env: Env,
        campaign_id: CampaignId,
        sender: Address,
        index: MilestoneIndex,
    ) -> Result<(), Error> {
        sender.require_auth();

        let now = utils::get_current_timestamp(&env);
        let (mut campaign, transition) = load_refreshed(&env, campaign_id, now)?;
        let amount = campaign.complete_milestone(&sender, index, now)?;

        registry::save_campaign(&env, &campaign);
        registry::extend_instance(&env);

        emit_transition(&env, campaign_id, transition);
        events::emit_milestone_completed(
            &env,
            events::MilestoneCompletedEvent {
                campaign_id,
                index,
                amount,
            },
        );

        Ok(())
    }

    /// Release the escrowed amount of a completed milestone to the beneficiary
    pub fn withdraw_milestone_funds(
        env: Env,
        campaign_id: CampaignId,
        sender: Address,
        index: MilestoneIndex,
    ) -> Result<(), Error> {
        sender.require_auth();

        let now = utils::get_current_timestamp(&env);
        let Payout {
            campaign,
            amount,
            transition,
        } = stage_release(&env, campaign_id, &sender, index, now)?;

        custody::disburse(&env, &campaign.token, &campaign.beneficiary, amount)?;

        log!(&env, "campaign {} released milestone {}", campaign_id, index);
        emit_transition(&env, campaign_id, transition);
        events::emit_funds_withdrawn(
            &env,
            events::FundsWithdrawnEvent {
                campaign_id,
                amount,
                index,
            },
        );

        Ok(())
    }

    /// Return the sender's contribution from a failed or cancelled campaign
    pub fn get_refund(env: Env, campaign_id: CampaignId, sender: Address) -> Result<i128, Error> {
        sender.require_auth();

        let now = utils::get_current_timestamp(&env);
        let Payout {
            campaign,
            amount,
            transition,
        } = stage_refund(&env, campaign_id, &sender, now)?;

        custody::disburse(&env, &campaign.token, &sender, amount)?;

        log!(&env, "campaign {} refunded {} to {}", campaign_id, amount, sender);
        emit_transition(&env, campaign_id, transition);
        events::emit_refund_issued(
            &env,
            events::RefundIssuedEvent {
                campaign_id,
                sender,
                amount,
            },
        );

        Ok(amount)
    }

    /// Cancel an active campaign (owner only)
    pub fn cancel_campaign(env: Env, campaign_id: CampaignId, sender: Address) -> Result<(), Error> {
        sender.require_auth();

        let now = utils::get_current_timestamp(&env);
        // A due transition leaves the campaign non-active, so `cancel` fails
        // and nothing of the refresh is kept.
        let (mut campaign, _) = load_refreshed(&env, campaign_id, now)?;
        campaign.cancel(&sender)?;

        registry::save_campaign(&env, &campaign);
        registry::extend_instance(&env);

        events::emit_state_changed(&env, campaign_id, CampaignStatus::Cancelled);

        Ok(())
    }

    /// Apply any due goal/deadline transition. Anyone may call this.
    pub fn refresh_state(env: Env, campaign_id: CampaignId) -> Result<CampaignStatus, Error> {
        let now = utils::get_current_timestamp(&env);
        let (campaign, transition) = load_refreshed(&env, campaign_id, now)?;

        if transition.is_some() {
            registry::save_campaign(&env, &campaign);
            registry::extend_instance(&env);
            emit_transition(&env, campaign_id, transition);
        }

        Ok(campaign.status)
    }

    /// View functions
    pub fn get_campaign(env: Env, campaign_id: CampaignId) -> Result<Campaign, Error> {
        registry::load_campaign(&env, campaign_id)
    }

    pub fn get_campaign_info(env: Env, campaign_id: CampaignId) -> Result<CampaignInfo, Error> {
        let campaign = registry::load_campaign(&env, campaign_id)?;
        let now = utils::get_current_timestamp(&env);
        Ok(campaign.info(now, registry::contributors_count(&env, campaign_id)))
    }

    /// Stored status. It may still read `Active` after the deadline until
    /// something refreshes the campaign.
    pub fn get_state(env: Env, campaign_id: CampaignId) -> Result<CampaignStatus, Error> {
        Ok(registry::load_campaign(&env, campaign_id)?.status)
    }

    pub fn get_milestone(
        env: Env,
        campaign_id: CampaignId,
        index: MilestoneIndex,
    ) -> Result<Milestone, Error> {
        registry::load_campaign(&env, campaign_id)?
            .milestones
            .get(index)
            .ok_or(Error::MilestoneNotFound)
    }

    pub fn get_all_milestones(env: Env, campaign_id: CampaignId) -> Result<Vec<Milestone>, Error> {
        Ok(registry::load_campaign(&env, campaign_id)?.milestones)
    }

    pub fn get_contributors(env: Env, campaign_id: CampaignId) -> Result<Vec<Address>, Error> {
        ensure_known(&env, campaign_id)?;
        Ok(registry::contributors(&env, campaign_id))
    }

    pub fn get_contributors_count(env: Env, campaign_id: CampaignId) -> Result<u32, Error> {
        ensure_known(&env, campaign_id)?;
        Ok(registry::contributors_count(&env, campaign_id))
    }

    pub fn get_contribution(
        env: Env,
        campaign_id: CampaignId,
        contributor: Address,
    ) -> Result<i128, Error> {
        ensure_known(&env, campaign_id)?;
        Ok(registry::contribution_of(&env, campaign_id, &contributor))
    }

    pub fn get_progress(env: Env, campaign_id: CampaignId) -> Result<u32, Error> {
        Ok(registry::load_campaign(&env, campaign_id)?.progress())
    }

    pub fn get_time_left(env: Env, campaign_id: CampaignId) -> Result<u64, Error> {
        let now = utils::get_current_timestamp(&env);
        Ok(registry::load_campaign(&env, campaign_id)?.time_left(now))
    }

    pub fn get_days_left(env: Env, campaign_id: CampaignId) -> Result<u32, Error> {
        let now = utils::get_current_timestamp(&env);
        Ok(registry::load_campaign(&env, campaign_id)?.days_left(now))
    }

    pub fn get_escrowed(env: Env, campaign_id: CampaignId) -> Result<i128, Error> {
        Ok(registry::load_campaign(&env, campaign_id)?.escrowed())
    }

    /// Registry queries
    pub fn list_all(env: Env) -> Vec<CampaignId> {
        registry::list_all(&env)
    }

    pub fn list_by_creator(env: Env, creator: Address) -> Vec<CampaignId> {
        registry::list_by_creator(&env, &creator)
    }

    pub fn paginate(env: Env, offset: u32, limit: u32) -> Result<Vec<CampaignId>, Error> {
        let config = registry::get_config(&env)?;
        Ok(registry::paginate(&env, offset, limit, config.max_page_size))
    }

    pub fn is_known(env: Env, campaign_id: CampaignId) -> bool {
        registry::is_known(&env, campaign_id)
    }

    pub fn campaign_count(env: Env) -> u32 {
        registry::list_all(&env).len()
    }

    pub fn stats(env: Env) -> Result<RegistryStats, Error> {
        let now = utils::get_current_timestamp(&env);
        registry::stats(&env, now)
    }

    pub fn get_config(env: Env) -> Result<RegistryConfig, Error> {
        registry::get_config(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        registry::get_admin(&env)
    }

    pub fn get_token(env: Env) -> Result<Address, Error> {
        registry::get_token(&env)
    }
}

// Helper functions
fn load_refreshed(
    env: &Env,
    campaign_id: CampaignId,
    now: u64,
) -> Result<(Campaign, Option<CampaignStatus>), Error> {
    let mut campaign = registry::load_campaign(env, campaign_id)?;
    let transition = campaign.refresh(now);
    Ok((campaign, transition))
}

/// A booked payout whose effects are already in storage.
struct Payout {
    campaign: Campaign,
    amount: i128,
    transition: Option<CampaignStatus>,
}

/// Books the release of milestone `index` and stores the released flag and
/// withdrawn total. Tokens move only after this returns.
fn stage_release(
    env: &Env,
    campaign_id: CampaignId,
    sender: &Address,
    index: MilestoneIndex,
    now: u64,
) -> Result<Payout, Error> {
    let (mut campaign, transition) = load_refreshed(env, campaign_id, now)?;
    let amount = campaign.release_milestone(sender, index)?;

    registry::save_campaign(env, &campaign);
    registry::extend_instance(env);

    Ok(Payout {
        campaign,
        amount,
        transition,
    })
}

/// Books a refund of the sender's whole contribution and stores the zeroed
/// ledger entry and refunded total. Tokens move only after this returns.
fn stage_refund(
    env: &Env,
    campaign_id: CampaignId,
    sender: &Address,
    now: u64,
) -> Result<Payout, Error> {
    let (mut campaign, transition) = load_refreshed(env, campaign_id, now)?;
    let held = registry::contribution_of(env, campaign_id, sender);
    let amount = campaign.book_refund(held, now)?;

    registry::set_contribution(env, campaign_id, sender, 0);
    registry::save_campaign(env, &campaign);
    registry::extend_instance(env);

    Ok(Payout {
        campaign,
        amount,
        transition,
    })
}

fn emit_transition(env: &Env, campaign_id: CampaignId, transition: Option<CampaignStatus>) {
    if let Some(status) = transition {
        events::emit_state_changed(env, campaign_id, status);
    }
}

fn ensure_known(env: &Env, campaign_id: CampaignId) -> Result<(), Error> {
    if !registry::is_known(env, campaign_id) {
        return Err(Error::CampaignNotFound);
    }
    Ok(())
}
