use soroban_sdk::{contracttype, Address, Env, String, Symbol};

use crate::storage_types::{CampaignId, CampaignStatus, MilestoneIndex};

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignCreatedEvent {
    pub campaign_id: CampaignId,
    pub beneficiary: Address,
    pub title: String,
    pub goal: i128,
    pub deadline: u64,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct ContributionMadeEvent {
    pub campaign_id: CampaignId,
    pub sender: Address,
    pub amount: i128,
    pub total_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignStateChangedEvent {
    pub campaign_id: CampaignId,
    pub status: CampaignStatus,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneCompletedEvent {
    pub campaign_id: CampaignId,
    pub index: MilestoneIndex,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct FundsWithdrawnEvent {
    pub campaign_id: CampaignId,
    pub amount: i128,
    pub index: MilestoneIndex,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct RefundIssuedEvent {
    pub campaign_id: CampaignId,
    pub sender: Address,
    pub amount: i128,
}

pub fn emit_campaign_created(env: &Env, event: CampaignCreatedEvent) {
    env.events()
        .publish((Symbol::new(env, "campaign_created"),), event);
}

pub fn emit_contribution_made(env: &Env, event: ContributionMadeEvent) {
    env.events()
        .publish((Symbol::new(env, "contribution_made"),), event);
}

pub fn emit_state_changed(env: &Env, campaign_id: CampaignId, status: CampaignStatus) {
    env.events().publish(
        (Symbol::new(env, "campaign_state_changed"),),
        CampaignStateChangedEvent { campaign_id, status },
    );
}

pub fn emit_milestone_completed(env: &Env, event: MilestoneCompletedEvent) {
    env.events()
        .publish((Symbol::new(env, "milestone_completed"),), event);
}

pub fn emit_funds_withdrawn(env: &Env, event: FundsWithdrawnEvent) {
    env.events()
        .publish((Symbol::new(env, "funds_withdrawn"),), event);
}

pub fn emit_refund_issued(env: &Env, event: RefundIssuedEvent) {
    env.events()
        .publish((Symbol::new(env, "refund_issued"),), event);
}
