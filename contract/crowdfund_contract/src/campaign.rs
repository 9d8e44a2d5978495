//! Per-campaign fund-custody state machine.
//!
//! Everything here operates on an in-memory [`Campaign`] record. Callers load
//! the record, apply one transition, persist it and only then move tokens.
//! A campaign starts `Active` and ends in exactly one of `Successful`,
//! `Failed` or `Cancelled`. The deadline transition is lazy: it is applied by
//! [`Campaign::refresh`] whenever an operation looks at the clock.

use soroban_sdk::{Address, Env, String, Vec};

use crate::storage_types::*;
use crate::utils;

/// Creation parameters as supplied to `create_campaign`.
pub struct CampaignParams {
    pub beneficiary: Address,
    pub title: String,
    pub description: String,
    pub goal: i128,
    pub duration: u64,
    pub milestone_descriptions: Vec<String>,
    pub milestone_amounts: Vec<i128>,
}

impl CampaignParams {
    /// Checks the parameters against `config`. On success the milestone
    /// amounts are known to be positive and to sum to `goal`.
    pub fn validate(&self, config: &RegistryConfig) -> Result<(), Error> {
        if self.title.len() == 0 {
            return Err(Error::EmptyTitle);
        }
        if self.description.len() == 0 {
            return Err(Error::EmptyDescription);
        }
        if self.goal <= 0 {
            return Err(Error::InvalidGoal);
        }
        if self.duration == 0 || self.duration > config.max_duration {
            return Err(Error::InvalidDuration);
        }

        let count = self.milestone_amounts.len();
        if self.milestone_descriptions.len() != count {
            return Err(Error::MilestoneLengthMismatch);
        }
        if count == 0 {
            return Err(Error::NoMilestones);
        }
        if count > config.max_milestones {
            return Err(Error::TooManyMilestones);
        }

        let mut sum: i128 = 0;
        for (description, amount) in self
            .milestone_descriptions
            .iter()
            .zip(self.milestone_amounts.iter())
        {
            if description.len() == 0 {
                return Err(Error::EmptyMilestoneDescription);
            }
            if amount <= 0 {
                return Err(Error::InvalidMilestoneAmount);
            }
            sum = sum.checked_add(amount).ok_or(Error::Overflow)?;
        }
        if sum != self.goal {
            return Err(Error::MilestoneSumMismatch);
        }

        Ok(())
    }
}

impl Campaign {
    pub fn new(
        env: &Env,
        id: CampaignId,
        owner: Address,
        token: Address,
        params: CampaignParams,
        config: &RegistryConfig,
    ) -> Result<Self, Error> {
        params.validate(config)?;

        let created_at = utils::get_current_timestamp(env);
        let deadline = created_at
            .checked_add(params.duration)
            .ok_or(Error::Overflow)?;

        let mut milestones = Vec::new(env);
        for (description, amount) in params
            .milestone_descriptions
            .iter()
            .zip(params.milestone_amounts.iter())
        {
            milestones.push_back(Milestone {
                description,
                amount,
                completed: false,
                released: false,
                completed_at: None,
            });
        }

        Ok(Campaign {
            id,
            owner,
            beneficiary: params.beneficiary,
            token,
            title: params.title,
            description: params.description,
            goal: params.goal,
            min_contribution: config.min_contribution,
            created_at,
            deadline,
            status: CampaignStatus::Active,
            total_raised: 0,
            total_withdrawn: 0,
            total_refunded: 0,
            milestones,
            current_milestone: 0,
        })
    }

    /// Transition that is due at `now`, if any. Only `Active` campaigns move.
    pub fn due_transition(&self, now: u64) -> Option<CampaignStatus> {
        if self.status != CampaignStatus::Active {
            return None;
        }
        if self.total_raised >= self.goal {
            Some(CampaignStatus::Successful)
        } else if now >= self.deadline {
            Some(CampaignStatus::Failed)
        } else {
            None
        }
    }

    /// Applies the due transition and returns the new status when one
    /// happened. Calling it again at the same time is a no-op.
    pub fn refresh(&mut self, now: u64) -> Option<CampaignStatus> {
        let next = self.due_transition(now)?;
        self.status = next;
        Some(next)
    }

    /// Status as it would read right after a refresh at `now`.
    pub fn effective_status(&self, now: u64) -> CampaignStatus {
        self.due_transition(now).unwrap_or(self.status)
    }

    /// Openness is derived from the clock, never from the stored status
    /// alone.
    pub fn is_open(&self, now: u64) -> bool {
        self.status == CampaignStatus::Active && now < self.deadline
    }

    pub fn is_refund_eligible(&self, now: u64) -> bool {
        matches!(
            self.effective_status(now),
            CampaignStatus::Failed | CampaignStatus::Cancelled
        )
    }

    pub fn escrowed(&self) -> i128 {
        self.total_raised - self.total_withdrawn - self.total_refunded
    }

    pub fn progress(&self) -> u32 {
        utils::percentage_of(self.total_raised, self.goal)
    }

    pub fn time_left(&self, now: u64) -> u64 {
        self.deadline.saturating_sub(now)
    }

    pub fn days_left(&self, now: u64) -> u32 {
        utils::seconds_to_days(self.time_left(now))
    }

    /// Books an accepted contribution into the totals. Returns the
    /// `Successful` transition when this contribution crosses the goal.
    pub fn accept_contribution(
        &mut self,
        amount: i128,
        now: u64,
    ) -> Result<Option<CampaignStatus>, Error> {
        if !self.is_open(now) {
            return Err(Error::CampaignNotOpen);
        }
        if amount <= 0 || amount < self.min_contribution {
            return Err(Error::InvalidAmount);
        }

        self.total_raised = self
            .total_raised
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        Ok(self.refresh(now))
    }

    /// Marks milestone `index` completed. Milestones complete strictly in
    /// order, so `index` must equal `current_milestone`.
    pub fn complete_milestone(
        &mut self,
        sender: &Address,
        index: MilestoneIndex,
        now: u64,
    ) -> Result<i128, Error> {
        if *sender != self.beneficiary {
            return Err(Error::NotBeneficiary);
        }
        if self.status != CampaignStatus::Successful {
            return Err(Error::NotSuccessful);
        }

        let mut milestone = self
            .milestones
            .get(index)
            .ok_or(Error::MilestoneNotFound)?;
        if milestone.completed || index < self.current_milestone {
            return Err(Error::MilestoneAlreadyCompleted);
        }
        if index > self.current_milestone {
            return Err(Error::MilestoneOutOfOrder);
        }

        milestone.completed = true;
        milestone.completed_at = Some(now);
        let amount = milestone.amount;
        self.milestones.set(index, milestone);
        self.current_milestone += 1;

        Ok(amount)
    }

    /// Books the release of a completed milestone. The caller must persist
    /// the campaign before paying out the returned amount.
    pub fn release_milestone(
        &mut self,
        sender: &Address,
        index: MilestoneIndex,
    ) -> Result<i128, Error> {
        if *sender != self.beneficiary {
            return Err(Error::NotBeneficiary);
        }
        if self.status != CampaignStatus::Successful {
            return Err(Error::NotSuccessful);
        }

        let mut milestone = self
            .milestones
            .get(index)
            .ok_or(Error::MilestoneNotFound)?;
        if !milestone.completed {
            return Err(Error::MilestoneNotCompleted);
        }
        if milestone.released {
            return Err(Error::MilestoneAlreadyReleased);
        }
        if self.escrowed() < milestone.amount {
            return Err(Error::InsufficientFunds);
        }

        milestone.released = true;
        let amount = milestone.amount;
        self.milestones.set(index, milestone);
        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        Ok(amount)
    }

    /// Books a refund of `held`, the contributor's current ledger entry. The
    /// caller zeroes the entry and persists both before paying out.
    pub fn book_refund(&mut self, held: i128, now: u64) -> Result<i128, Error> {
        if !self.is_refund_eligible(now) {
            return Err(Error::NotRefundable);
        }
        if held <= 0 {
            return Err(Error::NothingToRefund);
        }
        if self.escrowed() < held {
            return Err(Error::InsufficientFunds);
        }

        self.total_refunded = self
            .total_refunded
            .checked_add(held)
            .ok_or(Error::Overflow)?;
        Ok(held)
    }

    pub fn cancel(&mut self, sender: &Address) -> Result<(), Error> {
        if *sender != self.owner {
            return Err(Error::NotOwner);
        }
        if self.status != CampaignStatus::Active {
            return Err(Error::NotActive);
        }

        self.status = CampaignStatus::Cancelled;
        Ok(())
    }

    pub fn info(&self, now: u64, contributors_count: u32) -> CampaignInfo {
        CampaignInfo {
            id: self.id,
            owner: self.owner.clone(),
            beneficiary: self.beneficiary.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            goal: self.goal,
            created_at: self.created_at,
            deadline: self.deadline,
            status: self.effective_status(now),
            total_raised: self.total_raised,
            total_withdrawn: self.total_withdrawn,
            total_refunded: self.total_refunded,
            escrowed: self.escrowed(),
            progress: self.progress(),
            contributors_count,
            milestones_count: self.milestones.len(),
            current_milestone: self.current_milestone,
            time_left: self.time_left(now),
        }
    }
}
