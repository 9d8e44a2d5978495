use soroban_sdk::{contracterror, contracttype, Address, String, Vec};

// Storage keys for instance data
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Token,
    Config,
    NextCampaignId,
}

// Storage keys for persistent data
#[derive(Clone)]
#[contracttype]
pub enum PersistentKey {
    Campaign(CampaignId),
    Contribution(CampaignId, Address),
    Contributors(CampaignId),
    CampaignIndex,
    CreatorCampaigns(Address),
}

pub type CampaignId = u64;
pub type MilestoneIndex = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[contracttype]
pub enum CampaignStatus {
    Active,
    Successful,
    Failed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Milestone {
    pub description: String,
    pub amount: i128,
    pub completed: bool,
    pub released: bool,
    pub completed_at: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Campaign {
    pub id: CampaignId,
    pub owner: Address,
    pub beneficiary: Address,
    pub token: Address,
    pub title: String,
    pub description: String,
    pub goal: i128,
    pub min_contribution: i128,
    pub created_at: u64,
    pub deadline: u64,
    pub status: CampaignStatus,
    pub total_raised: i128,
    pub total_withdrawn: i128,
    pub total_refunded: i128,
    pub milestones: Vec<Milestone>,
    pub current_milestone: MilestoneIndex,
}

/// Read-only summary returned by `get_campaign_info`. `status` is the
/// effective status at the time of the query.
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct CampaignInfo {
    pub id: CampaignId,
    pub owner: Address,
    pub beneficiary: Address,
    pub title: String,
    pub description: String,
    pub goal: i128,
    pub created_at: u64,
    pub deadline: u64,
    pub status: CampaignStatus,
    pub total_raised: i128,
    pub total_withdrawn: i128,
    pub total_refunded: i128,
    pub escrowed: i128,
    pub progress: u32,
    pub contributors_count: u32,
    pub milestones_count: u32,
    pub current_milestone: MilestoneIndex,
    pub time_left: u64,
}

/// Tunables applied when campaigns are created and listed. A campaign copies
/// `min_contribution` at creation and keeps it for its whole life.
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct RegistryConfig {
    pub min_contribution: i128,
    pub max_milestones: u32,
    pub max_duration: u64,    // seconds
    pub max_page_size: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_contribution: DEFAULT_MIN_CONTRIBUTION,
            max_milestones: DEFAULT_MAX_MILESTONES,
            max_duration: DEFAULT_MAX_DURATION,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct RegistryStats {
    pub total: u32,
    pub active: u32,
    pub successful: u32,
    pub failed: u32,
    pub cancelled: u32,
    pub total_raised: i128,
}

// Error codes are banded by class, see `ErrorKind`.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    EmptyTitle = 1,
    EmptyDescription = 2,
    InvalidGoal = 3,
    InvalidDuration = 4,
    NoMilestones = 5,
    MilestoneLengthMismatch = 6,
    TooManyMilestones = 7,
    InvalidMilestoneAmount = 8,
    EmptyMilestoneDescription = 9,
    MilestoneSumMismatch = 10,
    InvalidAmount = 11,
    NothingToRefund = 12,
    InvalidConfig = 13,
    Overflow = 14,

    NotOwner = 21,
    NotBeneficiary = 22,

    AlreadyInitialized = 30,
    NotInitialized = 31,
    CampaignNotFound = 32,
    CampaignNotOpen = 33,
    NotActive = 34,
    NotSuccessful = 35,
    NotRefundable = 36,
    MilestoneNotFound = 37,
    MilestoneOutOfOrder = 38,
    MilestoneAlreadyCompleted = 39,
    MilestoneNotCompleted = 40,
    MilestoneAlreadyReleased = 41,

    InsufficientFunds = 50,

    TransferFailed = 60,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
    InsufficientFunds,
    TransferFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self as u32 {
            0..=19 => ErrorKind::Validation,
            20..=29 => ErrorKind::Authorization,
            30..=49 => ErrorKind::State,
            50..=59 => ErrorKind::InsufficientFunds,
            _ => ErrorKind::TransferFailure,
        }
    }
}

// Constants
pub const PERCENT: i128 = 100;
pub const SECONDS_PER_DAY: u64 = 86400;
pub const DEFAULT_MIN_CONTRIBUTION: i128 = 1;
pub const DEFAULT_MAX_MILESTONES: u32 = 20;
pub const DEFAULT_MAX_DURATION: u64 = 365 * SECONDS_PER_DAY;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 50;
pub const TTL_INSTANCE: u32 = 17280 * 30; // 30 days
pub const TTL_PERSISTENT: u32 = 17280 * 90; // 90 days
