#![cfg(test)]

use super::*;
use crate::test::{create_campaign, days_to_seconds, funded_contributor, milestone_plan, setup};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    vec, Address, Env, String,
};

#[test]
fn test_initialize_only_once() {
    let s = setup();
    let other = Address::generate(&s.env);

    assert_eq!(
        s.client.try_initialize(&other, &s.token.address, &None),
        Err(Ok(Error::AlreadyInitialized))
    );
    assert_eq!(s.client.get_admin(), s.admin);
}

#[test]
fn test_create_requires_initialized_registry() {
    let env = Env::default();
    env.mock_all_auths();
    let client = CrowdfundContractClient::new(&env, &env.register(CrowdfundContract, ()));
    let creator = Address::generate(&env);
    let (descriptions, amounts) = milestone_plan(&env, &[10]);

    assert_eq!(
        client.try_create_campaign(
            &creator,
            &creator,
            &String::from_str(&env, "Title"),
            &String::from_str(&env, "Description"),
            &10,
            &100,
            &descriptions,
            &amounts,
        ),
        Err(Ok(Error::NotInitialized))
    );
    assert_eq!(client.try_get_config(), Err(Ok(Error::NotInitialized)));
    assert_eq!(client.campaign_count(), 0);
}

#[test]
fn test_initialize_rejects_invalid_config() {
    let env = Env::default();
    env.mock_all_auths();
    let client = CrowdfundContractClient::new(&env, &env.register(CrowdfundContract, ()));
    let admin = Address::generate(&env);
    let token = Address::generate(&env);

    let config = RegistryConfig {
        min_contribution: 0,
        ..RegistryConfig::default()
    };
    assert_eq!(
        client.try_initialize(&admin, &token, &Some(config)),
        Err(Ok(Error::InvalidConfig))
    );
    assert_eq!(Error::InvalidConfig.kind(), ErrorKind::Validation);
}

#[test]
fn test_ids_and_indexes() {
    let s = setup();
    let first = create_campaign(&s, 10, 1000, &[10]);
    let second = create_campaign(&s, 20, 1000, &[5, 15]);

    let other_creator = Address::generate(&s.env);
    let (descriptions, amounts) = milestone_plan(&s.env, &[7]);
    let third = s.client.create_campaign(
        &other_creator,
        &s.beneficiary,
        &String::from_str(&s.env, "Library Roof"),
        &String::from_str(&s.env, "Replace the roof before the rains"),
        &7,
        &500,
        &descriptions,
        &amounts,
    );

    assert_eq!((first, second, third), (1, 2, 3));
    assert_eq!(s.client.campaign_count(), 3);
    assert_eq!(s.client.list_all(), vec![&s.env, 1u64, 2, 3]);
    assert_eq!(s.client.list_by_creator(&s.owner), vec![&s.env, 1u64, 2]);
    assert_eq!(s.client.list_by_creator(&other_creator), vec![&s.env, 3u64]);
    assert_eq!(
        s.client.list_by_creator(&Address::generate(&s.env)).len(),
        0
    );

    assert!(s.client.is_known(&2));
    assert!(!s.client.is_known(&4));
    assert!(!s.client.is_known(&0));

    let campaign = s.client.get_campaign(&third);
    assert_eq!(campaign.owner, other_creator);
    assert_eq!(campaign.token, s.token.address);
    assert_eq!(campaign.deadline, campaign.created_at + 500);
}

#[test]
fn test_paginate() {
    let s = setup();
    for _ in 0..5 {
        create_campaign(&s, 10, 1000, &[10]);
    }

    assert_eq!(s.client.paginate(&0, &2), vec![&s.env, 1u64, 2]);
    assert_eq!(s.client.paginate(&2, &2), vec![&s.env, 3u64, 4]);
    assert_eq!(s.client.paginate(&4, &2), vec![&s.env, 5u64]);
    assert_eq!(s.client.paginate(&5, &2).len(), 0);
    assert_eq!(s.client.paginate(&u32::MAX, &u32::MAX).len(), 0);
    assert_eq!(s.client.paginate(&0, &0).len(), 0);
    assert_eq!(s.client.paginate(&1, &u32::MAX).len(), 4);

    s.client.update_config(&RegistryConfig {
        max_page_size: 3,
        ..RegistryConfig::default()
    });
    assert_eq!(s.client.paginate(&0, &10), vec![&s.env, 1u64, 2, 3]);
}

#[test]
fn test_stats_reflect_effective_status() {
    let s = setup();
    let succeeded = create_campaign(&s, 10, 1000, &[10]);
    let expired = create_campaign(&s, 10, 100, &[10]);
    let cancelled = create_campaign(&s, 10, 1000, &[10]);
    let open = create_campaign(&s, 10, 1000, &[10]);
    let alice = funded_contributor(&s, 100);

    s.client.contribute(&succeeded, &alice, &10);
    s.client.contribute(&expired, &alice, &3);
    s.client.contribute(&open, &alice, &4);
    s.client.cancel_campaign(&cancelled, &s.owner);

    s.env.ledger().set_timestamp(100);
    // Still stored as active, counted as failed.
    assert_eq!(s.client.get_state(&expired), CampaignStatus::Active);

    let stats = s.client.stats();
    assert_eq!(
        stats,
        RegistryStats {
            total: 4,
            active: 1,
            successful: 1,
            failed: 1,
            cancelled: 1,
            total_raised: 17,
        }
    );
    assert_eq!(s.client.get_state(&expired), CampaignStatus::Active);

    // Refunds do not lower the raised total.
    s.client.get_refund(&expired, &alice);
    assert_eq!(s.client.stats().total_raised, 17);
}

#[test]
fn test_config_bounds_apply_to_new_campaigns() {
    let s = setup();
    let existing = create_campaign(&s, 10, days_to_seconds(30), &[4, 3, 3]);

    let config = RegistryConfig {
        min_contribution: 5,
        max_milestones: 2,
        max_duration: days_to_seconds(7),
        max_page_size: 10,
    };
    s.client.update_config(&config);
    assert_eq!(s.client.get_config(), config);

    let (descriptions, amounts) = milestone_plan(&s.env, &[4, 3, 3]);
    assert_eq!(
        s.client.try_create_campaign(
            &s.owner,
            &s.beneficiary,
            &String::from_str(&s.env, "Title"),
            &String::from_str(&s.env, "Description"),
            &10,
            &days_to_seconds(1),
            &descriptions,
            &amounts,
        ),
        Err(Ok(Error::TooManyMilestones))
    );
    let (descriptions, amounts) = milestone_plan(&s.env, &[5, 5]);
    assert_eq!(
        s.client.try_create_campaign(
            &s.owner,
            &s.beneficiary,
            &String::from_str(&s.env, "Title"),
            &String::from_str(&s.env, "Description"),
            &10,
            &days_to_seconds(8),
            &descriptions,
            &amounts,
        ),
        Err(Ok(Error::InvalidDuration))
    );

    // The campaign created under the old limits keeps its schedule and its
    // contribution floor.
    let existing_campaign = s.client.get_campaign(&existing);
    assert_eq!(existing_campaign.milestones.len(), 3);
    assert_eq!(existing_campaign.deadline, days_to_seconds(30));
    assert_eq!(existing_campaign.min_contribution, 1);

    let alice = funded_contributor(&s, 100);
    s.client.contribute(&existing, &alice, &1);
    assert_eq!(s.client.get_contribution(&existing, &alice), 1);

    let (descriptions, amounts) = milestone_plan(&s.env, &[5, 5]);
    let fresh = s.client.create_campaign(
        &s.owner,
        &s.beneficiary,
        &String::from_str(&s.env, "Title"),
        &String::from_str(&s.env, "Description"),
        &10,
        &days_to_seconds(7),
        &descriptions,
        &amounts,
    );
    assert_eq!(s.client.get_campaign(&fresh).min_contribution, 5);
    assert_eq!(
        s.client.try_contribute(&fresh, &alice, &4),
        Err(Ok(Error::InvalidAmount))
    );
    s.client.contribute(&fresh, &alice, &5);
    assert_eq!(s.client.get_contribution(&fresh, &alice), 5);
}

#[test]
fn test_raising_the_floor_does_not_block_live_campaigns() {
    let s = setup();
    let campaign_id = create_campaign(&s, 10, 1000, &[10]);
    let alice = funded_contributor(&s, 100);

    s.client.update_config(&RegistryConfig {
        min_contribution: 50,
        ..RegistryConfig::default()
    });

    s.client.contribute(&campaign_id, &alice, &2);
    s.client.contribute(&campaign_id, &alice, &8);
    assert_eq!(s.client.get_state(&campaign_id), CampaignStatus::Successful);
    assert_eq!(s.client.get_contribution(&campaign_id, &alice), 10);
}

#[test]
fn test_update_config_rejects_invalid_values() {
    let s = setup();

    let config = RegistryConfig {
        max_page_size: 0,
        ..RegistryConfig::default()
    };
    assert_eq!(
        s.client.try_update_config(&config),
        Err(Ok(Error::InvalidConfig))
    );
    assert_eq!(s.client.get_config(), RegistryConfig::default());
}
