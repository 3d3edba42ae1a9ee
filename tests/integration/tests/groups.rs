//! Group and membership tests.

use acc_core::ErrorKind;
use acc_integration_tests::TestEnv;
use acc_model::{Account, Group, Reference};
use acc_service::dto::{CreateAccountRequest, CreateGroupRequest, ListGroupsRequest, MemberRequest};
use acc_service::{AccountsService, GroupsService};

async fn account(env: &TestEnv, id: &str) -> anyhow::Result<()> {
    env.handle()
        .create_account(CreateAccountRequest {
            account: Some(Account::new(id).with_login(id)),
        })
        .await?;
    Ok(())
}

async fn group(env: &TestEnv, group: Group) -> anyhow::Result<Group> {
    Ok(env
        .handle()
        .create_group(CreateGroupRequest { group: Some(group) })
        .await?)
}

fn member_ids(group: &Group) -> Vec<&str> {
    group.members.iter().map(Reference::id).collect()
}

/// Tests the create, add member, remove member flow.
#[tokio::test]
async fn test_membership_scenario() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let generated = group(&env, Group::default()).await?;
    assert!(!generated.id.is_empty());
    let listed = env.handle().list_groups(ListGroupsRequest::default()).await?;
    assert!(listed.groups.iter().any(|g| g.id == generated.id));

    account(&env, "u1").await?;
    group(&env, Group::new("g1")).await?;

    env.handle().add_member(MemberRequest::new("g1", "u1")).await?;
    let g1 = env.handle().get_group("g1").await?;
    assert_eq!(g1.members.len(), 1);
    assert_eq!(g1.members[0].as_expanded().map(|a| a.id.as_str()), Some("u1"));

    env.handle().remove_member(MemberRequest::new("g1", "u1")).await?;
    let g1 = env.handle().get_group("g1").await?;
    assert!(g1.members.is_empty());

    Ok(())
}

/// Tests that repeated membership edits do not duplicate or fail.
#[tokio::test]
async fn test_membership_idempotence() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    account(&env, "u1").await?;
    group(&env, Group::new("g1")).await?;

    env.handle().add_member(MemberRequest::new("g1", "u1")).await?;
    let g1 = env.handle().add_member(MemberRequest::new("g1", "u1")).await?;
    assert_eq!(member_ids(&g1), vec!["u1"]);
    let u1 = env.handle().get_account("u1").await?;
    assert_eq!(u1.member_of.len(), 1);

    env.handle().remove_member(MemberRequest::new("g1", "u1")).await?;
    let g1 = env.handle().remove_member(MemberRequest::new("g1", "u1")).await?;
    assert!(g1.members.is_empty());

    Ok(())
}

/// Tests that both sides of an edge agree after every edit.
#[tokio::test]
async fn test_membership_symmetry() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    for id in ["u1", "u2"] {
        account(&env, id).await?;
    }
    for id in ["g1", "g2"] {
        group(&env, Group::new(id)).await?;
    }

    for (g, u) in [("g1", "u1"), ("g1", "u2"), ("g2", "u1")] {
        env.handle().add_member(MemberRequest::new(g, u)).await?;
    }
    env.handle().remove_member(MemberRequest::new("g1", "u1")).await?;

    let u1 = env.handle().get_account("u1").await?;
    let u1_groups: Vec<_> = u1.member_of.iter().map(Reference::id).collect();
    assert_eq!(u1_groups, vec!["g2"]);
    assert_eq!(member_ids(&env.handle().get_group("g1").await?), vec!["u2"]);
    assert_eq!(member_ids(&env.handle().get_group("g2").await?), vec!["u1"]);

    Ok(())
}

/// Tests that deleting a group strips it from every member.
#[tokio::test]
async fn test_group_delete_cascade() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    group(&env, Group::new("physicists")).await?;
    group(&env, Group::new("chemists")).await?;
    for id in ["u1", "u2", "u3"] {
        account(&env, id).await?;
        env.handle()
            .add_member(MemberRequest::new("physicists", id))
            .await?;
    }
    env.handle()
        .add_member(MemberRequest::new("chemists", "u3"))
        .await?;

    env.handle().delete_group("physicists").await?;

    assert!(!env.group_file("physicists").exists());
    for id in ["u1", "u2", "u3"] {
        let account = env.handle().get_account(id).await?;
        assert!(!account.is_member_of("physicists"), "{id}");
    }
    assert!(env.handle().get_account("u3").await?.is_member_of("chemists"));

    Ok(())
}

/// Tests membership edits against missing entities.
#[tokio::test]
async fn test_membership_errors() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    group(&env, Group::new("g1")).await?;

    let err = env
        .handle()
        .add_member(MemberRequest::new("g1", "ghost"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = env
        .handle()
        .add_member(MemberRequest::new("../g1", "ghost"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);

    let err = env.handle().delete_group("nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    Ok(())
}

/// Tests that members of a deleted account are skipped on expansion.
#[tokio::test]
async fn test_account_delete_leaves_group_reference() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    account(&env, "u1").await?;
    account(&env, "u2").await?;
    group(&env, Group::new("g1")).await?;
    env.handle().add_member(MemberRequest::new("g1", "u1")).await?;
    env.handle().add_member(MemberRequest::new("g1", "u2")).await?;

    env.handle().delete_account("u2").await?;

    let raw = std::fs::read_to_string(env.group_file("g1"))?;
    assert!(raw.contains("u2"));
    let members = env.handle().list_members("g1").await?.members;
    let ids: Vec<_> = members.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["u1"]);

    Ok(())
}
