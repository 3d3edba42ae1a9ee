//! Filtered listing and reindex tests.

use acc_core::ErrorKind;
use acc_integration_tests::TestEnv;
use acc_model::{Account, Group};
use acc_service::dto::{
    CreateAccountRequest, CreateGroupRequest, ListAccountsRequest, ListGroupsRequest,
    MemberRequest,
};
use acc_service::{AccountsService, GroupsService};

async fn seed(env: &TestEnv) -> anyhow::Result<()> {
    let accounts = [
        Account::new("einstein")
            .with_display_name("Albert Einstein")
            .with_login("einstein")
            .with_mail("einstein@example.org")
            .with_numbers(20000, 30000),
        Account::new("marie")
            .with_display_name("Marie Curie")
            .with_login("marie")
            .with_mail("marie@example.org")
            .with_numbers(20001, 30000),
        Account::new("richard")
            .with_display_name("Richard Feynman")
            .with_login("richard")
            .with_mail("richard@example.org")
            .with_numbers(20002, 30000)
            .with_enabled(false),
    ];
    for account in accounts {
        env.handle()
            .create_account(CreateAccountRequest {
                account: Some(account),
            })
            .await?;
    }
    for (id, gid) in [("physicists", 30000), ("chemists", 30001)] {
        env.handle()
            .create_group(CreateGroupRequest {
                group: Some(Group::new(id).with_display_name(id).with_gid_number(gid)),
            })
            .await?;
    }
    for (group, account) in [("physicists", "einstein"), ("physicists", "richard"), ("chemists", "marie")] {
        env.handle()
            .add_member(MemberRequest::new(group, account))
            .await?;
    }
    Ok(())
}

async fn account_ids(env: &TestEnv, query: &str) -> anyhow::Result<Vec<String>> {
    let response = env
        .handle()
        .list_accounts(ListAccountsRequest {
            query: query.to_string(),
        })
        .await?;
    let mut ids: Vec<_> = response.accounts.into_iter().map(|a| a.id).collect();
    ids.sort();
    Ok(ids)
}

async fn group_ids(env: &TestEnv, query: &str) -> anyhow::Result<Vec<String>> {
    let response = env
        .handle()
        .list_groups(ListGroupsRequest {
            query: query.to_string(),
        })
        .await?;
    let mut ids: Vec<_> = response.groups.into_iter().map(|g| g.id).collect();
    ids.sort();
    Ok(ids)
}

fn sorted_files(dir: &std::path::Path) -> anyhow::Result<Vec<String>> {
    let mut names = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    Ok(names)
}

/// Tests that a fresh server lists exactly what is on disk.
#[tokio::test]
async fn test_index_store_agreement() -> anyhow::Result<()> {
    let mut env = TestEnv::new().await?;
    seed(&env).await?;

    env.restart().await?;

    assert_eq!(
        account_ids(&env, "").await?,
        sorted_files(&env.data_path().join("accounts"))?
    );
    assert_eq!(
        group_ids(&env, "").await?,
        sorted_files(&env.data_path().join("groups"))?
    );

    Ok(())
}

/// Tests the supported filter constructs.
#[tokio::test]
async fn test_filters() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    seed(&env).await?;

    assert_eq!(account_ids(&env, "mail eq 'marie@example.org'").await?, ["marie"]);
    assert_eq!(account_ids(&env, "accountEnabled eq false").await?, ["richard"]);
    assert_eq!(account_ids(&env, "uidNumber ge 20001").await?, ["marie", "richard"]);
    assert_eq!(
        account_ids(&env, "memberOf eq 'physicists' and accountEnabled").await?,
        ["einstein"]
    );
    assert_eq!(
        account_ids(&env, "startswith(displayName, 'Ri') or endswith(mail, 'e@example.org')").await?,
        ["marie", "richard"]
    );
    assert_eq!(
        account_ids(&env, "not contains(displayName, 'Curie')").await?,
        ["einstein", "richard"]
    );
    assert_eq!(group_ids(&env, "members eq 'marie'").await?, ["chemists"]);
    assert_eq!(group_ids(&env, "gidNumber lt 30001").await?, ["physicists"]);

    Ok(())
}

/// Tests that listings never mix entity kinds.
#[tokio::test]
async fn test_listing_is_scoped_to_kind() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.handle()
        .create_account(CreateAccountRequest {
            account: Some(Account::new("shared").with_display_name("Shared")),
        })
        .await?;
    env.handle()
        .create_group(CreateGroupRequest {
            group: Some(Group::new("shared").with_display_name("Shared")),
        })
        .await?;

    assert_eq!(account_ids(&env, "displayName eq 'Shared'").await?, ["shared"]);
    assert_eq!(group_ids(&env, "displayName eq 'Shared'").await?, ["shared"]);

    env.handle().delete_group("shared").await?;
    assert_eq!(account_ids(&env, "").await?, ["shared"]);
    assert!(group_ids(&env, "").await?.is_empty());

    Ok(())
}

/// Tests that bad filters fail with typed errors.
#[tokio::test]
async fn test_filter_errors() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    seed(&env).await?;

    let cases = [
        ("shoeSize eq 42", ErrorKind::UnknownField),
        ("uidNumber eq 'twenty'", ErrorKind::UnsupportedQuery),
        ("memberOf/any(g: g eq 'physicists')", ErrorKind::UnsupportedQuery),
        ("displayName eq null", ErrorKind::UnsupportedQuery),
        ("displayName eq 'unterminated", ErrorKind::BadRequest),
        ("(mail eq 'x'", ErrorKind::BadRequest),
    ];
    for (query, expected) in cases {
        let err = env
            .handle()
            .list_accounts(ListAccountsRequest {
                query: query.to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), expected, "{query}");
    }

    for query in [
        format!("{}mail eq 'x'{}", "(".repeat(20_000), ")".repeat(20_000)),
        format!("{}mail eq 'x'{}", "(".repeat(1_000), ")".repeat(1_000)),
        format!("{}accountEnabled", "not ".repeat(500)),
    ] {
        let err = env
            .handle()
            .list_accounts(ListAccountsRequest { query })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
    assert_eq!(account_ids(&env, "mail eq 'marie@example.org'").await?, ["marie"]);

    Ok(())
}
