//! Account lifecycle tests.

use acc_core::ErrorKind;
use acc_integration_tests::TestEnv;
use acc_model::Account;
use acc_service::AccountsService;
use acc_service::dto::{AuthenticateRequest, CreateAccountRequest, UpdateAccountRequest};

async fn create(env: &TestEnv, account: Account) -> anyhow::Result<Account> {
    Ok(env
        .handle()
        .create_account(CreateAccountRequest {
            account: Some(account),
        })
        .await?)
}

fn einstein() -> Account {
    Account::new("einstein")
        .with_display_name("Albert Einstein")
        .with_preferred_name("einstein")
        .with_login("einstein")
        .with_mail("einstein@example.org")
        .with_numbers(20000, 30000)
        .with_password("relativity")
}

/// Tests that a created account reads back unchanged, also after a restart.
#[tokio::test]
async fn test_account_round_trip() -> anyhow::Result<()> {
    let mut env = TestEnv::new().await?;

    let created = create(&env, einstein()).await?;
    assert_eq!(env.handle().get_account("einstein").await?, created);

    env.restart().await?;
    assert_eq!(env.handle().get_account("einstein").await?, created);

    Ok(())
}

/// Tests that passwords are stored as Argon2 hashes and never returned.
#[tokio::test]
async fn test_password_storage() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let created = create(&env, einstein()).await?;
    assert!(created.password().is_none());

    let raw = std::fs::read_to_string(env.account_file("einstein"))?;
    let stored: serde_json::Value = serde_json::from_str(&raw)?;
    let hash = stored["passwordProfile"]["password"]
        .as_str()
        .expect("hash is stored");
    assert!(hash.starts_with("$argon2id$"));
    assert!(!raw.contains("relativity"));

    let fetched = env.handle().get_account("einstein").await?;
    assert!(fetched.password().is_none());
    let serialized = serde_json::to_string(&fetched)?;
    assert!(!serialized.contains("argon2"));

    Ok(())
}

/// Tests that only the right password authenticates an enabled account.
#[tokio::test]
async fn test_authenticate() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    create(&env, einstein()).await?;

    let login = |login: &str, password: &str| AuthenticateRequest {
        login: login.to_string(),
        password: password.to_string(),
    };

    let account = env.handle().authenticate(login("einstein", "relativity")).await?;
    assert_eq!(account.id, "einstein");

    let wrong = env.handle().authenticate(login("einstein", "gravity")).await;
    assert_eq!(wrong.unwrap_err().kind(), ErrorKind::InvalidCredentials);

    env.handle()
        .update_account(UpdateAccountRequest {
            account: Some(Account::new("einstein").with_enabled(false)),
            update_mask: vec!["accountEnabled".to_string()],
        })
        .await?;
    let disabled = env.handle().authenticate(login("einstein", "relativity")).await;
    assert_eq!(disabled.unwrap_err().kind(), ErrorKind::InvalidCredentials);

    Ok(())
}

/// Tests that update masks reject identity and membership paths.
#[tokio::test]
async fn test_update_mask_rejection() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    create(&env, einstein()).await?;

    for mask in [vec![], vec!["id"], vec!["memberOf"], vec!["shoeSize"]] {
        let err = env
            .handle()
            .update_account(UpdateAccountRequest {
                account: Some(Account::new("einstein").with_mail("other@example.org")),
                update_mask: mask.iter().map(ToString::to_string).collect(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest, "{mask:?}");
    }

    let account = env.handle().get_account("einstein").await?;
    assert_eq!(account.mail.as_deref(), Some("einstein@example.org"));

    Ok(())
}

/// Tests that hostile ids are rejected before touching the filesystem.
#[tokio::test]
async fn test_path_safety() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    for id in ["../evil", "..", "a/b", "a\\b", "a\0b", ".hidden", "/etc/passwd"] {
        let err = env
            .handle()
            .create_account(CreateAccountRequest {
                account: Some(Account::new(id)),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier, "{id:?}");

        let err = env.handle().get_account(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier, "{id:?}");
    }

    let mut entries: Vec<_> = std::fs::read_dir(env.data_path())?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    entries.sort();
    assert_eq!(entries, vec!["accounts", "groups"]);
    assert_eq!(std::fs::read_dir(env.data_path().join("accounts"))?.count(), 0);

    Ok(())
}

/// Tests that deleting an account removes it from store and listings.
#[tokio::test]
async fn test_delete_account() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    create(&env, einstein()).await?;

    env.handle().delete_account("einstein").await?;

    assert!(!env.account_file("einstein").exists());
    let err = env.handle().get_account("einstein").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let listed = env.handle().list_accounts(Default::default()).await?;
    assert!(listed.accounts.is_empty());

    Ok(())
}
