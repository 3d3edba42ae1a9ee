//! Account operations.

use acc_model::{Account, EntityKind};
use acc_search::filter::{CompareOp, Expr, Literal, Operand};
use acc_storage::SafeId;
use chrono::Utc;

use crate::directory::{Directory, hydrate};
use crate::dto::{CreateAccountRequest, UpdateAccountRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::mask;

impl Directory {
    /// Creates an account.
    ///
    /// An empty id is replaced with a random UUID. Group references are
    /// stored as given, reduced to their ids. A plaintext password is
    /// hashed before the account is written.
    ///
    /// ## Errors
    ///
    /// - `BadRequest` if the request carries no account
    /// - `InvalidIdentifier` if the id is not usable as a file name
    /// - `AlreadyExists` if an account with the id exists
    pub fn create_account(&self, request: CreateAccountRequest) -> ServiceResult<Account> {
        let Some(mut account) = request.account else {
            return Err(ServiceError::bad_request("account is required"));
        };
        let id = SafeId::parse(account.ensure_id())?;
        if self.accounts.exists(&id)? {
            return Err(ServiceError::already_exists(EntityKind::Account, id.as_str()));
        }

        self.deflate_member_of(&mut account);
        self.hash_password(&mut account)?;
        let now = Utc::now();
        account.created_date_time = Some(now);
        account.last_modified_date_time = Some(now);

        self.accounts.save(&account)?;
        self.index.index_account(&account)?;

        tracing::info!(account_id = %id, "Created account");
        account.redact_password();
        Ok(account)
    }

    /// Loads an account with its groups expanded.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidIdentifier` or `NotFound`.
    pub fn get_account(&self, id: &str) -> ServiceResult<Account> {
        let id = SafeId::parse(id)?;
        let mut account = self.accounts.load(&id)?;
        self.expand_member_of(&mut account);
        account.redact_password();
        Ok(account)
    }

    /// Copies the masked properties of the request onto the stored account.
    ///
    /// ## Errors
    ///
    /// - `BadRequest` if the account is missing or the mask is empty, names
    ///   an immutable property or an unknown one
    /// - `InvalidIdentifier` or `NotFound` for the target id
    pub fn update_account(&self, request: UpdateAccountRequest) -> ServiceResult<Account> {
        let Some(mut source) = request.account else {
            return Err(ServiceError::bad_request("account is required"));
        };
        let paths = mask::account_paths(&request.update_mask)?;
        let id = SafeId::parse(&source.id)?;

        let guard = self.edits.lock();
        let mut account = self.accounts.load(&id)?;
        if let Some(password) = mask::apply_account(&mut account, &mut source, &paths) {
            let hash = self.hasher.hash(&password)?;
            if let Some(profile) = account.password_profile.as_mut() {
                profile.password = Some(hash);
            }
        }
        account.last_modified_date_time = Some(Utc::now());

        self.accounts.save(&account)?;
        self.index.index_account(&account)?;
        drop(guard);

        tracing::info!(account_id = %id, fields = paths.len(), "Updated account");
        self.expand_member_of(&mut account);
        account.redact_password();
        Ok(account)
    }

    /// Deletes an account.
    ///
    /// Groups that list the account keep their reference; it is dropped
    /// when those groups are expanded.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidIdentifier` or `NotFound`.
    pub fn delete_account(&self, id: &str) -> ServiceResult<()> {
        let id = SafeId::parse(id)?;
        self.accounts.delete(&id)?;
        self.index.remove(EntityKind::Account, id.as_str())?;

        tracing::info!(account_id = %id, "Deleted account");
        Ok(())
    }

    /// Checks a login and password.
    ///
    /// Returns the first enabled account with a matching login whose stored
    /// hash verifies.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidCredentials` for an unknown login, a disabled account
    /// or a wrong password alike.
    pub fn authenticate(&self, login: &str, password: &str) -> ServiceResult<Account> {
        if login.is_empty() || password.is_empty() {
            return Err(ServiceError::InvalidCredentials);
        }

        let by_login = Expr::Compare {
            op: CompareOp::Eq,
            left: Operand::Property("onPremisesSamAccountName".to_string()),
            right: Operand::Literal(Literal::String(login.to_string())),
        };
        let query = self.index.expr_query(EntityKind::Account, &by_login)?;
        let ids = self.index.search(query.as_ref())?;

        let account = hydrate(EntityKind::Account, ids, |id| self.accounts.load(id))
            .into_iter()
            .filter(|account| account.account_enabled)
            .find(|account| {
                account
                    .password()
                    .is_some_and(|hash| self.hasher.verify(password, hash).is_ok())
            });

        match account {
            Some(mut account) => {
                tracing::debug!(account_id = %account.id, "Authenticated");
                account.redact_password();
                Ok(account)
            }
            None => {
                tracing::debug!(login, "Authentication failed");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    fn hash_password(&self, account: &mut Account) -> ServiceResult<()> {
        let Some(profile) = account.password_profile.as_mut() else {
            return Ok(());
        };
        profile.password = match profile.password.take().filter(|p| !p.is_empty()) {
            Some(plain) => Some(self.hasher.hash(&plain)?),
            None => None,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use acc_core::ErrorKind;
    use acc_model::{Account, Reference};
    use acc_storage::{AccountStore, SafeId};

    use super::*;
    use crate::testing::{directory, directory_with_store, offline_directory};

    fn create(directory: &Directory, account: Account) -> Account {
        directory
            .create_account(CreateAccountRequest {
                account: Some(account),
            })
            .unwrap()
    }

    #[test]
    fn create_then_get() {
        let (_dir, directory) = directory();
        let created = create(
            &directory,
            Account::new("einstein")
                .with_display_name("Albert Einstein")
                .with_mail("einstein@example.org"),
        );

        assert!(created.created_date_time.is_some());
        let loaded = directory.get_account("einstein").unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn create_assigns_missing_id() {
        let (_dir, directory) = directory();
        let created = create(&directory, Account::new(""));

        assert_eq!(created.id.len(), 36);
        assert!(directory.get_account(&created.id).is_ok());
    }

    #[test]
    fn create_rejects_bad_requests() {
        let (_dir, directory) = directory();
        create(&directory, Account::new("einstein"));

        let missing = directory.create_account(CreateAccountRequest::default());
        assert_eq!(missing.unwrap_err().kind(), ErrorKind::BadRequest);

        let duplicate = directory.create_account(CreateAccountRequest {
            account: Some(Account::new("einstein")),
        });
        assert_eq!(duplicate.unwrap_err().kind(), ErrorKind::AlreadyExists);

        let traversal = directory.create_account(CreateAccountRequest {
            account: Some(Account::new("../../etc/passwd")),
        });
        assert_eq!(traversal.unwrap_err().kind(), ErrorKind::InvalidIdentifier);
    }

    #[test]
    fn create_surfaces_store_failures() {
        let directory = offline_directory();

        let err = directory
            .create_account(CreateAccountRequest {
                account: Some(Account::new("einstein")),
            })
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        let query = directory.index().list_query(EntityKind::Account, None).unwrap();
        assert!(directory.index().search(query.as_ref()).unwrap().is_empty());
    }

    #[test]
    fn create_stores_references_deflated() {
        let (_dir, directory) = directory();
        let mut account = Account::new("einstein");
        account.member_of = vec![
            Reference::expanded(acc_model::Group::new("physicists")),
            Reference::expanded(acc_model::Group::new("")),
        ];

        create(&directory, account);

        assert_eq!(
            directory.stored_account("einstein").member_of,
            vec![Reference::deflated("physicists")]
        );
    }

    #[test]
    fn password_is_hashed_and_never_returned() {
        let (_dir, directory, store) = directory_with_store();
        let created = create(
            &directory,
            Account::new("einstein").with_password("relativity"),
        );
        assert!(created.password().is_none());

        let stored = store.load(&SafeId::parse("einstein").unwrap()).unwrap();
        let hash = stored.password().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("relativity"));

        assert!(directory.get_account("einstein").unwrap().password().is_none());
    }

    #[test]
    fn update_copies_masked_fields_only() {
        let (_dir, directory) = directory();
        create(
            &directory,
            Account::new("einstein")
                .with_display_name("Albert")
                .with_mail("albert@example.org"),
        );

        let updated = directory
            .update_account(UpdateAccountRequest {
                account: Some(Account::new("einstein").with_display_name("Albert Einstein")),
                update_mask: vec!["display_name".to_string()],
            })
            .unwrap();

        assert_eq!(updated.display_name.as_deref(), Some("Albert Einstein"));
        assert_eq!(updated.mail.as_deref(), Some("albert@example.org"));
        assert!(updated.last_modified_date_time >= updated.created_date_time);
    }

    #[test]
    fn update_rejects_membership_paths() {
        let (_dir, directory) = directory();
        create(&directory, Account::new("einstein"));

        let err = directory
            .update_account(UpdateAccountRequest {
                account: Some(Account::new("einstein")),
                update_mask: vec!["memberOf".to_string()],
            })
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn update_rehashes_password() {
        let (_dir, directory) = directory();
        create(
            &directory,
            Account::new("einstein")
                .with_login("einstein")
                .with_password("relativity"),
        );

        directory
            .update_account(UpdateAccountRequest {
                account: Some(Account::new("einstein").with_password("gravity")),
                update_mask: vec!["passwordProfile".to_string()],
            })
            .unwrap();

        assert!(directory.authenticate("einstein", "relativity").is_err());
        assert!(directory.authenticate("einstein", "gravity").is_ok());
    }

    #[test]
    fn delete_removes_from_store_and_index() {
        let (_dir, directory) = directory();
        create(&directory, Account::new("einstein"));

        directory.delete_account("einstein").unwrap();

        assert!(directory.get_account("einstein").unwrap_err().is_not_found());
        assert_eq!(directory.index().num_docs(), 0);
        assert!(directory.delete_account("einstein").unwrap_err().is_not_found());
    }

    #[test]
    fn authenticate_checks_password_and_state() {
        let (_dir, directory) = directory();
        create(
            &directory,
            Account::new("einstein")
                .with_login("einstein")
                .with_password("relativity"),
        );
        create(
            &directory,
            Account::new("marie")
                .with_login("marie")
                .with_password("radium")
                .with_enabled(false),
        );

        let account = directory.authenticate("einstein", "relativity").unwrap();
        assert_eq!(account.id, "einstein");
        assert!(account.password().is_none());

        for (login, password) in [
            ("einstein", "gravity"),
            ("marie", "radium"),
            ("nobody", "relativity"),
            ("einstein", ""),
        ] {
            let err = directory.authenticate(login, password).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidCredentials), "{login}");
        }
    }
}
