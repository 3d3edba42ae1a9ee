//! Index schema and document mapping.

use acc_model::{Account, EntityKind, Group};
use tantivy::TantivyDocument;
use tantivy::schema::{FAST, Field, INDEXED, STORED, STRING, Schema};

/// Fields a filter may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexField {
    /// Entity id.
    Id,
    /// Display name.
    DisplayName,
    /// Preferred name.
    PreferredName,
    /// On-premises login name.
    OnPremisesSamAccountName,
    /// Mail address.
    Mail,
    /// Description.
    Description,
    /// Numeric user id.
    UidNumber,
    /// Numeric group id.
    GidNumber,
    /// Whether an account is enabled.
    AccountEnabled,
    /// Group ids of an account.
    MemberOf,
    /// Account ids of a group.
    Members,
}

impl IndexField {
    /// Name of the field in the index.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::DisplayName => "display_name",
            Self::PreferredName => "preferred_name",
            Self::OnPremisesSamAccountName => "on_premises_sam_account_name",
            Self::Mail => "mail",
            Self::Description => "description",
            Self::UidNumber => "uid_number",
            Self::GidNumber => "gid_number",
            Self::AccountEnabled => "account_enabled",
            Self::MemberOf => "member_of",
            Self::Members => "members",
        }
    }
}

/// Name of the discriminator field.
pub const KIND_FIELD: &str = "kind";

/// The index schema with resolved field handles.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    schema: Schema,
    key: Field,
    kind: Field,
    id: Field,
    display_name: Field,
    preferred_name: Field,
    on_premises_sam_account_name: Field,
    mail: Field,
    description: Field,
    uid_number: Field,
    gid_number: Field,
    account_enabled: Field,
    member_of: Field,
    members: Field,
}

impl IndexSchema {
    /// Builds the schema.
    ///
    /// Text fields are indexed untokenized so that `eq` is an exact match.
    /// Only the id is stored; hits are always hydrated from the store.
    #[must_use]
    pub fn build() -> Self {
        let mut builder = Schema::builder();

        let key = builder.add_text_field("key", STRING);
        let kind = builder.add_text_field(KIND_FIELD, STRING);
        let id = builder.add_text_field("id", STRING | STORED);
        let display_name = builder.add_text_field("display_name", STRING);
        let preferred_name = builder.add_text_field("preferred_name", STRING);
        let on_premises_sam_account_name =
            builder.add_text_field("on_premises_sam_account_name", STRING);
        let mail = builder.add_text_field("mail", STRING);
        let description = builder.add_text_field("description", STRING);
        let uid_number = builder.add_i64_field("uid_number", INDEXED | FAST);
        let gid_number = builder.add_i64_field("gid_number", INDEXED | FAST);
        let account_enabled = builder.add_bool_field("account_enabled", INDEXED);
        let member_of = builder.add_text_field("member_of", STRING);
        let members = builder.add_text_field("members", STRING);

        Self {
            schema: builder.build(),
            key,
            kind,
            id,
            display_name,
            preferred_name,
            on_premises_sam_account_name,
            mail,
            description,
            uid_number,
            gid_number,
            account_enabled,
            member_of,
            members,
        }
    }

    /// The tantivy schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Handle of a filterable field.
    #[must_use]
    pub const fn field(&self, field: IndexField) -> Field {
        match field {
            IndexField::Id => self.id,
            IndexField::DisplayName => self.display_name,
            IndexField::PreferredName => self.preferred_name,
            IndexField::OnPremisesSamAccountName => self.on_premises_sam_account_name,
            IndexField::Mail => self.mail,
            IndexField::Description => self.description,
            IndexField::UidNumber => self.uid_number,
            IndexField::GidNumber => self.gid_number,
            IndexField::AccountEnabled => self.account_enabled,
            IndexField::MemberOf => self.member_of,
            IndexField::Members => self.members,
        }
    }

    /// Handle of the discriminator field.
    #[must_use]
    pub const fn kind_field(&self) -> Field {
        self.kind
    }

    /// Handle of the per-document unique key.
    ///
    /// Accounts and groups live in separate collections and may share an
    /// id, so documents are keyed by kind and id.
    #[must_use]
    pub const fn key_field(&self) -> Field {
        self.key
    }

    /// Unique key of an entity document.
    #[must_use]
    pub fn key(kind: EntityKind, id: &str) -> String {
        format!("{}/{id}", kind.as_str())
    }

    /// Maps an account to its index document.
    #[must_use]
    pub fn account_document(&self, account: &Account) -> TantivyDocument {
        let mut doc = self.base_document(EntityKind::Account, &account.id);

        self.add_text(&mut doc, self.display_name, account.display_name.as_deref());
        self.add_text(&mut doc, self.preferred_name, account.preferred_name.as_deref());
        self.add_text(
            &mut doc,
            self.on_premises_sam_account_name,
            account.on_premises_sam_account_name.as_deref(),
        );
        self.add_text(&mut doc, self.mail, account.mail.as_deref());
        self.add_text(&mut doc, self.description, account.description.as_deref());
        if let Some(uid) = account.uid_number {
            doc.add_i64(self.uid_number, uid);
        }
        if let Some(gid) = account.gid_number {
            doc.add_i64(self.gid_number, gid);
        }
        doc.add_bool(self.account_enabled, account.account_enabled);
        for group_id in account.group_ids().filter(|id| !id.is_empty()) {
            doc.add_text(self.member_of, group_id);
        }

        doc
    }

    /// Maps a group to its index document.
    #[must_use]
    pub fn group_document(&self, group: &Group) -> TantivyDocument {
        let mut doc = self.base_document(EntityKind::Group, &group.id);

        self.add_text(&mut doc, self.display_name, group.display_name.as_deref());
        self.add_text(&mut doc, self.description, group.description.as_deref());
        self.add_text(
            &mut doc,
            self.on_premises_sam_account_name,
            group.on_premises_sam_account_name.as_deref(),
        );
        if let Some(gid) = group.gid_number {
            doc.add_i64(self.gid_number, gid);
        }
        for account_id in group.member_ids().filter(|id| !id.is_empty()) {
            doc.add_text(self.members, account_id);
        }

        doc
    }

    fn base_document(&self, kind: EntityKind, id: &str) -> TantivyDocument {
        let mut doc = TantivyDocument::default();
        doc.add_text(self.key, Self::key(kind, id));
        doc.add_text(self.kind, kind.as_str());
        doc.add_text(self.id, id);
        doc
    }

    #[allow(clippy::unused_self)]
    fn add_text(&self, doc: &mut TantivyDocument, field: Field, value: Option<&str>) {
        if let Some(value) = value {
            doc.add_text(field, value);
        }
    }
}
