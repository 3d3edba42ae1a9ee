//! The search index.

use acc_model::{Account, EntityKind, Group};
use parking_lot::Mutex;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Query};
use tantivy::schema::Value;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use crate::error::SearchResult;
use crate::filter::{self, Expr};
use crate::schema::{IndexField, IndexSchema};
use crate::translate::{kind_query, translate};

/// In-memory index over accounts and groups.
///
/// The index is derived data: it lives in RAM, starts empty and is rebuilt
/// from the store. Every mutation commits and reloads the reader before
/// returning, so a completed write is visible to the next search.
pub struct SearchIndex {
    schema: IndexSchema,
    writer: Mutex<IndexWriter>,
    reader: IndexReader,
}

impl SearchIndex {
    /// Creates an empty index.
    ///
    /// ## Errors
    ///
    /// Returns `SearchError::Index` if the writer cannot be created, for
    /// instance because `writer_memory_bytes` is below tantivy's minimum.
    pub fn open(writer_memory_bytes: usize) -> SearchResult<Self> {
        let schema = IndexSchema::build();
        let index = Index::create_in_ram(schema.schema().clone());
        let writer: IndexWriter = index.writer_with_num_threads(1, writer_memory_bytes)?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        tracing::debug!(writer_memory_bytes, "Opened search index");

        Ok(Self {
            schema,
            writer: Mutex::new(writer),
            reader,
        })
    }

    /// The schema and field handles.
    #[must_use]
    pub const fn schema(&self) -> &IndexSchema {
        &self.schema
    }

    /// Adds or replaces the document of an account.
    ///
    /// ## Errors
    ///
    /// Returns `SearchError::Index` if the write or commit fails.
    pub fn index_account(&self, account: &Account) -> SearchResult<()> {
        let doc = self.schema.account_document(account);
        self.upsert(EntityKind::Account, &account.id, doc)
    }

    /// Adds or replaces the document of a group.
    ///
    /// ## Errors
    ///
    /// Returns `SearchError::Index` if the write or commit fails.
    pub fn index_group(&self, group: &Group) -> SearchResult<()> {
        let doc = self.schema.group_document(group);
        self.upsert(EntityKind::Group, &group.id, doc)
    }

    /// Removes the document of an entity. Removing a missing document is
    /// not an error.
    ///
    /// ## Errors
    ///
    /// Returns `SearchError::Index` if the commit fails.
    pub fn remove(&self, kind: EntityKind, id: &str) -> SearchResult<()> {
        let mut writer = self.writer.lock();
        writer.delete_term(self.key_term(kind, id));
        writer.commit()?;
        self.reader.reload()?;

        tracing::debug!(%kind, id, "Removed from index");
        Ok(())
    }

    /// Drops every document.
    ///
    /// ## Errors
    ///
    /// Returns `SearchError::Index` if the commit fails.
    pub fn clear(&self) -> SearchResult<()> {
        let mut writer = self.writer.lock();
        writer.delete_all_documents()?;
        writer.commit()?;
        self.reader.reload()?;

        tracing::debug!("Cleared search index");
        Ok(())
    }

    /// Number of indexed documents.
    #[must_use]
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Builds the query for a list request: every document of `kind`,
    /// narrowed by `filter` when one is given.
    ///
    /// ## Errors
    ///
    /// Returns the parse and translation errors of the filter.
    pub fn list_query(
        &self,
        kind: EntityKind,
        filter: Option<&str>,
    ) -> SearchResult<Box<dyn Query>> {
        let by_kind = kind_query(&self.schema, kind);
        let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
            return Ok(by_kind);
        };

        let expr = filter::parse(filter)?;
        self.expr_query(kind, &expr)
    }

    /// Builds the query for an already parsed filter, restricted to `kind`.
    ///
    /// ## Errors
    ///
    /// Returns the translation errors of the expression.
    pub fn expr_query(&self, kind: EntityKind, expr: &Expr) -> SearchResult<Box<dyn Query>> {
        let filter_query = translate(&self.schema, kind, expr)?;
        Ok(Box::new(BooleanQuery::intersection(vec![
            kind_query(&self.schema, kind),
            filter_query,
        ])))
    }

    /// Runs a query and returns the matching ids in score order.
    ///
    /// ## Errors
    ///
    /// Returns `SearchError::Index` if the search fails.
    pub fn search(&self, query: &dyn Query) -> SearchResult<Vec<String>> {
        let searcher = self.reader.searcher();
        let limit = usize::try_from(searcher.num_docs())
            .unwrap_or(usize::MAX)
            .max(1);
        let hits = searcher.search(query, &TopDocs::with_limit(limit))?;

        let id_field = self.schema.field(IndexField::Id);
        let mut ids = Vec::with_capacity(hits.len());
        for (_score, address) in hits {
            let doc: TantivyDocument = searcher.doc(address)?;
            if let Some(id) = doc.get_first(id_field).and_then(|v| v.as_str()) {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }

    fn upsert(&self, kind: EntityKind, id: &str, doc: TantivyDocument) -> SearchResult<()> {
        let mut writer = self.writer.lock();
        writer.delete_term(self.key_term(kind, id));
        writer.add_document(doc)?;
        writer.commit()?;
        self.reader.reload()?;

        tracing::debug!(%kind, id, "Indexed entity");
        Ok(())
    }

    fn key_term(&self, kind: EntityKind, id: &str) -> Term {
        Term::from_field_text(self.schema.key_field(), &IndexSchema::key(kind, id))
    }
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("num_docs", &self.num_docs())
            .finish_non_exhaustive()
    }
}
