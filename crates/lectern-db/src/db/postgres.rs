//! PostgreSQL document store: `documents` and `media_assets` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lectern_core::models::{
    CatalogAggregates, Document, DocumentFilter, DocumentMetadata, DocumentPage, DocumentStatus,
    MediaAsset, MediaAssetSummary, NewDocument, NewMediaAsset, Pagination,
};
use lectern_core::{AppError, StorageBackend};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::document_store::DocumentStore;

const METADATA_COLUMNS: &str = "id, original_filename, stored_filename, file_type, file_size, \
     storage_backend, file_path, has_embedded_media, media_count, status, subject_id, class_id, \
     uploaded_by, created_at, updated_at";

const MEDIA_SUMMARY_COLUMNS: &str =
    "id, document_id, filename, mime_type, file_size, order_index, relationship_id, created_at";

/// Row type for documents table, payload included (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub original_filename: String,
    pub stored_filename: String,
    pub file_type: String,
    pub file_size: i64,
    pub storage_backend: StorageBackend,
    pub file_data: Option<Vec<u8>>,
    pub file_path: Option<String>,
    pub has_embedded_media: bool,
    pub media_count: i32,
    pub status: DocumentStatus,
    pub subject_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRow {
    pub fn into_document(self) -> Document {
        Document {
            id: self.id,
            original_filename: self.original_filename,
            stored_filename: self.stored_filename,
            file_type: self.file_type,
            file_size: self.file_size,
            storage_backend: self.storage_backend,
            file_data: self.file_data,
            file_path: self.file_path,
            has_embedded_media: self.has_embedded_media,
            media_count: self.media_count,
            status: self.status,
            subject_id: self.subject_id,
            class_id: self.class_id,
            uploaded_by: self.uploaded_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row type for documents table without the payload column.
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentMetadataRow {
    pub id: Uuid,
    pub original_filename: String,
    pub stored_filename: String,
    pub file_type: String,
    pub file_size: i64,
    pub storage_backend: StorageBackend,
    pub file_path: Option<String>,
    pub has_embedded_media: bool,
    pub media_count: i32,
    pub status: DocumentStatus,
    pub subject_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentMetadataRow {
    pub fn into_metadata(self) -> DocumentMetadata {
        DocumentMetadata {
            id: self.id,
            original_filename: self.original_filename,
            stored_filename: self.stored_filename,
            file_type: self.file_type,
            file_size: self.file_size,
            storage_backend: self.storage_backend,
            file_path: self.file_path,
            has_embedded_media: self.has_embedded_media,
            media_count: self.media_count,
            status: self.status,
            subject_id: self.subject_id,
            class_id: self.class_id,
            uploaded_by: self.uploaded_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row type for media_assets table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct MediaAssetRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub data: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub order_index: i32,
    pub relationship_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MediaAssetRow {
    pub fn into_media_asset(self) -> MediaAsset {
        MediaAsset {
            id: self.id,
            document_id: self.document_id,
            data: self.data,
            filename: self.filename,
            mime_type: self.mime_type,
            file_size: self.file_size,
            order_index: self.order_index,
            relationship_id: self.relationship_id,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct MediaAssetSummaryRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub order_index: i32,
    pub relationship_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MediaAssetSummaryRow {
    pub fn into_summary(self) -> MediaAssetSummary {
        MediaAssetSummary {
            id: self.id,
            document_id: self.document_id,
            filename: self.filename,
            mime_type: self.mime_type,
            file_size: self.file_size,
            order_index: self.order_index,
            relationship_id: self.relationship_id,
            created_at: self.created_at,
        }
    }
}

/// Append `WHERE ... AND ...` for every set filter field.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &DocumentFilter) {
    let mut separator = " WHERE ";
    if let Some(subject_id) = filter.subject_id {
        builder.push(separator).push("subject_id = ").push_bind(subject_id);
        separator = " AND ";
    }
    if let Some(class_id) = filter.class_id {
        builder.push(separator).push("class_id = ").push_bind(class_id);
        separator = " AND ";
    }
    if let Some(status) = filter.status {
        builder.push(separator).push("status = ").push_bind(status);
        separator = " AND ";
    }
    if let Some(uploaded_by) = filter.uploaded_by {
        builder.push(separator).push("uploaded_by = ").push_bind(uploaded_by);
    }
}

/// Document catalog backed by PostgreSQL
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[tracing::instrument(skip(self, document), fields(db.table = "documents", db.operation = "insert", db.record_id = %document.id))]
    async fn insert_document(&self, document: NewDocument) -> Result<Document, AppError> {
        let has_embedded_media = document.has_embedded_media();
        let row: DocumentRow = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            INSERT INTO documents (
                id, original_filename, stored_filename, file_type, file_size,
                storage_backend, file_data, file_path, has_embedded_media, media_count,
                status, subject_id, class_id, uploaded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(document.id)
        .bind(&document.original_filename)
        .bind(&document.stored_filename)
        .bind(&document.file_type)
        .bind(document.file_size)
        .bind(document.storage_backend)
        .bind(&document.file_data)
        .bind(&document.file_path)
        .bind(has_embedded_media)
        .bind(document.media_count)
        .bind(DocumentStatus::Uploaded)
        .bind(document.subject_id)
        .bind(document.class_id)
        .bind(document.uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_document())
    }

    #[tracing::instrument(skip(self, assets), fields(db.table = "media_assets", db.operation = "insert_batch", count = assets.len()))]
    async fn insert_media_batch(
        &self,
        assets: Vec<NewMediaAsset>,
    ) -> Result<Vec<MediaAssetSummary>, AppError> {
        if assets.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO media_assets (document_id, data, filename, mime_type, file_size, order_index, relationship_id) ",
        );
        builder.push_values(assets.iter(), |mut row, asset| {
            row.push_bind(asset.document_id)
                .push_bind(&asset.data)
                .push_bind(&asset.filename)
                .push_bind(&asset.mime_type)
                .push_bind(asset.file_size())
                .push_bind(asset.order_index)
                .push_bind(&asset.relationship_id);
        });
        builder.push(" RETURNING ").push(MEDIA_SUMMARY_COLUMNS);

        let rows: Vec<MediaAssetSummaryRow> = builder
            .build_query_as::<MediaAssetSummaryRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut summaries: Vec<MediaAssetSummary> =
            rows.into_iter().map(|r| r.into_summary()).collect();
        summaries.sort_by_key(|s| s.order_index);
        Ok(summaries)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select", db.record_id = %id))]
    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let row: Option<DocumentRow> =
            sqlx::query_as::<Postgres, DocumentRow>("SELECT * FROM documents WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| r.into_document()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select", db.record_id = %id))]
    async fn get_metadata(&self, id: Uuid) -> Result<Option<DocumentMetadata>, AppError> {
        let row: Option<DocumentMetadataRow> = sqlx::query_as::<Postgres, DocumentMetadataRow>(
            &format!("SELECT {} FROM documents WHERE id = $1", METADATA_COLUMNS),
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_metadata()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn list_documents(
        &self,
        filter: &DocumentFilter,
        pagination: Pagination,
    ) -> Result<DocumentPage, AppError> {
        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*)::BIGINT FROM documents");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        page_query.push(METADATA_COLUMNS).push(" FROM documents");
        push_filters(&mut page_query, filter);
        page_query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows: Vec<DocumentMetadataRow> = page_query
            .build_query_as::<DocumentMetadataRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(DocumentPage {
            items: rows.into_iter().map(|r| r.into_metadata()).collect(),
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_assets", db.operation = "select", db.document_id = %document_id))]
    async fn get_media_assets(&self, document_id: Uuid) -> Result<Vec<MediaAsset>, AppError> {
        let rows: Vec<MediaAssetRow> = sqlx::query_as::<Postgres, MediaAssetRow>(
            "SELECT * FROM media_assets WHERE document_id = $1 ORDER BY order_index ASC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.into_media_asset()).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_assets", db.operation = "select", db.document_id = %document_id))]
    async fn list_media(&self, document_id: Uuid) -> Result<Vec<MediaAssetSummary>, AppError> {
        let rows: Vec<MediaAssetSummaryRow> = sqlx::query_as::<Postgres, MediaAssetSummaryRow>(
            &format!(
                "SELECT {} FROM media_assets WHERE document_id = $1 ORDER BY order_index ASC",
                MEDIA_SUMMARY_COLUMNS
            ),
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.into_summary()).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_assets", db.operation = "select", db.record_id = %id))]
    async fn get_media_asset(&self, id: Uuid) -> Result<Option<MediaAsset>, AppError> {
        let row: Option<MediaAssetRow> =
            sqlx::query_as::<Postgres, MediaAssetRow>("SELECT * FROM media_assets WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| r.into_media_asset()))
    }

    /// Media rows go with the document through `ON DELETE CASCADE`. Files of
    /// disk-backed documents are left in place.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "delete", db.record_id = %id))]
    async fn delete_document(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "update", db.record_id = %id))]
    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Option<DocumentMetadata>, AppError> {
        let row: Option<DocumentMetadataRow> = sqlx::query_as::<Postgres, DocumentMetadataRow>(
            &format!(
                "UPDATE documents SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
                METADATA_COLUMNS
            ),
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_metadata()))
    }

    #[tracing::instrument(skip(self, data), fields(db.table = "documents", db.operation = "update", db.record_id = %id, size_bytes = data.len()))]
    async fn set_inline_payload(
        &self,
        id: Uuid,
        data: &[u8],
    ) -> Result<Option<DocumentMetadata>, AppError> {
        // Payload and flag change in one statement; a concurrent delete or
        // migration makes the WHERE clause miss instead of resurrecting the row.
        let row: Option<DocumentMetadataRow> = sqlx::query_as::<Postgres, DocumentMetadataRow>(
            &format!(
                r#"
                UPDATE documents
                SET file_data = $2, storage_backend = 'inline', updated_at = NOW()
                WHERE id = $1 AND storage_backend = 'disk'
                RETURNING {}
                "#,
                METADATA_COLUMNS
            ),
        )
        .bind(id)
        .bind(data)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_metadata()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn list_disk_backed(&self) -> Result<Vec<DocumentMetadata>, AppError> {
        let rows: Vec<DocumentMetadataRow> = sqlx::query_as::<Postgres, DocumentMetadataRow>(
            &format!(
                "SELECT {} FROM documents WHERE storage_backend = 'disk' ORDER BY created_at ASC, id ASC",
                METADATA_COLUMNS
            ),
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.into_metadata()).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "aggregate"))]
    async fn aggregate_stats(&self) -> Result<CatalogAggregates, AppError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*)::BIGINT AS total_documents,
                COUNT(*) FILTER (WHERE storage_backend = 'disk')::BIGINT AS disk_backed_count,
                COUNT(*) FILTER (WHERE storage_backend = 'inline')::BIGINT AS inline_backed_count,
                (COALESCE(SUM(file_size) FILTER (WHERE storage_backend = 'inline'), 0))::BIGINT AS total_inline_bytes,
                (SELECT COUNT(*) FROM media_assets)::BIGINT AS total_media_assets
            FROM documents
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CatalogAggregates {
            total_documents: row.get("total_documents"),
            total_media_assets: row.get("total_media_assets"),
            disk_backed_count: row.get("disk_backed_count"),
            inline_backed_count: row.get("inline_backed_count"),
            total_inline_bytes: row.get("total_inline_bytes"),
        })
    }
}
