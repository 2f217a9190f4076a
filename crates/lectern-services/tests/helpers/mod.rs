#![allow(dead_code)]

use lectern_core::{DocumentStorageConfig, StorageBackend};
use lectern_db::{DocumentStore, InMemoryDocumentStore};
use lectern_services::{DocumentCatalog, IngestRequest};
use lectern_storage::StorageBackends;
use std::io::{Cursor, Write};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;
use zip::write::FileOptions;
use zip::ZipWriter;

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRfake";
pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIFfake";

pub struct TestCatalog {
    pub catalog: DocumentCatalog,
    pub store: Arc<InMemoryDocumentStore>,
    pub dir: TempDir,
}

pub fn storage_config(dir: &TempDir) -> DocumentStorageConfig {
    DocumentStorageConfig {
        storage_path: dir.path().join("uploads"),
        default_backend: StorageBackend::Inline,
        max_document_size_bytes: 1024 * 1024,
    }
}

/// Catalog over an in-memory store and a temporary disk root.
pub async fn setup_catalog() -> TestCatalog {
    let store = Arc::new(InMemoryDocumentStore::new());
    setup_catalog_with_store(store.clone() as Arc<dyn DocumentStore>, store).await
}

pub async fn setup_catalog_with_store(
    store: Arc<dyn DocumentStore>,
    memory: Arc<InMemoryDocumentStore>,
) -> TestCatalog {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = storage_config(&dir);
    let backends = StorageBackends::from_config(&config)
        .await
        .expect("Failed to create storage backends");

    TestCatalog {
        catalog: DocumentCatalog::new(store, backends, &config),
        store: memory,
        dir,
    }
}

/// Build a ZIP package with the given entries, in order.
pub fn build_container(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).expect("start_file");
        zip.write_all(data).expect("write entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

pub fn relationships(pairs: &[(&str, &str)]) -> Vec<u8> {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, target) in pairs {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{}"/>"#,
            id, target
        ));
    }
    xml.push_str("</Relationships>");
    xml.into_bytes()
}

/// A minimal DOCX with one PNG and one JPEG.
pub fn docx_with_png_and_jpeg() -> Vec<u8> {
    let rels = relationships(&[("rId4", "media/image1.png"), ("rId5", "media/image2.jpeg")]);
    build_container(&[
        ("[Content_Types].xml", b"<Types/>"),
        ("word/document.xml", b"<w:document/>"),
        ("word/_rels/document.xml.rels", &rels),
        ("word/media/image1.png", PNG_BYTES),
        ("word/media/image2.jpeg", JPEG_BYTES),
    ])
}

pub fn docx_request(data: Vec<u8>) -> IngestRequest {
    IngestRequest::new(
        data,
        "worksheet.docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Uuid::new_v4(),
    )
}
