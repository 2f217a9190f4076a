use super::layout::{self, entry_basename};
use super::mime::mime_type_for;
use super::relationships::{RegexRelationshipResolver, RelationshipResolver};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{Cursor, Read};
use std::sync::Arc;
use zip::ZipArchive;

/// One embedded binary found in a container, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCandidate {
    pub data: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    /// Zero-based position among the returned candidates, in archive order.
    pub order_index: i32,
    pub relationship_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedReason {
    /// The bytes could not be opened as a ZIP archive.
    UnreadableContainer(String),
    /// Some media entries could not be read and were skipped.
    SkippedEntries(usize),
    /// Media was found but no relationship descriptor was present.
    MissingRelationshipDescriptor,
    RelationshipsUnresolved(String),
}

impl Display for DegradedReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DegradedReason::UnreadableContainer(e) => write!(f, "unreadable container: {}", e),
            DegradedReason::SkippedEntries(n) => write!(f, "{} unreadable media entries skipped", n),
            DegradedReason::MissingRelationshipDescriptor => {
                write!(f, "no relationship descriptor found")
            }
            DegradedReason::RelationshipsUnresolved(e) => {
                write!(f, "relationship descriptor unresolved: {}", e)
            }
        }
    }
}

/// Result of scanning a container. Degradation is never an error: ingestion
/// continues with whatever candidates were recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted {
        candidates: Vec<MediaCandidate>,
    },
    Degraded {
        candidates: Vec<MediaCandidate>,
        reason: DegradedReason,
    },
}

impl ExtractionOutcome {
    pub fn candidates(&self) -> &[MediaCandidate] {
        match self {
            ExtractionOutcome::Extracted { candidates }
            | ExtractionOutcome::Degraded { candidates, .. } => candidates,
        }
    }

    pub fn into_candidates(self) -> Vec<MediaCandidate> {
        match self {
            ExtractionOutcome::Extracted { candidates }
            | ExtractionOutcome::Degraded { candidates, .. } => candidates,
        }
    }

    pub fn degraded_reason(&self) -> Option<&DegradedReason> {
        match self {
            ExtractionOutcome::Extracted { .. } => None,
            ExtractionOutcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded_reason().is_some()
    }
}

/// Extracts embedded media from ZIP-based office packages.
#[derive(Clone)]
pub struct ContainerParser {
    resolver: Arc<dyn RelationshipResolver>,
}

impl Default for ContainerParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerParser {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ContainerParser").finish_non_exhaustive()
    }
}

impl ContainerParser {
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(RegexRelationshipResolver::new()))
    }

    pub fn with_resolver(resolver: Arc<dyn RelationshipResolver>) -> Self {
        Self { resolver }
    }

    /// Scan `data` for media entries and attach relationship ids.
    pub fn extract(&self, data: &[u8]) -> ExtractionOutcome {
        let mut archive = match ZipArchive::new(Cursor::new(data)) {
            Ok(archive) => archive,
            Err(e) => {
                tracing::warn!(error = %e, size_bytes = data.len(), "Container is not a readable archive");
                return ExtractionOutcome::Degraded {
                    candidates: Vec::new(),
                    reason: DegradedReason::UnreadableContainer(e.to_string()),
                };
            }
        };

        let mut candidates = Vec::new();
        let mut descriptors: Vec<(String, Vec<u8>)> = Vec::new();
        let mut skipped = 0usize;

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping unreadable archive entry");
                    skipped += 1;
                    continue;
                }
            };

            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            let is_descriptor = layout::is_relationship_part(&name);
            if !is_descriptor && layout::media_layout(&name).is_none() {
                continue;
            }

            let mut bytes = Vec::new();
            if let Err(e) = entry.read_to_end(&mut bytes) {
                tracing::warn!(entry = %name, error = %e, "Skipping unreadable archive entry");
                if !is_descriptor {
                    skipped += 1;
                }
                continue;
            }

            if is_descriptor {
                descriptors.push((name, bytes));
                continue;
            }

            let filename = entry_basename(&name).to_string();
            candidates.push(MediaCandidate {
                mime_type: mime_type_for(&filename).to_string(),
                order_index: candidates.len() as i32,
                filename,
                data: bytes,
                relationship_id: None,
            });
        }

        let mut reason = (skipped > 0).then_some(DegradedReason::SkippedEntries(skipped));

        if !candidates.is_empty() {
            if descriptors.is_empty() {
                tracing::warn!(
                    media_count = candidates.len(),
                    "Container has media but no relationship descriptor"
                );
                reason.get_or_insert(DegradedReason::MissingRelationshipDescriptor);
            } else {
                let (targets, failure) = self.resolve_descriptors(&descriptors);
                for candidate in candidates.iter_mut() {
                    candidate.relationship_id = targets.get(&candidate.filename).cloned();
                }
                if let Some(failure) = failure {
                    reason.get_or_insert(failure);
                }
            }
        }

        match reason {
            None => ExtractionOutcome::Extracted { candidates },
            Some(reason) => ExtractionOutcome::Degraded { candidates, reason },
        }
    }

    /// Run [`ContainerParser::extract`] on the blocking pool.
    pub async fn extract_async(&self, data: Vec<u8>) -> ExtractionOutcome {
        let parser = self.clone();
        match tokio::task::spawn_blocking(move || parser.extract(&data)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Extraction task failed");
                ExtractionOutcome::Degraded {
                    candidates: Vec::new(),
                    reason: DegradedReason::UnreadableContainer(e.to_string()),
                }
            }
        }
    }

    /// Merge all descriptors; earlier descriptors win on duplicate targets.
    fn resolve_descriptors(
        &self,
        descriptors: &[(String, Vec<u8>)],
    ) -> (HashMap<String, String>, Option<DegradedReason>) {
        let mut targets = HashMap::new();
        let mut failure = None;

        for (name, bytes) in descriptors {
            match self.resolver.resolve_bytes(bytes) {
                Ok(resolved) => {
                    for (target, id) in resolved {
                        targets.entry(target).or_insert(id);
                    }
                }
                Err(e) => {
                    tracing::warn!(descriptor = %name, error = %e, "Relationship descriptor unresolved");
                    failure.get_or_insert_with(|| {
                        DegradedReason::RelationshipsUnresolved(format!("{}: {}", name, e))
                    });
                }
            }
        }

        (targets, failure)
    }
}

/// Extract media candidates from `data`; unreadable input yields an empty list.
pub fn extract_media(data: &[u8]) -> Vec<MediaCandidate> {
    ContainerParser::new().extract(data).into_candidates()
}
