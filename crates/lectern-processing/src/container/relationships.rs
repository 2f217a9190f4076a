//! Relationship descriptor parsing
//!
//! A relationship part (`*.rels`) maps relationship ids such as `rId7` to
//! target parts such as `media/image3.png`. Only the target's basename is kept,
//! since media candidates are matched by filename.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

struct Patterns {
    element: Regex,
    id_attr: Regex,
    target_attr: Regex,
}

static PATTERNS: LazyLock<Result<Patterns, regex::Error>> = LazyLock::new(|| {
    Ok(Patterns {
        element: Regex::new(r"<Relationship\b[^>]*>")?,
        id_attr: Regex::new(r#"\bId\s*=\s*["']([^"']*)["']"#)?,
        target_attr: Regex::new(r#"\bTarget\s*=\s*["']([^"']*)["']"#)?,
    })
});

#[derive(Debug, Error)]
pub enum RelationshipError {
    #[error("relationship descriptor is not valid UTF-8")]
    NotUtf8,

    #[error("relationship descriptor has no <Relationships> root")]
    MissingRoot,

    #[error("invalid relationship pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Resolves a relationship descriptor into `target basename → relationship id`.
pub trait RelationshipResolver: Send + Sync {
    fn resolve(&self, descriptor: &str) -> Result<HashMap<String, String>, RelationshipError>;

    fn resolve_bytes(&self, descriptor: &[u8]) -> Result<HashMap<String, String>, RelationshipError> {
        let text = std::str::from_utf8(descriptor).map_err(|_| RelationshipError::NotUtf8)?;
        self.resolve(text)
    }
}

/// Pattern-matching resolver. Tolerates attribute order, quoting style and
/// unrelated attributes; does not validate the XML beyond the root element.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexRelationshipResolver;

impl RegexRelationshipResolver {
    pub fn new() -> Self {
        Self
    }
}

impl RelationshipResolver for RegexRelationshipResolver {
    fn resolve(&self, descriptor: &str) -> Result<HashMap<String, String>, RelationshipError> {
        if !descriptor.contains("<Relationships") {
            return Err(RelationshipError::MissingRoot);
        }

        let patterns = PATTERNS
            .as_ref()
            .map_err(|e| RelationshipError::Pattern(e.clone()))?;

        let mut targets = HashMap::new();
        for element in patterns.element.find_iter(descriptor) {
            let element = element.as_str();
            let id = patterns.id_attr.captures(element).and_then(|c| c.get(1));
            let target = patterns.target_attr.captures(element).and_then(|c| c.get(1));

            if let (Some(id), Some(target)) = (id, target) {
                let basename = target.as_str().rsplit('/').next().unwrap_or_default();
                if basename.is_empty() || id.as_str().is_empty() {
                    continue;
                }
                // First declaration wins
                targets
                    .entry(basename.to_string())
                    .or_insert_with(|| id.as_str().to_string());
            }
        }

        Ok(targets)
    }
}
