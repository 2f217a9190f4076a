//! Conventional part locations inside office packages

/// Where a package flavour keeps its media and relationship descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageLayout {
    pub name: &'static str,
    pub media_prefix: &'static str,
    /// Relationship parts are entries under this prefix ending in `.rels`.
    pub relationship_prefix: &'static str,
}

impl PackageLayout {
    pub fn contains_media(&self, entry_name: &str) -> bool {
        entry_name.len() > self.media_prefix.len() && entry_name.starts_with(self.media_prefix)
    }

    pub fn is_relationship_part(&self, entry_name: &str) -> bool {
        entry_name.starts_with(self.relationship_prefix) && entry_name.ends_with(".rels")
    }
}

pub const WORD: PackageLayout = PackageLayout {
    name: "word",
    media_prefix: "word/media/",
    relationship_prefix: "word/_rels/document.xml.rels",
};

pub const PRESENTATION: PackageLayout = PackageLayout {
    name: "presentation",
    media_prefix: "ppt/media/",
    relationship_prefix: "ppt/slides/_rels/",
};

pub const SPREADSHEET: PackageLayout = PackageLayout {
    name: "spreadsheet",
    media_prefix: "xl/media/",
    relationship_prefix: "xl/drawings/_rels/",
};

pub const LAYOUTS: [PackageLayout; 3] = [WORD, PRESENTATION, SPREADSHEET];

pub fn media_layout(entry_name: &str) -> Option<&'static PackageLayout> {
    LAYOUTS.iter().find(|l| l.contains_media(entry_name))
}

pub fn is_relationship_part(entry_name: &str) -> bool {
    LAYOUTS.iter().any(|l| l.is_relationship_part(entry_name))
}

/// Final path component of an archive entry name.
pub fn entry_basename(entry_name: &str) -> &str {
    entry_name.rsplit('/').next().unwrap_or(entry_name)
}
