//! Notes and their visibility state

use chrono::DateTime;
use chrono::FixedOffset;

use crate::id::DocumentId;

/// A boolean that may never have been written
///
/// Documents created before a flag existed carry no value at all, reading treats that the same
/// as `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flag {
    /// Never written
    #[default]
    Unset,

    /// Explicitly `false`
    False,

    /// Explicitly `true`
    True,
}

impl Flag {
    /// Collapse the flag into a plain boolean
    pub fn is_set(self) -> bool {
        matches!(self, Flag::True)
    }

    /// Create a flag from its stored form
    pub fn from_option(value: Option<bool>) -> Self {
        match value {
            None => Flag::Unset,
            Some(value) => Flag::from(value),
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value { Flag::True } else { Flag::False }
    }
}

#[derive(Clone, Debug)]
pub struct Note {
    pub id: DocumentId,
    pub name: String,
    pub text: String,
    pub color: String,
    pub order: i64,
    pub is_deleted: Flag,
    pub is_archived: Flag,
    pub notebook_id: Option<DocumentId>,
    pub tags: Vec<DocumentId>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Note {
    /// Visible in the default listing
    pub fn is_active(&self) -> bool {
        !self.is_deleted.is_set() && !self.is_archived.is_set()
    }

    /// Does the note carry the tag
    pub fn has_tag(&self, tag_id: &DocumentId) -> bool {
        self.tags.contains(tag_id)
    }
}

/// Selection of notes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteFilter {
    /// Neither trashed nor archived
    Active,

    /// `is_deleted` is set, regardless of the archive
    Trashed,

    /// `is_archived` is set, regardless of the trash
    Archived,

    /// Linked to the notebook, regardless of visibility
    ByNotebook(DocumentId),

    /// Carrying every one of the tags, regardless of visibility
    ByTags(Vec<DocumentId>),
}

impl NoteFilter {
    /// Does the note match the filter
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            NoteFilter::Active => note.is_active(),
            NoteFilter::Trashed => note.is_deleted.is_set(),
            NoteFilter::Archived => note.is_archived.is_set(),
            NoteFilter::ByNotebook(notebook_id) => note.notebook_id.as_ref() == Some(notebook_id),
            NoteFilter::ByTags(tag_ids) => tag_ids.iter().all(|tag_id| note.has_tag(tag_id)),
        }
    }
}
