//! MongoDB document types and conversions

use chrono::DateTime;
use chrono::FixedOffset;
use mongodb::bson::Bson;
use mongodb::bson::DateTime as BsonDateTime;
use mongodb::bson::Document;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use uuid::Uuid;

use crate::id::DocumentId;
use crate::notebooks::NoteBook;
use crate::notes::Flag;
use crate::notes::Note;
use crate::notes::NoteFilter;
use crate::reminders::Reminder;
use crate::reminders::Repeat;
use crate::storage::Error;
use crate::storage::NoteUpdate;
use crate::storage::Result;
use crate::storage::UpdateNoteBookValues;
use crate::storage::UpdateReminderValues;
use crate::storage::UpdateTagValues;
use crate::tags::Tag;
use crate::users::User;

/// Serialize a value into BSON
pub fn to_bson<T>(value: &T) -> Result<Bson>
where
    T: Serialize,
{
    mongodb::bson::to_bson(value).map_err(|err| Error::Connection(err.to_string()))
}

/// Filter on a single document
pub fn by_id(id: &DocumentId) -> Document {
    doc! { "_id": id.object_id() }
}

/// Store a timestamp as a BSON date
pub fn to_bson_date(date: &DateTime<FixedOffset>) -> BsonDateTime {
    BsonDateTime::from_millis(date.timestamp_millis())
}

/// Read a BSON date back, expressed in UTC
pub fn from_bson_date(date: BsonDateTime) -> DateTime<FixedOffset> {
    DateTime::from_timestamp_millis(date.timestamp_millis())
        .unwrap_or_default()
        .fixed_offset()
}

/// Read a timestamp stored as BSON date or as RFC 3339 string
///
/// Anything else, including a missing field, reads as absent
fn lenient_date<'de, D>(deserializer: D) -> core::result::Result<Option<BsonDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let date = match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::DateTime(date)) => Some(date),
        Some(Bson::String(text)) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|date| to_bson_date(&date)),
        _ => None,
    };

    Ok(date)
}

/// Timestamp of a document, the creation time of its ID when it has none
fn date_or_id_time(date: Option<BsonDateTime>, id: &ObjectId) -> DateTime<FixedOffset> {
    from_bson_date(date.unwrap_or_else(|| id.timestamp()))
}

/// MongoDB version of user
#[derive(Debug, Deserialize, Serialize)]
pub struct MongoUser {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub session_id: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<BsonDateTime>,
}

impl User {
    /// Create user from MongoDB version
    ///
    /// A mangled session ID results in a fresh one, which invalidates all tokens of the user
    pub fn from_mongo_user(user: MongoUser) -> Self {
        Self {
            id: user.id.into(),
            session_id: Uuid::parse_str(&user.session_id).unwrap_or_else(|_| Uuid::new_v4()),
            email: user.email,
            hashed_password: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: date_or_id_time(user.created_at, &user.id),
        }
    }
}

/// MongoDB version of notebook
#[derive(Debug, Deserialize, Serialize)]
pub struct MongoNoteBook {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
}

impl NoteBook {
    /// Create notebook from MongoDB version
    pub fn from_mongo_notebook(notebook: MongoNoteBook) -> Self {
        Self {
            id: notebook.id.into(),
            name: notebook.name,
            description: notebook.description,
            is_active: notebook.is_active,
        }
    }
}

impl UpdateNoteBookValues {
    /// The `$set` document of the supplied fields
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();

        if let Some(name) = &self.name {
            set.insert("name", name.clone());
        }
        if let Some(description) = &self.description {
            set.insert("description", description.clone());
        }
        if let Some(is_active) = self.is_active {
            set.insert("is_active", is_active);
        }

        set
    }
}

/// MongoDB version of tag
#[derive(Debug, Deserialize, Serialize)]
pub struct MongoTag {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl Tag {
    /// Create tag from MongoDB version
    pub fn from_mongo_tag(tag: MongoTag) -> Self {
        Self {
            id: tag.id.into(),
            name: tag.name,
            color: tag.color,
        }
    }
}

impl UpdateTagValues {
    /// The `$set` document of the supplied fields
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();

        if let Some(name) = &self.name {
            set.insert("name", name.clone());
        }
        if let Some(color) = &self.color {
            set.insert("color", color.clone());
        }

        set
    }
}

/// MongoDB version of note
///
/// Older documents may lack the flags, those read as [`Flag::Unset`]. Missing timestamps read as
/// the creation time of the ID.
#[derive(Debug, Deserialize, Serialize)]
pub struct MongoNote {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_id: Option<ObjectId>,
    #[serde(default)]
    pub tags: Vec<ObjectId>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<BsonDateTime>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<BsonDateTime>,
}

impl Note {
    /// Create note from MongoDB version
    pub fn from_mongo_note(note: MongoNote) -> Self {
        Self {
            id: note.id.into(),
            name: note.name,
            text: note.text,
            color: note.color,
            order: note.order,
            is_deleted: Flag::from_option(note.is_deleted),
            is_archived: Flag::from_option(note.is_archived),
            notebook_id: note.notebook_id.map(DocumentId::from),
            tags: note.tags.into_iter().map(DocumentId::from).collect(),
            created_at: date_or_id_time(note.created_at, &note.id),
            updated_at: date_or_id_time(note.updated_at.or(note.created_at), &note.id),
        }
    }

    /// Create multiple notes from MongoDB version
    pub fn from_mongo_note_multiple(notes: Vec<MongoNote>) -> Vec<Self> {
        notes.into_iter().map(Self::from_mongo_note).collect()
    }
}

impl NoteFilter {
    /// Query document of the filter
    pub fn to_document(&self) -> Document {
        match self {
            NoteFilter::Active => doc! {
                "is_deleted": { "$ne": true },
                "is_archived": { "$ne": true },
            },
            NoteFilter::Trashed => doc! { "is_deleted": true },
            NoteFilter::Archived => doc! { "is_archived": true },
            NoteFilter::ByNotebook(notebook_id) => doc! { "notebook_id": notebook_id.object_id() },
            NoteFilter::ByTags(tag_ids) => {
                let tag_ids = tag_ids
                    .iter()
                    .map(|tag_id| Bson::ObjectId(tag_id.object_id()))
                    .collect::<Vec<_>>();

                doc! { "tags": { "$all": tag_ids } }
            }
        }
    }
}

impl NoteUpdate {
    /// Update document of the update
    pub fn to_document(&self) -> Result<Document> {
        let update = match self {
            NoteUpdate::Fields(values) => {
                let mut set = Document::new();

                if let Some(name) = &values.name {
                    set.insert("name", name.clone());
                }
                if let Some(text) = &values.text {
                    set.insert("text", text.clone());
                }
                if let Some(color) = &values.color {
                    set.insert("color", color.clone());
                }
                if let Some(order) = values.order {
                    set.insert("order", order);
                }
                set.insert("updated_at", to_bson_date(&values.updated_at));

                doc! { "$set": set }
            }
            NoteUpdate::SetDeleted(is_deleted) => doc! { "$set": { "is_deleted": *is_deleted } },
            NoteUpdate::SetArchived(is_archived) => {
                doc! { "$set": { "is_archived": *is_archived } }
            }
            NoteUpdate::SetNotebook(Some(notebook_id)) => {
                doc! { "$set": { "notebook_id": notebook_id.object_id() } }
            }
            NoteUpdate::SetNotebook(None) => doc! { "$unset": { "notebook_id": "" } },
            NoteUpdate::AddTag(tag_id) => doc! { "$addToSet": { "tags": tag_id.object_id() } },
            NoteUpdate::RemoveTag(tag_id) => doc! { "$pull": { "tags": tag_id.object_id() } },
        };

        Ok(update)
    }
}

/// MongoDB version of reminder
#[derive(Debug, Deserialize, Serialize)]
pub struct MongoReminder {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub note_id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub remind_at: Option<BsonDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub repeat: Repeat,
}

impl Reminder {
    /// Create reminder from MongoDB version
    pub fn from_mongo_reminder(reminder: MongoReminder) -> Self {
        Self {
            id: reminder.id.into(),
            note_id: reminder.note_id.into(),
            name: reminder.name,
            message: reminder.message,
            remind_at: date_or_id_time(reminder.remind_at, &reminder.id),
            is_active: Flag::from_option(reminder.is_active),
            repeat: reminder.repeat,
        }
    }
}

impl UpdateReminderValues {
    /// The `$set` document of the supplied fields
    pub fn to_set_document(&self) -> Result<Document> {
        let mut set = Document::new();

        if let Some(name) = &self.name {
            set.insert("name", name.clone());
        }
        if let Some(message) = &self.message {
            set.insert("message", message.clone());
        }
        if let Some(remind_at) = &self.remind_at {
            set.insert("remind_at", to_bson_date(remind_at));
        }
        if let Some(is_active) = self.is_active {
            set.insert("is_active", is_active);
        }
        if let Some(repeat) = &self.repeat {
            set.insert("repeat", to_bson(repeat)?);
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::storage::UpdateNoteValues;

    #[test]
    fn test_active_filter_skips_flagged_notes() {
        let filter = NoteFilter::Active.to_document();

        assert_eq!(
            doc! { "$ne": true },
            filter.get_document("is_deleted").unwrap().clone()
        );
        assert_eq!(
            doc! { "$ne": true },
            filter.get_document("is_archived").unwrap().clone()
        );
    }

    #[test]
    fn test_tag_updates_use_set_operators() {
        let tag_id = DocumentId::new();

        let add = NoteUpdate::AddTag(tag_id).to_document().unwrap();
        assert_eq!(
            tag_id.object_id(),
            add.get_document("$addToSet")
                .unwrap()
                .get_object_id("tags")
                .unwrap()
        );

        let remove = NoteUpdate::RemoveTag(tag_id).to_document().unwrap();
        assert!(remove.get_document("$pull").is_ok());

        let unlink = NoteUpdate::SetNotebook(None).to_document().unwrap();
        assert!(unlink.get_document("$unset").is_ok());
    }

    #[test]
    fn test_sparse_fields_update() {
        let values = UpdateNoteValues {
            name: Some("Shopping".to_string()),
            text: None,
            color: None,
            order: Some(3),
            updated_at: Utc::now().fixed_offset(),
        };

        let update = NoteUpdate::Fields(values).to_document().unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!("Shopping", set.get_str("name").unwrap());
        assert_eq!(3, set.get_i64("order").unwrap());
        assert!(set.get("text").is_none());
        assert!(matches!(set.get("updated_at"), Some(Bson::DateTime(_))));
    }

    #[test]
    fn test_missing_flags_read_as_unset() {
        let now = Utc::now().fixed_offset();

        let note = Note::from_mongo_note(MongoNote {
            id: ObjectId::new(),
            name: "Old note".to_string(),
            text: String::new(),
            color: String::new(),
            order: 0,
            is_deleted: None,
            is_archived: Some(false),
            notebook_id: None,
            tags: Vec::new(),
            created_at: Some(to_bson_date(&now)),
            updated_at: Some(to_bson_date(&now)),
        });

        assert_eq!(Flag::Unset, note.is_deleted);
        assert_eq!(Flag::False, note.is_archived);
        assert!(note.is_active());
    }

    #[test]
    fn test_timestamps_of_older_documents() {
        let id = ObjectId::new();

        // no timestamps at all
        let note: MongoNote = mongodb::bson::from_document(doc! {
            "_id": id,
            "name": "Old note",
        })
        .unwrap();
        let note = Note::from_mongo_note(note);
        assert_eq!(from_bson_date(id.timestamp()), note.created_at);
        assert_eq!(note.created_at, note.updated_at);

        // BSON dates
        let created_at = BsonDateTime::from_millis(1_700_000_000_000);
        let note: MongoNote = mongodb::bson::from_document(doc! {
            "_id": id,
            "created_at": created_at,
        })
        .unwrap();
        let note = Note::from_mongo_note(note);
        assert_eq!(1_700_000_000_000, note.created_at.timestamp_millis());
        assert_eq!(note.created_at, note.updated_at);

        // RFC 3339 strings and garbage
        let note: MongoNote = mongodb::bson::from_document(doc! {
            "_id": id,
            "created_at": "2026-01-05T09:00:00+01:00",
            "updated_at": 42,
        })
        .unwrap();
        let note = Note::from_mongo_note(note);
        assert_eq!(
            DateTime::parse_from_rfc3339("2026-01-05T08:00:00Z").unwrap(),
            note.created_at
        );
        assert_eq!(note.created_at, note.updated_at);
    }
}
