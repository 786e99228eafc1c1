//! MongoDB storage
//!
//! Every entity has its own collection, named after the entity

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Client;
use mongodb::Collection;
use mongodb::IndexModel;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::error::ErrorKind;
use mongodb::error::WriteFailure;
use mongodb::options::IndexOptions;
use tracing::info;

use crate::id::DocumentId;
use crate::notebooks::NoteBook;
use crate::notes::Note;
use crate::notes::NoteFilter;
use crate::reminders::Reminder;
use crate::tags::Tag;
use crate::users::User;

use super::ChangePasswordValues;
use super::CreateNoteBookValues;
use super::CreateNoteValues;
use super::CreateReminderValues;
use super::CreateTagValues;
use super::CreateUserValues;
use super::Error;
use super::NoteUpdate;
use super::Result;
use super::Storage;
use super::UpdateNoteBookValues;
use super::UpdateOutcome;
use super::UpdateReminderValues;
use super::UpdateTagValues;

use types::MongoNote;
use types::MongoNoteBook;
use types::MongoReminder;
use types::MongoTag;
use types::MongoUser;
use types::by_id;
use types::to_bson_date;

mod types;

/// Duplicate key error code of MongoDB
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB storage
#[derive(Clone, Debug)]
pub struct Mongo {
    database: mongodb::Database,
}

impl Mongo {
    /// Connect to MongoDB and prepare the indexes
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await.map_err(connection_error)?;

        let mongo = Self {
            database: client.database(database),
        };

        mongo.ping().await?;

        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        mongo
            .users()
            .create_index(unique_email)
            .await
            .map_err(connection_error)?;

        info!("Connected to MongoDB database `{database}`");

        Ok(mongo)
    }

    fn users(&self) -> Collection<MongoUser> {
        self.database.collection("users")
    }

    fn notebooks(&self) -> Collection<MongoNoteBook> {
        self.database.collection("notebooks")
    }

    fn tags(&self) -> Collection<MongoTag> {
        self.database.collection("tags")
    }

    fn notes(&self) -> Collection<MongoNote> {
        self.database.collection("notes")
    }

    fn reminders(&self) -> Collection<MongoReminder> {
        self.database.collection("reminders")
    }
}

/// Convert a MongoDB error, a violated unique index becomes [`Error::Duplicate`]
fn connection_error(err: mongodb::error::Error) -> Error {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY =>
        {
            Error::Duplicate(write_error.message.clone())
        }
        _ => Error::Connection(err.to_string()),
    }
}

/// Update outcome of MongoDB
fn update_outcome(result: mongodb::results::UpdateResult) -> UpdateOutcome {
    UpdateOutcome {
        matched: result.matched_count,
        modified: result.modified_count,
    }
}

#[async_trait]
impl Storage for Mongo {
    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_error)?;

        Ok(())
    }

    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .users()
            .find_one(doc! { "email": email })
            .await
            .map_err(connection_error)?;

        Ok(user.map(User::from_mongo_user))
    }

    async fn find_single_user_by_id(&self, id: &DocumentId) -> Result<Option<User>> {
        let user = self
            .users()
            .find_one(by_id(id))
            .await
            .map_err(connection_error)?;

        Ok(user.map(User::from_mongo_user))
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let user = MongoUser {
            id: ObjectId::new(),
            session_id: values.session_id.to_string(),
            email: values.email.to_string(),
            password_hash: values.hashed_password.to_string(),
            first_name: values.first_name.to_string(),
            last_name: values.last_name.to_string(),
            created_at: Some(to_bson_date(&values.created_at)),
        };

        self.users()
            .insert_one(&user)
            .await
            .map_err(connection_error)?;

        Ok(User::from_mongo_user(user))
    }

    async fn change_password(
        &self,
        user: &User,
        values: &ChangePasswordValues<'_>,
    ) -> Result<User> {
        let update = doc! {
            "$set": {
                "session_id": values.session_id.to_string(),
                "password_hash": values.hashed_password,
            }
        };

        self.users()
            .update_one(by_id(&user.id), update)
            .await
            .map_err(connection_error)?;

        self.find_single_user_by_id(&user.id)
            .await?
            .ok_or_else(|| Error::Connection(format!("user {} disappeared", user.id)))
    }

    async fn find_all_notebooks(&self) -> Result<Vec<NoteBook>> {
        let notebooks: Vec<MongoNoteBook> = self
            .notebooks()
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(connection_error)?
            .try_collect()
            .await
            .map_err(connection_error)?;

        Ok(notebooks
            .into_iter()
            .map(NoteBook::from_mongo_notebook)
            .collect())
    }

    async fn find_single_notebook_by_id(&self, id: &DocumentId) -> Result<Option<NoteBook>> {
        let notebook = self
            .notebooks()
            .find_one(by_id(id))
            .await
            .map_err(connection_error)?;

        Ok(notebook.map(NoteBook::from_mongo_notebook))
    }

    async fn create_notebook(&self, values: &CreateNoteBookValues<'_>) -> Result<NoteBook> {
        let notebook = MongoNoteBook {
            id: ObjectId::new(),
            name: values.name.to_string(),
            description: values.description.to_string(),
            is_active: values.is_active,
        };

        self.notebooks()
            .insert_one(&notebook)
            .await
            .map_err(connection_error)?;

        Ok(NoteBook::from_mongo_notebook(notebook))
    }

    async fn update_notebook(
        &self,
        id: &DocumentId,
        values: &UpdateNoteBookValues,
    ) -> Result<UpdateOutcome> {
        let result = self
            .notebooks()
            .update_one(by_id(id), doc! { "$set": values.to_set_document() })
            .await
            .map_err(connection_error)?;

        Ok(update_outcome(result))
    }

    async fn delete_notebook(&self, id: &DocumentId) -> Result<u64> {
        let result = self
            .notebooks()
            .delete_one(by_id(id))
            .await
            .map_err(connection_error)?;

        Ok(result.deleted_count)
    }

    async fn find_all_tags(&self) -> Result<Vec<Tag>> {
        let tags: Vec<MongoTag> = self
            .tags()
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(connection_error)?
            .try_collect()
            .await
            .map_err(connection_error)?;

        Ok(tags.into_iter().map(Tag::from_mongo_tag).collect())
    }

    async fn find_single_tag_by_id(&self, id: &DocumentId) -> Result<Option<Tag>> {
        let tag = self
            .tags()
            .find_one(by_id(id))
            .await
            .map_err(connection_error)?;

        Ok(tag.map(Tag::from_mongo_tag))
    }

    async fn create_tag(&self, values: &CreateTagValues<'_>) -> Result<Tag> {
        let tag = MongoTag {
            id: ObjectId::new(),
            name: values.name.to_string(),
            color: values.color.to_string(),
        };

        self.tags()
            .insert_one(&tag)
            .await
            .map_err(connection_error)?;

        Ok(Tag::from_mongo_tag(tag))
    }

    async fn update_tag(&self, id: &DocumentId, values: &UpdateTagValues) -> Result<UpdateOutcome> {
        let result = self
            .tags()
            .update_one(by_id(id), doc! { "$set": values.to_set_document() })
            .await
            .map_err(connection_error)?;

        Ok(update_outcome(result))
    }

    async fn delete_tag(&self, id: &DocumentId) -> Result<u64> {
        let result = self
            .tags()
            .delete_one(by_id(id))
            .await
            .map_err(connection_error)?;

        Ok(result.deleted_count)
    }

    async fn find_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let notes: Vec<MongoNote> = self
            .notes()
            .find(filter.to_document())
            .sort(doc! { "_id": 1 })
            .await
            .map_err(connection_error)?
            .try_collect()
            .await
            .map_err(connection_error)?;

        Ok(Note::from_mongo_note_multiple(notes))
    }

    async fn find_single_note_by_id(&self, id: &DocumentId) -> Result<Option<Note>> {
        let note = self
            .notes()
            .find_one(by_id(id))
            .await
            .map_err(connection_error)?;

        Ok(note.map(Note::from_mongo_note))
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let note = MongoNote {
            id: ObjectId::new(),
            name: values.name.to_string(),
            text: values.text.to_string(),
            color: values.color.to_string(),
            order: values.order,
            is_deleted: Some(false),
            is_archived: Some(false),
            notebook_id: values.notebook_id.map(|notebook_id| notebook_id.object_id()),
            tags: Vec::new(),
            created_at: Some(to_bson_date(&values.created_at)),
            updated_at: Some(to_bson_date(&values.created_at)),
        };

        self.notes()
            .insert_one(&note)
            .await
            .map_err(connection_error)?;

        Ok(Note::from_mongo_note(note))
    }

    async fn update_note(&self, id: &DocumentId, update: &NoteUpdate) -> Result<UpdateOutcome> {
        let result = self
            .notes()
            .update_one(by_id(id), update.to_document()?)
            .await
            .map_err(connection_error)?;

        Ok(update_outcome(result))
    }

    async fn update_many_notes(&self, filter: &NoteFilter, update: &NoteUpdate) -> Result<u64> {
        let result = self
            .notes()
            .update_many(filter.to_document(), update.to_document()?)
            .await
            .map_err(connection_error)?;

        Ok(result.modified_count)
    }

    async fn delete_note(&self, id: &DocumentId) -> Result<u64> {
        let result = self
            .notes()
            .delete_one(by_id(id))
            .await
            .map_err(connection_error)?;

        Ok(result.deleted_count)
    }

    async fn find_reminders_by_note(&self, note_id: &DocumentId) -> Result<Vec<Reminder>> {
        let reminders: Vec<MongoReminder> = self
            .reminders()
            .find(doc! { "note_id": note_id.object_id() })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(connection_error)?
            .try_collect()
            .await
            .map_err(connection_error)?;

        Ok(reminders
            .into_iter()
            .map(Reminder::from_mongo_reminder)
            .collect())
    }

    async fn find_single_reminder_by_id(&self, id: &DocumentId) -> Result<Option<Reminder>> {
        let reminder = self
            .reminders()
            .find_one(by_id(id))
            .await
            .map_err(connection_error)?;

        Ok(reminder.map(Reminder::from_mongo_reminder))
    }

    async fn create_reminder(&self, values: &CreateReminderValues<'_>) -> Result<Reminder> {
        let reminder = MongoReminder {
            id: ObjectId::new(),
            note_id: values.note_id.object_id(),
            name: values.name.to_string(),
            message: values.message.to_string(),
            remind_at: Some(to_bson_date(&values.remind_at)),
            is_active: Some(true),
            repeat: values.repeat,
        };

        self.reminders()
            .insert_one(&reminder)
            .await
            .map_err(connection_error)?;

        Ok(Reminder::from_mongo_reminder(reminder))
    }

    async fn update_reminder(
        &self,
        id: &DocumentId,
        values: &UpdateReminderValues,
    ) -> Result<UpdateOutcome> {
        let result = self
            .reminders()
            .update_one(by_id(id), doc! { "$set": values.to_set_document()? })
            .await
            .map_err(connection_error)?;

        Ok(update_outcome(result))
    }

    async fn delete_reminder(&self, id: &DocumentId) -> Result<u64> {
        let result = self
            .reminders()
            .delete_one(by_id(id))
            .await
            .map_err(connection_error)?;

        Ok(result.deleted_count)
    }

    async fn delete_reminders_by_note(&self, note_id: &DocumentId) -> Result<u64> {
        let result = self
            .reminders()
            .delete_many(doc! { "note_id": note_id.object_id() })
            .await
            .map_err(connection_error)?;

        Ok(result.deleted_count)
    }
}
