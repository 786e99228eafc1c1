//! Referential cleanup
//!
//! Notebooks and tags are only referenced from notes. Before either is deleted every reference
//! to it is stripped, when that fails the notebook or tag stays. There is no transaction: a
//! failure after the cleanup leaves the references stripped and the notebook or tag in place,
//! running the delete again finishes the job.

use crate::error::Error;
use crate::error::Result;
use crate::id::DocumentId;
use crate::notes::NoteFilter;
use crate::storage::NoteUpdate;
use crate::storage::Storage;

/// Unlink every note from the notebook, then delete the notebook
///
/// # Errors
///
/// Will return `Err` when the notebook does not exist, or the storage fails
pub async fn delete_notebook<S: Storage>(storage: &S, notebook_id: &DocumentId) -> Result<()> {
    if storage.find_single_notebook_by_id(notebook_id).await?.is_none() {
        return Err(Error::NotFound("Notebook"));
    }

    let unlinked = storage
        .update_many_notes(
            &NoteFilter::ByNotebook(*notebook_id),
            &NoteUpdate::SetNotebook(None),
        )
        .await?;
    tracing::debug!("Unlinked {unlinked} note(s) from notebook {notebook_id}");

    storage.delete_notebook(notebook_id).await?;

    tracing::info!("Deleted notebook {notebook_id}");

    Ok(())
}

/// Remove the tag from every note, then delete the tag
///
/// # Errors
///
/// Will return `Err` when the tag does not exist, or the storage fails
pub async fn delete_tag<S: Storage>(storage: &S, tag_id: &DocumentId) -> Result<()> {
    if storage.find_single_tag_by_id(tag_id).await?.is_none() {
        return Err(Error::NotFound("Tag"));
    }

    let untagged = storage
        .update_many_notes(
            &NoteFilter::ByTags(vec![*tag_id]),
            &NoteUpdate::RemoveTag(*tag_id),
        )
        .await?;
    tracing::debug!("Removed tag {tag_id} from {untagged} note(s)");

    storage.delete_tag(tag_id).await?;

    tracing::info!("Deleted tag {tag_id}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::clock::Clock;
    use crate::lifecycle::NoteFields;
    use crate::lifecycle::attach_tag;
    use crate::lifecycle::create_note;
    use crate::lifecycle::find_note;
    use crate::lifecycle::list_notes;
    use crate::notebooks::create_notebook;
    use crate::storage::Memory;
    use crate::tags::create_tag;

    use super::*;

    fn fields(name: &str) -> NoteFields {
        NoteFields {
            name: Some(name.to_string()),
            ..NoteFields::default()
        }
    }

    #[tokio::test]
    async fn test_delete_notebook_unlinks_notes() {
        let storage = Memory::new();
        let clock = Clock::default();

        let work = create_notebook(&storage, Some("Work".to_string()), None, true)
            .await
            .unwrap();
        let note = create_note(&storage, &clock, fields("Report"), Some(work.id))
            .await
            .unwrap();
        let other = create_note(&storage, &clock, fields("Other"), None)
            .await
            .unwrap();

        delete_notebook(&storage, &work.id).await.unwrap();

        let note = find_note(&storage, &note.id).await.unwrap();
        assert_eq!(None, note.notebook_id);
        assert!(find_note(&storage, &other.id).await.is_ok());
        assert!(
            storage
                .find_single_notebook_by_id(&work.id)
                .await
                .unwrap()
                .is_none()
        );

        assert!(matches!(
            delete_notebook(&storage, &work.id).await,
            Err(Error::NotFound("Notebook"))
        ));
    }

    #[tokio::test]
    async fn test_delete_tag_removes_it_from_notes() {
        let storage = Memory::new();
        let clock = Clock::default();

        let urgent = create_tag(&storage, Some("urgent".to_string()), None)
            .await
            .unwrap();
        let later = create_tag(&storage, Some("later".to_string()), None)
            .await
            .unwrap();

        let a = create_note(&storage, &clock, fields("A"), None).await.unwrap();
        let b = create_note(&storage, &clock, fields("B"), None).await.unwrap();

        for note in [&a, &b] {
            attach_tag(&storage, &note.id, &urgent.id).await.unwrap();
        }
        attach_tag(&storage, &b.id, &later.id).await.unwrap();

        delete_tag(&storage, &urgent.id).await.unwrap();

        let tagged = storage
            .find_notes(&NoteFilter::ByTags(vec![urgent.id]))
            .await
            .unwrap();
        assert!(tagged.is_empty());

        assert!(find_note(&storage, &a.id).await.unwrap().tags.is_empty());
        assert_eq!(vec![later.id], find_note(&storage, &b.id).await.unwrap().tags);
    }

    #[tokio::test]
    async fn test_cleanup_without_referrers() {
        let storage = Memory::new();
        let clock = Clock::default();

        let note = create_note(&storage, &clock, fields("A"), None).await.unwrap();
        let unused_tag = create_tag(&storage, Some("unused".to_string()), None)
            .await
            .unwrap();
        let unused_notebook = create_notebook(&storage, Some("Unused".to_string()), None, false)
            .await
            .unwrap();

        delete_tag(&storage, &unused_tag.id).await.unwrap();
        delete_notebook(&storage, &unused_notebook.id).await.unwrap();

        let note_after = find_note(&storage, &note.id).await.unwrap();
        assert_eq!(note.updated_at, note_after.updated_at);
        assert_eq!(1, list_notes(&storage, &NoteFilter::Active).await.unwrap().len());
    }

    #[tokio::test]
    async fn test_failed_cleanup_keeps_notebook_and_tag() {
        let storage = Memory::new();
        let clock = Clock::default();

        let work = create_notebook(&storage, Some("Work".to_string()), None, true)
            .await
            .unwrap();
        let urgent = create_tag(&storage, Some("urgent".to_string()), None)
            .await
            .unwrap();
        let note = create_note(&storage, &clock, fields("Report"), Some(work.id))
            .await
            .unwrap();
        attach_tag(&storage, &note.id, &urgent.id).await.unwrap();

        storage.fail_bulk_updates();

        assert!(matches!(
            delete_notebook(&storage, &work.id).await,
            Err(Error::Store(_))
        ));
        assert!(matches!(
            delete_tag(&storage, &urgent.id).await,
            Err(Error::Store(_))
        ));

        assert!(
            storage
                .find_single_notebook_by_id(&work.id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(storage.find_single_tag_by_id(&urgent.id).await.unwrap().is_some());

        let note = find_note(&storage, &note.id).await.unwrap();
        assert_eq!(Some(work.id), note.notebook_id);
        assert_eq!(vec![urgent.id], note.tags);
    }
}
