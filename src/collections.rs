use tracing::info;
use ulid::Ulid;

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::store::{PersistentCell, SharedStorage};
use crate::types::{Entity, InsertOrder};

/// Generate a new record id. ULIDs start with the millisecond timestamp, so
/// ids sort by creation time across milliseconds.
pub fn generate_id() -> String {
    Ulid::new().to_string()
}

/// A typed entity list persisted under `E::STORAGE_KEY`.
#[derive(Debug)]
pub struct Collection<E: Entity> {
    cell: PersistentCell<Vec<E>>,
}

impl<E: Entity> Collection<E> {
    pub fn open(storage: SharedStorage) -> Self {
        Self {
            cell: PersistentCell::open(storage, E::STORAGE_KEY, Vec::new()),
        }
    }

    pub fn items(&self) -> &[E] {
        self.cell.get()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.items().iter().find(|item| item.id() == id)
    }

    pub fn add(&mut self, draft: E::Draft) -> WorkspaceResult<E> {
        let record = E::from_draft(generate_id(), crate::types::timestamp_now(), draft);
        let added = record.clone();
        self.cell.update(|prev| {
            let mut next = Vec::with_capacity(prev.len() + 1);
            match E::INSERT_ORDER {
                InsertOrder::Append => {
                    next.extend(prev.iter().cloned());
                    next.push(record);
                }
                InsertOrder::Prepend => {
                    next.push(record);
                    next.extend(prev.iter().cloned());
                }
            }
            next
        })?;
        info!(kind = E::KIND, id = %added.id(), "added record");
        Ok(added)
    }

    /// Replace every field of `id` except its identity and creation time.
    pub fn edit(&mut self, id: &str, draft: E::Draft) -> WorkspaceResult<E> {
        if self.get(id).is_none() {
            return Err(WorkspaceError::not_found(E::KIND, id));
        }
        let edited = self.cell.modify(|items| {
            items.iter_mut().find(|item| item.id() == id).map(|item| {
                item.apply_draft(draft);
                item.clone()
            })
        })?;
        info!(kind = E::KIND, id, "edited record");
        edited.ok_or_else(|| WorkspaceError::not_found(E::KIND, id))
    }

    /// Edit starting from the record's current fields. Nothing is written
    /// when `f` fails.
    pub fn patch(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut E::Draft) -> WorkspaceResult<()>,
    ) -> WorkspaceResult<E> {
        let mut draft = self
            .get(id)
            .ok_or_else(|| WorkspaceError::not_found(E::KIND, id))?
            .to_draft();
        f(&mut draft)?;
        self.edit(id, draft)
    }

    pub fn delete(&mut self, id: &str) -> WorkspaceResult<E> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| WorkspaceError::not_found(E::KIND, id))?;
        self.retain(|item| item.id() != id)?;
        info!(kind = E::KIND, id, "deleted record");
        Ok(removed)
    }

    pub fn retain(&mut self, keep: impl Fn(&E) -> bool) -> WorkspaceResult<()> {
        self.cell
            .update(|prev| prev.iter().filter(|item| keep(*item)).cloned().collect())?;
        Ok(())
    }

    pub fn reload(&mut self) {
        self.cell.reload();
    }
}
