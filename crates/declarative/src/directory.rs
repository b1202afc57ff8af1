//! Remote directory trait
//!
//! A RemoteDirectory is the collection of entities living on a remote
//! resource (the labels of a repository, the fields of a project board).
//! The reconciler reads it once per run and then mutates it entity by
//! entity.

use crate::error::DirectoryError;
use crate::types::{ActualEntity, Entity};

/// Collaborator the reconciler converges towards the desired state
///
/// Implementations wrap whatever transport reaches the remote (REST,
/// GraphQL, a CLI). Every call is expected to be bounded by a timeout and
/// to report an exceeded deadline as [`DirectoryError::Timeout`].
///
/// # Example
///
/// ```
/// use declarative::{ActualEntity, DirectoryError, Entity, RemoteDirectory};
/// use std::cell::RefCell;
///
/// #[derive(Default)]
/// struct InMemory {
///     items: RefCell<Vec<ActualEntity>>,
/// }
///
/// impl RemoteDirectory for InMemory {
///     fn list(&self) -> Result<Vec<ActualEntity>, DirectoryError> {
///         Ok(self.items.borrow().clone())
///     }
///
///     fn create(&self, entity: &Entity) -> Result<String, DirectoryError> {
///         let id = entity.key.clone();
///         self.items.borrow_mut().push(ActualEntity {
///             key: entity.key.clone(),
///             attributes: entity.attributes.clone(),
///             remote_id: id.clone(),
///         });
///         Ok(id)
///     }
///
///     fn update(&self, remote_id: &str, entity: &Entity) -> Result<(), DirectoryError> {
///         let mut items = self.items.borrow_mut();
///         let item = items
///             .iter_mut()
///             .find(|i| i.remote_id == remote_id)
///             .ok_or_else(|| DirectoryError::NotFound(remote_id.to_string()))?;
///         item.attributes = entity.attributes.clone();
///         Ok(())
///     }
///
///     fn delete(&self, remote_id: &str) -> Result<(), DirectoryError> {
///         self.items.borrow_mut().retain(|i| i.remote_id != remote_id);
///         Ok(())
///     }
/// }
/// ```
pub trait RemoteDirectory {
    /// Fetch every entity currently present on the remote
    ///
    /// A failure here is fatal for the run: there is no baseline to diff.
    fn list(&self) -> Result<Vec<ActualEntity>, DirectoryError>;

    /// Create an entity, returning its remote id
    ///
    /// Fails with `Validation` for rejected attributes and `Conflict` when
    /// the key exists despite not appearing in `list()`.
    fn create(&self, entity: &Entity) -> Result<String, DirectoryError>;

    /// Update the entity identified by `remote_id` to the declared state
    ///
    /// Fails with `NotFound` when the entity vanished after `list()`.
    fn update(&self, remote_id: &str, entity: &Entity) -> Result<(), DirectoryError>;

    /// Delete the entity identified by `remote_id`
    ///
    /// `NotFound` is treated by the reconciler as already satisfied.
    fn delete(&self, remote_id: &str) -> Result<(), DirectoryError>;
}

impl<D: RemoteDirectory + ?Sized> RemoteDirectory for &D {
    fn list(&self) -> Result<Vec<ActualEntity>, DirectoryError> {
        (**self).list()
    }

    fn create(&self, entity: &Entity) -> Result<String, DirectoryError> {
        (**self).create(entity)
    }

    fn update(&self, remote_id: &str, entity: &Entity) -> Result<(), DirectoryError> {
        (**self).update(remote_id, entity)
    }

    fn delete(&self, remote_id: &str) -> Result<(), DirectoryError> {
        (**self).delete(remote_id)
    }
}
