//! Driving port for reading pets.

use async_trait::async_trait;

use crate::domain::{Error, Pet, UserId};

/// Pet read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetQuery: Send + Sync {
    /// List the owner's pets.
    async fn list_pets(&self, owner: &UserId) -> Result<Vec<Pet>, Error>;
}

/// Fixture implementation returning no pets.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePetQuery;

#[async_trait]
impl PetQuery for FixturePetQuery {
    async fn list_pets(&self, _owner: &UserId) -> Result<Vec<Pet>, Error> {
        Ok(Vec::new())
    }
}
