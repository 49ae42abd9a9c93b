//! Pet profiles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AvatarPath, AvatarUpload, UserId};

/// Validation errors for pet drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetValidationError {
    /// Name was blank once trimmed.
    #[error("pet name must not be empty")]
    EmptyName,
    /// Breed was blank once trimmed.
    #[error("pet breed must not be empty")]
    EmptyBreed,
}

/// Species accepted by the daycare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetKind {
    /// Dogs.
    Dog,
    /// Cats.
    Cat,
}

/// Raised when a pet type label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pet type: {0}")]
pub struct ParsePetKindError(String);

impl PetKind {
    /// Canonical label stored in the database and rendered to clients.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "Dog",
            Self::Cat => "Cat",
        }
    }
}

impl fmt::Display for PetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetKind {
    type Err = ParsePetKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" => Ok(Self::Dog),
            "cat" => Ok(Self::Cat),
            _ => Err(ParsePetKindError(s.to_owned())),
        }
    }
}

/// Mutable pet fields supplied by a create or update request.
///
/// # Examples
/// ```
/// use pawsplay::domain::{PetDraft, PetKind};
///
/// let draft = PetDraft::new(" Rex ", 3, "Lab", Some(PetKind::Dog)).unwrap();
/// assert_eq!(draft.name(), "Rex");
/// assert!(PetDraft::new("Rex", 3, "  ", None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetDraft {
    name: String,
    age: u16,
    breed: String,
    kind: Option<PetKind>,
}

impl PetDraft {
    /// Validate and build a draft. Text fields are trimmed.
    pub fn new(
        name: &str,
        age: u16,
        breed: &str,
        kind: Option<PetKind>,
    ) -> Result<Self, PetValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PetValidationError::EmptyName);
        }
        let breed = breed.trim();
        if breed.is_empty() {
            return Err(PetValidationError::EmptyBreed);
        }
        Ok(Self {
            name: name.to_owned(),
            age,
            breed: breed.to_owned(),
            kind,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Age in years.
    pub fn age(&self) -> u16 {
        self.age
    }

    /// Breed label.
    pub fn breed(&self) -> &str {
        &self.breed
    }

    /// Species, when supplied.
    pub fn kind(&self) -> Option<PetKind> {
        self.kind
    }
}

/// Create or update payload for a pet: the record fields plus an optional
/// avatar to attach once the record exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetChange {
    /// Record fields.
    pub draft: PetDraft,
    /// Avatar to upload after the primary write.
    pub avatar: Option<AvatarUpload>,
}

/// Stored pet profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    /// Record identity.
    pub id: Uuid,
    /// Owning user.
    pub owner: UserId,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u16,
    /// Breed label.
    pub breed: String,
    /// Species, when recorded.
    pub kind: Option<PetKind>,
    /// Linked avatar, once provisioned.
    pub avatar_path: Option<AvatarPath>,
    /// Insertion time assigned by the store.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Dog", PetKind::Dog)]
    #[case("dog", PetKind::Dog)]
    #[case(" CAT ", PetKind::Cat)]
    fn parses_kind_labels(#[case] raw: &str, #[case] expected: PetKind) {
        assert_eq!(raw.parse::<PetKind>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_kind() {
        assert!("Hamster".parse::<PetKind>().is_err());
    }

    #[rstest]
    #[case("", "Lab", PetValidationError::EmptyName)]
    #[case("Rex", " ", PetValidationError::EmptyBreed)]
    fn draft_rejects_blank_text(
        #[case] name: &str,
        #[case] breed: &str,
        #[case] expected: PetValidationError,
    ) {
        let err = PetDraft::new(name, 1, breed, None).expect_err("blank field");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn draft_trims_text() {
        let draft = PetDraft::new(" Rex ", 4, " Lab ", Some(PetKind::Dog)).expect("valid");
        assert_eq!(draft.name(), "Rex");
        assert_eq!(draft.breed(), "Lab");
        assert_eq!(draft.age(), 4);
        assert_eq!(draft.kind(), Some(PetKind::Dog));
    }
}
