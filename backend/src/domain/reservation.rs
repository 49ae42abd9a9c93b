//! Service reservations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::domain::{Pet, UserId};

/// Validation errors for reservation drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReservationValidationError {
    /// Label was blank once trimmed.
    #[error("reservation name must not be empty")]
    EmptyName,
}

/// Bookable services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CareService {
    /// Day-long supervised play.
    Daycare,
    /// Grooming appointment.
    Grooming,
    /// Overnight boarding.
    Boarding,
}

/// Raised when a service label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service: {0}")]
pub struct ParseCareServiceError(String);

impl CareService {
    /// Canonical lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daycare => "daycare",
            Self::Grooming => "grooming",
            Self::Boarding => "boarding",
        }
    }
}

impl fmt::Display for CareService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CareService {
    type Err = ParseCareServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daycare" => Ok(Self::Daycare),
            "grooming" => Ok(Self::Grooming),
            "boarding" => Ok(Self::Boarding),
            _ => Err(ParseCareServiceError(s.to_owned())),
        }
    }
}

/// Mutable reservation fields.
///
/// `pet_id` must reference a pet of the same owner; the store enforces that
/// with a composite foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pet_id: Uuid,
    name: String,
    date: NaiveDate,
    time: NaiveTime,
    service: CareService,
}

impl ReservationDraft {
    /// Validate and build a draft.
    pub fn new(
        pet_id: Uuid,
        name: &str,
        date: NaiveDate,
        time: NaiveTime,
        service: CareService,
    ) -> Result<Self, ReservationValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ReservationValidationError::EmptyName);
        }
        Ok(Self {
            pet_id,
            name: name.to_owned(),
            date,
            time,
            service,
        })
    }

    /// Referenced pet.
    pub fn pet_id(&self) -> Uuid {
        self.pet_id
    }

    /// Label shown in the portal.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calendar date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Time of day.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Booked service.
    pub fn service(&self) -> CareService {
        self.service
    }
}

/// Stored reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Record identity.
    pub id: Uuid,
    /// Owning user.
    pub owner: UserId,
    /// Referenced pet.
    pub pet_id: Uuid,
    /// Label.
    pub name: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Time of day.
    pub time: NaiveTime,
    /// Booked service.
    pub service: CareService,
    /// Insertion time assigned by the store.
    pub created_at: DateTime<Utc>,
}

/// A pet joined with its reservations, as listed on the reservations page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetReservations {
    /// The pet.
    pub pet: Pet,
    /// Its reservations ordered by date then time.
    pub reservations: Vec<Reservation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("daycare", CareService::Daycare)]
    #[case("Grooming", CareService::Grooming)]
    #[case(" BOARDING", CareService::Boarding)]
    fn parses_service_labels(#[case] raw: &str, #[case] expected: CareService) {
        assert_eq!(raw.parse::<CareService>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_service() {
        assert!("spa".parse::<CareService>().is_err());
    }

    #[rstest]
    fn draft_rejects_blank_name() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date");
        let time = NaiveTime::from_hms_opt(9, 30, 0).expect("valid time");
        let err = ReservationDraft::new(Uuid::new_v4(), "  ", date, time, CareService::Daycare)
            .expect_err("blank name");
        assert_eq!(err, ReservationValidationError::EmptyName);
    }
}
