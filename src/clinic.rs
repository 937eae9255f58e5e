//! Veterinary clinic records: pets, search criteria and a paginated registry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BakeryError, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Parses `DD.MM.YYYY` or `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    let format = if trimmed.contains('.') { "%d.%m.%Y" } else { "%Y-%m-%d" };
    NaiveDate::parse_from_str(trimmed, format)
        .map_err(|_| BakeryError::InvalidDate(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub name: String,
    pub birth_date: NaiveDate,
    pub last_visit: NaiveDate,
    pub vet_name: String,
    pub diagnosis: String,
}

impl Pet {
    pub fn new(
        name: impl Into<String>,
        birth_date: NaiveDate,
        last_visit: NaiveDate,
        vet_name: impl Into<String>,
        diagnosis: impl Into<String>,
    ) -> Result<Self> {
        if last_visit < birth_date {
            return Err(BakeryError::VisitBeforeBirth);
        }
        Ok(Self {
            name: name.into(),
            birth_date,
            last_visit,
            vet_name: vet_name.into(),
            diagnosis: diagnosis.into(),
        })
    }
}

/// The three ways records can be searched or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetQuery {
    /// Pet name (case-insensitive) and exact birth date.
    NameAndBirth { name: String, birth_date: NaiveDate },
    /// Exact last visit date and vet name (case-insensitive).
    VisitAndVet { last_visit: NaiveDate, vet_name: String },
    /// Case-insensitive substring of the diagnosis.
    DiagnosisPhrase(String),
}

impl PetQuery {
    pub fn matches(&self, pet: &Pet) -> bool {
        match self {
            PetQuery::NameAndBirth { name, birth_date } => {
                pet.name.to_lowercase() == name.to_lowercase() && pet.birth_date == *birth_date
            }
            PetQuery::VisitAndVet { last_visit, vet_name } => {
                pet.last_visit == *last_visit && pet.vet_name.to_lowercase() == vet_name.to_lowercase()
            }
            PetQuery::DiagnosisPhrase(phrase) => {
                pet.diagnosis.to_lowercase().contains(&phrase.to_lowercase())
            }
        }
    }
}

/// In-memory pet list with 1-based page navigation.
#[derive(Debug, Clone)]
pub struct PetRegistry {
    pets: Vec<Pet>,
    page_size: usize,
    current_page: usize,
}

impl Default for PetRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PetRegistry {
    /// A zero page size falls back to the default.
    pub fn new(page_size: usize) -> Self {
        Self {
            pets: Vec::new(),
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
            current_page: 1,
        }
    }

    pub fn with_pets(mut self, pets: Vec<Pet>) -> Self {
        self.pets = pets;
        self
    }

    pub fn add(&mut self, pet: Pet) {
        self.pets.push(pet);
    }

    pub fn all(&self) -> &[Pet] {
        &self.pets
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn find(&self, query: &PetQuery) -> Vec<&Pet> {
        self.pets.iter().filter(|pet| query.matches(pet)).collect()
    }

    /// Removes every matching record and returns how many went.
    pub fn delete(&mut self, query: &PetQuery) -> usize {
        let before = self.pets.len();
        self.pets.retain(|pet| !query.matches(pet));
        self.clamp_current_page();
        before - self.pets.len()
    }

    /// Records on page `page` (1-based). Out-of-range pages are empty.
    pub fn page(&self, page: usize) -> &[Pet] {
        if page == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(self.page_size);
        if start >= self.pets.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.pets.len());
        &self.pets[start..end]
    }

    pub fn total_pages(&self) -> usize {
        self.pets.len().div_ceil(self.page_size)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Ignores zero.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size > 0 {
            self.page_size = page_size;
            self.clamp_current_page();
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Accepts pages `1..=total_pages`, or page 1 when the registry is empty.
    pub fn set_current_page(&mut self, page: usize) -> bool {
        let total = self.total_pages();
        if (1..=total).contains(&page) || (total == 0 && page == 1) {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub fn into_pets(self) -> Vec<Pet> {
        self.pets
    }

    fn clamp_current_page(&mut self) {
        let total = self.total_pages();
        if self.current_page > total {
            self.current_page = total.max(1);
        }
    }
}
