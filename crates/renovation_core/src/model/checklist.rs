//! Per-room renovation checklist.
//!
//! # Responsibility
//! - Define the fixed set of renovation categories shared by all rooms.
//! - Keep one boolean per category with a stable serialized key order.
//!
//! # Invariants
//! - A checklist always holds exactly `CATEGORY_COUNT` entries.
//! - Deserialization rejects missing and unknown category keys.

use crate::model::room::RoomValidationError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Number of fixed checklist categories.
pub const CATEGORY_COUNT: usize = 10;

/// One renovation aspect tracked per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecklistCategory {
    Paint,
    Flooring,
    Lighting,
    Plumbing,
    Hvac,
    Furniture,
    Appliances,
    WindowsDoors,
    Bathroom,
    DeepClean,
}

impl ChecklistCategory {
    /// All categories in canonical display and serialization order.
    pub const ALL: [ChecklistCategory; CATEGORY_COUNT] = [
        Self::Paint,
        Self::Flooring,
        Self::Lighting,
        Self::Plumbing,
        Self::Hvac,
        Self::Furniture,
        Self::Appliances,
        Self::WindowsDoors,
        Self::Bathroom,
        Self::DeepClean,
    ];

    /// Display name, also used as the JSON key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paint => "Paint",
            Self::Flooring => "Flooring",
            Self::Lighting => "Lighting",
            Self::Plumbing => "Plumbing",
            Self::Hvac => "HVAC",
            Self::Furniture => "Furniture",
            Self::Appliances => "Appliances",
            Self::WindowsDoors => "Windows/Doors",
            Self::Bathroom => "Bathroom",
            Self::DeepClean => "Deep Clean",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Display for ChecklistCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecklistCategory {
    type Err = RoomValidationError;

    /// Parses a category name, ignoring ASCII case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RoomValidationError::UnknownCategory(trimmed.to_string()))
    }
}

/// Completion flags for every fixed category of one room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, bool>")]
pub struct Checklist {
    done: [bool; CATEGORY_COUNT],
}

impl Checklist {
    /// Returns whether `category` is checked.
    pub fn get(&self, category: ChecklistCategory) -> bool {
        self.done[category.index()]
    }

    pub fn set(&mut self, category: ChecklistCategory, value: bool) {
        self.done[category.index()] = value;
    }

    /// Flips `category` and returns the new value.
    pub fn toggle(&mut self, category: ChecklistCategory) -> bool {
        let slot = &mut self.done[category.index()];
        *slot = !*slot;
        *slot
    }

    /// Iterates entries in canonical category order.
    pub fn iter(&self) -> impl Iterator<Item = (ChecklistCategory, bool)> + '_ {
        ChecklistCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
    }

    /// Number of checked categories.
    pub fn checked_count(&self) -> usize {
        self.done.iter().filter(|value| **value).count()
    }
}

impl Serialize for Checklist {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CATEGORY_COUNT))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.as_str(), &value)?;
        }
        map.end()
    }
}

impl TryFrom<HashMap<String, bool>> for Checklist {
    type Error = RoomValidationError;

    fn try_from(entries: HashMap<String, bool>) -> Result<Self, Self::Error> {
        let mut checklist = Checklist::default();
        for (key, value) in &entries {
            let category = ChecklistCategory::ALL
                .into_iter()
                .find(|category| category.as_str() == key)
                .ok_or_else(|| RoomValidationError::UnknownCategory(key.clone()))?;
            checklist.set(category, *value);
        }

        if let Some(missing) = ChecklistCategory::ALL
            .into_iter()
            .find(|category| !entries.contains_key(category.as_str()))
        {
            return Err(RoomValidationError::MissingCategory(missing));
        }

        Ok(checklist)
    }
}
