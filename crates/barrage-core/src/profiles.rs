//! Soldier flavor profiles.
//!
//! Each soldier waiting for rescue carries a [`SoldierProfile`]. Profiles are
//! plain data; the simulation only passes them through to events and the
//! render snapshot. Hosts plug in their own content through
//! [`ProfileProvider`]; [`BuiltinProfiles`] is a small default roster.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Who the soldier is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldierProfile {
    /// Full name.
    pub name: String,
    /// Rank.
    pub rank: String,
    /// Age in years.
    pub age: u8,
    /// Hometown.
    pub hometown: String,
    /// Short backstory.
    pub backstory: String,
    /// Who is waiting at home.
    pub family: String,
}

impl SoldierProfile {
    /// "Rank Name", as shown in messages.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.rank, self.name)
    }
}

/// Source of soldier profiles.
pub trait ProfileProvider: Send + Sync {
    /// Returns a profile for the next soldier.
    fn next_profile(&self, rng: &mut dyn rand::RngCore) -> SoldierProfile;
}

/// Built-in roster.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProfiles;

const ROSTER: &[(&str, &str, u8, &str, &str, &str)] = &[
    (
        "Ada Brennan",
        "Private",
        19,
        "Galway",
        "Signed up the week she finished school. Fixes every radio in the platoon.",
        "Parents and two younger brothers",
    ),
    (
        "Tomas Varga",
        "Corporal",
        26,
        "Szeged",
        "Former river pilot. Can read a map in the dark.",
        "Wife Eszter",
    ),
    (
        "Lena Okafor",
        "Sergeant",
        31,
        "Lagos",
        "Third tour. Keeps a notebook of everyone she has carried out.",
        "Daughter Amaka",
    ),
    (
        "Milo Hartmann",
        "Private First Class",
        22,
        "Bremen",
        "Apprentice carpenter who whittles chess pieces between shifts.",
        "Grandmother Ilse",
    ),
    (
        "Jun Takeda",
        "Lance Corporal",
        24,
        "Sapporo",
        "Marathon runner. First to volunteer for every forward patrol.",
        "Twin sister Aiko",
    ),
    (
        "Rosa Delgado",
        "Private",
        20,
        "Valparaiso",
        "Wants to be a doctor. Already the unofficial squad medic.",
        "Mother Carmen and three cousins",
    ),
];

impl ProfileProvider for BuiltinProfiles {
    fn next_profile(&self, rng: &mut dyn rand::RngCore) -> SoldierProfile {
        let (name, rank, age, hometown, backstory, family) = ROSTER[rng.gen_range(0..ROSTER.len())];
        SoldierProfile {
            name: name.to_owned(),
            rank: rank.to_owned(),
            age,
            hometown: hometown.to_owned(),
            backstory: backstory.to_owned(),
            family: family.to_owned(),
        }
    }
}
