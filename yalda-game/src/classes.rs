use serde::{Deserialize, Serialize};

use crate::stats::PlayerStats;

/// The three mutually exclusive character classes offered at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    /// Content archer: extra energy.
    Archer,
    /// Sales guardian: extra health.
    Guardian,
    /// Strategy mage: starting gold.
    Mage,
}

impl CharacterClass {
    pub const ALL: [Self; 3] = [Self::Archer, Self::Guardian, Self::Mage];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Archer => "archer",
            Self::Guardian => "guardian",
            Self::Mage => "mage",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Starting-stat overrides. Absent fields keep the session defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClassStart {
    #[serde(default)]
    pub hp: Option<i32>,
    #[serde(default)]
    pub max_hp: Option<i32>,
    #[serde(default)]
    pub energy: Option<i32>,
    #[serde(default)]
    pub gold: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPreset {
    pub class: CharacterClass,
    pub name: String,
    pub desc: String,
    pub title: String,
    pub start: ClassStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
struct PresetNoId {
    pub name: String,
    pub desc: String,
    pub title: String,
    #[serde(default)]
    pub start: ClassStart,
}

impl ClassPreset {
    fn with_class(class: CharacterClass, p: PresetNoId) -> Self {
        Self {
            class,
            name: p.name,
            desc: p.desc,
            title: p.title,
            start: p.start,
        }
    }

    /// Apply this preset to a fresh stats record.
    pub fn apply(&self, stats: &mut PlayerStats) {
        stats.class = Some(self.class);
        if let Some(max_hp) = self.start.max_hp {
            stats.max_hp = max_hp;
        }
        if let Some(hp) = self.start.hp {
            stats.hp = hp;
        }
        if let Some(energy) = self.start.energy {
            stats.energy = energy;
        }
        if let Some(gold) = self.start.gold {
            stats.gold = gold;
        }
        stats.title.clone_from(&self.title);
        stats.clamp();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClassList(pub Vec<ClassPreset>);

impl ClassList {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// Load class presets from a JSON map keyed by class id.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid preset data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: std::collections::HashMap<String, PresetNoId> = serde_json::from_str(json)?;
        let mut v = Vec::with_capacity(CharacterClass::ALL.len());
        for class in CharacterClass::ALL {
            if let Some(p) = map.get(class.id()) {
                v.push(ClassPreset::with_class(class, p.clone()));
            }
        }
        Ok(Self(v))
    }

    #[must_use]
    pub fn get(&self, class: CharacterClass) -> Option<&ClassPreset> {
        self.0.iter().find(|p| p.class == class)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassPreset> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ClassList {
    type Item = &'a ClassPreset;
    type IntoIter = std::slice::Iter<'a, ClassPreset>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
