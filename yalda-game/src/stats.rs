//! Player stats carried across the four stages of a session.
use serde::{Deserialize, Serialize};

use crate::classes::CharacterClass;
use crate::constants::{
    COMBO_BASELINE, DEFAULT_ENEMY_HP, DEFAULT_ENERGY, DEFAULT_HP, DEFAULT_PLAYER_NAME,
    DEFAULT_TITLE,
};

/// Kind of a reserved inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Consumable,
    Relic,
}

/// Inventory slot. No current stage grants items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub icon: String,
}

/// Business diagnostic produced by the analysis stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub has_business: bool,
    pub main_problem: String,
    pub goal: String,
    pub score: i32,
}

/// Cumulative player record. Stages never mutate it in place; they hand back
/// a replacement built through [`crate::aggregate::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub phone_number: String,
    #[serde(default)]
    pub class: Option<CharacterClass>,
    pub hp: i32,
    pub max_hp: i32,
    pub energy: i32,
    pub gold: i32,
    pub seals: i32,
    pub pomegranates: i32,
    pub title: String,
    pub quiz_score: i32,
    pub enemy_hp: i32,
    pub max_enemy_hp: i32,
    pub combo_multiplier: u32,
    pub max_combo: u32,
    #[serde(default)]
    pub active_powerups: Vec<String>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub analysis: Option<Analysis>,
    #[serde(default)]
    pub voice_score: Option<u32>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone_number: String::new(),
            class: None,
            hp: DEFAULT_HP,
            max_hp: DEFAULT_HP,
            energy: DEFAULT_ENERGY,
            gold: 0,
            seals: 0,
            pomegranates: 0,
            title: DEFAULT_TITLE.to_string(),
            quiz_score: 0,
            enemy_hp: DEFAULT_ENEMY_HP,
            max_enemy_hp: DEFAULT_ENEMY_HP,
            combo_multiplier: COMBO_BASELINE,
            max_combo: 0,
            active_powerups: Vec::new(),
            inventory: Vec::new(),
            analysis: None,
            voice_score: None,
        }
    }
}

impl PlayerStats {
    /// Clamp resource fields into their valid ranges.
    pub fn clamp(&mut self) {
        self.max_hp = self.max_hp.max(1);
        self.hp = self.hp.clamp(0, self.max_hp);
        self.max_enemy_hp = self.max_enemy_hp.max(1);
        self.enemy_hp = self.enemy_hp.clamp(0, self.max_enemy_hp);
        self.gold = self.gold.max(0);
        self.energy = self.energy.max(0);
    }

    /// Name shown on boards and exports; blank names fall back to a placeholder.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            trimmed
        }
    }

    #[must_use]
    pub fn has_business(&self) -> bool {
        self.analysis.as_ref().is_some_and(|a| a.has_business)
    }

    #[must_use]
    pub fn main_problem(&self) -> Option<&str> {
        self.analysis.as_ref().map(|a| a.main_problem.as_str())
    }
}
