//! Pet reference records and the per-level growth calculator.

use serde::{Deserialize, Serialize};

use crate::hangul;

pub const MIN_PET_LEVEL: u32 = 1;
pub const MAX_PET_LEVEL: u32 = 140;

/// Default cap on search results for a non-empty query.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Level-1 attributes of a pet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
    pub vitality: u32,
}

/// Gain per level for each attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthStats {
    pub attack: f64,
    pub defense: f64,
    pub agility: f64,
    pub vitality: f64,
}

/// Elemental affinity (지/수/화/풍), out of 10.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementStats {
    pub earth: u32,
    pub water: u32,
    pub fire: u32,
    pub wind: u32,
}

/// A pet from the static catalog. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub grade: String,
    pub source: String,
    pub base_stats: BaseStats,
    pub growth_stats: GrowthStats,
    pub total_growth: f64,
    #[serde(default)]
    pub rideable: bool,
    #[serde(default)]
    pub element_stats: ElementStats,
    #[serde(default)]
    pub image_link: String,
}

/// Pet attributes at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetGrowthResult {
    pub level: u32,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
    pub vitality: u32,
}

impl PetGrowthResult {
    pub fn as_base_stats(&self) -> BaseStats {
        BaseStats {
            attack: self.attack,
            defense: self.defense,
            agility: self.agility,
            vitality: self.vitality,
        }
    }
}

fn grow(base: u32, growth: f64, levels_gained: u32) -> u32 {
    (base as f64 + growth * levels_gained as f64).floor().max(0.0) as u32
}

/// `floor(base + growth × (level − 1))` per attribute, level clamped to `[1, 140]`.
pub fn calculate_pet_stats(pet: &PetRecord, level: u32) -> PetGrowthResult {
    let level = level.clamp(MIN_PET_LEVEL, MAX_PET_LEVEL);
    let gained = level - 1;
    let (base, growth) = (&pet.base_stats, &pet.growth_stats);

    PetGrowthResult {
        level,
        attack: grow(base.attack, growth.attack, gained),
        defense: grow(base.defense, growth.defense, gained),
        agility: grow(base.agility, growth.agility, gained),
        vitality: grow(base.vitality, growth.vitality, gained),
    }
}

/// Whether `pet` matches a search query.
///
/// Name, grade and source are matched literally; only the name takes part in
/// initial-consonant matching.
pub fn pet_matches(pet: &PetRecord, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    hangul::contains_ignore_case(&pet.name, query)
        || hangul::contains_ignore_case(&pet.grade, query)
        || hangul::contains_ignore_case(&pet.source, query)
        || (hangul::is_consonant_query(query) && hangul::matches_initials(&pet.name, query))
}

/// Filter `pets` by `query`, keeping catalog order.
///
/// An empty query returns every pet; otherwise at most `limit` matches.
pub fn search_pets<'a>(pets: &'a [PetRecord], query: &str, limit: usize) -> Vec<&'a PetRecord> {
    if query.trim().is_empty() {
        return pets.iter().collect();
    }
    pets.iter()
        .filter(|pet| pet_matches(pet, query))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(name: &str, grade: &str, source: &str) -> PetRecord {
        PetRecord {
            id: name.to_string(),
            name: name.to_string(),
            grade: grade.to_string(),
            source: source.to_string(),
            base_stats: BaseStats {
                attack: 25,
                defense: 20,
                agility: 30,
                vitality: 22,
            },
            growth_stats: GrowthStats {
                attack: 2.5,
                defense: 1.75,
                agility: 3.125,
                vitality: 0.4,
            },
            total_growth: 7.775,
            rideable: true,
            element_stats: ElementStats::default(),
            image_link: String::new(),
        }
    }

    #[test]
    fn level_one_is_base() {
        let p = pet("헬비스트", "영웅", "이벤트");
        let stats = calculate_pet_stats(&p, 1);
        assert_eq!(stats.as_base_stats(), p.base_stats);
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn level_140_applies_139_levels_of_growth() {
        let p = pet("헬비스트", "영웅", "이벤트");
        let stats = calculate_pet_stats(&p, 140);
        assert_eq!(stats.attack, (25.0 + 2.5 * 139.0_f64).floor() as u32);
        assert_eq!(stats.defense, (20.0 + 1.75 * 139.0_f64).floor() as u32);
        assert_eq!(stats.agility, (30.0 + 3.125 * 139.0_f64).floor() as u32);
        assert_eq!(stats.vitality, (22.0 + 0.4 * 139.0_f64).floor() as u32);
    }

    #[test]
    fn level_is_clamped() {
        let p = pet("헬비스트", "영웅", "이벤트");
        assert_eq!(calculate_pet_stats(&p, 0), calculate_pet_stats(&p, 1));
        assert_eq!(calculate_pet_stats(&p, 999), calculate_pet_stats(&p, 140));
    }

    #[test]
    fn search_matches_grade_and_source() {
        let pets = vec![pet("헬비스트", "영웅", "이벤트"), pet("우리", "일반", "필드")];
        let by_grade = search_pets(&pets, "영웅", DEFAULT_SEARCH_LIMIT);
        assert_eq!(by_grade.len(), 1);
        assert_eq!(by_grade[0].name, "헬비스트");
        let by_source = search_pets(&pets, "필드", DEFAULT_SEARCH_LIMIT);
        assert_eq!(by_source[0].name, "우리");
    }

    #[test]
    fn consonant_search_uses_name_only() {
        let pets = vec![pet("헬비스트", "영웅", "이벤트")];
        assert_eq!(search_pets(&pets, "ㅎㅂㅌ", 10).len(), 1);
        // initials of the grade must not match
        assert!(search_pets(&pets, "ㅇㅇ", 10).is_empty());
    }

    #[test]
    fn empty_query_ignores_limit() {
        let pets: Vec<_> = (0..15).map(|i| pet(&format!("pet{i}"), "일반", "필드")).collect();
        assert_eq!(search_pets(&pets, "", 10).len(), 15);
        assert_eq!(search_pets(&pets, "pet", 10).len(), 10);
    }

    #[test]
    fn deserializes_dataset_shape() {
        let json = r#"{
            "id": "p1",
            "name": "우리",
            "grade": "일반",
            "source": "필드",
            "baseStats": { "attack": 10, "defense": 11, "agility": 12, "vitality": 13 },
            "growthStats": { "attack": 1.5, "defense": 1.0, "agility": 2.0, "vitality": 0.5 },
            "totalGrowth": 5.0,
            "rideable": false,
            "elementStats": { "earth": 10, "water": 0, "fire": 0, "wind": 0 },
            "imageLink": "https://example.invalid/uri.png"
        }"#;
        let p: PetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(p.base_stats.vitality, 13);
        assert_eq!(p.element_stats.earth, 10);
        assert!(!p.rideable);
    }
}
