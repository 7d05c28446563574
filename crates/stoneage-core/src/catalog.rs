//! Static reference catalog: pets, boarding lists and riding images.
//!
//! Three JSON datasets live side by side in the data directory:
//!
//! - `pets.json`: `{ "pets": [PetRecord, ...] }`
//! - `boarding.json`: character name → pet names that character can ride
//! - `pet-riding.json`: character name → `[{ "name", "imageUrl" }]`
//!
//! Boarding lists mark some pets with `⭐️` and write the rebirth variant as
//! `이름(환)`. Lookups normalise names before comparing; see [`compact_name`]
//! and [`loose_name`].

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{CompanionError, Result};
use crate::hangul;
use crate::pet::{self, PetRecord};

pub const PETS_FILE: &str = "pets.json";
pub const BOARDING_FILE: &str = "boarding.json";
pub const RIDING_FILE: &str = "pet-riding.json";

const STAR_MARKER: &str = "⭐️";
const REBIRTH_MARKER: &str = "(환)";

/// Character name → rideable pet names.
pub type BoardingMap = CharacterMap<Vec<String>>;

/// Character name → riding images.
pub type RidingMap = CharacterMap<Vec<RidingImage>>;

/// Picture of a character riding a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RidingImage {
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
struct PetFile {
    pets: Vec<PetRecord>,
}

// ---------------------------------------------------------------------------
// Character map
// ---------------------------------------------------------------------------

/// Map keyed by character name that keeps the order of the dataset file.
///
/// The boarding page lists characters in the order the JSON object declares
/// them, so a sorted map would reorder the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for CharacterMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> CharacterMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, character: impl Into<String>, value: V) {
        let character = character.into();
        match self.entries.iter_mut().find(|(k, _)| *k == character) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((character, value)),
        }
    }

    pub fn get(&self, character: &str) -> Option<&V> {
        self.get_key_value(character).map(|(_, v)| v)
    }

    pub fn get_key_value(&self, character: &str) -> Option<(&String, &V)> {
        self.entries
            .iter()
            .find(|(k, _)| k == character)
            .map(|(k, v)| (k, v))
    }

    pub fn contains_key(&self, character: &str) -> bool {
        self.get(character).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Entries in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for CharacterMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CharacterMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = CharacterMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by character name")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut map = CharacterMap::new();
                while let Some((character, value)) = access.next_entry::<String, V>()? {
                    map.insert(character, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

// ---------------------------------------------------------------------------
// Name normalisation
// ---------------------------------------------------------------------------

/// Drop the `⭐️` marker and surrounding whitespace.
pub fn strip_marker(name: &str) -> String {
    name.replace(STAR_MARKER, "").trim().to_string()
}

/// [`strip_marker`] plus removal of all inner whitespace. Keeps `(환)`.
pub fn compact_name(name: &str) -> String {
    strip_marker(name)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// [`compact_name`] with every `(환)` removed.
pub fn loose_name(name: &str) -> String {
    compact_name(name).replace(REBIRTH_MARKER, "")
}

// ---------------------------------------------------------------------------
// Boarding view
// ---------------------------------------------------------------------------

/// Result of filtering the boarding map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardingView {
    pub entries: BoardingMap,
}

impl BoardingView {
    pub fn total_characters(&self) -> usize {
        self.entries.len()
    }

    pub fn total_pets(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Read-only reference data, loaded once.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pets: Vec<PetRecord>,
    boarding: BoardingMap,
    riding: RidingMap,
}

impl Catalog {
    pub fn new(pets: Vec<PetRecord>, boarding: BoardingMap, riding: RidingMap) -> Self {
        Self {
            pets,
            boarding,
            riding,
        }
    }

    /// Load the three datasets from `data_dir`.
    ///
    /// The pet list is required. A missing boarding or riding file is treated
    /// as an empty map.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref();
        let pets: PetFile = read_json(&dir.join(PETS_FILE))?;
        let boarding: BoardingMap = read_optional_json(&dir.join(BOARDING_FILE))?;
        let riding: RidingMap = read_optional_json(&dir.join(RIDING_FILE))?;

        let catalog = Self::new(pets.pets, boarding, riding);
        crate::obs::emit_catalog_loaded(
            &dir.display().to_string(),
            catalog.pets.len(),
            catalog.boarding.len(),
        );
        Ok(catalog)
    }

    pub fn pets(&self) -> &[PetRecord] {
        &self.pets
    }

    pub fn boarding(&self) -> &BoardingMap {
        &self.boarding
    }

    pub fn riding(&self) -> &RidingMap {
        &self.riding
    }

    /// Every character with a boarding list.
    pub fn characters(&self) -> Vec<&str> {
        self.boarding.keys().collect()
    }

    /// Pet search over the catalog; see [`pet::search_pets`].
    pub fn search_pets(&self, query: &str, limit: usize) -> Vec<&PetRecord> {
        pet::search_pets(&self.pets, query, limit)
    }

    /// Exact lookup by name, ignoring whitespace and the `⭐️` marker.
    ///
    /// `(환)` is significant: `우리(환)` does not find `우리`.
    pub fn find_pet(&self, name: &str) -> Option<&PetRecord> {
        let wanted = compact_name(name);
        let found = self.pets.iter().find(|p| compact_name(&p.name) == wanted);
        if found.is_none() {
            crate::obs::emit_pet_lookup_miss(&strip_marker(name));
        }
        found
    }

    /// Lookup that also ignores `(환)`, as used for shared pet links.
    pub fn find_pet_loose(&self, name: &str) -> Option<&PetRecord> {
        let wanted = loose_name(name);
        self.pets.iter().find(|p| loose_name(&p.name) == wanted)
    }

    /// Riding image of `character` on `pet_name`, without any fallback.
    pub fn riding_image(&self, pet_name: &str, character: &str) -> Option<&str> {
        let wanted = loose_name(pet_name);
        self.riding
            .get(character)?
            .iter()
            .find(|image| loose_name(&image.name) == wanted)
            .map(|image| image.image_url.as_str())
    }

    /// Best picture for a boarding entry: the riding image if there is one,
    /// otherwise the pet's own image.
    pub fn pet_image(&self, pet_name: &str, character: &str) -> Option<&str> {
        if let Some(url) = self.riding_image(pet_name, character) {
            return Some(url);
        }
        let exact = compact_name(pet_name);
        self.pets
            .iter()
            .find(|p| compact_name(&p.name) == exact)
            .or_else(|| self.find_pet_loose(pet_name))
            .map(|p| p.image_link.as_str())
            .filter(|url| !url.is_empty())
    }

    /// Characters that can ride `pet_name`.
    pub fn riding_characters(&self, pet_name: &str) -> Vec<&str> {
        let wanted = loose_name(pet_name);
        self.boarding
            .iter()
            .filter(|(_, pets)| pets.iter().any(|p| loose_name(p) == wanted))
            .map(|(character, _)| character.as_str())
            .collect()
    }

    /// Filter the boarding map by character and search query.
    ///
    /// With `character` set, only that character is considered (an unknown
    /// name yields an empty view). With a non-empty `query`, a character whose
    /// own name matches keeps its whole list; otherwise only matching pets are
    /// kept and characters left with none are dropped.
    pub fn filter_boarding(&self, character: Option<&str>, query: &str) -> BoardingView {
        let scoped: Vec<(&String, &Vec<String>)> = match character {
            Some(name) => self.boarding.get_key_value(name).into_iter().collect(),
            None => self.boarding.iter().collect(),
        };

        let query = query.trim();
        let mut entries = BoardingMap::new();
        for (name, pets) in scoped {
            if query.is_empty() || hangul::matches(name, query) {
                entries.insert(name.clone(), pets.clone());
                continue;
            }
            let matching: Vec<String> = pets
                .iter()
                .filter(|p| hangul::matches(p, query))
                .cloned()
                .collect();
            if !matching.is_empty() {
                entries.insert(name.clone(), matching);
            }
        }

        debug!(
            character = character.unwrap_or("*"),
            query,
            characters = entries.len(),
            "boarding filtered"
        );
        BoardingView { entries }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| CompanionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CompanionError::Dataset {
        path: PathBuf::from(path),
        source,
    })
}

fn read_optional_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!(path = %path.display(), "optional dataset missing");
        return Ok(T::default());
    }
    read_json(path)
}
