use rand::Rng;
use rand::prelude::IndexedRandom;
use rand::rng;
use std::fmt;
use thiserror::Error;

/// How many items come out of a single gacha ball
const ITEMS_PER_BALL: usize = 3;

/// Something that can come out of the gacha machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GachaItem {
    pub title: &'static str,
    pub description: &'static str,
}

impl fmt::Display for GachaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.description)
        }
    }
}

/// The contents of one gacha ball
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GachaBall {
    /// Gold pieces, in `0..10`
    pub gold: u32,
    /// Experience, in `0..100`
    pub xp: u32,
    /// Three distinct items
    pub items: Vec<GachaItem>,
}

/// Errors raised while cranking the machine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GachaError {
    #[error("gacha needs {needed} distinct items but the catalog only has {available}")]
    Exhausted { needed: usize, available: usize },
}

const CATALOG: &[GachaItem] = &[
    GachaItem {
        title: "Can of Dr. Pepper",
        description: "A delicious beverage containing all 23 mysterious ingredients.",
    },
    GachaItem { title: "Health Potion", description: "" },
    GachaItem { title: "Taser", description: "" },
    GachaItem { title: "Deck of Playing Cards", description: "" },
    GachaItem { title: "Parachute Pants", description: "" },
    GachaItem { title: "Log", description: "" },
    GachaItem { title: "Bone Hammer", description: "" },
    GachaItem { title: "Canadian Flag", description: "" },
    GachaItem {
        title: "HORI Real Arcade Pro. 4 Premium VLX Arcade Stick",
        description: "",
    },
    GachaItem { title: "Bootleg Dragonball Z VHS", description: "" },
    GachaItem { title: "Bag of Cheetos", description: "" },
    GachaItem { title: "55 Gallon Drum of Oil", description: "" },
];

/// A gacha machine drawing from a fixed catalog
pub struct GachaMachine {
    items: Vec<GachaItem>,
}

impl Default for GachaMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GachaMachine {
    /// Create a machine stocked with the built-in catalog
    pub fn new() -> Self {
        Self::with_items(CATALOG.to_vec())
    }

    /// Create a machine stocked with a custom catalog
    pub fn with_items(items: Vec<GachaItem>) -> Self {
        GachaMachine { items }
    }

    /// The items this machine can hand out
    #[cfg(test)]
    pub fn catalog(&self) -> &[GachaItem] {
        &self.items
    }

    /// Crank the machine using the thread-local RNG
    pub fn crank(&self) -> Result<GachaBall, GachaError> {
        self.crank_with(&mut rng())
    }

    /// Crank the machine with the given RNG
    ///
    /// Items are drawn uniformly from the catalog and redrawn whenever they
    /// equal one already in the ball, so the ball never holds duplicates.
    ///
    /// # Arguments
    /// * `rng` - Source of randomness
    ///
    /// # Returns
    /// A ball with gold, xp and three distinct items, or `GachaError::Exhausted`
    /// when the catalog cannot supply three distinct items
    pub fn crank_with<R: Rng>(&self, rng: &mut R) -> Result<GachaBall, GachaError> {
        let available = self.distinct_items();
        if available < ITEMS_PER_BALL {
            return Err(GachaError::Exhausted {
                needed: ITEMS_PER_BALL,
                available,
            });
        }

        let gold = rng.random_range(0..10);
        let xp = rng.random_range(0..100);

        let mut items: Vec<GachaItem> = Vec::with_capacity(ITEMS_PER_BALL);
        while items.len() < ITEMS_PER_BALL {
            let Some(item) = self.items.choose(rng) else {
                return Err(GachaError::Exhausted {
                    needed: ITEMS_PER_BALL,
                    available: 0,
                });
            };
            if !items.contains(item) {
                items.push(*item);
            }
        }

        Ok(GachaBall { gold, xp, items })
    }

    fn distinct_items(&self) -> usize {
        self.items
            .iter()
            .enumerate()
            .filter(|(i, item)| !self.items[..*i].contains(item))
            .count()
    }
}
