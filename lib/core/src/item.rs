use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::vector::{TextVector, VisualVector};

/// Identifier of a stored report. Assigned by the store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(i: u64) -> Self {
        ItemId(i)
    }
}

/// Reference to the account that filed a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub u64);

/// Whether a report describes something lost or something found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Polarity {
    Lost,
    Found,
}

impl Polarity {
    /// The polarity a searcher with this report type is looking for.
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Polarity::Lost => Polarity::Found,
            Polarity::Found => Polarity::Lost,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Lost => "LOST",
            Polarity::Found => "FOUND",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lost" => Ok(Polarity::Lost),
            "found" => Ok(Polarity::Found),
            other => Err(format!("unknown polarity '{}', expected lost or found", other)),
        }
    }
}

/// Fixed category set offered when filing a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Backpack,
    Bracelet,
    Calculator,
    Charger,
    Earphones,
    Headphones,
    Keyboard,
    Keys,
    Laptop,
    Mouse,
    Smartphone,
    Waterbottle,
    Wristwatch,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Category::Backpack,
        Category::Bracelet,
        Category::Calculator,
        Category::Charger,
        Category::Earphones,
        Category::Headphones,
        Category::Keyboard,
        Category::Keys,
        Category::Laptop,
        Category::Mouse,
        Category::Smartphone,
        Category::Waterbottle,
        Category::Wristwatch,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Backpack => "Backpack",
            Category::Bracelet => "Bracelet",
            Category::Calculator => "Calculator",
            Category::Charger => "Charger",
            Category::Earphones => "Earphones",
            Category::Headphones => "Headphones",
            Category::Keyboard => "Keyboard",
            Category::Keys => "Keys",
            Category::Laptop => "Laptop",
            Category::Mouse => "Mouse",
            Category::Smartphone => "Smartphone",
            Category::Waterbottle => "Waterbottle",
            Category::Wristwatch => "Wristwatch",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive lookup of a free label, `None` if it names no category.
    pub fn parse_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
    }

    /// Map a classifier hint onto the fixed set, falling back to `Other`.
    pub fn from_label(label: &str) -> Category {
        Category::parse_label(label).unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored report. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub owner: OwnerId,
    pub polarity: Polarity,
    pub category: Category,
    pub description: String,
    /// Where the uploaded image lives; opaque to the matcher.
    pub image_ref: Option<String>,
    /// Absent when the image could not be decoded at report time.
    pub visual: Option<VisualVector>,
    pub text: TextVector,
    pub contact: String,
}

/// Everything about a report except its id; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDraft {
    pub owner: OwnerId,
    pub polarity: Polarity,
    pub category: Category,
    pub description: String,
    pub image_ref: Option<String>,
    pub visual: Option<VisualVector>,
    pub text: TextVector,
    pub contact: String,
}

impl ItemDraft {
    #[must_use]
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            owner: self.owner,
            polarity: self.polarity,
            category: self.category,
            description: self.description,
            image_ref: self.image_ref,
            visual: self.visual,
            text: self.text,
            contact: self.contact,
        }
    }
}

/// Supplies the pool of reports to match against.
pub trait CandidateSource {
    /// All stored items of the given polarity.
    fn candidates(&self, polarity: Polarity) -> Vec<Item>;
}

impl CandidateSource for [Item] {
    fn candidates(&self, polarity: Polarity) -> Vec<Item> {
        self.iter()
            .filter(|item| item.polarity == polarity)
            .cloned()
            .collect()
    }
}

impl CandidateSource for Vec<Item> {
    fn candidates(&self, polarity: Polarity) -> Vec<Item> {
        self.as_slice().candidates(polarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, polarity: Polarity) -> Item {
        Item {
            id: ItemId(id),
            owner: OwnerId(1),
            polarity,
            category: Category::Keys,
            description: "silver keys".to_string(),
            image_ref: None,
            visual: None,
            text: TextVector::empty(),
            contact: "a@campus.edu".to_string(),
        }
    }

    #[test]
    fn test_polarity_opposite() {
        assert_eq!(Polarity::Lost.opposite(), Polarity::Found);
        assert_eq!(Polarity::Found.opposite(), Polarity::Lost);
        assert_eq!("FOUND".parse::<Polarity>().unwrap(), Polarity::Found);
        assert!("misplaced".parse::<Polarity>().is_err());
    }

    #[test]
    fn test_category_from_label() {
        assert_eq!(Category::from_label("backpack"), Category::Backpack);
        assert_eq!(Category::from_label(" WRISTWATCH "), Category::Wristwatch);
        assert_eq!(Category::from_label("umbrella"), Category::Other);
        assert_eq!(Category::parse_label("umbrella"), None);
    }

    #[test]
    fn test_slice_candidate_source() {
        let pool = vec![item(1, Polarity::Lost), item(2, Polarity::Found), item(3, Polarity::Found)];
        let found = pool.candidates(Polarity::Found);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|i| i.polarity == Polarity::Found));
    }

    #[test]
    fn test_item_serde_polarity_uppercase() {
        let json = serde_json::to_string(&item(7, Polarity::Lost)).unwrap();
        assert!(json.contains("\"LOST\""));
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, ItemId(7));
    }
}
