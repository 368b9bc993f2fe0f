//! # Reference Data
//!
//! Read-only lookup tables offered to the request form. Compiled in; there is
//! no update path.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceItem {
    pub id: u32,
    pub name: &'static str,
}

const fn item(id: u32, name: &'static str) -> ReferenceItem {
    ReferenceItem { id, name }
}

pub const CUISINES: [ReferenceItem; 25] = [
    item(1, "American"),
    item(2, "Italian"),
    item(3, "Mexican"),
    item(4, "Chinese"),
    item(5, "Japanese"),
    item(6, "Indian"),
    item(7, "Thai"),
    item(8, "Mediterranean"),
    item(9, "Middle Eastern"),
    item(10, "Korean"),
    item(11, "Vietnamese"),
    item(12, "French"),
    item(13, "Spanish"),
    item(14, "Greek"),
    item(15, "African"),
    item(16, "Caribbean"),
    item(17, "Brazilian"),
    item(18, "German"),
    item(19, "British"),
    item(20, "Turkish"),
    item(21, "Filipino"),
    item(22, "Indonesian"),
    item(23, "Malaysian"),
    item(24, "Peruvian"),
    item(25, "Ethiopian"),
];

pub const FLAVOR_MOODS: [ReferenceItem; 20] = [
    item(1, "Spicy"),
    item(2, "Sweet"),
    item(3, "Savory"),
    item(4, "Umami"),
    item(5, "Sour"),
    item(6, "Tangy"),
    item(7, "Salty"),
    item(8, "Fresh"),
    item(9, "Light"),
    item(10, "Rich"),
    item(11, "Creamy"),
    item(12, "Crispy"),
    item(13, "Smoky"),
    item(14, "Herby"),
    item(15, "Zesty"),
    item(16, "Mild"),
    item(17, "Bold"),
    item(18, "Comforting"),
    item(19, "Refreshing"),
    item(20, "Indulgent"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_from_one() {
        for table in [&CUISINES[..], &FLAVOR_MOODS[..]] {
            for (idx, entry) in table.iter().enumerate() {
                assert_eq!(entry.id as usize, idx + 1, "{}", entry.name);
            }
        }
    }
}
