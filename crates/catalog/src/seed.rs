//! Sample authors used to populate a fresh store.

use chrono::{TimeZone, Utc};
use common::EntityId;

use crate::author::Author;

const SEED: &[(&str, &str, &str, (i32, u32, u32), &str)] = &[
    ("d28888e9-2ba9-473a-a40f-e38cb54f9b35", "Berry", "Griffin Beach", (1650, 7, 23), "Ships"),
    ("da2fd609-d754-4feb-8acd-c4f9ff13ba96", "Nancy", "Swashbuckler Rye", (1668, 5, 21), "Rum"),
    ("2902b665-1190-4c70-9915-b9c2d7680450", "Eli", "Ivory Bones", (1701, 12, 16), "Singing"),
    ("102b566b-ba1f-404c-b2df-e2cde39ade09", "Arnold", "The Unseen Stafford", (1702, 3, 6), "Singing"),
    ("5b3621c0-7b12-4e80-9c8b-3398cba7ee05", "Seabury", "Toxic Reyes", (1690, 11, 23), "Maps"),
    ("2aadd2df-7caf-45ab-9355-7f6332985a87", "Rutherford", "Fearless Cloven", (1723, 4, 5), "General debauchery"),
    ("2ee49fe3-edf2-4f91-8409-3eb25ce6ca51", "Atherton", "Bloodthirsty Bolton", (1721, 10, 11), "Ships"),
    ("f74d6899-9ed2-4137-9876-66b070553f8f", "Hortensia", "Nail Drummond", (1675, 2, 28), "Rum"),
    ("a1da1d8e-1988-4634-b538-a01709477b77", "Jaime", "Bell Wolfe", (1698, 8, 9), "Maps"),
    ("f0a8f8a7-3e2c-4f1a-8f6f-0c8a3f0b9d21", "Mabel", "Quick Larkin", (1710, 1, 30), "Singing"),
    ("3c1e8d5b-6a2f-4e7b-9d0c-5b4a3f2e1d10", "Silas", "Grim Holloway", (1684, 6, 14), "General debauchery"),
    ("7e9b2c4d-1f3a-4b5c-8d6e-9f0a1b2c3d4e", "Ottilie", "Salt Marlowe", (1716, 9, 2), "Ships"),
];

/// Returns the sample authors with stable IDs.
pub fn authors() -> Vec<Author> {
    SEED.iter()
        .filter_map(|&(id, first, last, (y, m, d), category)| {
            let id = EntityId::parse(id).ok()?;
            let born = Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single()?;
            Some(Author {
                id,
                ..Author::new(first, last, born, category)
            })
        })
        .collect()
}
