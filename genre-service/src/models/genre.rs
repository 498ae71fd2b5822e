use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub genre: String,
}

impl Genre {
    pub fn new(id: i64, genre: impl Into<String>) -> Self {
        Self {
            id,
            genre: genre.into(),
        }
    }

    /// Records every fresh process starts with.
    pub fn seed() -> Vec<Genre> {
        vec![
            Genre::new(1, "action"),
            Genre::new(2, "horror"),
            Genre::new(3, "thriller"),
        ]
    }
}
