use std::collections::HashMap;
use std::str::FromStr;

use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static CORPUS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/corpus");

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Motivation,
    Wisdom,
    Technology,
    Literature,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Motivation,
        Category::Wisdom,
        Category::Technology,
        Category::Literature,
    ];

    /// Parses a category key, falling back to the default for unknown keys.
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse().unwrap_or_default()
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Supplies reference texts for new sessions.
pub trait TextSource {
    fn pick_text(&mut self, category: Category) -> Result<String>;
}

#[derive(Deserialize)]
struct CorpusFile {
    category: Category,
    passages: Vec<String>,
}

/// Passages grouped by category.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    passages: HashMap<Category, Vec<String>>,
}

impl Corpus {
    /// Loads the passages compiled into the crate.
    pub fn embedded() -> Result<Self> {
        let mut corpus = Corpus::default();
        for category in Category::ALL {
            let file_name = format!("{category}.json");
            let contents = CORPUS_DIR
                .get_file(&file_name)
                .and_then(|file| file.contents_utf8())
                .ok_or_else(|| Error::CorpusMissing(file_name.clone()))?;
            let parsed: CorpusFile =
                serde_json::from_str(contents).map_err(|source| Error::CorpusParse {
                    file: file_name.clone(),
                    source,
                })?;
            corpus.insert(parsed.category, parsed.passages);
        }
        Ok(corpus)
    }

    pub fn insert(&mut self, category: Category, passages: Vec<String>) {
        let passages = passages.into_iter().filter(|p| !p.is_empty());
        self.passages.entry(category).or_default().extend(passages);
    }

    pub fn passages(&self, category: Category) -> &[String] {
        self.passages
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn pick_with<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> Result<&str> {
        self.passages(category)
            .choose(rng)
            .map(String::as_str)
            .ok_or(Error::EmptyCategory(category))
    }
}

impl TextSource for Corpus {
    fn pick_text(&mut self, category: Category) -> Result<String> {
        let mut rng = rand::thread_rng();
        self.pick_with(category, &mut rng).map(str::to_owned)
    }
}

/// Hands out the same text for every category, e.g. a custom prompt.
#[derive(Debug, Clone)]
pub struct FixedText(pub String);

impl TextSource for FixedText {
    fn pick_text(&mut self, _category: Category) -> Result<String> {
        Ok(self.0.clone())
    }
}
