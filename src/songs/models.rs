use serde::{Deserialize, Serialize};

use crate::config::MAX_SLOTS;

const LISTEN_SEARCH_URL: &str = "https://music.youtube.com/search?q=";

/// Reward symbol shown in filled progress slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum FruitTheme {
    #[default]
    #[serde(rename = "🍎")]
    Apple,
    #[serde(rename = "🍊")]
    Orange,
    #[serde(rename = "🍌")]
    Banana,
    #[serde(rename = "🍇")]
    Grape,
    #[serde(rename = "🍓")]
    Strawberry,
}

impl FruitTheme {
    pub const ALL: [FruitTheme; 5] = [
        FruitTheme::Apple,
        FruitTheme::Orange,
        FruitTheme::Banana,
        FruitTheme::Grape,
        FruitTheme::Strawberry,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            FruitTheme::Apple => "🍎",
            FruitTheme::Orange => "🍊",
            FruitTheme::Banana => "🍌",
            FruitTheme::Grape => "🍇",
            FruitTheme::Strawberry => "🍓",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FruitTheme::Apple => "Apple",
            FruitTheme::Orange => "Orange",
            FruitTheme::Banana => "Banana",
            FruitTheme::Grape => "Grape",
            FruitTheme::Strawberry => "Strawberry",
        }
    }
}

/// Theme option as listed in the add form's picker.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeOption {
    pub label: &'static str,
    pub value: FruitTheme,
}

pub fn theme_options() -> Vec<ThemeOption> {
    FruitTheme::ALL
        .iter()
        .map(|theme| ThemeOption {
            label: theme.label(),
            value: *theme,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub date: String, // YYYY-MM-DD
    pub title: String,
    pub theme: FruitTheme,
    pub practice_count: u8, // 0 to MAX_SLOTS
    #[serde(default)]
    pub memo: String,
}

impl Song {
    pub fn is_mastered(&self) -> bool {
        self.practice_count >= MAX_SLOTS
    }

    pub fn listen_url(&self) -> String {
        format!("{}{}", LISTEN_SEARCH_URL, urlencoding::encode(&self.title))
    }
}
