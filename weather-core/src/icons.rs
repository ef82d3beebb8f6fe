//! Condition phrase → icon lookup.
//!
//! The table is plain data: the built-in one follows the provider's Russian
//! descriptions, and a replacement can be supplied from configuration.

use std::collections::HashMap;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Phrase used when a description is not in the table.
pub const FALLBACK_CONDITION: &str = "ясно";

const DEFAULT_TABLE: &[(&str, &str)] = &[
    ("ясно", "01d"),
    ("облачно с прояснениями", "02d"),
    ("переменная облачность", "02d"),
    ("гром", "03d"),
    ("облачно", "04d"),
    ("пасмурно", "04d"),
    ("небольшой дождь", "09d"),
    ("дождь", "10d"),
    ("гроза", "11d"),
    ("снег", "13d"),
    ("туман", "50d"),
    ("небольшой снег", "13d"),
];

/// Icon URL for a provider icon code such as `10d`.
pub fn icon_url_for_code(code: &str) -> String {
    format!("{ICON_BASE_URL}/{code}.png")
}

#[derive(Debug, Clone)]
pub struct IconMapper {
    table: HashMap<String, String>,
    fallback: String,
}

impl IconMapper {
    /// Build a mapper from `phrase → icon` pairs. Phrases are lowercased on
    /// insert. The fallback is the entry for [`FALLBACK_CONDITION`], or the
    /// clear-sky icon when the table has none.
    pub fn from_table<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let table: HashMap<String, String> = entries
            .into_iter()
            .map(|(phrase, icon)| (phrase.as_ref().to_lowercase(), icon.into()))
            .collect();

        let fallback = table
            .get(FALLBACK_CONDITION)
            .cloned()
            .unwrap_or_else(|| icon_url_for_code("01d"));

        Self { table, fallback }
    }

    /// Never fails: unknown phrases get the clear-sky icon.
    pub fn icon_for(&self, condition: &str) -> &str {
        self.table
            .get(&condition.to_lowercase())
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for IconMapper {
    fn default() -> Self {
        Self::from_table(
            DEFAULT_TABLE
                .iter()
                .map(|(phrase, code)| (*phrase, icon_url_for_code(code))),
        )
    }
}
