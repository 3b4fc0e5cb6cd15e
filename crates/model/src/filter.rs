use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ResourceRecord;

/// Attribute filters for browsing without a location. Set filters are ANDed.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub city: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl AttributeFilter {
    pub fn new(city: Option<String>, category: Option<String>, language: Option<String>) -> Self {
        Self {
            city: normalize(city),
            category: normalize(category),
            language: normalize(language),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.category.is_none() && self.language.is_none()
    }

    pub fn matches(&self, record: &ResourceRecord) -> bool {
        let city_matches = self.city.as_ref().map_or(true, |city| {
            record
                .city
                .as_ref()
                .is_some_and(|candidate| candidate.trim().to_lowercase() == city.to_lowercase())
        });
        let category_matches = self
            .category
            .as_ref()
            .map_or(true, |category| record.categories.matches(category));
        let language_matches = self
            .language
            .as_ref()
            .map_or(true, |language| record.languages.matches(language));

        city_matches && category_matches && language_matches
    }
}

/// Distinct values present in a store, for populating filter pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Facets {
    pub cities: Vec<String>,
    pub categories: Vec<String>,
    pub languages: Vec<String>,
}

impl Facets {
    pub fn collect<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ResourceRecord>,
    {
        let mut cities = vec![];
        let mut categories = vec![];
        let mut languages = vec![];
        for record in records {
            cities.extend(
                record
                    .city
                    .iter()
                    .map(|city| city.trim())
                    .filter(|city| !city.is_empty())
                    .map(str::to_owned),
            );
            categories.extend(record.categories.iter().cloned());
            languages.extend(record.languages.iter().cloned());
        }

        Self {
            cities: cities.into_iter().sorted().dedup().collect(),
            categories: categories.into_iter().sorted().dedup().collect(),
            languages: languages.into_iter().sorted().dedup().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Labels;

    fn record(city: &str, categories: &str, languages: &str) -> ResourceRecord {
        ResourceRecord {
            city: Some(city.to_owned()),
            categories: Labels::from_delimited(categories),
            languages: Labels::from_delimited(languages),
            ..ResourceRecord::named("Somewhere")
        }
    }

    #[test]
    fn blank_filters_are_dropped() {
        let filter = AttributeFilter::new(Some("  ".to_owned()), None, Some("".to_owned()));
        assert!(filter.is_empty());
        assert!(filter.matches(&record("San Jose", "food", "English")));
    }

    #[test]
    fn filters_are_anded_and_case_insensitive() {
        let pantry = record("Cupertino", "food", "English,Spanish");
        let filter = AttributeFilter::new(
            Some("cupertino".to_owned()),
            Some("FOOD".to_owned()),
            Some("spanish".to_owned()),
        );
        assert!(filter.matches(&pantry));

        let wrong_language = AttributeFilter {
            language: Some("Tagalog".to_owned()),
            ..filter.clone()
        };
        assert!(!wrong_language.matches(&pantry));
    }

    #[test]
    fn city_must_match_exactly() {
        let filter = AttributeFilter::new(Some("San".to_owned()), None, None);
        assert!(!filter.matches(&record("San Jose", "food", "English")));
        assert!(!filter.matches(&ResourceRecord::named("No city")));
    }

    #[test]
    fn facets_are_sorted_and_unique() {
        let records = [
            record("Sunnyvale", "health,food", "Spanish,English"),
            record("Cupertino", "food", "English"),
            record("Sunnyvale", "legal", "Vietnamese"),
        ];
        let facets = Facets::collect(records.iter());
        assert_eq!(facets.cities, ["Cupertino", "Sunnyvale"]);
        assert_eq!(facets.categories, ["food", "health", "legal"]);
        assert_eq!(facets.languages, ["English", "Spanish", "Vietnamese"]);
    }
}
