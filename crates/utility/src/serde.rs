/// Numbers that may arrive either as json numbers or as numeric strings, as is
/// common for spreadsheet exports and csv files.
pub mod lenient_f64 {
    use core::fmt;

    use serde::{
        de::{self, Unexpected, Visitor},
        Deserializer,
    };

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a finite number or a string containing one")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            if value.is_finite() {
                Ok(Some(value))
            } else {
                Err(E::invalid_value(Unexpected::Float(value), &self))
            }
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value as f64))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value as f64))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Some)
                .ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(NumberVisitor)
        }
    }

    /// `37.33`, `"37.33"` and `" 37.33 "` become `Some(37.33)`; null and blank
    /// strings become `None`; anything else is an error.
    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(NumberVisitor)
    }
}

/// Lists stored as a single comma-delimited text field.
pub mod comma_separated {
    use core::fmt;

    use serde::{
        de::{self, SeqAccess, Visitor},
        Deserializer,
    };

    pub fn split(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect()
    }

    struct ListVisitor;

    impl<'de> Visitor<'de> for ListVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a comma separated string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(split(value))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut tokens = vec![];
            while let Some(item) = seq.next_element::<String>()? {
                tokens.extend(split(&item));
            }
            Ok(tokens)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(vec![])
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(vec![])
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(ListVisitor)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ListVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::lenient_f64::deserialize_option")]
        lat: Option<f64>,
        #[serde(default, deserialize_with = "super::comma_separated::deserialize")]
        tags: Vec<String>,
    }

    #[test]
    fn coerces_numeric_strings() {
        let row: Row = serde_json::from_str(r#"{"lat": "37.33"}"#).unwrap();
        assert_eq!(row.lat, Some(37.33));
        let row: Row = serde_json::from_str(r#"{"lat": 37}"#).unwrap();
        assert_eq!(row.lat, Some(37.0));
    }

    #[test]
    fn blank_and_null_numbers_are_absent() {
        for json in [r#"{"lat": ""}"#, r#"{"lat": null}"#, r#"{}"#] {
            let row: Row = serde_json::from_str(json).unwrap();
            assert_eq!(row.lat, None, "{json}");
        }
    }

    #[test]
    fn rejects_non_numeric_strings() {
        assert!(serde_json::from_str::<Row>(r#"{"lat": "north"}"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"{"lat": "NaN"}"#).is_err());
    }

    #[test]
    fn splits_lists_from_text_or_arrays() {
        let row: Row = serde_json::from_str(r#"{"tags": "food, health,,"}"#).unwrap();
        assert_eq!(row.tags, vec!["food", "health"]);
        let row: Row = serde_json::from_str(r#"{"tags": ["food", "legal aid"]}"#).unwrap();
        assert_eq!(row.tags, vec!["food", "legal aid"]);
        let row: Row = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        assert!(row.tags.is_empty());
    }
}
