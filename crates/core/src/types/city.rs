//! City name type for favorites.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`City`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CityError {
    /// The input is empty or whitespace only.
    #[error("city is required")]
    Empty,
}

/// A free-text city name saved as a favorite.
///
/// The name is stored as given; only blank input is rejected.
///
/// ```
/// use weather_dashboard_core::City;
///
/// assert_eq!(City::parse("Lagos").unwrap().as_str(), "Lagos");
/// assert!(City::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct City(String);

impl City {
    /// Parse a `City` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`CityError::Empty`] if the input contains no visible characters.
    pub fn parse(s: &str) -> Result<Self, CityError> {
        if s.trim().is_empty() {
            return Err(CityError::Empty);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the city name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `City` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for City {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for City {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for City {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for City {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_input_verbatim() {
        let city = City::parse(" São Paulo ").unwrap();
        assert_eq!(city.as_str(), " São Paulo ");
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(City::parse(""), Err(CityError::Empty));
        assert_eq!(City::parse(" \t\n"), Err(CityError::Empty));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(CityError::Empty.to_string(), "city is required");
    }
}
