use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date of a panel observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelDate(Date);

impl PanelDate {
    /// Parse `YYYY-MM-DD`. A longer RFC3339-style value keeps only its date part.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let date_part = trimmed
            .split(|ch: char| ch == 'T' || ch == ' ')
            .next()
            .unwrap_or(trimmed);

        Date::parse(date_part, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        self.0.to_string()
    }
}

impl Display for PanelDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for PanelDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for PanelDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_date() {
        let parsed = PanelDate::parse("2019-01-31").expect("must parse");
        assert_eq!(parsed.format_iso(), "2019-01-31");
    }

    #[test]
    fn truncates_datetime_to_date() {
        let parsed = PanelDate::parse("2019-02-01T00:00:00Z").expect("must parse");
        assert_eq!(parsed.to_string(), "2019-02-01");
    }

    #[test]
    fn rejects_garbage() {
        let err = PanelDate::parse("31/01/2019").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn rejects_impossible_calendar_day() {
        let err = PanelDate::parse("2019-02-30").expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                value: String::from("2019-02-30")
            }
        );
    }

    #[test]
    fn orders_chronologically() {
        let early = PanelDate::parse("2019-01-31").expect("valid");
        let late = PanelDate::parse("2019-12-01").expect("valid");
        assert!(early < late);
    }
}
