//! Search filter values entered into the advanced-search panel.

use crate::error::{ConfigError, Result, ScrapeError};

/// Administrative district (merchav) filter value.
///
/// Closed list: these are the exact option labels rendered by the site's
/// district multiselect, so matching is by visible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum District {
    Jerusalem,
    TelAviv,
    Haifa,
    Center,
    North,
    South,
    JudeaSamaria,
    National,
}

impl District {
    pub const ALL: [District; 8] = [
        District::Jerusalem,
        District::TelAviv,
        District::Haifa,
        District::Center,
        District::North,
        District::South,
        District::JudeaSamaria,
        District::National,
    ];

    /// Visible option text on the site.
    pub fn label(&self) -> &'static str {
        match self {
            District::Jerusalem => "ירושלים",
            District::TelAviv => "תל אביב",
            District::Haifa => "חיפה",
            District::Center => "מרכז",
            District::North => "צפון",
            District::South => "דרום",
            District::JudeaSamaria => "יו\"ש",
            District::National => "מכרז ארצי",
        }
    }

    /// Parse a district from its visible label.
    pub fn from_label(label: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.label() == label.trim())
            .ok_or_else(|| {
                ScrapeError::Config(ConfigError::InvalidDistrict {
                    value: label.to_string(),
                })
            })
    }
}

/// Committee date in day/month/year form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitteeDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl CommitteeDate {
    /// Parse and validate a `DD/MM/YYYY` string.
    ///
    /// Validation is format plus basic ranges (day 1-31, month 1-12); whether
    /// the day actually exists in the target month is only discovered at the
    /// calendar grid, where a missing day is a silent no-op.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || {
            ScrapeError::Config(ConfigError::InvalidDate {
                value: input.to_string(),
            })
        };

        let parts: Vec<&str> = input.trim().split('/').collect();
        if parts.len() != 3 || parts[0].len() != 2 || parts[1].len() != 2 || parts[2].len() != 4 {
            return Err(invalid());
        }
        if !parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
            return Err(invalid());
        }

        let day: u32 = parts[0].parse().map_err(|_| invalid())?;
        let month: u32 = parts[1].parse().map_err(|_| invalid())?;
        let year: i32 = parts[2].parse().map_err(|_| invalid())?;

        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self { day, month, year })
    }

    /// Day label as rendered in the calendar grid (leading zero stripped).
    pub fn day_label(&self) -> String {
        self.day.to_string()
    }
}

impl std::fmt::Display for CommitteeDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

/// The full filter selection entered into the advanced-search panel.
///
/// Purpose and status are fixed by the site workflow; only district and
/// committee date vary per run.
#[derive(Debug, Clone)]
pub struct FilterSelection {
    pub district: District,
    pub committee_date: CommitteeDate,
}

impl FilterSelection {
    /// Fixed purpose categories selected on every run.
    pub const PURPOSES: [&'static str; 2] = ["בנייה נמוכה/צמודת קרקע", "בנייה רוויה"];

    /// Fixed status category selected on every run.
    pub const STATUS: &'static str = "נדון בוועדת מכרזים";

    /// Validate raw config input into a filter selection.
    pub fn from_config(district: &str, committee_date: &str) -> Result<Self> {
        Ok(Self {
            district: District::from_label(district)?,
            committee_date: CommitteeDate::parse(committee_date)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_from_label_accepts_closed_list() {
        for district in District::ALL {
            assert_eq!(District::from_label(district.label()).unwrap(), district);
        }
    }

    #[test]
    fn district_from_label_rejects_unknown() {
        assert!(District::from_label("אילת").is_err());
        assert!(District::from_label("").is_err());
    }

    #[test]
    fn date_parse_accepts_valid_format() {
        let date = CommitteeDate::parse("01/07/2025").unwrap();
        assert_eq!(date.day, 1);
        assert_eq!(date.month, 7);
        assert_eq!(date.year, 2025);
    }

    #[test]
    fn date_parse_rejects_bad_format() {
        assert!(CommitteeDate::parse("1/7/2025").is_err());
        assert!(CommitteeDate::parse("2025-07-01").is_err());
        assert!(CommitteeDate::parse("32/01/2025").is_err());
        assert!(CommitteeDate::parse("01/13/2025").is_err());
        assert!(CommitteeDate::parse("00/07/2025").is_err());
        assert!(CommitteeDate::parse("aa/bb/cccc").is_err());
    }

    #[test]
    fn day_label_strips_leading_zero() {
        let date = CommitteeDate::parse("01/07/2025").unwrap();
        assert_eq!(date.day_label(), "1");
        let date = CommitteeDate::parse("15/07/2025").unwrap();
        assert_eq!(date.day_label(), "15");
    }

    #[test]
    fn display_round_trips_input_format() {
        let date = CommitteeDate::parse("01/07/2025").unwrap();
        assert_eq!(date.to_string(), "01/07/2025");
    }

    #[test]
    fn filter_selection_validates_both_fields() {
        assert!(FilterSelection::from_config("ירושלים", "01/07/2025").is_ok());
        assert!(FilterSelection::from_config("nowhere", "01/07/2025").is_err());
        assert!(FilterSelection::from_config("ירושלים", "bad").is_err());
    }
}
