//! Calendar helpers: monthly periods, date parsing and localized month names.

use serde::{Deserialize, Serialize};
use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The format of dates in forms, query strings and JSON, e.g. "2024-03-05".
const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [Error::InvalidDate] if `raw` is not a valid calendar date.
pub fn parse_date(raw: &str) -> Result<Date, Error> {
    let trimmed = raw.trim();

    Date::parse(trimmed, DATE_FORMAT).map_err(|_| Error::InvalidDate(trimmed.to_owned()))
}

/// The number of days in `month` of `year`, accounting for leap years.
pub fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February if time::util::is_leap_year(year) => 29,
        Month::February => 28,
    }
}

/// A calendar month of a specific year, e.g. March 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    first_day: Date,
    last_day: Date,
}

impl Period {
    /// Create the period for `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidYear] if `year` is outside of the supported date range.
    pub fn new(year: i32, month: Month) -> Result<Self, Error> {
        let first_day =
            Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidYear(year))?;
        let last_day = Date::from_calendar_date(year, month, days_in_month(year, month))
            .map_err(|_| Error::InvalidYear(year))?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// Resolve a period from optional query parameters.
    ///
    /// Each missing component defaults to the corresponding component of `today`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidMonth] if `month` is not in 1 to 12, or an
    /// [Error::InvalidYear] if `year` is not a supported year.
    pub fn from_query(year: Option<i32>, month: Option<u8>, today: Date) -> Result<Self, Error> {
        let year = year.unwrap_or(today.year());
        let month = match month {
            Some(number) => Month::try_from(number).map_err(|_| Error::InvalidMonth(number))?,
            None => today.month(),
        };

        Period::new(year, month)
    }

    /// The year of the period.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The month of the period.
    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        self.first_day
    }

    /// The last day of the month.
    pub fn last_day(&self) -> Date {
        self.last_day
    }

    /// The number of days in the month.
    pub fn day_count(&self) -> u8 {
        self.last_day.day()
    }

    /// Whether `date` falls within the period.
    pub fn contains(&self, date: Date) -> bool {
        (self.first_day..=self.last_day).contains(&date)
    }
}

/// The language used for month names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum Language {
    /// English month names.
    #[default]
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
    /// Spanish month names.
    #[serde(rename = "es")]
    #[value(name = "es")]
    Spanish,
}

/// The full names of the months from January to December.
pub fn month_names(language: Language) -> [&'static str; 12] {
    match language {
        Language::English => [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ],
        Language::Spanish => [
            "Enero",
            "Febrero",
            "Marzo",
            "Abril",
            "Mayo",
            "Junio",
            "Julio",
            "Agosto",
            "Septiembre",
            "Octubre",
            "Noviembre",
            "Diciembre",
        ],
    }
}

/// Three-letter month abbreviations from January to December, used for chart labels.
pub fn short_month_names(language: Language) -> [&'static str; 12] {
    match language {
        Language::English => [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ],
        Language::Spanish => [
            "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
        ],
    }
}

/// An entry in a month selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    /// The month number, 1 for January.
    pub value: u8,
    /// The localized month name.
    pub name: &'static str,
}

/// The twelve months of the year for a month selector.
pub fn month_options(language: Language) -> Vec<MonthOption> {
    month_names(language)
        .into_iter()
        .zip(1..)
        .map(|(name, value)| MonthOption { value, name })
        .collect()
}

/// The years offered in a year selector: five years back to one year ahead of `today`.
pub fn year_options(today: Date) -> Vec<i32> {
    let year = today.year();

    (year - 5..=year + 1).collect()
}
