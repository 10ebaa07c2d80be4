//! Human-readable duration strings.

use std::str::FromStr;

use crate::error::ScheduleError;

const DAYS_PER_WEEK: i64 = 7;

/// Language for duration strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DurationLocale {
    #[default]
    German,
    English,
}

impl FromStr for DurationLocale {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" | "de-de" | "de_de" => Ok(Self::German),
            "en" | "en-us" | "en_us" | "en-gb" | "en_gb" => Ok(Self::English),
            _ => Err(ScheduleError::UnknownLocale(s.to_string())),
        }
    }
}

struct Words {
    day: &'static str,
    days: &'static str,
    week: &'static str,
    weeks: &'static str,
    week_short: &'static str,
    weeks_short: &'static str,
}

impl DurationLocale {
    fn words(self) -> &'static Words {
        match self {
            Self::German => &Words {
                day: "Tag",
                days: "Tage",
                week: "Woche",
                weeks: "Wochen",
                week_short: "Wo.",
                weeks_short: "Wo.",
            },
            Self::English => &Words {
                day: "day",
                days: "days",
                week: "week",
                weeks: "weeks",
                week_short: "wk.",
                weeks_short: "wks.",
            },
        }
    }
}

/// Format a day count in German, e.g. `8` -> `"1 Wo. 1 Tag"`.
pub fn format_duration(days: i64) -> String {
    format_duration_in(days, DurationLocale::German)
}

/// Format a day count, switching to weeks from 7 days on.
///
/// Below a week (and for negative counts) the plain day count is used.
pub fn format_duration_in(days: i64, locale: DurationLocale) -> String {
    let w = locale.words();
    let plural = |n: i64, one: &'static str, many: &'static str| if n == 1 { one } else { many };

    if days < DAYS_PER_WEEK {
        return format!("{} {}", days, plural(days, w.day, w.days));
    }

    let weeks = days / DAYS_PER_WEEK;
    let rest = days % DAYS_PER_WEEK;
    if rest == 0 {
        format!("{} {}", weeks, plural(weeks, w.week, w.weeks))
    } else {
        format!(
            "{} {} {} {}",
            weeks,
            plural(weeks, w.week_short, w.weeks_short),
            rest,
            plural(rest, w.day, w.days)
        )
    }
}
