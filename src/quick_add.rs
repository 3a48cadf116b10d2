//! One-line task entry: "pay rent in 3 days urgent" becomes a titled task
//! with a due date and a priority.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::task::{Priority, TaskFields};

static HIGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(high priority|urgent)\b").expect("valid regex"));
static LOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blow priority\b").expect("valid regex"));
static TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btomorrow\b").expect("valid regex"));
static TODAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btoday\b").expect("valid regex"));
static IN_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin (\d+) days?\b").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAdd {
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

impl From<QuickAdd> for TaskFields {
    fn from(quick: QuickAdd) -> Self {
        TaskFields {
            title: quick.title,
            due_date: quick.due_date,
            priority: quick.priority,
            ..TaskFields::default()
        }
    }
}

pub fn parse(text: &str, today: NaiveDate) -> QuickAdd {
    let mut rest = text.to_string();

    let priority = if HIGH.is_match(&rest) {
        rest = HIGH.replace_all(&rest, " ").into_owned();
        Some(Priority::High)
    } else if LOW.is_match(&rest) {
        rest = LOW.replace_all(&rest, " ").into_owned();
        Some(Priority::Low)
    } else {
        None
    };

    let mut due_date = None;
    if TOMORROW.is_match(&rest) {
        due_date = today.checked_add_days(Days::new(1));
        rest = TOMORROW.replace(&rest, " ").into_owned();
    } else if let Some(days) = IN_DAYS
        .captures(&rest)
        .and_then(|c| c[1].parse::<u64>().ok())
    {
        due_date = today.checked_add_days(Days::new(days));
        rest = IN_DAYS.replace(&rest, " ").into_owned();
    } else if TODAY.is_match(&rest) {
        due_date = Some(today);
        rest = TODAY.replace(&rest, " ").into_owned();
    }

    let title = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    QuickAdd {
        title: if title.is_empty() {
            text.trim().to_string()
        } else {
            title
        },
        due_date,
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[rstest]
    #[case("Buy milk", "Buy milk", None, None)]
    #[case("call mom tomorrow", "call mom", Some(date(5, 11)), None)]
    #[case("Pay rent in 3 days urgent", "Pay rent", Some(date(5, 13)), Some(Priority::High))]
    #[case("renew passport in 1 day", "renew passport", Some(date(5, 11)), None)]
    #[case("water plants today low priority", "water plants", Some(date(5, 10)), Some(Priority::Low))]
    #[case("HIGH PRIORITY fix the leak", "fix the leak", None, Some(Priority::High))]
    #[case("tomorrow", "tomorrow", Some(date(5, 11)), None)]
    #[case("follow the flow", "follow the flow", None, None)]
    fn parses_phrases(
        #[case] text: &str,
        #[case] title: &str,
        #[case] due_date: Option<NaiveDate>,
        #[case] priority: Option<Priority>,
    ) {
        let parsed = parse(text, date(5, 10));
        assert_eq!(
            parsed,
            QuickAdd {
                title: title.to_string(),
                due_date,
                priority,
            }
        );
    }

    #[test]
    fn converts_into_task_fields() {
        let fields: TaskFields = parse("gym tomorrow", date(5, 10)).into();
        assert_eq!(fields.title, "gym");
        assert_eq!(fields.due_date, Some(date(5, 11)));
        assert!(fields.priority.is_none());
    }
}
