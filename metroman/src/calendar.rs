use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::bundle::Record;
use crate::orig;

/// Which days a set of trips runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub code: orig::ScheduleCode,
    /// Monday first
    pub days_of_week: [bool; 7],
    /// Runs on holidays, regardless of the day of the week
    pub holidays: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Holiday {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Holiday {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// YYYYMMDD
    pub fn to_compact_string(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

impl Schedule {
    pub fn any_day_of_week(&self) -> bool {
        self.days_of_week.iter().any(|x| *x)
    }

    /// Holidays switch on the holiday schedules and switch off everything else.
    pub fn runs_on(&self, date: NaiveDate, holidays: &[Holiday]) -> bool {
        if holidays.iter().any(|h| h.date() == Some(date)) {
            return self.holidays;
        }
        self.days_of_week[date.weekday().num_days_from_monday() as usize]
    }

    pub fn describe(&self) -> String {
        let weekdays = self.days_of_week[0..5].iter().filter(|x| **x).count();
        let weekends = self.days_of_week[5..7].iter().filter(|x| **x).count();
        let mut result = if weekdays + weekends == 7 {
            "every day".to_string()
        } else if weekdays == 5 && weekends == 0 {
            "weekdays".to_string()
        } else if weekdays == 0 && weekends == 2 {
            "weekends".to_string()
        } else if weekdays == 0 && weekends == 0 {
            "never".to_string()
        } else {
            let mut result = String::new();
            for (day, operates) in ["M", "T", "W", "Th", "F", "Sat", "Sun"]
                .into_iter()
                .zip(self.days_of_week)
            {
                if operates {
                    result.push_str(day);
                }
            }
            result
        };
        if self.holidays {
            result.push_str(" + holidays");
        }
        result
    }
}

/// From `holiday`: one YYYYMMDD date per line.
pub(crate) fn load_holidays(lines: Vec<String>) -> Vec<Holiday> {
    let mut holidays = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.len() < 8 {
            warn!("Skipping malformed holiday {line:?}");
            continue;
        }
        let num = |range: std::ops::Range<usize>| {
            line.get(range).map(crate::bundle::parse_int).unwrap_or(0)
        };
        holidays.push(Holiday {
            year: num(0..4) as i32,
            month: num(4..6) as u32,
            day: num(6..8) as u32,
        });
    }
    holidays
}

/// From `schedule`: code, 7 day flags, an unused field, then the holiday flag. Only the first
/// character of each flag matters.
pub(crate) fn load_schedules(records: Vec<Record>) -> BTreeMap<orig::ScheduleCode, Schedule> {
    let flag = |x: &str| x.starts_with('1');
    let mut schedules = BTreeMap::new();
    for rec in records {
        let code = orig::ScheduleCode::new(rec.get(0));
        let mut days_of_week = [false; 7];
        for (i, day) in days_of_week.iter_mut().enumerate() {
            *day = flag(rec.get(1 + i));
        }
        let schedule = Schedule {
            code: code.clone(),
            days_of_week,
            holidays: flag(rec.get(9)),
        };
        debug!("Schedule {code} runs {}", schedule.describe());
        if schedules.insert(code.clone(), schedule).is_some() {
            warn!("Duplicate schedule {code}; keeping the last");
        }
    }
    schedules
}
