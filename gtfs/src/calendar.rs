use chrono::NaiveDate;
use metroman::City;
use serde::{Serialize, Serializer};
use serde_repr::Serialize_repr;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Service {
    pub service_id: String,
    #[serde(serialize_with = "serialize_bool")]
    pub monday: bool,
    #[serde(serialize_with = "serialize_bool")]
    pub tuesday: bool,
    #[serde(serialize_with = "serialize_bool")]
    pub wednesday: bool,
    #[serde(serialize_with = "serialize_bool")]
    pub thursday: bool,
    #[serde(serialize_with = "serialize_bool")]
    pub friday: bool,
    #[serde(serialize_with = "serialize_bool")]
    pub saturday: bool,
    #[serde(serialize_with = "serialize_bool")]
    pub sunday: bool,
    #[serde(serialize_with = "serialize_date")]
    pub start_date: NaiveDate,
    #[serde(serialize_with = "serialize_date")]
    pub end_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalendarDate {
    pub service_id: String,
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    pub exception_type: ExceptionType,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize_repr)]
#[repr(u8)]
pub enum ExceptionType {
    Added = 1,
    Removed = 2,
}

/// Schedules have no date range, so they're open-ended. A schedule only gets a row if it runs
/// on some day of the week or on holidays.
pub fn generate(city: &City) -> Vec<Service> {
    let (start_date, end_date) = match (
        NaiveDate::from_ymd_opt(2000, 1, 1),
        NaiveDate::from_ymd_opt(9999, 12, 31),
    ) {
        (Some(start), Some(end)) => (start, end),
        _ => return Vec::new(),
    };
    city.schedules
        .values()
        .filter(|schedule| schedule.any_day_of_week() || schedule.holidays)
        .map(|schedule| {
            let days = schedule.days_of_week;
            Service {
                service_id: schedule.code.to_string(),
                monday: days[0],
                tuesday: days[1],
                wednesday: days[2],
                thursday: days[3],
                friday: days[4],
                saturday: days[5],
                sunday: days[6],
                start_date,
                end_date,
            }
        })
        .collect()
}

/// Every holiday switches on the holiday schedules and switches off all the others.
pub fn generate_exceptions(city: &City) -> Vec<CalendarDate> {
    let mut dates = Vec::new();
    for holiday in &city.holidays {
        if holiday.date().is_none() {
            warn!("Skipping invalid holiday {}", holiday.to_compact_string());
        }
    }
    for schedule in city.schedules.values() {
        let exception_type = if schedule.holidays {
            ExceptionType::Added
        } else {
            ExceptionType::Removed
        };
        for date in city.holidays.iter().filter_map(|h| h.date()) {
            dates.push(CalendarDate {
                service_id: schedule.code.to_string(),
                date,
                exception_type,
            });
        }
    }
    dates
}

fn serialize_bool<S: Serializer>(x: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*x))
}

fn serialize_date<S: Serializer>(x: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&x.format("%Y%m%d"))
}
