//! Access to configuration values by field identifier.

use crate::{RealTimeConfig, VirtualCitizensLevel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a tunable field of [`RealTimeConfig`].
///
/// The serialized form equals the field's key in a stored record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    /// Time flow speed on daytime.
    DaytimeSpeed,
    /// Time flow speed at night.
    NighttimeSpeed,
    /// Day length follows location and season.
    DynamicDayLengthEnabled,
    /// Weekends without work.
    WeekendEnabled,
    /// Virtual citizens level.
    VirtualCitizens,
    /// Slowed aging and birth rates.
    UseSlowAging,
    /// Construction pauses at night.
    StopConstructionAtNight,
    /// Construction speed percentage.
    ConstructionSpeed,
    /// Inactive buildings go dark at night.
    SwitchOffLightsAtNight,
    /// Citizens may abandon long journeys.
    CanAbandonJourney,
    /// Second shift quota.
    SecondShiftQuota,
    /// Night shift quota.
    NightShiftQuota,
    /// Lunch quota.
    LunchQuota,
    /// Local building search quota.
    LocalBuildingSearchQuota,
    /// Shopping for fun quota.
    ShoppingForFunQuota,
    /// On-time quota.
    OnTimeQuota,
    /// Custom events switch.
    EventsEnabled,
    /// Earliest weekday event start hour.
    EarliestEventStartWeekday,
    /// Latest weekday event start hour.
    LatestEventStartWeekday,
    /// Earliest weekend event start hour.
    EarliestEventStartWeekend,
    /// Latest weekend event start hour.
    LatestEventStartWeekend,
    /// Hour the city wakes up.
    WakeUpHour,
    /// Hour the city goes to sleep.
    GoToSleepHour,
    /// Work start hour.
    WorkBegin,
    /// Work end hour.
    WorkEnd,
    /// Lunch break switch.
    LunchtimeEnabled,
    /// Lunch start hour.
    LunchBegin,
    /// Lunch end hour.
    LunchEnd,
    /// Maximum overtime in hours.
    MaxOvertime,
    /// School start hour.
    SchoolBegin,
    /// School end hour.
    SchoolEnd,
    /// Maximum vacation length in days.
    MaxVacationDays,
    /// Incompatibility notifications switch.
    ShowIncompatibilityNotifications,
    /// English-US formats switch.
    UseEnglishUsFormats,
}

impl ConfigField {
    /// Every field, in declaration order.
    pub const ALL: [ConfigField; 34] = [
        ConfigField::DaytimeSpeed,
        ConfigField::NighttimeSpeed,
        ConfigField::DynamicDayLengthEnabled,
        ConfigField::WeekendEnabled,
        ConfigField::VirtualCitizens,
        ConfigField::UseSlowAging,
        ConfigField::StopConstructionAtNight,
        ConfigField::ConstructionSpeed,
        ConfigField::SwitchOffLightsAtNight,
        ConfigField::CanAbandonJourney,
        ConfigField::SecondShiftQuota,
        ConfigField::NightShiftQuota,
        ConfigField::LunchQuota,
        ConfigField::LocalBuildingSearchQuota,
        ConfigField::ShoppingForFunQuota,
        ConfigField::OnTimeQuota,
        ConfigField::EventsEnabled,
        ConfigField::EarliestEventStartWeekday,
        ConfigField::LatestEventStartWeekday,
        ConfigField::EarliestEventStartWeekend,
        ConfigField::LatestEventStartWeekend,
        ConfigField::WakeUpHour,
        ConfigField::GoToSleepHour,
        ConfigField::WorkBegin,
        ConfigField::WorkEnd,
        ConfigField::LunchtimeEnabled,
        ConfigField::LunchBegin,
        ConfigField::LunchEnd,
        ConfigField::MaxOvertime,
        ConfigField::SchoolBegin,
        ConfigField::SchoolEnd,
        ConfigField::MaxVacationDays,
        ConfigField::ShowIncompatibilityNotifications,
        ConfigField::UseEnglishUsFormats,
    ];

    /// Key of the field in a stored record, e.g. `"daytime_speed"`.
    pub fn name(self) -> &'static str {
        match self {
            ConfigField::DaytimeSpeed => "daytime_speed",
            ConfigField::NighttimeSpeed => "nighttime_speed",
            ConfigField::DynamicDayLengthEnabled => "dynamic_day_length_enabled",
            ConfigField::WeekendEnabled => "weekend_enabled",
            ConfigField::VirtualCitizens => "virtual_citizens",
            ConfigField::UseSlowAging => "use_slow_aging",
            ConfigField::StopConstructionAtNight => "stop_construction_at_night",
            ConfigField::ConstructionSpeed => "construction_speed",
            ConfigField::SwitchOffLightsAtNight => "switch_off_lights_at_night",
            ConfigField::CanAbandonJourney => "can_abandon_journey",
            ConfigField::SecondShiftQuota => "second_shift_quota",
            ConfigField::NightShiftQuota => "night_shift_quota",
            ConfigField::LunchQuota => "lunch_quota",
            ConfigField::LocalBuildingSearchQuota => "local_building_search_quota",
            ConfigField::ShoppingForFunQuota => "shopping_for_fun_quota",
            ConfigField::OnTimeQuota => "on_time_quota",
            ConfigField::EventsEnabled => "events_enabled",
            ConfigField::EarliestEventStartWeekday => "earliest_event_start_weekday",
            ConfigField::LatestEventStartWeekday => "latest_event_start_weekday",
            ConfigField::EarliestEventStartWeekend => "earliest_event_start_weekend",
            ConfigField::LatestEventStartWeekend => "latest_event_start_weekend",
            ConfigField::WakeUpHour => "wake_up_hour",
            ConfigField::GoToSleepHour => "go_to_sleep_hour",
            ConfigField::WorkBegin => "work_begin",
            ConfigField::WorkEnd => "work_end",
            ConfigField::LunchtimeEnabled => "lunchtime_enabled",
            ConfigField::LunchBegin => "lunch_begin",
            ConfigField::LunchEnd => "lunch_end",
            ConfigField::MaxOvertime => "max_overtime",
            ConfigField::SchoolBegin => "school_begin",
            ConfigField::SchoolEnd => "school_end",
            ConfigField::MaxVacationDays => "max_vacation_days",
            ConfigField::ShowIncompatibilityNotifications => "show_incompatibility_notifications",
            ConfigField::UseEnglishUsFormats => "use_english_us_formats",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigField::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// A single configuration value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// A switch.
    Bool(bool),
    /// A whole number: speeds, percentages, days.
    UInt(u32),
    /// An hour of the day or a length of time in hours.
    Float(f32),
    /// The virtual citizens level.
    Choice(VirtualCitizensLevel),
}

impl FieldValue {
    /// Name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::UInt(_) => "uint",
            FieldValue::Float(_) => "float",
            FieldValue::Choice(_) => "choice",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::UInt(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Choice(v) => write!(f, "{v}"),
        }
    }
}

/// Errors of dynamic field access.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    /// No field has this name.
    #[error("unknown configuration field: {0}")]
    UnknownField(String),
    /// The value kind does not match the field's kind.
    #[error("field {field} expects a {expected} value, got {actual}")]
    TypeMismatch {
        field: ConfigField,
        expected: &'static str,
        actual: &'static str,
    },
}

impl RealTimeConfig {
    /// Reads a field by identifier.
    pub fn get(&self, field: ConfigField) -> FieldValue {
        use ConfigField as F;
        use FieldValue::{Bool, Choice, Float, UInt};
        match field {
            F::DaytimeSpeed => UInt(self.daytime_speed),
            F::NighttimeSpeed => UInt(self.nighttime_speed),
            F::DynamicDayLengthEnabled => Bool(self.dynamic_day_length_enabled),
            F::WeekendEnabled => Bool(self.weekend_enabled),
            F::VirtualCitizens => Choice(self.virtual_citizens),
            F::UseSlowAging => Bool(self.use_slow_aging),
            F::StopConstructionAtNight => Bool(self.stop_construction_at_night),
            F::ConstructionSpeed => UInt(self.construction_speed),
            F::SwitchOffLightsAtNight => Bool(self.switch_off_lights_at_night),
            F::CanAbandonJourney => Bool(self.can_abandon_journey),
            F::SecondShiftQuota => UInt(self.second_shift_quota),
            F::NightShiftQuota => UInt(self.night_shift_quota),
            F::LunchQuota => UInt(self.lunch_quota),
            F::LocalBuildingSearchQuota => UInt(self.local_building_search_quota),
            F::ShoppingForFunQuota => UInt(self.shopping_for_fun_quota),
            F::OnTimeQuota => UInt(self.on_time_quota),
            F::EventsEnabled => Bool(self.events_enabled),
            F::EarliestEventStartWeekday => Float(self.earliest_event_start_weekday),
            F::LatestEventStartWeekday => Float(self.latest_event_start_weekday),
            F::EarliestEventStartWeekend => Float(self.earliest_event_start_weekend),
            F::LatestEventStartWeekend => Float(self.latest_event_start_weekend),
            F::WakeUpHour => Float(self.wake_up_hour),
            F::GoToSleepHour => Float(self.go_to_sleep_hour),
            F::WorkBegin => Float(self.work_begin),
            F::WorkEnd => Float(self.work_end),
            F::LunchtimeEnabled => Bool(self.lunchtime_enabled),
            F::LunchBegin => Float(self.lunch_begin),
            F::LunchEnd => Float(self.lunch_end),
            F::MaxOvertime => Float(self.max_overtime),
            F::SchoolBegin => Float(self.school_begin),
            F::SchoolEnd => Float(self.school_end),
            F::MaxVacationDays => UInt(self.max_vacation_days),
            F::ShowIncompatibilityNotifications => Bool(self.show_incompatibility_notifications),
            F::UseEnglishUsFormats => Bool(self.use_english_us_formats),
        }
    }

    /// Writes a field by identifier. The value is stored as is; run
    /// [`RealTimeConfig::validate`] to bring it into range.
    pub fn set(&mut self, field: ConfigField, value: FieldValue) -> Result<(), FieldError> {
        use ConfigField as F;
        let mismatch = |expected: &'static str| FieldError::TypeMismatch {
            field,
            expected,
            actual: value.kind(),
        };
        match self.get(field) {
            FieldValue::Bool(_) => {
                let FieldValue::Bool(v) = value else {
                    return Err(mismatch("bool"));
                };
                *self.bool_mut(field) = v;
            }
            FieldValue::UInt(_) => {
                let FieldValue::UInt(v) = value else {
                    return Err(mismatch("uint"));
                };
                *self.uint_mut(field) = v;
            }
            FieldValue::Float(_) => {
                let FieldValue::Float(v) = value else {
                    return Err(mismatch("float"));
                };
                *self.float_mut(field) = v;
            }
            FieldValue::Choice(_) => {
                let FieldValue::Choice(v) = value else {
                    return Err(mismatch("choice"));
                };
                debug_assert_eq!(field, F::VirtualCitizens);
                self.virtual_citizens = v;
            }
        }
        Ok(())
    }

    // The accessors below are only reached for fields whose `get` kind matched.

    fn bool_mut(&mut self, field: ConfigField) -> &mut bool {
        use ConfigField as F;
        match field {
            F::DynamicDayLengthEnabled => &mut self.dynamic_day_length_enabled,
            F::WeekendEnabled => &mut self.weekend_enabled,
            F::UseSlowAging => &mut self.use_slow_aging,
            F::StopConstructionAtNight => &mut self.stop_construction_at_night,
            F::SwitchOffLightsAtNight => &mut self.switch_off_lights_at_night,
            F::CanAbandonJourney => &mut self.can_abandon_journey,
            F::EventsEnabled => &mut self.events_enabled,
            F::LunchtimeEnabled => &mut self.lunchtime_enabled,
            F::ShowIncompatibilityNotifications => &mut self.show_incompatibility_notifications,
            F::UseEnglishUsFormats => &mut self.use_english_us_formats,
            other => unreachable!("{other} is not a bool field"),
        }
    }

    fn uint_mut(&mut self, field: ConfigField) -> &mut u32 {
        use ConfigField as F;
        match field {
            F::DaytimeSpeed => &mut self.daytime_speed,
            F::NighttimeSpeed => &mut self.nighttime_speed,
            F::ConstructionSpeed => &mut self.construction_speed,
            F::SecondShiftQuota => &mut self.second_shift_quota,
            F::NightShiftQuota => &mut self.night_shift_quota,
            F::LunchQuota => &mut self.lunch_quota,
            F::LocalBuildingSearchQuota => &mut self.local_building_search_quota,
            F::ShoppingForFunQuota => &mut self.shopping_for_fun_quota,
            F::OnTimeQuota => &mut self.on_time_quota,
            F::MaxVacationDays => &mut self.max_vacation_days,
            other => unreachable!("{other} is not a uint field"),
        }
    }

    fn float_mut(&mut self, field: ConfigField) -> &mut f32 {
        use ConfigField as F;
        match field {
            F::EarliestEventStartWeekday => &mut self.earliest_event_start_weekday,
            F::LatestEventStartWeekday => &mut self.latest_event_start_weekday,
            F::EarliestEventStartWeekend => &mut self.earliest_event_start_weekend,
            F::LatestEventStartWeekend => &mut self.latest_event_start_weekend,
            F::WakeUpHour => &mut self.wake_up_hour,
            F::GoToSleepHour => &mut self.go_to_sleep_hour,
            F::WorkBegin => &mut self.work_begin,
            F::WorkEnd => &mut self.work_end,
            F::LunchBegin => &mut self.lunch_begin,
            F::LunchEnd => &mut self.lunch_end,
            F::MaxOvertime => &mut self.max_overtime,
            F::SchoolBegin => &mut self.school_begin,
            F::SchoolEnd => &mut self.school_end,
            other => unreachable!("{other} is not a float field"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn names_are_unique_and_parse_back() {
        let names: BTreeSet<_> = ConfigField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), ConfigField::ALL.len());
        for field in ConfigField::ALL {
            assert_eq!(field.name().parse::<ConfigField>().unwrap(), field);
        }
        assert_eq!(
            "time_warp".parse::<ConfigField>(),
            Err(FieldError::UnknownField("time_warp".to_string()))
        );
    }

    #[test]
    fn names_match_serialized_keys() {
        let value = serde_json::to_value(RealTimeConfig::new()).unwrap();
        let obj = value.as_object().unwrap();
        for field in ConfigField::ALL {
            assert!(obj.contains_key(field.name()), "missing key {}", field.name());
            let as_json = serde_json::to_value(field).unwrap();
            assert_eq!(as_json.as_str(), Some(field.name()));
        }
        // every key except the version is a field
        assert_eq!(obj.len(), ConfigField::ALL.len() + 1);
    }

    #[test]
    fn set_then_get() {
        let mut c = RealTimeConfig::new();
        c.set(ConfigField::LunchEnd, FieldValue::Float(14.5)).unwrap();
        c.set(ConfigField::OnTimeQuota, FieldValue::UInt(400)).unwrap();
        c.set(ConfigField::WeekendEnabled, FieldValue::Bool(false)).unwrap();
        c.set(
            ConfigField::VirtualCitizens,
            FieldValue::Choice(VirtualCitizensLevel::Few),
        )
        .unwrap();
        assert_eq!(c.get(ConfigField::LunchEnd), FieldValue::Float(14.5));
        assert_eq!(c.on_time_quota, 400);
        assert!(!c.weekend_enabled);
        assert_eq!(c.virtual_citizens, VirtualCitizensLevel::Few);
    }

    #[test]
    fn set_rejects_wrong_kind() {
        let mut c = RealTimeConfig::new();
        let err = c.set(ConfigField::WorkBegin, FieldValue::UInt(9)).unwrap_err();
        assert_eq!(
            err,
            FieldError::TypeMismatch {
                field: ConfigField::WorkBegin,
                expected: "float",
                actual: "uint",
            }
        );
        assert_eq!(c.work_begin, 9.0);
    }

    #[test]
    fn field_copy_reproduces_record() {
        let original = RealTimeConfig::new();
        let mut copy = RealTimeConfig::zeroed();
        copy.version = original.version;
        for field in ConfigField::ALL {
            copy.set(field, original.get(field)).unwrap();
        }
        assert_eq!(copy, original);
        copy.validate();
        assert_eq!(copy, original);
    }
}
