//! Settings-UI metadata for every configuration field.
//!
//! Each entry places a field in a group (and optional subgroup) of the
//! settings page, gives its display order inside that group and describes the
//! editor widget. Group keys carry a numeric prefix the renderer sorts by.

use crate::{clamp, ConfigField, FieldValue};
use chrono::NaiveTime;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

/// How a slider value is to be interpreted and formatted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderValueType {
    /// A plain number.
    Default,
    /// A daytime hour, e.g. `6.5` is 06:30.
    Time,
    /// A length of time in hours.
    Duration,
}

impl SliderValueType {
    /// Formats a slider value for display.
    ///
    /// `english_us` switches clock times to the 12-hour format.
    pub fn format(self, value: f32, english_us: bool) -> String {
        match self {
            SliderValueType::Default => value.to_string(),
            SliderValueType::Time => format_time_of_day(value, english_us),
            SliderValueType::Duration => format_duration(value),
        }
    }
}

fn format_time_of_day(hour: f32, english_us: bool) -> String {
    let secs = (clamp(hour, 0.0, 24.0) * 3600.0).round() as u32 % 86_400;
    let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0) else {
        return hour.to_string();
    };
    if english_us {
        time.format("%-I:%M %p").to_string()
    } else {
        time.format("%H:%M").to_string()
    }
}

fn format_duration(hours: f32) -> String {
    let minutes = (clamp(hours, 0.0, f32::MAX) * 60.0).round() as u32;
    match (minutes / 60, minutes % 60) {
        (h, 0) => format!("{h}h"),
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Editor widget of a field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    /// A checkbox for a switch.
    CheckBox,
    /// A dropdown; the stored value is the index into `choices`.
    ComboBox { choices: &'static [&'static str] },
    /// A slider over an inclusive range.
    Slider {
        /// Lowest selectable value.
        min: f32,
        /// Highest selectable value.
        max: f32,
        /// Distance between selectable values.
        step: f32,
        /// Interpretation of the value.
        value_type: SliderValueType,
    },
}

/// UI metadata of a single field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FieldSchema {
    /// The described field.
    pub field: ConfigField,
    /// Settings page group key, e.g. `"1General"`.
    pub group: &'static str,
    /// Section inside the group, if the group is split.
    pub subgroup: Option<&'static str>,
    /// Display order inside the (sub)group.
    pub order: u32,
    /// Editor widget.
    pub widget: Widget,
}

impl FieldSchema {
    /// Formats a value of this field for display.
    pub fn format(&self, value: FieldValue, english_us: bool) -> String {
        match (self.widget, value) {
            (Widget::Slider { value_type, .. }, FieldValue::Float(v)) => {
                value_type.format(v, english_us)
            }
            (_, FieldValue::Bool(v)) => String::from(if v { "on" } else { "off" }),
            (_, other) => other.to_string(),
        }
    }
}

const GENERAL: &str = "1General";
const QUOTAS: &str = "2Quotas";
const EVENTS: &str = "3Events";
const TIME: &str = "4Time";
const TOOLS: &str = "Tools";

const LEVEL_CHOICES: &[&str] = &["None", "Few", "Vanilla"];

const fn entry(
    field: ConfigField,
    group: &'static str,
    subgroup: Option<&'static str>,
    order: u32,
    widget: Widget,
) -> FieldSchema {
    FieldSchema {
        field,
        group,
        subgroup,
        order,
        widget,
    }
}

const fn slider(min: f32, max: f32, step: f32, value_type: SliderValueType) -> Widget {
    Widget::Slider {
        min,
        max,
        step,
        value_type,
    }
}

const fn number(min: f32, max: f32) -> Widget {
    slider(min, max, 1.0, SliderValueType::Default)
}

const fn time(min: f32, max: f32, step: f32) -> Widget {
    slider(min, max, step, SliderValueType::Time)
}

static SCHEMA: [FieldSchema; 34] = {
    use ConfigField as F;
    use Widget::CheckBox;
    let time_sub = Some("0Time");
    let other_sub = Some("1Other");
    [
        entry(F::DaytimeSpeed, GENERAL, time_sub, 2, number(1.0, 500.0)),
        entry(F::NighttimeSpeed, GENERAL, time_sub, 3, number(1.0, 500.0)),
        entry(F::DynamicDayLengthEnabled, GENERAL, time_sub, 4, CheckBox),
        entry(F::WeekendEnabled, GENERAL, time_sub, 5, CheckBox),
        entry(
            F::VirtualCitizens,
            GENERAL,
            other_sub,
            0,
            Widget::ComboBox {
                choices: LEVEL_CHOICES,
            },
        ),
        entry(F::UseSlowAging, GENERAL, other_sub, 1, CheckBox),
        entry(F::StopConstructionAtNight, GENERAL, other_sub, 2, CheckBox),
        entry(
            F::ConstructionSpeed,
            GENERAL,
            other_sub,
            3,
            number(1.0, 100.0),
        ),
        entry(F::SwitchOffLightsAtNight, GENERAL, other_sub, 4, CheckBox),
        entry(F::CanAbandonJourney, GENERAL, other_sub, 5, CheckBox),
        entry(F::SecondShiftQuota, QUOTAS, None, 0, number(1.0, 25.0)),
        entry(F::NightShiftQuota, QUOTAS, None, 1, number(1.0, 25.0)),
        entry(F::LunchQuota, QUOTAS, None, 2, number(0.0, 100.0)),
        entry(
            F::LocalBuildingSearchQuota,
            QUOTAS,
            None,
            3,
            number(0.0, 100.0),
        ),
        entry(F::ShoppingForFunQuota, QUOTAS, None, 4, number(0.0, 50.0)),
        entry(F::OnTimeQuota, QUOTAS, None, 5, number(0.0, 100.0)),
        entry(F::EventsEnabled, EVENTS, None, 0, CheckBox),
        entry(
            F::EarliestEventStartWeekday,
            EVENTS,
            None,
            1,
            time(0.0, 23.5, 0.5),
        ),
        entry(
            F::LatestEventStartWeekday,
            EVENTS,
            None,
            2,
            time(0.0, 23.5, 0.5),
        ),
        entry(
            F::EarliestEventStartWeekend,
            EVENTS,
            None,
            3,
            time(0.0, 23.5, 0.5),
        ),
        entry(
            F::LatestEventStartWeekend,
            EVENTS,
            None,
            4,
            time(0.0, 23.5, 0.5),
        ),
        entry(F::WakeUpHour, TIME, None, 0, time(4.0, 8.0, 0.25)),
        entry(F::GoToSleepHour, TIME, None, 1, time(20.0, 23.75, 0.25)),
        entry(F::WorkBegin, TIME, None, 2, time(4.0, 11.0, 0.25)),
        entry(F::WorkEnd, TIME, None, 3, time(12.0, 20.0, 0.25)),
        entry(F::LunchtimeEnabled, TIME, None, 4, CheckBox),
        entry(F::LunchBegin, TIME, None, 5, time(11.0, 13.0, 0.25)),
        entry(F::LunchEnd, TIME, None, 6, time(13.0, 15.0, 0.25)),
        entry(
            F::MaxOvertime,
            TIME,
            None,
            7,
            slider(0.0, 4.0, 0.25, SliderValueType::Duration),
        ),
        entry(F::SchoolBegin, TIME, None, 8, time(4.0, 10.0, 0.25)),
        entry(F::SchoolEnd, TIME, None, 9, time(11.0, 16.0, 0.25)),
        entry(F::MaxVacationDays, TIME, None, 10, number(0.0, 7.0)),
        entry(
            F::ShowIncompatibilityNotifications,
            TOOLS,
            None,
            0,
            CheckBox,
        ),
        entry(F::UseEnglishUsFormats, TOOLS, None, 1, CheckBox),
    ]
};

static BY_FIELD: Lazy<BTreeMap<ConfigField, &'static FieldSchema>> =
    Lazy::new(|| SCHEMA.iter().map(|s| (s.field, s)).collect());

/// The whole schema table, in field declaration order.
pub fn schema() -> &'static [FieldSchema] {
    &SCHEMA
}

/// UI metadata of one field.
pub fn field_schema(field: ConfigField) -> &'static FieldSchema {
    BY_FIELD[&field]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RealTimeConfig, VirtualCitizensLevel};
    use std::collections::BTreeSet;

    #[test]
    fn every_field_has_one_entry_in_order() {
        let fields: Vec<_> = schema().iter().map(|s| s.field).collect();
        assert_eq!(fields, ConfigField::ALL.to_vec());
        for field in ConfigField::ALL {
            assert_eq!(field_schema(field).field, field);
        }
    }

    #[test]
    fn display_slots_are_unique() {
        let slots: BTreeSet<_> = schema()
            .iter()
            .map(|s| (s.group, s.subgroup, s.order))
            .collect();
        assert_eq!(slots.len(), schema().len());
    }

    #[test]
    fn widget_matches_value_kind() {
        let c = RealTimeConfig::new();
        for s in schema() {
            match (s.widget, c.get(s.field)) {
                (Widget::CheckBox, FieldValue::Bool(_)) => {}
                (Widget::ComboBox { choices }, FieldValue::Choice(_)) => {
                    assert_eq!(choices.len(), VirtualCitizensLevel::ALL.len());
                    for (name, level) in choices.iter().zip(VirtualCitizensLevel::ALL) {
                        assert_eq!(*name, level.name());
                    }
                }
                (Widget::Slider { .. }, FieldValue::UInt(_) | FieldValue::Float(_)) => {}
                (w, v) => panic!("{}: widget {w:?} for value {v:?}", s.field),
            }
        }
    }

    fn extreme(value: FieldValue, high: bool) -> FieldValue {
        match value {
            FieldValue::UInt(_) => FieldValue::UInt(if high { u32::MAX } else { 0 }),
            FieldValue::Float(_) => FieldValue::Float(if high { 1e9 } else { -1e9 }),
            other => other,
        }
    }

    fn as_f32(value: FieldValue) -> f32 {
        match value {
            FieldValue::UInt(v) => v as f32,
            FieldValue::Float(v) => v,
            other => panic!("not numeric: {other:?}"),
        }
    }

    #[test]
    fn validation_bounds_follow_slider_ranges() {
        for s in schema() {
            let Widget::Slider { min, max, .. } = s.widget else {
                continue;
            };
            let mut base = RealTimeConfig::new();
            base.earliest_event_start_weekday = 0.0;
            base.earliest_event_start_weekend = 0.0;

            let mut low = base.clone();
            low.set(s.field, extreme(low.get(s.field), false)).unwrap();
            low.validate();
            assert_eq!(as_f32(low.get(s.field)), min, "{} min", s.field);

            let mut high = base.clone();
            high.set(s.field, extreme(high.get(s.field), true)).unwrap();
            high.validate();
            let expected_max = match s.field {
                // slider allows 500, validation stops at 6
                ConfigField::DaytimeSpeed | ConfigField::NighttimeSpeed => 6.0,
                _ => max,
            };
            assert_eq!(as_f32(high.get(s.field)), expected_max, "{} max", s.field);
        }
    }

    #[test]
    fn defaults_lie_within_slider_ranges() {
        let c = RealTimeConfig::new();
        for s in schema() {
            if let Widget::Slider { min, max, .. } = s.widget {
                let v = as_f32(c.get(s.field));
                assert!(v >= min && v <= max, "{} default {v}", s.field);
            }
        }
    }

    #[test]
    fn formats_times_and_durations() {
        assert_eq!(SliderValueType::Time.format(6.5, false), "06:30");
        assert_eq!(SliderValueType::Time.format(6.5, true), "6:30 AM");
        assert_eq!(SliderValueType::Time.format(22.0, true), "10:00 PM");
        assert_eq!(SliderValueType::Time.format(23.75, false), "23:45");
        assert_eq!(SliderValueType::Duration.format(2.25, false), "2h 15m");
        assert_eq!(SliderValueType::Duration.format(2.0, false), "2h");
        assert_eq!(SliderValueType::Duration.format(0.5, false), "30m");
        assert_eq!(SliderValueType::Default.format(13.0, false), "13");
    }

    #[test]
    fn field_schema_formats_values() {
        let c = RealTimeConfig::new();
        let wake = field_schema(ConfigField::WakeUpHour);
        assert_eq!(wake.format(c.get(ConfigField::WakeUpHour), false), "06:00");
        let events = field_schema(ConfigField::EventsEnabled);
        assert_eq!(events.format(c.get(ConfigField::EventsEnabled), false), "on");
        let level = field_schema(ConfigField::VirtualCitizens);
        assert_eq!(level.format(c.get(ConfigField::VirtualCitizens), false), "Vanilla");
        let quota = field_schema(ConfigField::LunchQuota);
        assert_eq!(quota.format(c.get(ConfigField::LunchQuota), false), "80");
    }

    #[test]
    fn schema_serializes_widget_kind() {
        let json = serde_json::to_value(field_schema(ConfigField::MaxOvertime)).unwrap();
        assert_eq!(json["field"], "max_overtime");
        assert_eq!(json["group"], "4Time");
        assert_eq!(json["widget"]["kind"], "slider");
        assert_eq!(json["widget"]["value_type"], "duration");
        assert_eq!(json["widget"]["step"], 0.25);
    }
}
