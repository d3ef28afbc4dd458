#![deny(warnings)]

//! Versioned, self-validating configuration record for the Real Time mod.
//!
//! [`RealTimeConfig`] holds every tunable value of the mod. A record coming out
//! of storage may be stamped with an older schema version and may carry values
//! outside their documented ranges, so loaders must call
//! [`RealTimeConfig::migrate_when_necessary`] and then
//! [`RealTimeConfig::validate`] before handing the record to anyone.
//!
//! The declarative settings-UI metadata lives in the [`schema`] table; dynamic
//! access by field identifier is provided through [`ConfigField`] and
//! [`FieldValue`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, info, warn};

mod field;
pub mod schema;

pub use field::{ConfigField, FieldError, FieldValue};
pub use schema::{field_schema, schema, FieldSchema, SliderValueType, Widget};

/// The storage ID under which configuration records are persisted.
pub const STORAGE_ID: &str = "RealTimeConfiguration";

/// The latest known schema version of [`RealTimeConfig`].
pub const LATEST_VERSION: u32 = 2;

/// Multiplier converting the version 0 shift quotas to the current percentage basis.
const LEGACY_SHIFT_QUOTA_FACTOR: f32 = 3.125;

/// How many citizens the simulation keeps as virtual (not spawned) citizens.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "i64")]
pub enum VirtualCitizensLevel {
    /// Every citizen is spawned.
    #[default]
    None = 0,
    /// A small share of citizens stays virtual.
    Few = 1,
    /// The game's own behavior.
    Vanilla = 2,
}

impl VirtualCitizensLevel {
    /// All levels in ordinal order.
    pub const ALL: [VirtualCitizensLevel; 3] = [
        VirtualCitizensLevel::None,
        VirtualCitizensLevel::Few,
        VirtualCitizensLevel::Vanilla,
    ];

    /// Display name of the level.
    pub fn name(self) -> &'static str {
        match self {
            VirtualCitizensLevel::None => "None",
            VirtualCitizensLevel::Few => "Few",
            VirtualCitizensLevel::Vanilla => "Vanilla",
        }
    }
}

impl fmt::Display for VirtualCitizensLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stored ordinals outside the known range saturate to the nearest level.
impl From<i64> for VirtualCitizensLevel {
    fn from(ordinal: i64) -> Self {
        match ordinal {
            i64::MIN..=0 => VirtualCitizensLevel::None,
            1 => VirtualCitizensLevel::Few,
            _ => VirtualCitizensLevel::Vanilla,
        }
    }
}

impl From<VirtualCitizensLevel> for i64 {
    fn from(level: VirtualCitizensLevel) -> Self {
        level as i64
    }
}

/// Saturating clamp of `value` into the inclusive range `[min, max]`.
///
/// Values that cannot be ordered against `min` (a float NaN) become `min`.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    match value.partial_cmp(&min) {
        Some(Ordering::Less) | None => min,
        _ if value > max => max,
        _ => value,
    }
}

/// The mod's configuration.
///
/// Hours are fractional daytime hours (`6.5` is 06:30), durations are hours,
/// quotas are percentages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default = "RealTimeConfig::zeroed")]
pub struct RealTimeConfig {
    /// Schema version the record was written under.
    pub version: u32,

    /// Speed of the time flow on daytime. Validated into 1..=6.
    pub daytime_speed: u32,
    /// Speed of the time flow on night time. Validated into 1..=6.
    pub nighttime_speed: u32,
    /// Day length follows the map's location and the day of the year.
    pub dynamic_day_length_enabled: bool,
    /// Citizens don't go to work on weekends.
    pub weekend_enabled: bool,

    /// How many citizens stay virtual instead of being spawned.
    pub virtual_citizens: VirtualCitizensLevel,
    /// Slow down the citizens' aging and birth rates.
    pub use_slow_aging: bool,
    /// Construction sites pause at night time.
    pub stop_construction_at_night: bool,
    /// Building construction speed in percent, 1..=100.
    pub construction_speed: u32,
    /// Inactive buildings switch off the lights at night time.
    pub switch_off_lights_at_night: bool,
    /// A citizen can abandon a journey after being stuck in traffic or waiting
    /// too long for public transport.
    pub can_abandon_journey: bool,

    /// Share of the workers working the second shift, 1..=25.
    pub second_shift_quota: u32,
    /// Share of the workers working the night shift, 1..=25.
    pub night_shift_quota: u32,
    /// Share of the workers going out for lunch, 0..=100.
    pub lunch_quota: u32,
    /// Share of the population searching locally for buildings, 0..=100.
    pub local_building_search_quota: u32,
    /// Share of the citizens shopping just for fun, 0..=50.
    pub shopping_for_fun_quota: u32,
    /// Share of the citizens going to and leaving work or school on time, 0..=100.
    pub on_time_quota: u32,

    /// Custom city events are enabled.
    pub events_enabled: bool,
    /// Earliest hour an event may start on a weekday, 0..=23.5.
    pub earliest_event_start_weekday: f32,
    /// Latest hour an event may start on a weekday, never before the earliest one.
    pub latest_event_start_weekday: f32,
    /// Earliest hour an event may start on a weekend day, 0..=23.5.
    pub earliest_event_start_weekend: f32,
    /// Latest hour an event may start on a weekend day, never before the earliest one.
    pub latest_event_start_weekend: f32,

    /// The hour the city wakes up.
    pub wake_up_hour: f32,
    /// The hour the city goes to sleep.
    pub go_to_sleep_hour: f32,
    /// Hour adults must be at work, 4..=11.
    pub work_begin: f32,
    /// Hour adults return from work, 12..=20.
    pub work_end: f32,
    /// Workers go out at lunch for food.
    pub lunchtime_enabled: bool,
    /// Hour workers go out for lunch, 11..=13.
    pub lunch_begin: f32,
    /// Hour workers return from lunch, 13..=15.
    pub lunch_end: f32,
    /// Hours a worker that is not on time may come earlier or stay longer.
    /// Students never do overtime.
    pub max_overtime: f32,
    /// Hour students must be at school or university, 4..=10.
    pub school_begin: f32,
    /// Hour students return from school or university, 11..=16.
    pub school_end: f32,
    /// Maximum vacation length in days.
    pub max_vacation_days: u32,

    /// Show a notification when incompatible mods are active.
    pub show_incompatibility_notifications: bool,
    /// Use the English-US time and date formats when English is selected.
    pub use_english_us_formats: bool,
}

impl RealTimeConfig {
    /// Creates a record holding the built-in defaults.
    ///
    /// The version stays 0, the same as a record loaded from unversioned
    /// storage. Use [`RealTimeConfig::with_latest_version`] when no stored
    /// state exists.
    pub fn new() -> Self {
        let mut config = Self::zeroed();
        config.reset_to_defaults();
        config
    }

    /// Creates a record holding the defaults, already stamped with [`LATEST_VERSION`].
    pub fn with_latest_version() -> Self {
        Self {
            version: LATEST_VERSION,
            ..Self::new()
        }
    }

    /// A record with every field at the zero value of its type.
    ///
    /// Deserialization fills missing fields from this record.
    pub fn zeroed() -> Self {
        Self {
            version: 0,
            daytime_speed: 0,
            nighttime_speed: 0,
            dynamic_day_length_enabled: false,
            weekend_enabled: false,
            virtual_citizens: VirtualCitizensLevel::None,
            use_slow_aging: false,
            stop_construction_at_night: false,
            construction_speed: 0,
            switch_off_lights_at_night: false,
            can_abandon_journey: false,
            second_shift_quota: 0,
            night_shift_quota: 0,
            lunch_quota: 0,
            local_building_search_quota: 0,
            shopping_for_fun_quota: 0,
            on_time_quota: 0,
            events_enabled: false,
            earliest_event_start_weekday: 0.0,
            latest_event_start_weekday: 0.0,
            earliest_event_start_weekend: 0.0,
            latest_event_start_weekend: 0.0,
            wake_up_hour: 0.0,
            go_to_sleep_hour: 0.0,
            work_begin: 0.0,
            work_end: 0.0,
            lunchtime_enabled: false,
            lunch_begin: 0.0,
            lunch_end: 0.0,
            max_overtime: 0.0,
            school_begin: 0.0,
            school_end: 0.0,
            max_vacation_days: 0,
            show_incompatibility_notifications: false,
            use_english_us_formats: false,
        }
    }

    /// Resets all values to their defaults. The version is left untouched.
    pub fn reset_to_defaults(&mut self) {
        self.wake_up_hour = 6.0;
        self.go_to_sleep_hour = 22.0;

        self.dynamic_day_length_enabled = true;
        self.daytime_speed = 4;
        self.nighttime_speed = 5;

        self.virtual_citizens = VirtualCitizensLevel::Vanilla;
        self.use_slow_aging = true;
        self.weekend_enabled = true;
        self.lunchtime_enabled = true;

        self.stop_construction_at_night = true;
        self.construction_speed = 50;
        self.switch_off_lights_at_night = true;
        self.can_abandon_journey = true;

        self.second_shift_quota = 13;
        self.night_shift_quota = 6;

        self.lunch_quota = 80;
        self.local_building_search_quota = 60;
        self.shopping_for_fun_quota = 30;
        self.on_time_quota = 80;

        self.events_enabled = true;
        self.earliest_event_start_weekday = 16.0;
        self.latest_event_start_weekday = 20.0;
        self.earliest_event_start_weekend = 8.0;
        self.latest_event_start_weekend = 22.0;

        self.work_begin = 9.0;
        self.work_end = 18.0;
        self.lunch_begin = 12.0;
        self.lunch_end = 13.0;
        self.max_overtime = 2.0;
        self.school_begin = 8.0;
        self.school_end = 14.0;
        self.max_vacation_days = 3;

        self.show_incompatibility_notifications = true;
        self.use_english_us_formats = false;
    }

    /// Corrects every value lying outside its valid range.
    ///
    /// The latest event start hours are raised to the earliest ones when they
    /// would start before them.
    pub fn validate(&mut self) {
        clamp_field("wake_up_hour", &mut self.wake_up_hour, 4.0, 8.0);
        clamp_field("go_to_sleep_hour", &mut self.go_to_sleep_hour, 20.0, 23.75);

        // The settings slider goes up to 500, but the simulation only supports 6.
        clamp_field("daytime_speed", &mut self.daytime_speed, 1, 6);
        clamp_field("nighttime_speed", &mut self.nighttime_speed, 1, 6);

        clamp_field(
            "virtual_citizens",
            &mut self.virtual_citizens,
            VirtualCitizensLevel::None,
            VirtualCitizensLevel::Vanilla,
        );
        clamp_field("construction_speed", &mut self.construction_speed, 1, 100);

        clamp_field("second_shift_quota", &mut self.second_shift_quota, 1, 25);
        clamp_field("night_shift_quota", &mut self.night_shift_quota, 1, 25);
        clamp_field("lunch_quota", &mut self.lunch_quota, 0, 100);
        clamp_field(
            "local_building_search_quota",
            &mut self.local_building_search_quota,
            0,
            100,
        );
        clamp_field(
            "shopping_for_fun_quota",
            &mut self.shopping_for_fun_quota,
            0,
            50,
        );
        clamp_field("on_time_quota", &mut self.on_time_quota, 0, 100);

        clamp_field(
            "earliest_event_start_weekday",
            &mut self.earliest_event_start_weekday,
            0.0,
            23.5,
        );
        clamp_field(
            "latest_event_start_weekday",
            &mut self.latest_event_start_weekday,
            0.0,
            23.5,
        );
        raise_to(
            "latest_event_start_weekday",
            &mut self.latest_event_start_weekday,
            self.earliest_event_start_weekday,
        );

        clamp_field(
            "earliest_event_start_weekend",
            &mut self.earliest_event_start_weekend,
            0.0,
            23.5,
        );
        clamp_field(
            "latest_event_start_weekend",
            &mut self.latest_event_start_weekend,
            0.0,
            23.5,
        );
        raise_to(
            "latest_event_start_weekend",
            &mut self.latest_event_start_weekend,
            self.earliest_event_start_weekend,
        );

        clamp_field("work_begin", &mut self.work_begin, 4.0, 11.0);
        clamp_field("work_end", &mut self.work_end, 12.0, 20.0);
        clamp_field("lunch_begin", &mut self.lunch_begin, 11.0, 13.0);
        clamp_field("lunch_end", &mut self.lunch_end, 13.0, 15.0);
        clamp_field("school_begin", &mut self.school_begin, 4.0, 10.0);
        clamp_field("school_end", &mut self.school_end, 11.0, 16.0);
        clamp_field("max_overtime", &mut self.max_overtime, 0.0, 4.0);
        clamp_field("max_vacation_days", &mut self.max_vacation_days, 0, 7);
    }

    /// Brings a record written under an older schema version up to [`LATEST_VERSION`].
    ///
    /// Must run before [`RealTimeConfig::validate`], which then clamps the
    /// migrated values into their current ranges.
    pub fn migrate_when_necessary(&mut self) {
        if self.version > LATEST_VERSION {
            warn!(
                version = self.version,
                latest = LATEST_VERSION,
                "configuration written by a newer version, restamping"
            );
        } else if self.version < LATEST_VERSION {
            info!(
                from = self.version,
                to = LATEST_VERSION,
                "migrating configuration"
            );
        }
        while self.version < LATEST_VERSION {
            self.migrate_step(self.version);
            self.version += 1;
        }
        self.version = LATEST_VERSION;
    }

    /// Applies the transformation from `from_version` to `from_version + 1`.
    fn migrate_step(&mut self, from_version: u32) {
        match from_version {
            // Shift quotas used to be a share of 8 instead of a share of 25.
            0 => {
                self.second_shift_quota = rescale_legacy_quota(self.second_shift_quota);
                self.night_shift_quota = rescale_legacy_quota(self.night_shift_quota);
            }
            // Version 2 added no fields needing conversion.
            _ => {}
        }
    }
}

impl Default for RealTimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn rescale_legacy_quota(quota: u32) -> u32 {
    (quota as f32 * LEGACY_SHIFT_QUOTA_FACTOR) as u32
}

fn clamp_field<T>(name: &'static str, value: &mut T, min: T, max: T)
where
    T: PartialOrd + Copy + fmt::Debug,
{
    let clamped = clamp(*value, min, max);
    if clamped != *value {
        debug!(field = name, from = ?*value, to = ?clamped, "corrected out-of-range value");
        *value = clamped;
    }
}

fn raise_to(name: &'static str, value: &mut f32, floor: f32) {
    if *value < floor {
        debug!(field = name, from = *value, to = floor, "raised to keep event window ordered");
        *value = floor;
    }
}
