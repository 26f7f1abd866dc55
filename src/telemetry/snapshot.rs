//! Telemetry snapshot schemas for the two supported firmwares
//!
//! Each snapshot is a fixed-shape record of display strings: every field is
//! always present and defaulted, updates are last-write-wins, and nothing is
//! validated against a device state machine (the device's real state machine
//! is opaque to a log observer). Numeric readings are stored as their
//! captured text.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::engine::{self, Stamped};
use super::severity::{self, Severity};
use super::{feeder, home};

/// Which firmware schema a monitoring session tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceProfile {
    #[default]
    Feeder,
    Home,
}

impl DeviceProfile {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceProfile::Feeder => "Pet Feeder",
            DeviceProfile::Home => "Smart Home",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            DeviceProfile::Feeder => DeviceProfile::Home,
            DeviceProfile::Home => DeviceProfile::Feeder,
        }
    }
}

/// Pet-feeder telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeederSnapshot {
    /// Ultrasonic reading of the food container, cm.
    pub food_distance: String,
    pub food_alert: String,
    pub food_present: String,
    pub ir_sensor: String,
    pub relay_status: String,
    pub last_access: String,
    pub last_feed: String,
    /// Last RFID tag seen at the feeder.
    pub last_uid: String,
    pub access_status: String,
    pub unauthorized_uid: String,
    pub feeding_7am: String,
    pub feeding_12pm: String,
    pub feeding_7pm: String,
    pub wifi_status: String,
    pub firebase_status: String,
    pub last_update: String,
}

impl Default for FeederSnapshot {
    fn default() -> Self {
        Self {
            food_distance: "--".to_string(),
            food_alert: "Unknown".to_string(),
            food_present: "Unknown".to_string(),
            ir_sensor: "--".to_string(),
            relay_status: "OFF".to_string(),
            last_access: "Never".to_string(),
            last_feed: "Never".to_string(),
            last_uid: "--".to_string(),
            access_status: "--".to_string(),
            unauthorized_uid: "--".to_string(),
            feeding_7am: "--".to_string(),
            feeding_12pm: "--".to_string(),
            feeding_7pm: "--".to_string(),
            wifi_status: "Unknown".to_string(),
            firebase_status: "Unknown".to_string(),
            last_update: "Never".to_string(),
        }
    }
}

impl Stamped for FeederSnapshot {
    fn set_last_update(&mut self, stamp: &str) {
        self.last_update = stamp.to_string();
    }
}

/// Smart-home telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSnapshot {
    pub temperature: String,
    pub humidity: String,
    pub light: String,
    pub motion: String,
    pub door: String,
    pub gas: String,
    pub flame: String,
    pub wifi_status: String,
    pub firebase_status: String,
    pub last_update: String,
}

impl Default for HomeSnapshot {
    fn default() -> Self {
        Self {
            temperature: "--".to_string(),
            humidity: "--".to_string(),
            light: "--".to_string(),
            motion: "No Motion".to_string(),
            door: "Closed".to_string(),
            gas: "Normal".to_string(),
            flame: "Normal".to_string(),
            wifi_status: "Unknown".to_string(),
            firebase_status: "Unknown".to_string(),
            last_update: "Never".to_string(),
        }
    }
}

impl Stamped for HomeSnapshot {
    fn set_last_update(&mut self, stamp: &str) {
        self.last_update = stamp.to_string();
    }
}

/// One dashboard field with its display value and severity hint.
#[derive(Debug, Clone)]
pub struct FieldRow {
    pub label: &'static str,
    pub value: String,
    pub severity: Severity,
}

impl FieldRow {
    fn new(label: &'static str, value: impl Into<String>, severity: Severity) -> Self {
        Self {
            label,
            value: value.into(),
            severity,
        }
    }
}

/// A titled group of dashboard fields.
#[derive(Debug, Clone)]
pub struct FieldGroup {
    pub title: &'static str,
    pub rows: Vec<FieldRow>,
}

/// The snapshot for whichever profile the session monitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "device", rename_all = "snake_case")]
pub enum DeviceSnapshot {
    Feeder(FeederSnapshot),
    Home(HomeSnapshot),
}

impl DeviceSnapshot {
    pub fn new(profile: DeviceProfile) -> Self {
        match profile {
            DeviceProfile::Feeder => DeviceSnapshot::Feeder(FeederSnapshot::default()),
            DeviceProfile::Home => DeviceSnapshot::Home(HomeSnapshot::default()),
        }
    }

    pub fn profile(&self) -> DeviceProfile {
        match self {
            DeviceSnapshot::Feeder(_) => DeviceProfile::Feeder,
            DeviceSnapshot::Home(_) => DeviceProfile::Home,
        }
    }

    /// Run one classification pass for a raw line read at `now`.
    pub fn classify(&mut self, line: &str, now: DateTime<Local>) {
        let stamp = now.format("%H:%M:%S").to_string();
        match self {
            DeviceSnapshot::Feeder(s) => engine::classify(feeder::RULES, line, &stamp, s),
            DeviceSnapshot::Home(s) => engine::classify(home::RULES, line, &stamp, s),
        }
    }

    pub fn last_update(&self) -> &str {
        match self {
            DeviceSnapshot::Feeder(s) => &s.last_update,
            DeviceSnapshot::Home(s) => &s.last_update,
        }
    }

    /// Grouped field view for the dashboard, severity included.
    pub fn field_groups(&self) -> Vec<FieldGroup> {
        match self {
            DeviceSnapshot::Feeder(s) => feeder_groups(s),
            DeviceSnapshot::Home(s) => home_groups(s),
        }
    }
}

fn feeder_groups(s: &FeederSnapshot) -> Vec<FieldGroup> {
    vec![
        FieldGroup {
            title: "Food Monitoring",
            rows: vec![
                FieldRow::new(
                    "Distance",
                    format!("{} cm", s.food_distance),
                    severity::food_distance(&s.food_distance),
                ),
                FieldRow::new("Alert", &s.food_alert, severity::food_alert(&s.food_alert)),
                FieldRow::new(
                    "Present",
                    &s.food_present,
                    severity::food_present(&s.food_present),
                ),
                FieldRow::new("IR Sensor", &s.ir_sensor, Severity::Neutral),
            ],
        },
        FieldGroup {
            title: "RFID Access",
            rows: vec![
                FieldRow::new("Last UID", &s.last_uid, Severity::Neutral),
                FieldRow::new("Access", &s.access_status, severity::access(&s.access_status)),
                FieldRow::new("Unauthorized UID", &s.unauthorized_uid, Severity::Neutral),
            ],
        },
        FieldGroup {
            title: "Feeding Schedule",
            rows: vec![
                FieldRow::new("7 AM", &s.feeding_7am, Severity::Neutral),
                FieldRow::new("12 PM", &s.feeding_12pm, Severity::Neutral),
                FieldRow::new("7 PM", &s.feeding_7pm, Severity::Neutral),
            ],
        },
        FieldGroup {
            title: "Activity",
            rows: vec![
                FieldRow::new("Last Access", &s.last_access, Severity::Neutral),
                FieldRow::new("Last Feed", &s.last_feed, Severity::Neutral),
                FieldRow::new("Relay", &s.relay_status, severity::relay(&s.relay_status)),
            ],
        },
        FieldGroup {
            title: "System",
            rows: vec![
                FieldRow::new("WiFi", &s.wifi_status, severity::link(&s.wifi_status)),
                FieldRow::new(
                    "Firebase",
                    &s.firebase_status,
                    severity::feeder_backend(&s.firebase_status),
                ),
                FieldRow::new("Last Update", &s.last_update, Severity::Neutral),
            ],
        },
    ]
}

fn home_groups(s: &HomeSnapshot) -> Vec<FieldGroup> {
    vec![
        FieldGroup {
            title: "Environmental",
            rows: vec![
                FieldRow::new(
                    "Temperature",
                    format!("{}\u{b0}C", s.temperature),
                    severity::temperature(&s.temperature),
                ),
                FieldRow::new(
                    "Humidity",
                    format!("{}%", s.humidity),
                    severity::humidity(&s.humidity),
                ),
                FieldRow::new("Light", format!("{}V", s.light), severity::light(&s.light)),
            ],
        },
        FieldGroup {
            title: "Security",
            rows: vec![
                FieldRow::new("Motion", &s.motion, severity::motion(&s.motion)),
                FieldRow::new("Door", &s.door, severity::door(&s.door)),
                FieldRow::new("Gas", &s.gas, severity::gas(&s.gas)),
                FieldRow::new("Fire", &s.flame, severity::flame(&s.flame)),
            ],
        },
        FieldGroup {
            title: "System",
            rows: vec![
                FieldRow::new("WiFi", &s.wifi_status, severity::link(&s.wifi_status)),
                FieldRow::new(
                    "Firebase",
                    &s.firebase_status,
                    severity::home_backend(&s.firebase_status),
                ),
                FieldRow::new("Last Update", &s.last_update, Severity::Neutral),
            ],
        },
    ]
}
