//! Classification rules for the smart-home firmware
//!
//! Same engine as the feeder table, different schema. Two orderings are
//! deliberate: the alarm rules sit last so a triggered alarm is the final
//! value a pass leaves behind even if a threshold rule matched the same
//! line, and the flame status rule is the table's one guarded rule (it
//! reads the snapshot to avoid downgrading an active fire state).

use std::sync::OnceLock;

use regex::Regex;

use super::engine::{pattern, LineCtx, Rule, RuleAction, Trigger};
use super::snapshot::HomeSnapshot;

static TEMP: OnceLock<Regex> = OnceLock::new();
static HUMIDITY: OnceLock<Regex> = OnceLock::new();
static LIGHT: OnceLock<Regex> = OnceLock::new();
static GAS: OnceLock<Regex> = OnceLock::new();
static FLAME: OnceLock<Regex> = OnceLock::new();

/// Gas readings above this are reported as a leak.
const GAS_LEAK_THRESHOLD: f64 = 500.0;
/// Flame sensor readings below this mean fire (the sensor reads lower in
/// the presence of flame).
const FLAME_FIRE_THRESHOLD: f64 = 1000.0;

fn wifi(ctx: &LineCtx, s: &mut HomeSnapshot) {
    if ctx.line.contains("Connected to WiFi") {
        s.wifi_status = "Connected".to_string();
    } else if ctx.line.contains("Failed to connect to WiFi") {
        s.wifi_status = "Failed".to_string();
    }
}

fn firebase(ctx: &LineCtx, s: &mut HomeSnapshot) {
    if ctx.line.contains("Firebase.ready(): true") {
        s.firebase_status = "Ready".to_string();
    } else if ctx.line.contains("Firebase.ready(): false") {
        s.firebase_status = "Not Ready".to_string();
    } else if ctx.line.contains("Firebase signup OK") {
        s.firebase_status = "Connected".to_string();
    }
}

/// `Environment -> Temp: 25.50°C  Humidity: 60.00%  Light: 3.25V`
///
/// Each capture is independent: a mangled temperature does not stop the
/// humidity or light update on the same line.
fn environment(ctx: &LineCtx, s: &mut HomeSnapshot) {
    if let Some(caps) = pattern(&TEMP, r"Temp:\s*([\d.]+)").captures(ctx.line) {
        s.temperature = caps[1].to_string();
    }
    if let Some(caps) = pattern(&HUMIDITY, r"Humidity:\s*([\d.]+)").captures(ctx.line) {
        s.humidity = caps[1].to_string();
    }
    if let Some(caps) = pattern(&LIGHT, r"Light:\s*([\d.]+)").captures(ctx.line) {
        s.light = caps[1].to_string();
    }
}

/// `Security -> Motion: YES | Door: OPEN | Gas: 450`
fn security(ctx: &LineCtx, s: &mut HomeSnapshot) {
    if ctx.line.contains("Motion: YES") {
        s.motion = "Motion YES".to_string();
    } else if ctx.line.contains("Motion: NO") {
        s.motion = "No Motion".to_string();
    }

    if ctx.line.contains("Door: OPEN") {
        s.door = "OPEN".to_string();
    } else if ctx.line.contains("Door: CLOSED") {
        s.door = "Closed".to_string();
    }

    if let Some(caps) = pattern(&GAS, r"\|\s*Gas:\s*([\d.]+)").captures(ctx.line) {
        if let Ok(value) = caps[1].parse::<f64>() {
            s.gas = if value > GAS_LEAK_THRESHOLD {
                "GAS LEAK!".to_string()
            } else {
                format!("Normal ({value:.0})")
            };
        }
    }
}

/// `| flame: 1234`
fn flame_reading(ctx: &LineCtx, s: &mut HomeSnapshot) {
    if let Some(caps) = pattern(&FLAME, r"\|\s*flame:\s*([\d.]+)").captures(ctx.line) {
        if let Ok(value) = caps[1].parse::<f64>() {
            s.flame = if value < FLAME_FIRE_THRESHOLD {
                "FIRE DETECTED!".to_string()
            } else {
                format!("Normal ({value:.0})")
            };
        }
    }
}

/// `| status: Detected` / `| status: norm`
///
/// Guarded: a "norm" status must not clear a fire state the numeric rule or
/// an alarm already latched.
fn flame_status(ctx: &LineCtx, s: &mut HomeSnapshot) {
    if ctx.line.contains("Detected") {
        s.flame = "FIRE DETECTED!".to_string();
    } else if ctx.line.contains("norm") && !s.flame.contains("FIRE") {
        s.flame = "Normal".to_string();
    }
}

fn door_alarm(_: &LineCtx, s: &mut HomeSnapshot) {
    s.door = "OPEN - ALARM!".to_string();
}

fn fire_alarm(_: &LineCtx, s: &mut HomeSnapshot) {
    s.flame = "FIRE DETECTED - ALARM!".to_string();
}

pub static RULES: &[Rule<HomeSnapshot>] = &[
    Rule {
        name: "wifi-link",
        trigger: Trigger::ContainsAny(&["Connected to WiFi", "Failed to connect to WiFi"]),
        action: RuleAction::Stateless(wifi),
    },
    Rule {
        name: "firebase-status",
        trigger: Trigger::ContainsAny(&[
            "Firebase.ready(): true",
            "Firebase.ready(): false",
            "Firebase signup OK",
        ]),
        action: RuleAction::Stateless(firebase),
    },
    Rule {
        name: "environment",
        trigger: Trigger::Contains("Environment ->"),
        action: RuleAction::Stateless(environment),
    },
    Rule {
        name: "security",
        trigger: Trigger::Contains("Security ->"),
        action: RuleAction::Stateless(security),
    },
    Rule {
        name: "flame-reading",
        trigger: Trigger::Contains("| flame:"),
        action: RuleAction::Stateless(flame_reading),
    },
    Rule {
        name: "flame-status",
        trigger: Trigger::Contains("| status:"),
        action: RuleAction::Guarded(flame_status),
    },
    // Alarms last: their write is the final value of the pass.
    Rule {
        name: "door-alarm",
        trigger: Trigger::Contains("Door Opened - Alarm Triggered"),
        action: RuleAction::Stateless(door_alarm),
    },
    Rule {
        name: "fire-alarm",
        trigger: Trigger::Contains("Fire Detected - Alarm Triggered"),
        action: RuleAction::Stateless(fire_alarm),
    },
];

#[cfg(test)]
mod tests {
    use super::super::engine::classify;
    use super::*;

    fn pass(snap: &mut HomeSnapshot, line: &str) {
        classify(RULES, line, "12:34:56", snap);
    }

    #[test]
    fn environment_line_updates_all_three_readings() {
        let mut snap = HomeSnapshot::default();
        pass(
            &mut snap,
            "Environment -> Temp: 36.00\u{b0}C  Humidity: 25.00%  Light: 0.50V",
        );

        assert_eq!(snap.temperature, "36.00");
        assert_eq!(snap.humidity, "25.00");
        assert_eq!(snap.light, "0.50");
    }

    #[test]
    fn malformed_temperature_skips_only_that_field() {
        let mut snap = HomeSnapshot::default();
        pass(&mut snap, "Environment -> Temp: abc  Humidity: 60.00%");

        assert_eq!(snap.temperature, "--");
        assert_eq!(snap.humidity, "60.00");
    }

    #[test]
    fn gas_threshold_boundary() {
        let mut snap = HomeSnapshot::default();
        pass(&mut snap, "Security -> Motion: NO | Door: CLOSED | Gas: 500");
        assert_eq!(snap.gas, "Normal (500)");

        pass(&mut snap, "Security -> Motion: NO | Door: CLOSED | Gas: 501");
        assert_eq!(snap.gas, "GAS LEAK!");
    }

    #[test]
    fn security_line_updates_motion_and_door() {
        let mut snap = HomeSnapshot::default();
        pass(&mut snap, "Security -> Motion: YES | Door: OPEN | Gas: 450");

        assert_eq!(snap.motion, "Motion YES");
        assert_eq!(snap.door, "OPEN");
        assert_eq!(snap.gas, "Normal (450)");
    }

    #[test]
    fn flame_reading_threshold() {
        let mut snap = HomeSnapshot::default();
        pass(&mut snap, "| flame: 1234");
        assert_eq!(snap.flame, "Normal (1234)");

        pass(&mut snap, "| flame: 999");
        assert_eq!(snap.flame, "FIRE DETECTED!");
    }

    #[test]
    fn norm_status_does_not_downgrade_fire() {
        let mut snap = HomeSnapshot::default();
        snap.flame = "FIRE DETECTED!".to_string();

        pass(&mut snap, "| status: norm");
        assert_eq!(snap.flame, "FIRE DETECTED!");
    }

    #[test]
    fn norm_status_clears_normal_reading() {
        let mut snap = HomeSnapshot::default();
        snap.flame = "Normal (1200)".to_string();

        pass(&mut snap, "| status: norm");
        assert_eq!(snap.flame, "Normal");
    }

    #[test]
    fn detected_status_latches_fire() {
        let mut snap = HomeSnapshot::default();
        pass(&mut snap, "| status: Detected");
        assert_eq!(snap.flame, "FIRE DETECTED!");
    }

    #[test]
    fn door_alarm_overrides_threshold_value() {
        let mut snap = HomeSnapshot::default();
        pass(&mut snap, "Security -> Motion: NO | Door: CLOSED | Gas: 100");
        assert_eq!(snap.door, "Closed");

        pass(&mut snap, "Door Opened - Alarm Triggered");
        assert_eq!(snap.door, "OPEN - ALARM!");
    }

    #[test]
    fn fire_alarm_sets_distinguished_value() {
        let mut snap = HomeSnapshot::default();
        pass(&mut snap, "Fire Detected - Alarm Triggered");
        assert_eq!(snap.flame, "FIRE DETECTED - ALARM!");
    }

    #[test]
    fn firebase_tri_state() {
        let mut snap = HomeSnapshot::default();
        pass(&mut snap, "Firebase.ready(): true");
        assert_eq!(snap.firebase_status, "Ready");

        pass(&mut snap, "Firebase.ready(): false");
        assert_eq!(snap.firebase_status, "Not Ready");

        pass(&mut snap, "Firebase signup OK");
        assert_eq!(snap.firebase_status, "Connected");
    }

    #[test]
    fn repeated_classification_is_deterministic() {
        let line = "Security -> Motion: YES | Door: OPEN | Gas: 700";
        let mut a = HomeSnapshot::default();
        let mut b = HomeSnapshot::default();
        pass(&mut a, line);
        pass(&mut b, line);
        assert_eq!(a, b);
    }

    #[test]
    fn unrecognized_line_only_stamps() {
        let mut snap = HomeSnapshot::default();
        let before = snap.clone();
        pass(&mut snap, "free heap: 182400 bytes");

        assert_eq!(snap.last_update, "12:34:56");
        snap.last_update = before.last_update.clone();
        assert_eq!(snap, before);
    }
}
