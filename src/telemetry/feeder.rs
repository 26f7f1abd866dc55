//! Classification rules for the pet-feeder firmware
//!
//! Trigger substrings, capture patterns, and value mappings follow the
//! feeder firmware's serial output verbatim. Table order matters in one
//! place: the backend acknowledgment rule sits after the servo rules so a
//! verbatim `[OK] ... = value` payload wins over the wall-clock stamp when
//! both would write the same field in a single pass.

use std::sync::OnceLock;

use regex::Regex;

use super::engine::{pattern, LineCtx, Rule, RuleAction, Trigger};
use super::snapshot::FeederSnapshot;

static RFID_UID: OnceLock<Regex> = OnceLock::new();
static ANY_UID: OnceLock<Regex> = OnceLock::new();
static DISTANCE_CM: OnceLock<Regex> = OnceLock::new();
static IR_LEVEL: OnceLock<Regex> = OnceLock::new();
static ACK_VALUE: OnceLock<Regex> = OnceLock::new();

fn wifi(ctx: &LineCtx, s: &mut FeederSnapshot) {
    if ctx.line.contains("Connected to WiFi") || ctx.line.contains("Connected to Wi-Fi") {
        s.wifi_status = "Connected".to_string();
    } else if ctx.line.contains("Failed to connect") {
        s.wifi_status = "Failed".to_string();
    }
}

fn firebase_ready(ctx: &LineCtx, s: &mut FeederSnapshot) {
    s.firebase_status = if ctx.line.to_lowercase().contains("true") {
        "Ready (true)".to_string()
    } else {
        "Not Ready (false)".to_string()
    };
}

fn rfid_detected(ctx: &LineCtx, s: &mut FeederSnapshot) {
    let re = pattern(&RFID_UID, r"RFID Detected:\s*([A-F0-9:]+)");
    if let Some(caps) = re.captures(ctx.line) {
        s.last_uid = caps[1].to_string();
    }
}

fn authorized(_: &LineCtx, s: &mut FeederSnapshot) {
    s.access_status = "Authorized".to_string();
}

/// Re-captures the tag with a looser pattern than the dedicated RFID rule:
/// the first hex-ish token anywhere in the line. That can latch onto
/// fragments of surrounding text (the "D" in "UID" qualifies); preserved
/// as the firmware's monitor has always behaved.
fn unauthorized(ctx: &LineCtx, s: &mut FeederSnapshot) {
    s.access_status = "Unauthorized".to_string();
    let re = pattern(&ANY_UID, r"([A-F0-9:]+)");
    if let Some(caps) = re.captures(ctx.line) {
        s.unauthorized_uid = caps[1].to_string();
    }
}

fn access_servo(ctx: &LineCtx, s: &mut FeederSnapshot) {
    s.last_access = ctx.stamp.to_string();
}

fn feed_servo(ctx: &LineCtx, s: &mut FeederSnapshot) {
    s.last_feed = ctx.stamp.to_string();
}

fn relay(ctx: &LineCtx, s: &mut FeederSnapshot) {
    s.relay_status = if ctx.line.contains("ON") {
        "ON".to_string()
    } else {
        "OFF".to_string()
    };
}

fn food_distance(ctx: &LineCtx, s: &mut FeederSnapshot) {
    let re = pattern(&DISTANCE_CM, r"distance:\s*(\d+)\s*cm");
    if let Some(caps) = re.captures(ctx.line) {
        s.food_distance = caps[1].to_string();
    }
}

fn food_alert(ctx: &LineCtx, s: &mut FeederSnapshot) {
    if ctx.line.contains("Food level low") || ctx.line.contains("Food level Low") {
        s.food_alert = "Food level low".to_string();
    } else if ctx.line.contains("Food level OK") || ctx.line.contains("Food Status: Normal") {
        s.food_alert = "OK".to_string();
    }
}

fn ir_sensor(ctx: &LineCtx, s: &mut FeederSnapshot) {
    let re = pattern(&IR_LEVEL, r"IR Sensor:\s*(\d+)");
    if let Some(caps) = re.captures(ctx.line) {
        s.ir_sensor = caps[1].to_string();
    }
}

fn food_present(ctx: &LineCtx, s: &mut FeederSnapshot) {
    s.food_present = if ctx.line.contains("Yes") {
        "Yes".to_string()
    } else {
        "No".to_string()
    };
}

fn slot_outcome(line: &str) -> Option<String> {
    if line.contains("Fed") {
        Some("Fed".to_string())
    } else if line.contains("Skipped") {
        Some("Skipped".to_string())
    } else {
        None
    }
}

fn feeding_7am(ctx: &LineCtx, s: &mut FeederSnapshot) {
    if let Some(outcome) = slot_outcome(ctx.line) {
        s.feeding_7am = outcome;
    }
}

fn feeding_12pm(ctx: &LineCtx, s: &mut FeederSnapshot) {
    if let Some(outcome) = slot_outcome(ctx.line) {
        s.feeding_12pm = outcome;
    }
}

fn feeding_7pm(ctx: &LineCtx, s: &mut FeederSnapshot) {
    if let Some(outcome) = slot_outcome(ctx.line) {
        s.feeding_7pm = outcome;
    }
}

/// Backend acknowledgment lines echo the value the backend stored; that
/// verbatim value replaces the wall-clock stamp written earlier in the pass.
fn backend_ack(ctx: &LineCtx, s: &mut FeederSnapshot) {
    let re = pattern(&ACK_VALUE, r"=\s*(.+)$");
    if ctx.line.contains("/petFeeder/lastAccess") {
        if let Some(caps) = re.captures(ctx.line) {
            s.last_access = caps[1].trim().to_string();
        }
    } else if ctx.line.contains("/petFeeder/lastFeed") {
        if let Some(caps) = re.captures(ctx.line) {
            s.last_feed = caps[1].trim().to_string();
        }
    }
}

pub static RULES: &[Rule<FeederSnapshot>] = &[
    Rule {
        name: "wifi-link",
        trigger: Trigger::ContainsAny(&[
            "Connected to WiFi",
            "Connected to Wi-Fi",
            "Failed to connect",
        ]),
        action: RuleAction::Stateless(wifi),
    },
    Rule {
        name: "firebase-ready",
        trigger: Trigger::Contains("Firebase.ready():"),
        action: RuleAction::Stateless(firebase_ready),
    },
    Rule {
        name: "rfid-detected",
        trigger: Trigger::Contains("RFID Detected:"),
        action: RuleAction::Stateless(rfid_detected),
    },
    Rule {
        name: "access-authorized",
        trigger: Trigger::ContainsAny(&["Authorized ID detected", "\u{2705} Authorized"]),
        action: RuleAction::Stateless(authorized),
    },
    Rule {
        name: "access-unauthorized",
        trigger: Trigger::ContainsAny(&["Unauthorized UID", "\u{274c} Unauthorized"]),
        action: RuleAction::Stateless(unauthorized),
    },
    Rule {
        name: "access-servo",
        trigger: Trigger::Contains("Opening Servo 1"),
        action: RuleAction::Stateless(access_servo),
    },
    Rule {
        name: "feed-servo",
        trigger: Trigger::ContainsAny(&["Scheduled feeding time", "Opening Servo 2"]),
        action: RuleAction::Stateless(feed_servo),
    },
    Rule {
        name: "relay",
        trigger: Trigger::Contains("Relay:"),
        action: RuleAction::Stateless(relay),
    },
    Rule {
        name: "food-distance",
        trigger: Trigger::ContainsAny(&["Food container distance:", "food container distance:"]),
        action: RuleAction::Stateless(food_distance),
    },
    Rule {
        name: "food-alert",
        trigger: Trigger::ContainsAny(&[
            "Food level low",
            "Food level Low",
            "Food level OK",
            "Food Status: Normal",
        ]),
        action: RuleAction::Stateless(food_alert),
    },
    Rule {
        name: "ir-sensor",
        trigger: Trigger::Contains("IR Sensor:"),
        action: RuleAction::Stateless(ir_sensor),
    },
    Rule {
        name: "food-present",
        trigger: Trigger::Contains("Food Present:"),
        action: RuleAction::Stateless(food_present),
    },
    Rule {
        name: "feeding-7am",
        trigger: Trigger::ContainsAny(&["7 AM:", "7am"]),
        action: RuleAction::Stateless(feeding_7am),
    },
    Rule {
        name: "feeding-12pm",
        trigger: Trigger::ContainsAny(&["12 PM:", "12pm"]),
        action: RuleAction::Stateless(feeding_12pm),
    },
    Rule {
        name: "feeding-7pm",
        trigger: Trigger::ContainsAny(&["7 PM:", "7pm"]),
        action: RuleAction::Stateless(feeding_7pm),
    },
    // After the servo rules: the echoed value wins within one pass.
    Rule {
        name: "backend-ack",
        trigger: Trigger::Contains("[OK]"),
        action: RuleAction::Stateless(backend_ack),
    },
];
