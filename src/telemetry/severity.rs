//! Display severity bands for dashboard fields
//!
//! These are presentation hints only: the classifier stores what the
//! firmware reported, and the dashboard colors it with these thresholds.
//! Band boundaries match the firmware's operator conventions: temp > 35
//! hot / > 30 warm, humidity < 30 dry / < 40 low, light < 1 V dark /
//! < 2 V dim, food distance > 15 cm empty / > 10 cm low.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Good,
    Warn,
    Alert,
    /// No opinion, e.g. identifiers, timestamps, or unreadable values.
    Neutral,
}

impl Severity {
    pub fn color(&self) -> Color {
        match self {
            Severity::Good => Color::Green,
            Severity::Warn => Color::Yellow,
            Severity::Alert => Color::Red,
            Severity::Neutral => Color::Gray,
        }
    }
}

pub fn temperature(value: &str) -> Severity {
    match value.parse::<f64>() {
        Ok(t) if t > 35.0 => Severity::Alert,
        Ok(t) if t > 30.0 => Severity::Warn,
        Ok(_) => Severity::Good,
        Err(_) => Severity::Neutral,
    }
}

pub fn humidity(value: &str) -> Severity {
    match value.parse::<f64>() {
        Ok(h) if h < 30.0 => Severity::Alert,
        Ok(h) if h < 40.0 => Severity::Warn,
        Ok(_) => Severity::Good,
        Err(_) => Severity::Neutral,
    }
}

pub fn light(value: &str) -> Severity {
    match value.parse::<f64>() {
        Ok(l) if l < 1.0 => Severity::Alert,
        Ok(l) if l < 2.0 => Severity::Warn,
        Ok(_) => Severity::Good,
        Err(_) => Severity::Neutral,
    }
}

/// "--" counts as zero, i.e. a full container.
pub fn food_distance(value: &str) -> Severity {
    match value.replace("--", "0").parse::<i64>() {
        Ok(d) if d > 15 => Severity::Alert,
        Ok(d) if d > 10 => Severity::Warn,
        Ok(_) => Severity::Good,
        Err(_) => Severity::Neutral,
    }
}

pub fn food_alert(value: &str) -> Severity {
    if value.to_lowercase().contains("low") {
        Severity::Alert
    } else if value.contains("OK") {
        Severity::Good
    } else {
        Severity::Warn
    }
}

pub fn food_present(value: &str) -> Severity {
    if value.contains("Yes") {
        Severity::Good
    } else if value.contains("No") {
        Severity::Warn
    } else {
        Severity::Neutral
    }
}

pub fn access(value: &str) -> Severity {
    if value.contains("Unauthorized") {
        Severity::Alert
    } else if value.contains("Authorized") {
        Severity::Good
    } else {
        Severity::Neutral
    }
}

pub fn relay(value: &str) -> Severity {
    if value == "ON" {
        Severity::Good
    } else {
        Severity::Warn
    }
}

pub fn motion(value: &str) -> Severity {
    if value.contains("YES") {
        Severity::Alert
    } else {
        Severity::Good
    }
}

pub fn door(value: &str) -> Severity {
    if value.contains("OPEN") {
        Severity::Alert
    } else {
        Severity::Good
    }
}

pub fn gas(value: &str) -> Severity {
    if value.contains("LEAK") {
        Severity::Alert
    } else {
        Severity::Good
    }
}

pub fn flame(value: &str) -> Severity {
    if value.contains("FIRE") || value.contains("Detected") {
        Severity::Alert
    } else {
        Severity::Good
    }
}

pub fn link(value: &str) -> Severity {
    if value.contains("Connected") {
        Severity::Good
    } else {
        Severity::Alert
    }
}

pub fn feeder_backend(value: &str) -> Severity {
    if value.to_lowercase().contains("true") {
        Severity::Good
    } else {
        Severity::Alert
    }
}

pub fn home_backend(value: &str) -> Severity {
    if value.contains("Ready") {
        Severity::Good
    } else {
        Severity::Alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_bands() {
        // The documented hot / dry / dark scenario.
        assert_eq!(temperature("36.00"), Severity::Alert);
        assert_eq!(temperature("31.00"), Severity::Warn);
        assert_eq!(temperature("25.50"), Severity::Good);
        assert_eq!(humidity("25.00"), Severity::Alert);
        assert_eq!(humidity("35.00"), Severity::Warn);
        assert_eq!(humidity("60.00"), Severity::Good);
        assert_eq!(light("0.50"), Severity::Alert);
        assert_eq!(light("1.50"), Severity::Warn);
        assert_eq!(light("3.25"), Severity::Good);
    }

    #[test]
    fn unreadable_numeric_is_neutral() {
        assert_eq!(temperature("--"), Severity::Neutral);
        assert_eq!(humidity("--"), Severity::Neutral);
        assert_eq!(light("--"), Severity::Neutral);
    }

    #[test]
    fn food_distance_bands() {
        assert_eq!(food_distance("18"), Severity::Alert);
        assert_eq!(food_distance("12"), Severity::Warn);
        assert_eq!(food_distance("5"), Severity::Good);
        // Unset distance reads as zero, i.e. full.
        assert_eq!(food_distance("--"), Severity::Good);
    }

    #[test]
    fn security_string_checks() {
        assert_eq!(motion("Motion YES"), Severity::Alert);
        assert_eq!(motion("No Motion"), Severity::Good);
        assert_eq!(door("OPEN - ALARM!"), Severity::Alert);
        assert_eq!(door("Closed"), Severity::Good);
        assert_eq!(gas("GAS LEAK!"), Severity::Alert);
        assert_eq!(gas("Normal (450)"), Severity::Good);
        assert_eq!(flame("FIRE DETECTED!"), Severity::Alert);
        assert_eq!(flame("Normal (1200)"), Severity::Good);
    }

    #[test]
    fn backend_checks_differ_per_profile() {
        assert_eq!(feeder_backend("Ready (true)"), Severity::Good);
        assert_eq!(feeder_backend("Not Ready (false)"), Severity::Alert);
        assert_eq!(home_backend("Ready"), Severity::Good);
        // Substring check, so "Not Ready" also reads green while the
        // signup-derived "Connected" reads red. Kept as the firmware's
        // original monitor behaved.
        assert_eq!(home_backend("Not Ready"), Severity::Good);
        assert_eq!(home_backend("Connected"), Severity::Alert);
    }
}
