//! Rule evaluation engine shared by both device profiles
//!
//! The firmware's log format is ad hoc: loosely structured, irregular, and
//! unversioned. Instead of one grammar, classification is a bank of
//! independent rule descriptors. Each rule names a trigger substring and an
//! apply function; every rule whose trigger occurs in the line fires, in
//! table order, and overwrites only the fields it captured. Lines matching
//! nothing leave the snapshot untouched apart from the last-update stamp.

use std::sync::OnceLock;

use regex::Regex;

/// Context handed to every apply function for one classification pass.
///
/// `stamp` is the wall-clock time the line was read, pre-formatted as
/// `%H:%M:%S`. Rules that record event times use it instead of anything
/// embedded in the line; passing it in keeps classification testable.
pub struct LineCtx<'a> {
    pub line: &'a str,
    pub stamp: &'a str,
}

/// Trigger predicate: does this rule apply to the line at all?
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Line contains the substring.
    Contains(&'static str),
    /// Line contains any of the substrings.
    ContainsAny(&'static [&'static str]),
}

impl Trigger {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Trigger::Contains(needle) => line.contains(needle),
            Trigger::ContainsAny(needles) => needles.iter().any(|n| line.contains(n)),
        }
    }
}

pub type ApplyFn<S> = fn(&LineCtx, &mut S);

/// How a rule writes the snapshot.
///
/// Almost every rule is `Stateless`: a pure function of the line (and the
/// stamp) that overwrites its fields on a successful capture and does
/// nothing otherwise. `Guarded` marks the exception: rules that must read
/// the current snapshot value before deciding whether to write (the flame
/// status corroboration refuses to downgrade an active fire state).
#[derive(Clone, Copy)]
pub enum RuleAction<S: 'static> {
    Stateless(ApplyFn<S>),
    Guarded(ApplyFn<S>),
}

/// One declarative classification rule.
///
/// Rules in a table are independent and commutative except where a table
/// deliberately orders a later rule to win a same-pass write to the same
/// field (backend acknowledgments over wall-clock stamps, alarm overrides
/// over threshold-derived values).
pub struct Rule<S: 'static> {
    pub name: &'static str,
    pub trigger: Trigger,
    pub action: RuleAction<S>,
}

/// Snapshot types that carry a last-update stamp.
pub trait Stamped {
    fn set_last_update(&mut self, stamp: &str);
}

/// Apply all matching rules to one line, then stamp the snapshot.
///
/// Never fails: a rule whose capture comes up empty skips its own write and
/// the pass continues. The stamp is written unconditionally as the final
/// step, so even an unrecognized line proves the device is alive.
pub fn classify<S: Stamped>(rules: &[Rule<S>], line: &str, stamp: &str, snapshot: &mut S) {
    let ctx = LineCtx { line, stamp };
    for rule in rules {
        if rule.trigger.matches(line) {
            match rule.action {
                RuleAction::Stateless(apply) | RuleAction::Guarded(apply) => apply(&ctx, snapshot),
            }
        }
    }
    snapshot.set_last_update(stamp);
}

/// Lazily compiled capture pattern for rule tables.
pub(crate) fn pattern(cell: &'static OnceLock<Regex>, source: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("rule pattern is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        hits: Vec<&'static str>,
        last_update: String,
    }

    impl Stamped for Probe {
        fn set_last_update(&mut self, stamp: &str) {
            self.last_update = stamp.to_string();
        }
    }

    fn hit_a(_: &LineCtx, p: &mut Probe) {
        p.hits.push("a");
    }

    fn hit_b(_: &LineCtx, p: &mut Probe) {
        p.hits.push("b");
    }

    static RULES: &[Rule<Probe>] = &[
        Rule {
            name: "a",
            trigger: Trigger::Contains("alpha"),
            action: RuleAction::Stateless(hit_a),
        },
        Rule {
            name: "b",
            trigger: Trigger::ContainsAny(&["beta", "alpha"]),
            action: RuleAction::Stateless(hit_b),
        },
    ];

    #[test]
    fn multiple_rules_fire_in_table_order() {
        let mut probe = Probe::default();
        classify(RULES, "alpha line", "10:00:00", &mut probe);
        assert_eq!(probe.hits, vec!["a", "b"]);
    }

    #[test]
    fn unmatched_line_only_stamps() {
        let mut probe = Probe::default();
        classify(RULES, "nothing recognizable", "10:00:01", &mut probe);
        assert!(probe.hits.is_empty());
        assert_eq!(probe.last_update, "10:00:01");
    }

    #[test]
    fn trigger_any_matches_either_needle() {
        let trigger = Trigger::ContainsAny(&["7 AM:", "7am"]);
        assert!(trigger.matches("feeding at 7am done"));
        assert!(trigger.matches("7 AM: Fed"));
        assert!(!trigger.matches("12 PM: Fed"));
    }
}
