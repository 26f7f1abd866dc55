pub mod engine;
pub mod feeder;
pub mod home;
pub mod severity;
pub mod snapshot;

pub use engine::{classify, LineCtx, Rule, RuleAction, Trigger};
pub use severity::Severity;
pub use snapshot::{
    DeviceProfile, DeviceSnapshot, FeederSnapshot, FieldGroup, FieldRow, HomeSnapshot,
};
