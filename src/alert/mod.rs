/// Alerting: turning elevation readings into alarm verdicts.

pub mod thresholds;
