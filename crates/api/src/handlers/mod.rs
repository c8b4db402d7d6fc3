pub mod activity;
pub mod son_executions;
pub mod sons;
pub mod stats;
pub mod webhook;
pub mod webhook_logs;
