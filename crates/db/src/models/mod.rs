pub mod action_execution_log;
pub mod activity;
pub mod son;
pub mod son_execution_log;
pub mod webhook;
pub mod webhook_log;
