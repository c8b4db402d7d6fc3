mod action_log_repo;
mod activity_repo;
mod son_execution_repo;
mod son_repo;
mod webhook_log_repo;
mod webhook_repo;

pub use action_log_repo::ActionLogRepo;
pub use activity_repo::ActivityRepo;
pub use son_execution_repo::SonExecutionRepo;
pub use son_repo::SonRepo;
pub use webhook_log_repo::WebhookLogRepo;
pub use webhook_repo::WebhookRepo;
