// Business logic services

mod approval;
mod notification;

pub use approval::ApprovalService;
pub use notification::NotificationService;
