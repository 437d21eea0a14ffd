pub mod payment;
pub mod submission;

pub use payment::Entity as Payment;
pub use submission::Entity as Submission;
