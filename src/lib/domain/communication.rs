//! Mail transport seam

pub mod email_address;
pub mod errors;
pub mod mailer;
pub mod message;
