pub mod coaching;
pub mod exercise;
pub mod phase;
pub mod progress;
pub mod question;
pub mod question_bank;
pub mod response;
pub mod trade;
