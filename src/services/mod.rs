pub mod coach_client;
pub mod coaching_service;
pub mod exercise_service;
pub mod question_view;
pub mod scoring_service;
pub mod trade_history_service;
pub mod tracker_service;
