pub mod assessment_dto;
pub mod coach_dto;
pub mod exercise_dto;
pub mod trade_dto;
