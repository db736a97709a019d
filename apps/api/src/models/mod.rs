pub mod criteria;
pub mod resume;
pub mod score;
