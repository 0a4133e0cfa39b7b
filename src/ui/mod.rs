pub mod cards;
pub mod chart;
