pub mod reading_queries;
pub mod scope_queries;
pub mod simulation_queries;
pub mod tariff_queries;
