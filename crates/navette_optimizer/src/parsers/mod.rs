pub mod demand_csv;
pub mod parse_error;
pub mod plan_csv;
pub mod time_of_day;
