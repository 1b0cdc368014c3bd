pub mod waiting_time;
