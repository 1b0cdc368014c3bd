pub mod demand;
pub mod direction;
pub mod peaks;
pub mod plan;
pub mod route_profile;
pub mod service_window;
pub mod shuttle_problem;
pub mod trip;
