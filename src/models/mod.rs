pub mod media_model;
pub mod movie_model;
pub mod reservation_model;
pub mod show_model;
pub mod snack_model;
pub mod upcoming_model;
