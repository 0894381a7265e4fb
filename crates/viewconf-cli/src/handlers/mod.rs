pub mod catalog;
pub mod custom_view;
pub mod line;
pub mod view;
