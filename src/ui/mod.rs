pub mod components;
pub mod setting_view;
