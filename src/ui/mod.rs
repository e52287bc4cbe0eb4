//! egui widgets of the figure window.

pub mod panels;
pub mod plot;
