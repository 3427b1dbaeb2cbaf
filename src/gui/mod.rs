//! egui front end: one tab per active output, double-click a mode to apply it

mod components;
mod constants;
mod manager;

pub use manager::run_gui;
