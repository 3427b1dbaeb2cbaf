pub mod mode_table;
pub mod output_tabs;
