pub mod chart;
pub mod format;
pub mod html;
pub mod table;
pub mod terminal;
pub mod widget;
