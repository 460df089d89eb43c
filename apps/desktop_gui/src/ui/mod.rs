//! UI layer for desktop GUI: app shell, section panels, widgets, and theme.

pub mod app;
pub mod panels;
pub mod theme;
pub mod widgets;

pub use app::PortfolioApp;
