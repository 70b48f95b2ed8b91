pub mod board;
pub mod window;

pub use board::{BatchUpdate, BoardError, BoardSnapshot};
pub use window::{AppData, AppId, AppWindow, Position, Size, WindowUpdate};
