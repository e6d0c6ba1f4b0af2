// UI module - handles all TUI rendering using Ratatui
//
// Architecture:
// - render: Main orchestration function that coordinates all rendering
// - file_list: Upload placeholders and file rows with progress bars
// - search: Search input box with query and match count
// - legend: Hotkey legend
// - status_bar: Sort bar and bottom status bar
// - dialogs: Delete confirmation and upload path prompt
// - toast: Toast notifications (brief pop-up messages)

pub mod dialogs;
pub mod file_list;
pub mod legend;
pub mod render;
pub mod search;
pub mod status_bar;
pub mod toast;

// Re-export main render function for convenience
pub use render::render;
