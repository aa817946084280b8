pub mod archive_undo;
pub mod preferences;
pub mod undo_window;

// Re-export for convenience
pub use archive_undo::ArchiveUndoService;
pub use preferences::{ImmersivePreference, PreferencesError, PreferencesStore};
pub use undo_window::{ArchiveUndo, UndoHandle, UndoWindow, DEFAULT_UNDO_WINDOW};
