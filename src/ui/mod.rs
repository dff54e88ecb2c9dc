// UI module
// Interactive collaborators: the numbered file picker and the external editor

pub mod editor;
pub mod picker;

pub use editor::{CommandEditor, Editor};
pub use picker::{NumberedPicker, Picker};
