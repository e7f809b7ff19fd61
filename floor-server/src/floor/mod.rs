//! Floor plan domain: tables on a canvas, selection, inspector, sessions

pub mod defaults;
pub mod editor;
pub mod grid;
pub mod inspector;
pub mod session;
pub mod validation;

pub use editor::{EditorError, FloorEditor, NewTableForm};
pub use grid::Grid;
pub use inspector::{EditOutcome, InspectorError, InspectorForm, TableEdit};
pub use session::{FloorSession, FloorSessions, FloorView, LayoutChange, LayoutChangeKind};
pub use validation::ValidationError;
