//! Slateboard Core Library
//!
//! Platform-agnostic canvas state engine for the Slateboard whiteboard:
//! viewport math, snapshot history, tool state machine, live previews
//! and persistence contracts. Rendering primitives live in
//! `slateboard-raster`; shells feed this crate input events and blit
//! its surfaces.

pub mod engine;
pub mod history;
pub mod input;
pub mod notice;
pub mod preview;
pub mod redraw;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod text;
pub mod tools;
pub mod viewport;

pub use engine::{Engine, Permission};
pub use history::{RasterHistory, Snapshot};
pub use input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use notice::{Notice, NoticeKind, NoticeQueue};
pub use preview::{PreviewLayer, ShapePreview};
pub use redraw::RepaintScheduler;
pub use shortcuts::{Action, Shortcut, ShortcutRegistry};
pub use snap::{SNAP_ANGLES, aspect_lock, grid_rects, snap_angle, snapped_endpoint};
pub use storage::{BoardStore, MemoryStore, StorageError, StorageResult};
pub use text::{BLINK_INTERVAL, TextEditor, TextKeyResult};
pub use tools::{BrushSettings, ShapeKind, Tool};
pub use viewport::{MAX_SCALE, MIN_SCALE, Viewport, ZOOM_STEP};
