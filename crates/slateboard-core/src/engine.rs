//! The board engine: tool state machine, input routing and the glue
//! between viewport, history, preview and storage.
//!
//! One engine instance backs one board. The shell feeds it pointer and
//! key events in screen coordinates plus a per-frame `tick`, and reads
//! back the committed surface, the preview overlay and any queued
//! notices.

use crate::history::RasterHistory;
use crate::input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::notice::{Notice, NoticeQueue};
use crate::preview::{PreviewLayer, ShapePreview};
use crate::redraw::RepaintScheduler;
use crate::shortcuts::{self, Action};
use crate::storage::{self, BoardStore};
use crate::text::{TextEditor, TextKeyResult};
use crate::tools::{BrushSettings, Tool};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};
use slateboard_raster::{CompositeMode, RasterResult, Surface, TextRasterizer, TextStyle};
use std::sync::Arc;
use uuid::Uuid;

/// Access level for the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Permission {
    /// Navigation and export only; every mutating input is ignored.
    View,
    #[default]
    Edit,
}

/// What the pointer is currently doing.
#[derive(Debug)]
enum EngineState {
    Idle,
    /// Freehand pen/eraser stroke; `last` is the previous logical point.
    Stroking { last: Point },
    ShapeDragging(ShapePreview),
    TextEditing(TextEditor),
    /// Middle-button pan; `last` is the previous screen point.
    Panning { last: Point },
}

/// The canvas engine for one board.
pub struct Engine {
    board_id: String,
    board_name: Option<String>,
    permission: Permission,
    tool: Tool,
    settings: BrushSettings,
    viewport: Viewport,
    history: RasterHistory,
    preview: PreviewLayer,
    rasterizer: TextRasterizer,
    state: EngineState,
    notices: NoticeQueue,
    scheduler: RepaintScheduler,
    store: Option<Arc<dyn BoardStore>>,
}

impl Engine {
    /// Create an engine for an existing board id. The blank raster is
    /// recorded as the first undo snapshot.
    pub fn new(board_id: impl Into<String>, display: Size, dpr: f64) -> RasterResult<Self> {
        let history = RasterHistory::new(Surface::new(display, dpr))?;
        Ok(Self {
            board_id: board_id.into(),
            board_name: None,
            permission: Permission::default(),
            tool: Tool::default(),
            settings: BrushSettings::default(),
            viewport: Viewport::new(dpr),
            history,
            preview: PreviewLayer::new(display, dpr),
            rasterizer: TextRasterizer::new(),
            state: EngineState::Idle,
            notices: NoticeQueue::new(),
            scheduler: RepaintScheduler::new(),
            store: None,
        })
    }

    /// Create an engine for a brand-new board with a generated id.
    pub fn with_generated_id(display: Size, dpr: f64) -> RasterResult<Self> {
        Self::new(Uuid::new_v4().to_string(), display, dpr)
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// Display name used for export filenames.
    pub fn set_board_name(&mut self, name: impl Into<String>) {
        self.board_name = Some(name.into());
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut BrushSettings {
        &mut self.settings
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The committed raster.
    pub fn surface(&self) -> &Surface {
        self.history.surface()
    }

    /// The preview overlay the shell stacks above the committed raster.
    pub fn preview(&self) -> &Surface {
        self.preview.surface()
    }

    pub fn history(&self) -> &RasterHistory {
        &self.history
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, EngineState::Panning { .. })
    }

    pub fn is_text_editing(&self) -> bool {
        matches!(self.state, EngineState::TextEditing(_))
    }

    /// Take all queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Supply font bytes for text rendering. Without a font, text
    /// measurement falls back to approximate metrics and glyphs are not
    /// painted.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> RasterResult<()> {
        self.rasterizer = TextRasterizer::from_bytes(bytes)?;
        Ok(())
    }

    fn can_edit(&self) -> bool {
        self.permission == Permission::Edit
    }

    // ---- Tool selection ----

    /// Switch tools. Any in-progress stroke, drag or text session is
    /// discarded without committing.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        self.cancel_in_progress();
        self.tool = tool;
    }

    fn cancel_in_progress(&mut self) {
        if !matches!(self.state, EngineState::Idle) {
            self.preview.clear();
            self.history
                .surface_mut()
                .set_composite(CompositeMode::SourceOver);
            self.state = EngineState::Idle;
        }
    }

    // ---- Pointer input ----

    /// Dispatch a unified pointer event. Shells that already split
    /// their events can call the `pointer_*` methods directly.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move {
                position,
                modifiers,
            } => self.pointer_move(position, modifiers),
            PointerEvent::Up {
                position,
                button,
                modifiers,
            } => self.pointer_up(position, button, modifiers),
            PointerEvent::Scroll { delta_y, .. } => self.scroll(delta_y),
        }
    }

    pub fn pointer_down(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        if button == MouseButton::Middle {
            self.cancel_in_progress();
            self.state = EngineState::Panning { last: position };
            return;
        }
        if button != MouseButton::Left || !self.can_edit() {
            return;
        }

        let logical = self.viewport.to_logical(position);
        match self.tool {
            Tool::Pen | Tool::Eraser => self.begin_stroke(logical),
            Tool::Text => self.begin_text(logical),
            _ => self.begin_shape(logical, modifiers),
        }
    }

    pub fn pointer_move(&mut self, position: Point, modifiers: Modifiers) {
        match &mut self.state {
            EngineState::Panning { last } => {
                let delta = Vec2::new(position.x - last.x, position.y - last.y);
                *last = position;
                self.viewport.pan(delta);
                self.scheduler.request(&self.viewport);
            }
            EngineState::Stroking { last } => {
                let from = *last;
                let to = self.viewport.to_logical(position);
                *last = to;
                let width = self.settings.width_for(self.tool);
                let color = self.settings.color;
                self.history.surface_mut().stroke_segment(from, to, width, color);
            }
            EngineState::ShapeDragging(shape) => {
                shape.end = self.viewport.to_logical(position);
                shape.snap = modifiers.shift;
                let shape = *shape;
                let width = self.settings.width_for(self.tool);
                self.preview
                    .repaint_shape(&self.viewport, &shape, width, self.settings.color);
            }
            EngineState::Idle | EngineState::TextEditing(_) => {}
        }
    }

    pub fn pointer_up(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        match &mut self.state {
            EngineState::Panning { .. } if button == MouseButton::Middle => {
                self.state = EngineState::Idle;
            }
            EngineState::Stroking { .. } if button == MouseButton::Left => {
                self.history
                    .surface_mut()
                    .set_composite(CompositeMode::SourceOver);
                self.state = EngineState::Idle;
                self.commit_snapshot();
            }
            EngineState::ShapeDragging(shape) if button == MouseButton::Left => {
                shape.end = self.viewport.to_logical(position);
                shape.snap = modifiers.shift;
                let shape = *shape;
                self.state = EngineState::Idle;
                self.commit_shape(shape);
            }
            _ => {}
        }
    }

    /// Wheel scroll: zoom about the canvas, one step per event. The
    /// repaint is coalesced, not immediate.
    pub fn scroll(&mut self, delta_y: f64) {
        self.viewport.zoom(delta_y);
        self.scheduler.request(&self.viewport);
    }

    fn begin_stroke(&mut self, logical: Point) {
        let surface = self.history.surface_mut();
        surface.set_transform(self.viewport.scale, self.viewport.offset);
        surface.set_composite(match self.tool {
            Tool::Eraser => CompositeMode::DestinationOut,
            _ => CompositeMode::SourceOver,
        });
        let width = self.settings.width_for(self.tool);
        let color = self.settings.color;
        surface.stroke_segment(logical, logical, width, color);
        self.state = EngineState::Stroking { last: logical };
    }

    fn begin_shape(&mut self, logical: Point, modifiers: Modifiers) {
        let Some(kind) = self.tool.shape() else {
            return;
        };
        let shape = ShapePreview {
            kind,
            anchor: logical,
            end: logical,
            snap: modifiers.shift,
            grid_cols: self.settings.grid_cols(),
        };
        let width = self.settings.width_for(self.tool);
        self.preview
            .repaint_shape(&self.viewport, &shape, width, self.settings.color);
        self.state = EngineState::ShapeDragging(shape);
    }

    fn begin_text(&mut self, logical: Point) {
        // A placement click while a session is open commits the old
        // session first.
        if let EngineState::TextEditing(editor) = std::mem::replace(&mut self.state, EngineState::Idle) {
            self.commit_text(editor);
        }
        let style = TextStyle {
            size: self.settings.font_size,
            bold: self.settings.bold,
            italic: self.settings.italic,
        };
        let editor = TextEditor::new(logical, style);
        self.preview
            .repaint_text(&self.viewport, &editor, &self.rasterizer, self.settings.color);
        self.state = EngineState::TextEditing(editor);
    }

    fn commit_shape(&mut self, shape: ShapePreview) {
        let width = self.settings.width_for(self.tool);
        let surface = self.history.surface_mut();
        surface.set_transform(self.viewport.scale, self.viewport.offset);
        surface.set_composite(CompositeMode::SourceOver);
        shape.paint(surface, width, self.settings.color);
        self.preview.clear();
        self.commit_snapshot();
    }

    fn commit_text(&mut self, editor: TextEditor) {
        self.preview.clear();
        // An empty buffer leaves no mark and no history entry.
        if editor.is_empty() {
            return;
        }
        let surface = self.history.surface_mut();
        surface.set_transform(self.viewport.scale, self.viewport.offset);
        surface.set_composite(CompositeMode::SourceOver);
        surface.fill_text(
            &self.rasterizer,
            editor.buffer(),
            editor.caret(),
            editor.style(),
            self.settings.color,
        );
        self.commit_snapshot();
    }

    fn commit_snapshot(&mut self) {
        if let Err(e) = self.history.snapshot() {
            log::error!("snapshot failed: {e}");
            self.notices.error("Could not record drawing history");
        }
    }

    // ---- Keyboard input ----

    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let Some(action) = shortcuts::resolve(event, self.is_text_editing()) {
            self.apply_action(action);
            return;
        }
        if let EngineState::TextEditing(editor) = &mut self.state {
            match editor.handle_key(event) {
                TextKeyResult::Edited => {
                    let editor = editor.clone();
                    self.preview.repaint_text(
                        &self.viewport,
                        &editor,
                        &self.rasterizer,
                        self.settings.color,
                    );
                }
                TextKeyResult::Commit => {
                    if let EngineState::TextEditing(editor) =
                        std::mem::replace(&mut self.state, EngineState::Idle)
                    {
                        self.commit_text(editor);
                    }
                }
                TextKeyResult::Cancel => {
                    self.preview.clear();
                    self.state = EngineState::Idle;
                }
                TextKeyResult::Ignored => {}
            }
        }
    }

    fn apply_action(&mut self, action: Action) {
        if action == Action::ResetView {
            self.viewport.reset();
            self.scheduler.request(&self.viewport);
            return;
        }
        if !self.can_edit() {
            log::debug!("ignoring {action:?}: view-only session");
            return;
        }
        match action {
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::Clear => self.clear(),
            Action::Save => self.save(),
            Action::SelectTool(tool) => self.set_tool(tool),
            Action::ResetView => {}
        }
    }

    // ---- History ----

    pub fn undo(&mut self) {
        self.cancel_in_progress();
        match self.history.undo(&self.viewport) {
            Ok(_) => {}
            Err(e) => {
                log::error!("undo failed: {e}");
                self.notices.error("Could not undo");
            }
        }
    }

    pub fn redo(&mut self) {
        self.cancel_in_progress();
        match self.history.redo(&self.viewport) {
            Ok(_) => {}
            Err(e) => {
                log::error!("redo failed: {e}");
                self.notices.error("Could not redo");
            }
        }
    }

    pub fn clear(&mut self) {
        if !self.can_edit() {
            return;
        }
        self.cancel_in_progress();
        if let Err(e) = self.history.clear(&self.viewport) {
            log::error!("clear failed: {e}");
            self.notices.error("Could not clear the board");
        }
    }

    // ---- Frame pump ----

    /// Per-frame update: advances the caret blink and flushes at most
    /// one coalesced zoom/pan repaint.
    pub fn tick(&mut self, dt: f64) {
        if let EngineState::TextEditing(editor) = &mut self.state {
            if editor.tick(dt) {
                let editor = editor.clone();
                self.preview.repaint_text(
                    &self.viewport,
                    &editor,
                    &self.rasterizer,
                    self.settings.color,
                );
            }
        }
        if let Some(viewport) = self.scheduler.take() {
            if let Err(e) = self.history.repaint_from_top(&viewport) {
                log::error!("viewport repaint failed: {e}");
                self.notices.error("Could not repaint the board");
            }
        }
    }

    /// Display size or pixel ratio changed. The committed content is
    /// repainted from the last snapshot into the new buffer.
    pub fn resize(&mut self, display: Size, dpr: f64) {
        self.cancel_in_progress();
        self.viewport.dpr = dpr;
        self.preview.resize(display, dpr);
        if let Err(e) = self.history.resize(display, &self.viewport) {
            log::error!("resize repaint failed: {e}");
            self.notices.error("Could not repaint the board");
        }
    }

    // ---- Persistence ----

    /// Attach the storage backend Ctrl+S and `save`/`load` go through.
    pub fn set_store(&mut self, store: Arc<dyn BoardStore>) {
        self.store = Some(store);
    }

    /// Persist through the attached backend. Without one this is a
    /// silent no-op; the shell may be handling persistence itself.
    pub fn save(&mut self) {
        let Some(store) = self.store.clone() else {
            log::debug!("ignoring save: no storage backend attached");
            return;
        };
        self.save_board(store.as_ref());
    }

    /// Load through the attached backend, if any.
    pub fn load(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        self.load_board(store.as_ref());
    }

    /// Encode the committed raster as PNG. Available in every
    /// permission mode.
    pub fn export_png(&self) -> RasterResult<Vec<u8>> {
        self.history.surface().encode()
    }

    /// Filename for the exported PNG, derived from the board's display
    /// name (falling back to the id) with filesystem-hostile characters
    /// replaced.
    pub fn export_filename(&self) -> String {
        let name = self.board_name.as_deref().unwrap_or(&self.board_id);
        let safe: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{safe}.png")
    }

    /// Persist the committed raster to a storage backend as a
    /// base64 PNG data URL. Queues a notice with the outcome.
    /// View-only sessions are a silent no-op.
    pub fn save_board(&mut self, store: &dyn BoardStore) {
        if !self.can_edit() {
            log::debug!("ignoring save: view-only session");
            return;
        }
        let bytes = match self.export_png() {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("encode for save failed: {e}");
                self.notices.error("Could not save the board");
                return;
            }
        };
        let payload = storage::to_data_url(&bytes);
        match store.persist(&self.board_id, payload.as_bytes()) {
            Ok(status) if (200..300).contains(&status) => {
                self.notices.info("Board saved");
            }
            Ok(status) => {
                log::warn!("save rejected with status {status}");
                self.notices.error(format!("Save failed (status {status})"));
            }
            Err(e) => {
                log::error!("save failed: {e}");
                self.notices.error("Could not save the board");
            }
        }
    }

    /// Load the board's persisted raster, if any. The stored payload
    /// is a base64 PNG data URL. A missing board is a fresh board and
    /// queues an informational notice, not an error. A payload that
    /// fails to unwrap or decode leaves the current raster untouched
    /// and queues an error notice.
    pub fn load_board(&mut self, store: &dyn BoardStore) {
        let payload = match store.load(&self.board_id) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                self.notices.info("Nothing to load yet");
                return;
            }
            Err(e) => {
                log::error!("load failed: {e}");
                self.notices.error("Could not load the board");
                return;
            }
        };
        let bytes = match std::str::from_utf8(&payload)
            .map_err(|e| e.to_string())
            .and_then(|url| storage::from_data_url(url).map_err(|e| e.to_string()))
        {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("stored board payload is malformed: {e}");
                self.notices.error("Could not load the board");
                return;
            }
        };
        if let Err(e) = self.history.replace_with(&bytes, &self.viewport) {
            log::error!("loaded board is undecodable: {e}");
            self.notices.error("Could not load the board");
        }
    }
}
