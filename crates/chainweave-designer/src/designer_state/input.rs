//! Pointer, wheel and cancel handling.

use glam::DVec2;
use tracing::debug;

use chainweave_core::{AppEvent, SelectionEvent, ViewEvent};

use super::{DesignerState, Gesture, Tool};
use crate::frame_scheduler::{FrameBatch, FrameWork};
use crate::lattice::CellKey;
use crate::selection::SelectionShape;

impl DesignerState {
    /// Cell under a screen position, `None` before the viewport is laid out.
    pub fn cell_at(&self, screen: DVec2) -> Option<CellKey> {
        self.viewport
            .is_ready()
            .then(|| self.viewport.screen_to_cell(screen, &self.lattice))
    }

    /// Starts a gesture for the active tool. While an overlay pick is pending
    /// the pointer always drags its rectangular scope.
    pub fn pointer_down(&mut self, screen: DVec2) {
        if !self.viewport.is_ready() || !screen.is_finite() {
            debug!("Ignoring pointer down before layout");
            return;
        }
        if self.gesture.is_some() {
            // A second press restarts the drag; a pending overlay pick stays armed.
            self.abandon_drag();
        }
        if self.overlay_pick.is_some() {
            self.begin_selection(SelectionShape::Rectangle, screen);
            return;
        }
        let key = self.viewport.screen_to_cell(screen, &self.lattice);
        self.gesture = match self.tool {
            Tool::Paint => {
                self.paint_cell(key);
                Some(Gesture::Paint { last: key })
            }
            Tool::Erase => {
                self.erase_cell(key);
                Some(Gesture::Erase { last: key })
            }
            Tool::SelectRect => {
                self.begin_selection(SelectionShape::Rectangle, screen);
                return;
            }
            Tool::SelectCircle => {
                self.begin_selection(SelectionShape::Circle, screen);
                return;
            }
            Tool::Pan => Some(Gesture::Pan {
                last_screen: screen,
            }),
        };
    }

    /// Continues the active gesture. Painting and erasing touch each cell the
    /// pointer enters once; selection endpoints move and the live set is
    /// recomputed on the next frame.
    pub fn pointer_move(&mut self, screen: DVec2) {
        if !self.viewport.is_ready() || !screen.is_finite() {
            return;
        }
        let Some(gesture) = self.gesture else {
            return;
        };
        match gesture {
            Gesture::Paint { last } => {
                let key = self.viewport.screen_to_cell(screen, &self.lattice);
                if key != last {
                    self.paint_cell(key);
                    self.gesture = Some(Gesture::Paint { last: key });
                }
            }
            Gesture::Erase { last } => {
                let key = self.viewport.screen_to_cell(screen, &self.lattice);
                if key != last {
                    self.erase_cell(key);
                    self.gesture = Some(Gesture::Erase { last: key });
                }
            }
            Gesture::Pan { last_screen } => {
                self.viewport.pan_by_screen(last_screen, screen);
                self.gesture = Some(Gesture::Pan {
                    last_screen: screen,
                });
                let pan = self.viewport.view().pan();
                self.emit(AppEvent::View(ViewEvent::Panned {
                    pan_x: pan.x,
                    pan_y: pan.y,
                }));
                self.request(FrameWork::Redraw);
            }
            Gesture::Select => {
                let logical = self.viewport.screen_to_logical(screen);
                if self.selection.update(screen, logical) {
                    self.request(FrameWork::SelectionRecompute);
                }
            }
        }
    }

    /// Ends the active gesture. A finished selection becomes the last
    /// selection, or the scope of a pending overlay pick.
    pub fn pointer_up(&mut self, screen: DVec2) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        match gesture {
            Gesture::Select => {
                if self.viewport.is_ready() && screen.is_finite() {
                    let logical = self.viewport.screen_to_logical(screen);
                    self.selection.update(screen, logical);
                }
                if self.selection.finish(&self.lattice).is_none() {
                    return;
                }
                let cells = self.selection.last_selection().len();
                match self.overlay_pick.take() {
                    Some(pending) => {
                        if let Err(e) = self.apply_overlay_image(
                            &pending.image,
                            pending.params,
                            super::OverlayScope::Selection,
                        ) {
                            tracing::warn!("Overlay pick failed: {}", e);
                        }
                    }
                    None => self.emit(AppEvent::Selection(SelectionEvent::Finished { cells })),
                }
                self.request(FrameWork::Redraw);
            }
            Gesture::Paint { .. } | Gesture::Erase { .. } => self.maybe_rebase_origin(),
            Gesture::Pan { .. } => {}
        }
    }

    /// Aborts a selection drag or a pending overlay pick. Rings and camera are
    /// left as they are.
    ///
    /// # Returns
    ///
    /// `true` if anything was discarded.
    pub fn cancel(&mut self) -> bool {
        let had_gesture = self.gesture.is_some();
        let dragged = self.selection.cancel();
        self.gesture = None;
        let picked = self.overlay_pick.take().is_some();
        let cancelled = dragged || picked;
        if cancelled {
            debug!("Cancelled (drag: {}, overlay pick: {})", dragged, picked);
            self.emit(AppEvent::Selection(SelectionEvent::Cancelled));
            self.request(FrameWork::Redraw);
        }
        cancelled || had_gesture
    }

    /// Drops the in-flight gesture only.
    fn abandon_drag(&mut self) {
        self.gesture = None;
        if self.selection.cancel() {
            self.emit(AppEvent::Selection(SelectionEvent::Cancelled));
            self.request(FrameWork::Redraw);
        }
    }

    /// Zooms one step around the cursor. Negative `delta_y` zooms in.
    pub fn wheel(&mut self, screen: DVec2, delta_y: f64) {
        if !self.viewport.is_ready() || !screen.is_finite() || delta_y == 0.0 || delta_y.is_nan() {
            return;
        }
        let zoom = self.viewport.zoom();
        let target = if delta_y < 0.0 {
            zoom * self.options.zoom_step
        } else {
            zoom / self.options.zoom_step
        };
        self.viewport.zoom_at(screen, target);
        self.emit(AppEvent::View(ViewEvent::Zoomed {
            zoom: self.viewport.zoom(),
        }));
        self.request(FrameWork::Redraw);
    }

    /// Runs the work flagged since the previous frame. Call once per
    /// animation frame; the returned batch tells the host what to redraw.
    pub fn on_animation_frame(&mut self) -> FrameBatch {
        let batch = self.scheduler.take_pending();
        if batch.selection {
            let cells = self.selection.recompute_live(&self.lattice).len();
            debug!("Live selection: {} cells", cells);
        }
        batch
    }

    fn begin_selection(&mut self, shape: SelectionShape, screen: DVec2) {
        let logical = self.viewport.screen_to_logical(screen);
        self.selection.begin(shape, screen, logical);
        self.gesture = Some(Gesture::Select);
        self.request(FrameWork::SelectionRecompute);
    }
}
