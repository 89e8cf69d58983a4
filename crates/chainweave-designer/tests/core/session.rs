use std::sync::Arc;

use chainweave_core::{AppEvent, EventBus, EventCategory, EventFilter, RingEvent, SelectionEvent};
use chainweave_designer::{CellKey, DesignerState, HexColor, SessionOptions, Tool};
use glam::DVec2;
use parking_lot::Mutex;

fn recorded(state: &DesignerState, categories: Vec<EventCategory>) -> Arc<Mutex<Vec<AppEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    state
        .bus()
        .subscribe(EventFilter::only(categories), move |e| sink.lock().push(e.clone()));
    events
}

fn laid_out() -> DesignerState {
    let mut state = DesignerState::new();
    state.set_viewport_size(1200.0, 800.0);
    state
}

#[test]
fn test_click_paints_cell_under_cursor() {
    let mut state = laid_out();
    state.set_active_color(HexColor::new(255, 0, 0));
    let target = CellKey::new(2, 3);
    let screen = state
        .viewport()
        .logical_to_screen(state.lattice().cell_to_logical(target));
    state.pointer_down(screen);
    state.pointer_up(screen);
    assert_eq!(
        state.rings().get(target).map(|r| r.color),
        Some(HexColor::new(255, 0, 0))
    );
    assert!(state.is_modified);
}

#[test]
fn test_selection_drag_then_bulk_paint() {
    let mut state = laid_out();
    let events = recorded(&state, vec![EventCategory::Selection, EventCategory::Rings]);
    let a = state
        .viewport()
        .logical_to_screen(DVec2::new(-1.0, -1.0));
    let b = state
        .viewport()
        .logical_to_screen(DVec2::new(9.0, 7.5));

    state.set_tool(Tool::SelectRect);
    state.pointer_down(a);
    state.pointer_move(b);
    state.on_animation_frame();
    assert_eq!(state.selection().live_keys().len(), 3);
    state.pointer_up(b);

    state.set_active_color(HexColor::new(0, 255, 0));
    let summary = state.paint_selection();
    assert_eq!(summary.created, 3);
    assert!(state.rings().contains(CellKey::new(1, 0)));

    let events = events.lock();
    assert!(events.contains(&AppEvent::Selection(SelectionEvent::Finished { cells: 3 })));
    assert!(events.contains(&AppEvent::Rings(RingEvent::Changed {
        created: 3,
        recolored: 0,
        erased: 0,
        total: 3
    })));
}

#[test]
fn test_cancel_during_drag_changes_nothing() {
    let mut state = laid_out();
    state.paint_cell(CellKey::new(0, 0));
    let rings = state.rings().clone();
    let view = *state.viewport().view();

    state.set_tool(Tool::SelectCircle);
    state.pointer_down(DVec2::new(600.0, 400.0));
    state.pointer_move(DVec2::new(900.0, 400.0));
    assert!(state.cancel());
    state.pointer_up(DVec2::new(900.0, 400.0));

    assert_eq!(state.rings(), &rings);
    assert_eq!(state.viewport().view(), &view);
    assert!(state.selection().last_selection().is_empty());
}

#[test]
fn test_far_painting_rebases_origin_without_moving_rings() {
    let mut state = laid_out();
    let far = CellKey::new(0, 500);
    state.paint_cell(far);
    let before = state
        .viewport()
        .logical_to_screen(state.lattice().cell_to_logical(far));
    let screen = state.viewport().logical_to_screen(DVec2::ZERO);
    state.set_tool(Tool::Erase);
    state.pointer_down(screen);
    state.pointer_up(screen);

    assert!(state.viewport().view().origin().x > 1000.0);
    let after = state
        .viewport()
        .logical_to_screen(state.lattice().cell_to_logical(far));
    assert!(before.distance(after) < 1e-6);
}

#[test]
fn test_frame_content_shows_all_rings() {
    let mut state = laid_out();
    for col in 0..40 {
        state.paint_cell(CellKey::new(col / 4, col * 3));
    }
    state.frame_content();
    for (key, _) in state.rings().iter() {
        let s = state
            .viewport()
            .logical_to_screen(state.lattice().cell_to_logical(*key));
        assert!(s.x >= 0.0 && s.x <= 1200.0);
        assert!(s.y >= 0.0 && s.y <= 800.0);
    }
}

#[test]
fn test_options_flow_into_session() {
    let options = SessionOptions {
        max_zoom: 4.0,
        selection_margin: 1,
        pack_size: 10,
        ..SessionOptions::default()
    };
    let mut state = DesignerState::with_options(options, Arc::new(EventBus::new()));
    state.set_viewport_size(800.0, 600.0);
    for _ in 0..20 {
        state.wheel(DVec2::new(400.0, 300.0), -1.0);
    }
    assert_eq!(state.viewport().zoom(), 4.0);
    assert_eq!(state.selection().margin(), 1);

    let keys: Vec<CellKey> = (0..11).map(|c| CellKey::new(0, c)).collect();
    for key in keys {
        state.paint_cell(key);
    }
    let bom = state.bom();
    assert_eq!(bom.pack_size, 10);
    assert_eq!(bom.total_packs, 2);
}

#[test]
fn test_unknown_tool_index_falls_back_to_paint() {
    let mut state = DesignerState::new();
    state.set_mode(2);
    assert_eq!(state.tool(), Tool::SelectRect);
    state.set_mode(99);
    assert_eq!(state.tool(), Tool::Paint);
}
