//! # Chainweave Designer
//!
//! This crate provides the editing core for chainmail (European 4-in-1 style)
//! ring layouts. Rings sit on an offset hexagonal lattice; the crate turns
//! pointer input into lattice edits, keeps colors and cluster ids, and derives
//! the material and assembly outputs a maker needs.
//!
//! ## Core Components
//!
//! ### Layout
//! - **Lattice**: `(row, col)` addressing, centers, nearest-cell lookup
//! - **Ring Store**: Sparse ring collection with monotonically increasing cluster ids
//! - **Connectivity**: Chain-linked components via union-find
//! - **Geometry**: Ring inner/wire diameters, spacing and tilt
//!
//! ### Interaction
//! - **Viewport**: Perspective camera, zoom/pan, floating origin, screen picking
//! - **Selection**: Rectangle and circle drags, throttled to one recompute per frame
//! - **Frame Scheduler**: Coalescing of redraw and selection work
//!
//! ### Color and Output
//! - **Palette**: Lab-space quantization to a fixed color list
//! - **Calibration**: Display color correction held in an explicit context
//! - **Overlay**: Bulk color assignment from raster images
//! - **BOM / Export**: Per-color counts and packs, CSV, printable assembly map
//! - **Serialization**: Versioned JSON project files with legacy migration
//!
//! ## Architecture
//!
//! ```text
//! DesignerState (editing session)
//!   ├── RingStore (HashMap<CellKey, Ring>)
//!   ├── HexLattice (from RingGeometry)
//!   ├── Viewport (PerspectiveCamera + ViewState)
//!   ├── SelectionManager + RedrawScheduler
//!   └── Palette + CalibrationContext ── EventBus
//!
//! Derived views (snapshots): Bom, CSV, RenderFrame, AssemblyMap, Components
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use chainweave_designer::{CellKey, DesignerState, HexColor};
//!
//! let mut state = DesignerState::new();
//! state.set_active_color(HexColor::new(255, 0, 0));
//! state.paint_cell(CellKey::new(0, 0));
//! state.paint_cell(CellKey::new(0, 1));
//!
//! let bom = state.bom();
//! assert_eq!(bom.total_rings, 2);
//! ```

pub mod bom;
pub mod bounds;
pub mod calibration;
pub mod camera;
pub mod color;
pub mod connectivity;
pub mod export;
pub mod font_manager;
pub mod frame_scheduler;
pub mod geometry;
pub mod lattice;
pub mod overlay;
pub mod palette;
pub mod render;
pub mod ring_store;
pub mod selection;
pub mod selection_manager;
pub mod serialization;
pub mod viewport;

// Editing session
pub mod designer_state;

// Re-export all public types from submodules
pub use bom::{build_bom, packs_for, Bom, BomLine, BomMode, BomPage};
pub use bounds::Bounds;
pub use calibration::{CalibrationContext, CalibrationTable};
pub use camera::{CameraSnapshot, PerspectiveCamera, Ray};
pub use color::HexColor;
pub use connectivity::{linked_components, Components, DisjointSet};
pub use export::{
    bom_print_pages, bom_to_csv, build_assembly_map, rings_to_csv, save_assembly_map,
    AssemblyMap, AssemblyMapOptions, AssemblyTile,
};
pub use frame_scheduler::{FrameBatch, FrameWork, RedrawScheduler};
pub use geometry::RingGeometry;
pub use lattice::{CellKey, HexLattice, LatticeSpan};
pub use overlay::{decode_overlay, OverlayParams, OverlayResult, OverlaySampler};
pub use palette::{Palette, PaletteEntry, PaletteMatch};
pub use render::{build_render_list, RenderFrame, RingRenderRecord};
pub use ring_store::{BulkSummary, PlacementOutcome, Ring, RingStore};
pub use selection::{compute_selection_keys, Selection, SelectionShape};
pub use selection_manager::SelectionManager;
pub use serialization::{LoadedProject, ProjectFile, ProjectMetadata, PROJECT_FORMAT_VERSION};
pub use viewport::{ViewState, Viewport};

// State
pub use designer_state::{DesignerState, OverlayScope, SessionOptions, Tool};
