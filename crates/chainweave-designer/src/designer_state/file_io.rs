//! File I/O operations for the editing session.
//! Handles saving and loading projects.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use chainweave_core::{AppEvent, ProjectError, ProjectEvent, RingEvent};

use super::DesignerState;
use crate::frame_scheduler::FrameWork;
use crate::ring_store::RingStore;
use crate::serialization::{LoadedProject, ProjectFile, ProjectMetadata};

impl DesignerState {
    /// Builds the project document for the current session.
    pub fn to_project_file(&self) -> ProjectFile {
        let mut metadata = self.metadata.clone();
        metadata.modified = Utc::now();
        ProjectFile::new(metadata, self.geometry, &self.store, Some(&self.palette))
    }

    /// Save design to file
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = self.to_project_file();
        file.save_to_file(path)?;

        self.metadata = file.metadata;
        self.current_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        info!("Saved {} rings to {}", self.store.len(), path.display());
        self.emit(AppEvent::Project(ProjectEvent::Saved {
            name: self.metadata.name.clone(),
        }));
        Ok(())
    }

    /// Load design from file. A rejected file leaves the session as it was.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match ProjectFile::load_from_file(path) {
            Ok(loaded) => {
                self.install(loaded);
                self.current_file_path = Some(path.to_path_buf());
                Ok(())
            }
            Err(e) => {
                warn!("Rejected project {}: {:#}", path.display(), e);
                self.emit(AppEvent::Project(ProjectEvent::LoadRejected {
                    reason: format!("{:#}", e),
                }));
                Err(e)
            }
        }
    }

    /// Loads a project document from a string.
    pub fn load_json(&mut self, json: &str) -> Result<(), ProjectError> {
        match ProjectFile::load_str(json) {
            Ok(loaded) => {
                self.install(loaded);
                self.current_file_path = None;
                Ok(())
            }
            Err(e) => {
                warn!("Rejected project: {}", e);
                self.emit(AppEvent::Project(ProjectEvent::LoadRejected {
                    reason: e.to_string(),
                }));
                Err(e)
            }
        }
    }

    /// Starts an empty design, keeping palette, calibration and camera.
    pub fn new_design(&mut self) {
        self.cancel();
        self.store = RingStore::new();
        self.geometry = self.options.geometry;
        self.lattice = self.geometry.lattice();
        self.selection.clear_last();
        self.metadata = ProjectMetadata::new("Untitled");
        self.current_file_path = None;
        self.is_modified = false;
        self.viewport.view_mut().recenter(glam::DVec2::ZERO);
        self.emit(AppEvent::Rings(RingEvent::Replaced { total: 0 }));
        self.request(FrameWork::Redraw);
    }

    /// Title for window captions: file stem, or the design name when unsaved,
    /// with a trailing `*` while modified.
    pub fn display_name(&self) -> String {
        let base = self
            .current_file_path
            .as_deref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.metadata.name.clone());
        if self.is_modified {
            format!("{}*", base)
        } else {
            base
        }
    }

    fn install(&mut self, loaded: LoadedProject) {
        self.cancel();
        self.store = loaded.store;
        self.geometry = loaded.geometry;
        self.lattice = self.geometry.lattice();
        if let Some(palette) = loaded.palette {
            self.set_palette(palette);
        }
        self.metadata = loaded.metadata;
        self.selection.clear_last();
        self.is_modified = false;
        info!(
            "Loaded '{}' with {} rings",
            self.metadata.name,
            self.store.len()
        );
        self.emit(AppEvent::Rings(RingEvent::Replaced {
            total: self.store.len(),
        }));
        self.emit(AppEvent::Project(ProjectEvent::Loaded {
            name: self.metadata.name.clone(),
            rings: self.store.len(),
        }));
        self.frame_content();
        self.request(FrameWork::Redraw);
    }
}
