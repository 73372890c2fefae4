//! Journal template for the external meshing tool.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::validate::Seed;

use super::MeshRequest;

/// Names of the four corner nodesets, in nodeset-id order
pub const CORNER_NODESETS: [&str; 4] = ["bottom_left", "bottom_right", "top_right", "top_left"];

/// Name of the single element block in the exported deck
pub const ELEMENT_BLOCK: &str = "ELEMENTS";

/// Element type written into the block definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElementType {
    #[default]
    Quad,
    Quad4,
    Quad8,
    Quad9,
}

impl ElementType {
    pub fn keyword(self) -> &'static str {
        match self {
            ElementType::Quad => "QUAD",
            ElementType::Quad4 => "QUAD4",
            ElementType::Quad8 => "QUAD8",
            ElementType::Quad9 => "QUAD9",
        }
    }
}

/// Vertex ids of the base geometry's corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerVertices {
    pub bottom_left: u32,
    pub bottom_right: u32,
    pub top_right: u32,
    pub top_left: u32,
}

impl Default for CornerVertices {
    fn default() -> Self {
        Self {
            bottom_left: 1,
            bottom_right: 2,
            top_right: 3,
            top_left: 4,
        }
    }
}

impl CornerVertices {
    /// `(nodeset name, vertex id)` in nodeset-id order
    pub fn named(&self) -> [(&'static str, u32); 4] {
        [
            (CORNER_NODESETS[0], self.bottom_left),
            (CORNER_NODESETS[1], self.bottom_right),
            (CORNER_NODESETS[2], self.top_right),
            (CORNER_NODESETS[3], self.top_left),
        ]
    }
}

/// Mesh generation journal for one surface of a fixed base geometry.
///
/// The only free input is the seed; everything else is fixed per template so
/// that equal seeds render byte-identical journals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshTemplate {
    /// Pre-existing partition file opened before meshing
    pub base_geometry: PathBuf,
    /// Surface that gets sized, meshed and blocked
    pub surface: u32,
    pub corners: CornerVertices,
    pub block_id: u32,
    pub element_type: ElementType,
}

impl Default for MeshTemplate {
    fn default() -> Self {
        Self {
            base_geometry: PathBuf::from("base.cub"),
            surface: 1,
            corners: CornerVertices::default(),
            block_id: 1,
            element_type: ElementType::Quad,
        }
    }
}

impl MeshTemplate {
    /// Render the journal that meshes the surface at `seed` and exports
    /// block `block_id` as a 2-D deck to `export_path`, overwriting it.
    pub fn render(&self, seed: Seed, export_path: &Path) -> String {
        let mut journal = String::new();
        let surface = self.surface;
        let block = self.block_id;

        // Writing to a String cannot fail
        let _ = writeln!(journal, "open \"{}\"", self.base_geometry.display());
        let _ = writeln!(journal, "surface {surface} size {seed}");
        let _ = writeln!(journal, "mesh surface {surface}");
        let _ = writeln!(journal, "set duplicate block elements off");
        for (id, (name, vertex)) in (1..).zip(self.corners.named()) {
            let _ = writeln!(journal, "nodeset {id} add vertex {vertex}");
            let _ = writeln!(journal, "nodeset {id} name \"{name}\"");
        }
        let _ = writeln!(journal, "block {block} add surface {surface}");
        let _ = writeln!(journal, "block {block} name \"{ELEMENT_BLOCK}\"");
        let _ = writeln!(
            journal,
            "block {block} element type {}",
            self.element_type.keyword()
        );
        let _ = writeln!(
            journal,
            "export mesh \"{}\" dimension 2 block {block} partial overwrite",
            export_path.display()
        );
        journal
    }

    /// Bundle the rendered journal into a build request
    pub fn request(&self, label: impl Into<String>, seed: Seed, export_path: PathBuf) -> MeshRequest {
        MeshRequest {
            label: label.into(),
            seed,
            journal: self.render(seed, &export_path),
            export_path,
        }
    }
}
