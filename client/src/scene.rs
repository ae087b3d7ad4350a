use inkroom_shared::wire::{decode_envelope, WireError};
use inkroom_shared::Shape;

/// Ordered, append-only store of committed shapes for one room session.
/// Insertion order doubles as paint order; there is no deletion and no id,
/// so a re-delivered frame would simply append again.
#[derive(Default)]
pub struct Scene {
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Installs bootstrap history. Called once, before live frames attach.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    pub fn append(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn snapshot(&self) -> &[Shape] {
        &self.shapes
    }
}

/// Inbound commit point: decode before touching the scene, so a malformed
/// envelope never partially mutates it.
pub fn apply_envelope(scene: &mut Scene, raw: &str) -> Result<(), WireError> {
    let shape = decode_envelope(raw)?;
    scene.append(shape);
    Ok(())
}
