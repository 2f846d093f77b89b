use super::Instruction;

/// Abstract drawing surface driven by the interpreter.
///
/// Mirrors the 2D canvas subset the turtle needs. `save`/`restore` are
/// issued at branch boundaries; surfaces without style state of their own
/// can keep the default empty bodies.
pub trait Surface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
    fn set_width(&mut self, width: f64);
    fn save(&mut self) {}
    fn restore(&mut self) {}
}

/// Discards everything. Advances an interpreter without producing output.
#[derive(Debug, Default, Clone, Copy)]
pub struct VoidSurface;

impl Surface for VoidSurface {
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _x: f64, _y: f64) {}
    fn line_to(&mut self, _x: f64, _y: f64) {}
    fn stroke(&mut self) {}
    fn set_width(&mut self, _width: f64) {}
}

/// Records the bounding box of all path endpoints, drawing nothing.
///
/// Used for dry runs to size or center the real drawing before making it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BoundsSurface {
    bounds: Option<(f64, f64, f64, f64)>,
}

impl BoundsSurface {
    fn extend(&mut self, x: f64, y: f64) {
        let (min_x, min_y, max_x, max_y) = self.bounds.unwrap_or((x, y, x, y));
        self.bounds = Some((min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)));
    }

    /// `(min_x, min_y, max_x, max_y)` over everything drawn so far.
    pub fn rect(&self) -> Option<(f64, f64, f64, f64)> {
        self.bounds
    }
}

impl Surface for BoundsSurface {
    fn begin_path(&mut self) {}

    fn move_to(&mut self, x: f64, y: f64) {
        self.extend(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.extend(x, y);
    }

    fn stroke(&mut self) {}
    fn set_width(&mut self, _width: f64) {}
}

/// Captures the instruction stream emitted by the interpreter.
///
/// This is what [`vectorize`](super::vectorize) runs on. Branch save/restore
/// has no opcode: positions in the stream are absolute.
#[derive(Debug, Default)]
pub struct VectorSurface {
    instructions: Vec<Instruction>,
}

impl VectorSurface {
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl Surface for VectorSurface {
    fn begin_path(&mut self) {
        self.instructions.push(Instruction::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.instructions.push(Instruction::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.instructions.push(Instruction::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.instructions.push(Instruction::Stroke);
    }

    fn set_width(&mut self, width: f64) {
        self.instructions.push(Instruction::Width(width));
    }
}
