// Turtle interpretation of a finished axiom.
//
// The cursor walks the symbols left to right. `F` draws, `+`/`-` turn,
// `[` saves the cursor and narrows the pen for the branch, `]` jumps back
// to the saved cursor without drawing. Saved cursors live on an explicit
// stack rather than the call stack, so nesting depth is limited only by
// memory.
//
// After every symbol the pen narrows slightly, so width falls off both
// with branch depth and with distance along a branch.

use crate::canvas::{Canvas, Point2D};
use crate::error::TreeError;
use crate::grammar::{Axiom, BRANCH_CLOSE, BRANCH_OPEN, FORWARD, TURN_LEFT, TURN_RIGHT};

// Pen width multiplier applied on entering a branch.
pub const BRANCH_TAPER : f64 = 0.6;

// Heading pointing up the canvas.
pub const HEADING_UP : f64 = 90.0;

// Point `distance` along `heading` (degrees, counter-clockwise from +x).
pub fn advance(position : Point2D, heading : f64, distance : f64) -> Point2D {
    let rad = heading.to_radians();
    Point2D {
        x : position.x + distance * rad.cos(),
        y : position.y + distance * rad.sin()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorState {
    pub heading : f64,
    pub position : Point2D,
    pub pen_width : f64
}

// How to draw: everything the interpreter needs beyond the symbols.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawParameters {
    pub step_length : f64,
    pub angle : f64,
    pub pen_width : f64,
    pub color : f64
}

impl DrawParameters {
    // Per-symbol width multiplier, proportional to the starting width.
    pub fn decay(self : &Self) -> f64 {
        1.0 - (1e-3 * self.pen_width / 3.0)
    }

    // Step length and pen width must be positive, and the pen must stay
    // positive as it decays, which caps the starting width.
    pub fn check(self : &Self) -> Result<(), TreeError> {
        for (name, value) in &[("step length", self.step_length), ("pen width", self.pen_width)] {
            if !(value.is_finite() && *value > 0.0) {
                return Err(TreeError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.decay() <= 0.0 {
            return Err(TreeError::InvalidConfig(format!(
                "pen width {} would decay to nothing",
                self.pen_width
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub symbols : usize,
    pub segments : usize,
    pub max_depth : usize,
    // Branches still open after the last symbol.
    pub residual_depth : usize
}

impl RenderReport {
    pub fn is_complete(self : &Self) -> bool {
        self.residual_depth == 0
    }
}

pub struct Interpreter {
    params : DrawParameters,
    origin : Point2D,
    state : CursorState,
    stack : Vec<CursorState>
}

impl Interpreter {
    pub fn init(params : DrawParameters, origin : Point2D) -> Interpreter {
        Interpreter {
            params,
            origin,
            state : Interpreter::start(&params, origin),
            stack : Vec::new()
        }
    }

    fn start(params : &DrawParameters, origin : Point2D) -> CursorState {
        CursorState { heading : HEADING_UP, position : origin, pen_width : params.pen_width }
    }

    pub fn state(self : &Self) -> &CursorState {
        &self.state
    }

    pub fn depth(self : &Self) -> usize {
        self.stack.len()
    }

    // Apply one symbol to the cursor, mirroring the effect on the canvas.
    fn step<C : Canvas>(
        self : &mut Self,
        index : usize,
        symbol : char,
        canvas : &mut C,
        cursor : &mut C::Cursor
    ) -> Result<bool, TreeError> {
        let mut drew = false;
        match symbol {
            FORWARD => {
                canvas.forward(cursor, self.params.step_length);
                let step = self.params.step_length;
                self.state.position = advance(self.state.position, self.state.heading, step);
                drew = true;
            }
            TURN_LEFT => {
                self.state.heading += self.params.angle;
                canvas.set_heading(cursor, self.state.heading);
            }
            TURN_RIGHT => {
                self.state.heading -= self.params.angle;
                canvas.set_heading(cursor, self.state.heading);
            }
            BRANCH_OPEN => {
                self.stack.push(self.state);
                self.state.pen_width *= BRANCH_TAPER;
            }
            BRANCH_CLOSE => {
                self.state = self.stack.pop().ok_or(TreeError::MalformedAxiom { index })?;
                canvas.relocate(cursor, self.state.position, self.state.heading);
            }
            _ => {}
        }
        self.state.pen_width *= self.params.decay();
        canvas.set_pen_width(cursor, self.state.pen_width);
        Ok(drew)
    }

    // Draw `axiom` onto `canvas`, starting from a fresh cursor at the
    // origin. Stops at the first unmatched `]`.
    pub fn render<C : Canvas>(
        self : &mut Self,
        axiom : &Axiom,
        canvas : &mut C
    ) -> Result<RenderReport, TreeError> {
        self.state = Interpreter::start(&self.params, self.origin);
        self.stack.clear();

        let mut cursor = canvas.create_cursor(self.state.position, self.state.heading);
        canvas.set_pen_width(&mut cursor, self.state.pen_width);
        canvas.set_pen_color(&mut cursor, self.params.color);

        let mut report = RenderReport::default();
        for (index, symbol) in axiom.symbols().enumerate() {
            if self.step(index, symbol, canvas, &mut cursor)? {
                report.segments += 1;
            }
            report.symbols += 1;
            report.max_depth = report.max_depth.max(self.stack.len());
        }
        report.residual_depth = self.stack.len();
        if !report.is_complete() {
            tracing::warn!(residual = report.residual_depth, "axiom left branches open");
        }
        Ok(report)
    }
}
