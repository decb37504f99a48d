// Procedural trees from an L-system grammar.
//
// A single nonterminal is rewritten for a number of generations, turn
// symbols are randomly thinned out, and the result is walked by a turtle
// that draws onto a canvas.

pub mod canvas;
pub mod error;
pub mod grammar;
pub mod scene;
pub mod stochastic;
pub mod turtle;

pub use canvas::{Canvas, DrawCommand, ImageCanvas, Pen, Point2D, RecordingCanvas};
pub use error::TreeError;
pub use grammar::{Axiom, ProductionRules, MAX_ITERATIONS};
pub use scene::{draw_tree, plant_tree, SceneParameters, TreeParameters};
pub use stochastic::StochasticFilter;
pub use turtle::{CursorState, DrawParameters, Interpreter, RenderReport};
