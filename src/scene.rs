// Per-tree parameters and the expand -> filter -> interpret pipeline.
//
// `SceneParameters` holds the means and spreads a caller configures.
// Each tree samples its own `TreeParameters` from them, so repeated
// trees come out slightly different.

use std::fs;
use std::path::Path;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Point2D};
use crate::error::TreeError;
use crate::grammar::{Axiom, ProductionRules, MAX_ITERATIONS};
use crate::stochastic::{StochasticFilter, DEFAULT_DROP_PROBABILITY};
use crate::turtle::{DrawParameters, Interpreter, RenderReport};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParameters {
    pub iterations : u32,
    pub length_mean : f64,
    // Defaults to a tenth of the mean.
    pub length_spread : Option<f64>,
    pub angle_mean : f64,
    pub angle_spread : f64,
    // Defaults to 15x the length mean.
    pub pen_width_mean : Option<f64>,
    pub pen_width_spread : f64,
    // Defaults to 1 - |offset.y|, so trees further down are darker.
    pub color_mean : Option<f64>,
    pub color_spread : f64,
    pub offset : (f64, f64),
    pub drop_probability : f64,
    pub seed : Option<u64>
}

impl Default for SceneParameters {
    fn default() -> Self {
        SceneParameters {
            iterations : 8,
            length_mean : 1.0,
            length_spread : None,
            angle_mean : 15.0,
            angle_spread : 1.0,
            pen_width_mean : None,
            pen_width_spread : 0.1,
            color_mean : None,
            color_spread : 0.0,
            offset : (0.0, -0.8),
            drop_probability : DEFAULT_DROP_PROBABILITY,
            seed : None
        }
    }
}

// Concrete values for one tree, already checked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeParameters {
    pub iterations : u32,
    pub draw : DrawParameters,
    pub drop_probability : f64
}

fn sample_normal<R : Rng>(
    rng : &mut R,
    mean : f64,
    spread : f64,
    name : &str
) -> Result<f64, TreeError> {
    if spread == 0.0 {
        return Ok(mean);
    }
    let normal = Normal::new(mean, spread)
        .map_err(|e| TreeError::InvalidConfig(format!("{} distribution: {}", name, e)))?;
    Ok(normal.sample(rng))
}

impl SceneParameters {
    pub fn from_json_file(path : impl AsRef<Path>) -> Result<SceneParameters, TreeError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    // Draw one tree's values. Fails before anything is drawn if the
    // sampled step length or pen width is unusable.
    pub fn sample<R : Rng>(self : &Self, rng : &mut R) -> Result<TreeParameters, TreeError> {
        if self.iterations > MAX_ITERATIONS {
            return Err(TreeError::InvalidConfig(format!(
                "{} iterations exceeds the limit of {}",
                self.iterations, MAX_ITERATIONS
            )));
        }
        StochasticFilter::init(self.drop_probability)?;

        let length_spread = self.length_spread.unwrap_or(self.length_mean.abs() / 10.0);
        let step_length = sample_normal(rng, self.length_mean, length_spread, "length")?;
        let angle = sample_normal(rng, self.angle_mean, self.angle_spread, "angle")?;
        let pen_mean = self.pen_width_mean.unwrap_or(15.0 * self.length_mean);
        let pen_width = sample_normal(rng, pen_mean, self.pen_width_spread, "pen width")?;
        let color_mean = self.color_mean.unwrap_or(1.0 - self.offset.1.abs());
        let color = sample_normal(rng, color_mean, self.color_spread, "color")?
            .max(0.0)
            .min(1.0);

        let draw = DrawParameters { step_length, angle, pen_width, color };
        draw.check()?;
        Ok(TreeParameters {
            iterations : self.iterations,
            draw,
            drop_probability : self.drop_probability
        })
    }
}

// Expand, filter and draw one tree, then present the canvas.
pub fn draw_tree<C : Canvas, R : Rng>(
    canvas : &mut C,
    rng : &mut R,
    axiom : &Axiom,
    rules : &ProductionRules,
    params : &TreeParameters,
    origin : Point2D
) -> Result<RenderReport, TreeError> {
    params.draw.check()?;
    let filter = StochasticFilter::init(params.drop_probability)?;

    let expanded = rules.expand(axiom, params.iterations);
    let filtered = filter.apply(&expanded, rng);
    let report = Interpreter::init(params.draw, origin).render(&filtered, canvas)?;
    canvas.present()?;

    tracing::info!(
        symbols = report.symbols,
        segments = report.segments,
        max_depth = report.max_depth,
        "tree drawn"
    );
    Ok(report)
}

// The plant grammar grown from a single `X`. `origin` is where the
// scene's placement offset lands on the caller's canvas.
pub fn plant_tree<C : Canvas, R : Rng>(
    canvas : &mut C,
    rng : &mut R,
    scene : &SceneParameters,
    origin : Point2D
) -> Result<RenderReport, TreeError> {
    let params = scene.sample(rng)?;
    tracing::debug!(?params, "sampled tree parameters");
    draw_tree(canvas, rng, &Axiom::from("X"), &ProductionRules::plant(), &params, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn defaults_follow_the_length_mean() {
        let scene = SceneParameters {
            angle_spread : 0.0,
            pen_width_spread : 0.0,
            length_spread : Some(0.0),
            ..SceneParameters::default()
        };
        let params = scene.sample(&mut rng()).unwrap();
        assert_eq!(params.draw.step_length, 1.0);
        assert_eq!(params.draw.angle, 15.0);
        assert_eq!(params.draw.pen_width, 15.0);
        assert!((params.draw.color - 0.2).abs() < 1e-9);
        assert_eq!(params.iterations, 8);
    }

    #[test]
    fn sampling_stays_near_the_mean() {
        let scene = SceneParameters::default();
        let mut rng = rng();
        for _ in 0..50 {
            let params = scene.sample(&mut rng).unwrap();
            assert!((params.draw.step_length - 1.0).abs() < 0.6);
            assert!((params.draw.angle - 15.0).abs() < 6.0);
        }
    }

    #[test]
    fn non_positive_length_is_rejected() {
        let scene = SceneParameters {
            length_mean : -1.0,
            length_spread : Some(0.0),
            pen_width_mean : Some(5.0),
            ..SceneParameters::default()
        };
        match scene.sample(&mut rng()) {
            Err(TreeError::InvalidConfig(_)) => {}
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn non_positive_pen_width_is_rejected() {
        for mean in &[0.0, -2.0] {
            let scene = SceneParameters {
                pen_width_mean : Some(*mean),
                pen_width_spread : 0.0,
                ..SceneParameters::default()
            };
            match scene.sample(&mut rng()) {
                Err(TreeError::InvalidConfig(_)) => {}
                other => panic!("expected invalid config, got {:?}", other),
            }
        }
    }

    #[test]
    fn pen_too_wide_to_decay_is_rejected() {
        let scene = SceneParameters {
            pen_width_mean : Some(3000.0),
            pen_width_spread : 0.0,
            ..SceneParameters::default()
        };
        assert!(scene.sample(&mut rng()).is_err());
        let scene = SceneParameters { pen_width_mean : Some(2900.0), ..scene };
        assert!(scene.sample(&mut rng()).is_ok());
    }

    #[test]
    fn too_many_iterations_is_rejected() {
        let scene = SceneParameters {
            iterations : MAX_ITERATIONS + 1,
            ..SceneParameters::default()
        };
        assert!(scene.sample(&mut rng()).is_err());
    }

    #[test]
    fn invalid_parameters_draw_nothing() {
        let mut canvas = RecordingCanvas::init();
        let params = TreeParameters {
            iterations : 2,
            draw : DrawParameters { step_length : 0.0, angle : 15.0, pen_width : 1.0, color : 0.5 },
            drop_probability : 0.5
        };
        let origin = Point2D { x : 0.0, y : 0.0 };
        let rules = ProductionRules::plant();
        let result = draw_tree(&mut canvas, &mut rng(), &Axiom::from("X"), &rules, &params, origin);
        assert!(result.is_err());
        assert!(canvas.commands.is_empty());

        let wide = TreeParameters {
            draw : DrawParameters { step_length : 1.0, pen_width : 4000.0, ..params.draw },
            ..params
        };
        let result = draw_tree(&mut canvas, &mut rng(), &Axiom::from("X"), &rules, &wide, origin);
        assert!(result.is_err());
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn config_parses_partial_json() {
        let json = r#"{"iterations": 4, "seed": 9}"#;
        let scene : SceneParameters = serde_json::from_str(json).unwrap();
        assert_eq!(scene.iterations, 4);
        assert_eq!(scene.seed, Some(9));
        assert_eq!(scene.angle_mean, 15.0);
    }

    #[test]
    fn negative_iterations_fail_to_parse() {
        let result : Result<SceneParameters, _> = serde_json::from_str(r#"{"iterations": -1}"#);
        assert!(result.is_err());
    }
}
