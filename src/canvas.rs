// Drawing surfaces the interpreter writes to.
//
// World coordinates have their origin at the canvas centre with y
// pointing up; headings are degrees counter-clockwise from +x.

use geo::{Coordinate, Line};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_antialiased_line_segment_mut, draw_filled_circle_mut};
use imageproc::pixelops;

use crate::error::TreeError;
use crate::turtle::advance;

pub type Point2D = Coordinate<f64>;

// Primitive drawing operations, applied in the order they are issued.
pub trait Canvas {
    type Cursor;

    fn create_cursor(self : &mut Self, position : Point2D, heading : f64) -> Self::Cursor;

    fn set_heading(self : &mut Self, cursor : &mut Self::Cursor, heading : f64);

    // Pen down: draws a visible segment.
    fn forward(self : &mut Self, cursor : &mut Self::Cursor, distance : f64);

    // Pen up: moves without drawing.
    fn relocate(self : &mut Self, cursor : &mut Self::Cursor, position : Point2D, heading : f64);

    fn set_pen_width(self : &mut Self, cursor : &mut Self::Cursor, width : f64);

    fn set_pen_color(self : &mut Self, cursor : &mut Self::Cursor, intensity : f64);

    fn present(self : &mut Self) -> Result<(), TreeError>;
}

// Cursor handle shared by the canvases in this module.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub position : Point2D,
    pub heading : f64,
    pub width : f64,
    pub intensity : f64
}

impl Pen {
    fn init(position : Point2D, heading : f64) -> Pen {
        Pen { position, heading, width : 1.0, intensity : 0.0 }
    }
}

fn grey(intensity : f64) -> Rgb<u8> {
    let val = (255.0 * intensity.max(0.0).min(1.0)).round() as u8;
    Rgb([val, val, val])
}

// Raster canvas backed by an RGB image.
pub struct ImageCanvas {
    image : RgbImage,
    frames : usize
}

impl ImageCanvas {
    pub fn init(width : u32, height : u32, background : Rgb<u8>) -> ImageCanvas {
        ImageCanvas {
            image : RgbImage::from_pixel(width, height, background),
            frames : 0
        }
    }

    // Placement offset given as a fraction of the half-extent on each axis.
    pub fn place(self : &Self, offset : (f64, f64)) -> Point2D {
        Point2D {
            x : offset.0 * f64::from(self.image.width()) / 2.0,
            y : offset.1 * f64::from(self.image.height()) / 2.0
        }
    }

    pub fn image(self : &Self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    // Number of times the canvas has been presented.
    pub fn frames(self : &Self) -> usize {
        self.frames
    }

    fn pixel(self : &Self, point : &Point2D) -> (i32, i32) {
        let x = (point.x.round() as i32) + (self.image.width() as i32 / 2);
        let y = (self.image.height() as i32 / 2) - (point.y.round() as i32);
        (x, y)
    }

    fn stroke(self : &mut Self, from : &Point2D, to : &Point2D, width : f64, color : Rgb<u8>) {
        let start = self.pixel(from);
        let end = self.pixel(to);
        let radius = width / 2.0;
        if radius < 1.0 {
            draw_antialiased_line_segment_mut(
                &mut self.image,
                start,
                end,
                color,
                pixelops::interpolate
            );
            return;
        }
        // Stamp discs along the segment, spaced so consecutive discs overlap.
        let dx = f64::from(end.0 - start.0);
        let dy = f64::from(end.1 - start.1);
        let spacing = (radius / 2.0).max(0.5);
        let steps = ((dx * dx + dy * dy).sqrt() / spacing).ceil().max(1.0) as i32;
        let r = radius.round() as i32;
        for i in 0..=steps {
            let t = f64::from(i) / f64::from(steps);
            let centre = (
                start.0 + (t * dx).round() as i32,
                start.1 + (t * dy).round() as i32
            );
            draw_filled_circle_mut(&mut self.image, centre, r, color);
        }
    }
}

impl Canvas for ImageCanvas {
    type Cursor = Pen;

    fn create_cursor(self : &mut Self, position : Point2D, heading : f64) -> Pen {
        Pen::init(position, heading)
    }

    fn set_heading(self : &mut Self, cursor : &mut Pen, heading : f64) {
        cursor.heading = heading;
    }

    fn forward(self : &mut Self, cursor : &mut Pen, distance : f64) {
        let end = advance(cursor.position, cursor.heading, distance);
        self.stroke(&cursor.position, &end, cursor.width, grey(cursor.intensity));
        cursor.position = end;
    }

    fn relocate(self : &mut Self, cursor : &mut Pen, position : Point2D, heading : f64) {
        cursor.position = position;
        cursor.heading = heading;
    }

    fn set_pen_width(self : &mut Self, cursor : &mut Pen, width : f64) {
        cursor.width = width;
    }

    fn set_pen_color(self : &mut Self, cursor : &mut Pen, intensity : f64) {
        cursor.intensity = intensity;
    }

    fn present(self : &mut Self) -> Result<(), TreeError> {
        self.frames += 1;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    CreateCursor { position : Point2D, heading : f64 },
    SetHeading(f64),
    Segment { line : Line<f64>, width : f64, intensity : f64 },
    Relocate { position : Point2D, heading : f64 },
    SetPenWidth(f64),
    SetPenColor(f64),
    Present,
}

// Canvas that keeps the issued commands instead of rasterising them.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    pub commands : Vec<DrawCommand>
}

impl RecordingCanvas {
    pub fn init() -> RecordingCanvas {
        RecordingCanvas::default()
    }

    pub fn segments(self : &Self) -> impl Iterator<Item = &Line<f64>> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Segment { line, .. } => Some(line),
            _ => None,
        })
    }

    pub fn presented(self : &Self) -> bool {
        self.commands.iter().any(|command| *command == DrawCommand::Present)
    }
}

impl Canvas for RecordingCanvas {
    type Cursor = Pen;

    fn create_cursor(self : &mut Self, position : Point2D, heading : f64) -> Pen {
        self.commands.push(DrawCommand::CreateCursor { position, heading });
        Pen::init(position, heading)
    }

    fn set_heading(self : &mut Self, cursor : &mut Pen, heading : f64) {
        cursor.heading = heading;
        self.commands.push(DrawCommand::SetHeading(heading));
    }

    fn forward(self : &mut Self, cursor : &mut Pen, distance : f64) {
        let end = advance(cursor.position, cursor.heading, distance);
        self.commands.push(DrawCommand::Segment {
            line : Line::new(cursor.position, end),
            width : cursor.width,
            intensity : cursor.intensity
        });
        cursor.position = end;
    }

    fn relocate(self : &mut Self, cursor : &mut Pen, position : Point2D, heading : f64) {
        cursor.position = position;
        cursor.heading = heading;
        self.commands.push(DrawCommand::Relocate { position, heading });
    }

    fn set_pen_width(self : &mut Self, cursor : &mut Pen, width : f64) {
        cursor.width = width;
        self.commands.push(DrawCommand::SetPenWidth(width));
    }

    fn set_pen_color(self : &mut Self, cursor : &mut Pen, intensity : f64) {
        cursor.intensity = intensity;
        self.commands.push(DrawCommand::SetPenColor(intensity));
    }

    fn present(self : &mut Self) -> Result<(), TreeError> {
        self.commands.push(DrawCommand::Present);
        Ok(())
    }
}
