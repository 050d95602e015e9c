//! The drawing capability the swarm renders onto.
//!
//! [`Surface`] is the minimal path-based 2D contract the particles need: a
//! shape is opened with [`Surface::begin_shape`], built from arcs and line
//! segments, and finished with [`Surface::fill`] or [`Surface::stroke`].
//!
//! [`RecordingSurface`] implements the contract by recording
//! [`DrawCommand`]s since the last clear. Hosts replay that display list with
//! their own painter; tests inspect it directly.

/// Dimensions of a drawing surface in surface units (pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }
}

/// Opaque 2D drawing capability consumed by particles and the swarm.
pub trait Surface {
    /// Current drawable area.
    fn size(&self) -> SurfaceSize;

    fn clear(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Starts a new shape, discarding any unfinished path.
    fn begin_shape(&mut self);

    /// Adds an arc around `(cx, cy)` from `start_angle` to `end_angle`
    /// (radians) to the current shape.
    fn arc(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    );

    fn fill(&mut self);

    fn stroke(&mut self);

    fn move_to(&mut self, x: f32, y: f32);

    fn line_to(&mut self, x: f32, y: f32);
}

/// A single recorded call on a [`RecordingSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Clear {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    BeginShape,
    Arc {
        cx: f32,
        cy: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    },
    Fill,
    Stroke,
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
}

/// A [`Surface`] that keeps the display list of the current frame.
///
/// Clearing the full surface drops everything recorded before it, so the
/// list always describes what is visible right now.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            commands: Vec::with_capacity(256),
        }
    }

    /// Changes the drawable area, e.g. after the host window was resized.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = SurfaceSize::new(width, height);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of finished shapes (fills plus strokes) in the display list.
    pub fn shape_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill | DrawCommand::Stroke))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let covers_all =
            x <= 0.0 && y <= 0.0 && x + width >= self.size.width && y + height >= self.size.height;
        if covers_all {
            self.commands.clear();
        }
        self.commands.push(DrawCommand::Clear {
            x,
            y,
            width,
            height,
        });
    }

    fn begin_shape(&mut self) {
        self.commands.push(DrawCommand::BeginShape);
    }

    fn arc(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    ) {
        self.commands.push(DrawCommand::Arc {
            cx,
            cy,
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }
}
