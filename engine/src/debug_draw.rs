//! Debug draw requests
//!
//! Fire-and-forget overlay primitives (lines, spheres, boxes, arrows and text)
//! that gameplay code hands to a [`DebugDrawSink`]. Requests carry their own
//! lifetime and color; the sink decides how they reach the screen, e.g. as
//! `ddraw.*` console commands sent to a client.

use cgmath::{Vector3, Vector4};

pub const BLACK: Vector4<f32> = rgba(0.0, 0.0, 0.0, 1.0);
pub const WHITE: Vector4<f32> = rgba(1.0, 1.0, 1.0, 1.0);
pub const GREEN: Vector4<f32> = rgba(0.0, 1.0, 0.0, 1.0);

pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Vector4<f32> {
    Vector4 {
        x: r,
        y: g,
        z: b,
        w: a,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawShape {
    Line {
        from: Vector3<f32>,
        to: Vector3<f32>,
    },
    Sphere {
        center: Vector3<f32>,
        radius: f32,
    },
    Box {
        center: Vector3<f32>,
        size: f32,
    },
    Arrow {
        from: Vector3<f32>,
        to: Vector3<f32>,
        head_size: f32,
    },
    Text {
        position: Vector3<f32>,
        text: String,
    },
}

impl DrawShape {
    /// Console command name understood by clients
    pub fn command_name(&self) -> &'static str {
        match self {
            DrawShape::Line { .. } => "ddraw.line",
            DrawShape::Sphere { .. } => "ddraw.sphere",
            DrawShape::Box { .. } => "ddraw.box",
            DrawShape::Arrow { .. } => "ddraw.arrow",
            DrawShape::Text { .. } => "ddraw.text",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawRequest {
    /// Seconds the primitive stays on screen
    pub duration: f32,
    pub color: Vector4<f32>,
    pub shape: DrawShape,
}

impl DrawRequest {
    pub fn new(duration: f32, color: Vector4<f32>, shape: DrawShape) -> Self {
        Self {
            duration,
            color,
            shape,
        }
    }

    pub fn line(duration: f32, color: Vector4<f32>, from: Vector3<f32>, to: Vector3<f32>) -> Self {
        Self::new(duration, color, DrawShape::Line { from, to })
    }

    pub fn sphere(duration: f32, color: Vector4<f32>, center: Vector3<f32>, radius: f32) -> Self {
        Self::new(duration, color, DrawShape::Sphere { center, radius })
    }

    pub fn cube(duration: f32, color: Vector4<f32>, center: Vector3<f32>, size: f32) -> Self {
        Self::new(duration, color, DrawShape::Box { center, size })
    }

    pub fn arrow(
        duration: f32,
        color: Vector4<f32>,
        from: Vector3<f32>,
        to: Vector3<f32>,
        head_size: f32,
    ) -> Self {
        Self::new(
            duration,
            color,
            DrawShape::Arrow {
                from,
                to,
                head_size,
            },
        )
    }

    pub fn text(
        duration: f32,
        color: Vector4<f32>,
        position: Vector3<f32>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(
            duration,
            color,
            DrawShape::Text {
                position,
                text: text.into(),
            },
        )
    }

    /// Encode as a client console command:
    /// `ddraw.box 10 "0,1,0,1" "32,0,0" 1`
    pub fn console_command(&self) -> String {
        let mut args = vec![
            self.shape.command_name().to_string(),
            format_number(self.duration),
            quoted(&format_color(self.color)),
        ];

        match &self.shape {
            DrawShape::Line { from, to } => {
                args.push(quoted(&format_vector(*from)));
                args.push(quoted(&format_vector(*to)));
            }
            DrawShape::Sphere { center, radius } => {
                args.push(quoted(&format_vector(*center)));
                args.push(format_number(*radius));
            }
            DrawShape::Box { center, size } => {
                args.push(quoted(&format_vector(*center)));
                args.push(format_number(*size));
            }
            DrawShape::Arrow {
                from,
                to,
                head_size,
            } => {
                args.push(quoted(&format_vector(*from)));
                args.push(quoted(&format_vector(*to)));
                args.push(format_number(*head_size));
            }
            DrawShape::Text { position, text } => {
                args.push(quoted(&format_vector(*position)));
                args.push(quoted(text));
            }
        }

        args.join(" ")
    }
}

fn format_number(value: f32) -> String {
    format!("{}", value)
}

fn format_vector(v: Vector3<f32>) -> String {
    format!("{},{},{}", v.x, v.y, v.z)
}

fn format_color(c: Vector4<f32>) -> String {
    format!("{},{},{},{}", c.x, c.y, c.z, c.w)
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Receiver for debug draw requests. Drawing never feeds back into the caller.
pub trait DebugDrawSink {
    fn draw(&mut self, request: DrawRequest);
}

impl<F> DebugDrawSink for F
where
    F: FnMut(DrawRequest),
{
    fn draw(&mut self, request: DrawRequest) {
        self(request)
    }
}

/// Sink that keeps every request in order, for forwarding or inspection.
#[derive(Clone, Debug, Default)]
pub struct DrawRecorder {
    pub requests: Vec<DrawRequest>,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn console_commands(&self) -> Vec<String> {
        self.requests.iter().map(DrawRequest::console_command).collect()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, DrawRequest> {
        self.requests.drain(..)
    }
}

impl DebugDrawSink for DrawRecorder {
    fn draw(&mut self, request: DrawRequest) {
        self.requests.push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_box_console_command() {
        let request = DrawRequest::cube(10.0, GREEN, vec3(32.0, 0.0, 0.5), 1.0);
        assert_eq!(
            request.console_command(),
            "ddraw.box 10 \"0,1,0,1\" \"32,0,0.5\" 1"
        );
    }

    #[test]
    fn test_arrow_console_command() {
        let request = DrawRequest::arrow(
            10.0,
            BLACK,
            vec3(0.0, 1.5, 0.0),
            vec3(100.0, 1.5, 0.0),
            5.0,
        );
        assert_eq!(
            request.console_command(),
            "ddraw.arrow 10 \"0,0,0,1\" \"0,1.5,0\" \"100,1.5,0\" 5"
        );
    }

    #[test]
    fn test_text_is_quoted_and_escaped() {
        let request = DrawRequest::text(2.5, WHITE, vec3(1.0, 2.0, 3.0), "say \"hi\"");
        assert_eq!(
            request.console_command(),
            "ddraw.text 2.5 \"1,1,1,1\" \"1,2,3\" \"say \\\"hi\\\"\""
        );
    }

    #[test]
    fn test_recorder_keeps_order() {
        let mut recorder = DrawRecorder::new();
        recorder.draw(DrawRequest::sphere(1.0, BLACK, vec3(0.0, 0.0, 0.0), 4.0));
        recorder.draw(DrawRequest::line(
            1.0,
            rgba(1.0, 1.0, 1.0, 0.5),
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
        ));

        let commands = recorder.console_commands();
        assert_eq!(commands.len(), 2);
        assert!(commands[0].starts_with("ddraw.sphere"));
        assert!(commands[1].starts_with("ddraw.line 1 \"1,1,1,0.5\""));
    }

    #[test]
    fn test_closure_sink() {
        let mut count = 0;
        {
            let mut sink = |_request: DrawRequest| count += 1;
            sink.draw(DrawRequest::cube(1.0, GREEN, vec3(0.0, 0.0, 0.0), 1.0));
            sink.draw(DrawRequest::cube(1.0, GREEN, vec3(0.0, 0.0, 0.0), 1.0));
        }
        assert_eq!(count, 2);
    }
}
