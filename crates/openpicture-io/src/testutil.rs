//! Shared fixtures for codec tests.

use openpicture_core::{
    AffineTransform, AlphaFunction, Color, Command, DrawingMode, FillRule, FontEncoding,
    FontSpacing, Gradient, LineCap, LineJoin, Pattern, PixelData, PixelFormat, Point, Rect, Shape,
    SourceAlpha,
};

/// One command of every kind in the vocabulary.
pub(crate) fn all_commands() -> Vec<Command> {
    let rect = Rect::new(1.0, 2.0, 30.0, 40.0);
    let shape = Shape::new()
        .move_to(Point::new(0.0, 0.0))
        .line_to(vec![Point::new(5.0, 0.0), Point::new(5.0, 5.0)])
        .cubic_to(vec![
            Point::new(6.0, 5.0),
            Point::new(7.0, 6.0),
            Point::new(8.0, 8.0),
        ])
        .arc_to(3.0, 3.0, 0.5, true, false, Point::new(0.0, 8.0))
        .close();
    let gradient = Gradient::linear(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
        .with_stop(Color::opaque(255, 0, 0), 0.0)
        .with_stop(Color::opaque(0, 0, 255), 1.0);
    let bezier = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 2.0),
        Point::new(3.0, 2.0),
        Point::new(4.0, 0.0),
    ];
    let polygon = vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(2.0, 3.0),
    ];

    vec![
        Command::EnterStateChange,
        Command::ExitStateChange,
        Command::EnterFontState,
        Command::ExitFontState,
        Command::PushState,
        Command::PopState,
        Command::SetDrawingMode(DrawingMode::ALPHA),
        Command::SetLineMode {
            cap: LineCap::SQUARE,
            join: LineJoin::MITER,
            miter_limit: 4.0,
        },
        Command::SetPenSize(2.5),
        Command::SetForeColor(Color::new(1, 2, 3, 4)),
        Command::SetBackColor(Color::WHITE),
        Command::SetStipplePattern(Pattern::MIXED),
        Command::SetBlendingMode {
            source_alpha: SourceAlpha::CONSTANT_ALPHA,
            alpha_function: AlphaFunction::ALPHA_COMPOSITE,
        },
        Command::SetFillRule(FillRule::NONZERO),
        Command::SetOrigin(Point::new(-3.0, 7.5)),
        Command::SetScale(1.25),
        Command::SetPenLocation(Point::new(9.0, 9.0)),
        Command::SetTransform(AffineTransform::rotation(0.3)),
        Command::MovePenBy { dx: 1.0, dy: -1.0 },
        Command::TranslateBy { dx: 10.0, dy: 20.0 },
        Command::ScaleBy { sx: 2.0, sy: 0.5 },
        Command::RotateBy { radians: 1.5707 },
        Command::SetClippingRects(vec![rect, Rect::new(0.0, 0.0, 5.0, 5.0)]),
        Command::ClearClippingRects,
        Command::ClipToRect {
            rect,
            inverse: true,
        },
        Command::ClipToShape {
            shape: shape.clone(),
            inverse: false,
        },
        Command::ClipToPicture {
            token: 3,
            origin: Point::new(1.0, 1.0),
            inverse: true,
        },
        Command::SetFontFamily("Noto Sans".into()),
        Command::SetFontStyle("Bold Italic".into()),
        Command::SetFontSpacing(FontSpacing::FIXED_SPACING),
        Command::SetFontSize(12.5),
        Command::SetFontRotation(0.25),
        Command::SetFontEncoding(FontEncoding::UNICODE_UTF8),
        Command::SetFontFlags(0b101),
        Command::SetFontShear(45.0),
        Command::SetFontBitDepth(8),
        Command::SetFontFace(0x40),
        Command::StrokeLine {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 10.0),
        },
        Command::StrokeRect(rect),
        Command::FillRect(rect),
        Command::StrokeRoundRect {
            rect,
            radii: Point::new(2.0, 3.0),
        },
        Command::FillRoundRect {
            rect,
            radii: Point::new(2.0, 3.0),
        },
        Command::StrokeBezier(bezier),
        Command::FillBezier(bezier),
        Command::StrokeArc {
            center: Point::new(5.0, 5.0),
            radii: Point::new(4.0, 3.0),
            start_angle: 0.0,
            span_angle: 180.0,
        },
        Command::FillArc {
            center: Point::new(5.0, 5.0),
            radii: Point::new(4.0, 3.0),
            start_angle: 90.0,
            span_angle: 90.0,
        },
        Command::StrokeEllipse(rect),
        Command::FillEllipse(rect),
        Command::StrokePolygon {
            points: polygon.clone(),
            closed: true,
        },
        Command::FillPolygon(polygon.clone()),
        Command::StrokeShape(shape.clone()),
        Command::FillShape(shape.clone()),
        Command::StrokeLineGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(1.0, 1.0),
            gradient: gradient.clone(),
        },
        Command::StrokeRectGradient {
            rect,
            gradient: gradient.clone(),
        },
        Command::FillRectGradient {
            rect,
            gradient: gradient.clone(),
        },
        Command::StrokeRoundRectGradient {
            rect,
            radii: Point::new(1.0, 1.0),
            gradient: gradient.clone(),
        },
        Command::FillRoundRectGradient {
            rect,
            radii: Point::new(1.0, 1.0),
            gradient: gradient.clone(),
        },
        Command::StrokeBezierGradient {
            points: bezier,
            gradient: gradient.clone(),
        },
        Command::FillBezierGradient {
            points: bezier,
            gradient: gradient.clone(),
        },
        Command::StrokeArcGradient {
            center: Point::new(2.0, 2.0),
            radii: Point::new(2.0, 2.0),
            start_angle: 0.0,
            span_angle: 360.0,
            gradient: gradient.clone(),
        },
        Command::FillArcGradient {
            center: Point::new(2.0, 2.0),
            radii: Point::new(2.0, 2.0),
            start_angle: 0.0,
            span_angle: 360.0,
            gradient: gradient.clone(),
        },
        Command::StrokeEllipseGradient {
            rect,
            gradient: gradient.clone(),
        },
        Command::FillEllipseGradient {
            rect,
            gradient: gradient.clone(),
        },
        Command::StrokePolygonGradient {
            points: polygon.clone(),
            closed: false,
            gradient: gradient.clone(),
        },
        Command::FillPolygonGradient {
            points: polygon,
            gradient: gradient.clone(),
        },
        Command::StrokeShapeGradient {
            shape: shape.clone(),
            gradient: gradient.clone(),
        },
        Command::FillShapeGradient { shape, gradient },
        Command::DrawString {
            text: "héllo wörld".into(),
            escapement_space: 0.5,
            escapement_nonspace: 0.1,
        },
        Command::DrawStringLocations {
            text: "ab".into(),
            locations: vec![Point::new(0.0, 0.0), Point::new(8.0, 0.0)],
        },
        Command::DrawPixels(PixelData {
            src: Rect::new(0.0, 0.0, 2.0, 2.0),
            dst: Rect::new(10.0, 10.0, 14.0, 14.0),
            width: 2,
            height: 2,
            bytes_per_row: 8,
            format: PixelFormat::RGBA32,
            flags: 1,
            data: vec![0xDE, 0xAD, 0xBE, 0xEF, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
        }),
        Command::DrawPicture {
            origin: Point::new(50.0, 50.0),
            token: 12,
        },
    ]
}
