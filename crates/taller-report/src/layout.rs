// SPDX-License-Identifier: Apache-2.0

//! Declarative description of one report section.
//!
//! Coordinates use a top-left origin in points; the renderer converts them
//! to PDF space. Every `y` is relative to the section offset.

pub const PAGE_WIDTH: f64 = 612.0;
pub const PAGE_HEIGHT: f64 = 792.0;

/// Vertical offsets at which the section is drawn on the page.
pub const SECTION_OFFSETS: [f64; 2] = [0.0, 400.0];

pub const WATERMARK_OPACITY: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    #[must_use]
    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    #[must_use]
    pub const fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Folio,
    Date,
    Unit,
    MeasureType,
    MeasureValue,
    OrderType,
    ReportedBy,
    Comments,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextSource {
    Literal(&'static str),
    Field(Field),
    Prefixed(&'static str, Field),
    Suffixed(Field, &'static str),
}

/// Horizontal placement of a single text line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Left(f64),
    Right(f64),
    Center(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element {
    Watermark {
        x: f64,
        y: f64,
        width: f64,
    },
    Text {
        source: TextSource,
        font: Font,
        size: f64,
        anchor: Anchor,
        y: f64,
    },
    Rule {
        x1: f64,
        x2: f64,
        y: f64,
    },
    Frame {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Paragraph {
        field: Field,
        font: Font,
        size: f64,
        x: f64,
        y: f64,
        width: f64,
        leading: f64,
        max_lines: usize,
    },
}

const fn label(text: &'static str, y: f64) -> Element {
    Element::Text {
        source: TextSource::Literal(text),
        font: Font::Bold,
        size: 12.0,
        anchor: Anchor::Left(50.0),
        y,
    }
}

const fn value(field: Field, y: f64) -> Element {
    Element::Text {
        source: TextSource::Field(field),
        font: Font::Regular,
        size: 12.0,
        anchor: Anchor::Left(150.0),
        y,
    }
}

pub const SECTION: [Element; 18] = [
    Element::Watermark {
        x: 70.0,
        y: 25.0,
        width: 500.0,
    },
    Element::Text {
        source: TextSource::Literal("Reporte de Taller"),
        font: Font::Bold,
        size: 20.0,
        anchor: Anchor::Center(PAGE_WIDTH / 2.0),
        y: 40.0,
    },
    Element::Rule {
        x1: 50.0,
        x2: 550.0,
        y: 100.0,
    },
    Element::Text {
        source: TextSource::Prefixed("Fecha: ", Field::Date),
        font: Font::Regular,
        size: 12.0,
        anchor: Anchor::Left(50.0),
        y: 120.0,
    },
    Element::Text {
        source: TextSource::Prefixed("Folio: ", Field::Folio),
        font: Font::Regular,
        size: 12.0,
        anchor: Anchor::Right(550.0),
        y: 120.0,
    },
    label("Unidad:", 150.0),
    value(Field::Unit, 150.0),
    Element::Text {
        source: TextSource::Suffixed(Field::MeasureType, ":"),
        font: Font::Bold,
        size: 12.0,
        anchor: Anchor::Left(50.0),
        y: 170.0,
    },
    value(Field::MeasureValue, 170.0),
    label("Tipo de Orden:", 190.0),
    value(Field::OrderType, 190.0),
    label("Quién Reporta:", 210.0),
    value(Field::ReportedBy, 210.0),
    Element::Frame {
        x: 50.0,
        y: 240.0,
        width: 500.0,
        height: 80.0,
    },
    Element::Text {
        source: TextSource::Literal("Comentarios:"),
        font: Font::Bold,
        size: 12.0,
        anchor: Anchor::Left(60.0),
        y: 248.0,
    },
    Element::Paragraph {
        field: Field::Comments,
        font: Font::Regular,
        size: 12.0,
        x: 60.0,
        y: 264.0,
        width: 480.0,
        leading: 14.0,
        max_lines: 4,
    },
    Element::Rule {
        x1: 230.0,
        x2: 380.0,
        y: 355.0,
    },
    Element::Text {
        source: TextSource::Literal("Firma"),
        font: Font::Regular,
        size: 12.0,
        anchor: Anchor::Center(305.0),
        y: 362.0,
    },
];
