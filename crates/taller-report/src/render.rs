// SPDX-License-Identifier: Apache-2.0

use crate::encoding::{displayed_char, to_win_ansi};
use crate::error::{RenderError, RenderErrorCode};
use crate::layout::{
    Anchor, Element, Field, Font, TextSource, PAGE_HEIGHT, PAGE_WIDTH, SECTION, SECTION_OFFSETS,
    WATERMARK_OPACITY,
};
use crate::metrics::text_width;
use crate::watermark::Watermark;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};
use std::io::Write;
use taller_model::Record;
use tracing::debug;

/// Helvetica ascender, used to place a line's top edge at its layout `y`.
const ASCENT: f64 = 0.718;
const IMAGE_RESOURCE: &str = "Im1";
const GSTATE_RESOURCE: &str = "GS1";
const ELLIPSIS: &str = "...";

/// Writes `record` as a one-page PDF into `sink` and returns the byte count.
///
/// The section layout is drawn once per entry of [`SECTION_OFFSETS`]. When a
/// watermark is supplied its image is embedded once and painted by each
/// section.
pub fn render_record<W: Write>(
    record: &Record,
    watermark: Option<&Watermark>,
    sink: &mut W,
) -> Result<u64, RenderError> {
    let mut doc = build_document(record, watermark)?;
    let mut tracked = TrackedSink::new(sink);
    let outcome = doc
        .save_to(&mut tracked)
        .map(|_| ())
        .map_err(|e| e.to_string())
        .and_then(|()| tracked.flush().map_err(|e| e.to_string()));
    // Buffered writers may swallow a late sink error on drop.
    if tracked.failed {
        let message = outcome.err().unwrap_or_else(|| "sink closed".to_string());
        return Err(RenderError::new(RenderErrorCode::Sink, message));
    }
    outcome.map_err(|message| RenderError::new(RenderErrorCode::Serialize, message))?;
    debug!(folio = %record.folio, bytes = tracked.written, "report rendered");
    Ok(tracked.written)
}

fn build_document(record: &Record, watermark: Option<&Watermark>) -> Result<Document, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(Font::Regular));
    let bold_id = doc.add_object(font_dictionary(Font::Bold));
    let mut resources = dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular_id,
            Font::Bold.resource_name() => bold_id,
        },
    };

    if let Some(mark) = watermark {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(mark.width()),
                "Height" => i64::from(mark.height()),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            mark.deflated_samples().to_vec(),
        ));
        let gstate_id = doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => real(WATERMARK_OPACITY),
            "CA" => real(WATERMARK_OPACITY),
        });
        resources.set("XObject", dictionary! { IMAGE_RESOURCE => image_id });
        resources.set("ExtGState", dictionary! { GSTATE_RESOURCE => gstate_id });
    }

    let mut operations = Vec::new();
    for offset in SECTION_OFFSETS {
        paint_section(&mut operations, record, watermark, offset);
    }
    let content = Content { operations }
        .encode()
        .map_err(|e| RenderError::new(RenderErrorCode::Serialize, e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            real(PAGE_WIDTH),
            real(PAGE_HEIGHT),
        ],
        "Contents" => content_id,
        "Resources" => resources,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(record.folio.document_filename()),
        "Producer" => Object::string_literal("taller"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    Ok(doc)
}

fn font_dictionary(font: Font) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn paint_section(
    ops: &mut Vec<Operation>,
    record: &Record,
    watermark: Option<&Watermark>,
    offset: f64,
) {
    for element in SECTION {
        match element {
            Element::Watermark { x, y, width } => {
                let Some(mark) = watermark else { continue };
                let height = mark.scaled_height(width);
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("gs", vec![GSTATE_RESOURCE.into()]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        real(width),
                        real(0.0),
                        real(0.0),
                        real(height),
                        real(x),
                        real(to_pdf_y(offset, y + height)),
                    ],
                ));
                ops.push(Operation::new("Do", vec![IMAGE_RESOURCE.into()]));
                ops.push(Operation::new("Q", vec![]));
            }
            Element::Text {
                source,
                font,
                size,
                anchor,
                y,
            } => {
                let text = shown(&resolve(record, source));
                let width = text_width(font, size, &text);
                let x = match anchor {
                    Anchor::Left(x) => x,
                    Anchor::Right(x) => x - width,
                    Anchor::Center(x) => x - width / 2.0,
                };
                push_text(ops, font, size, x, baseline(offset, y, size), &text);
            }
            Element::Rule { x1, x2, y } => {
                let pdf_y = to_pdf_y(offset, y);
                ops.push(Operation::new("w", vec![real(1.0)]));
                ops.push(Operation::new("m", vec![real(x1), real(pdf_y)]));
                ops.push(Operation::new("l", vec![real(x2), real(pdf_y)]));
                ops.push(Operation::new("S", vec![]));
            }
            Element::Frame {
                x,
                y,
                width,
                height,
            } => {
                ops.push(Operation::new("w", vec![real(1.0)]));
                ops.push(Operation::new(
                    "re",
                    vec![
                        real(x),
                        real(to_pdf_y(offset, y + height)),
                        real(width),
                        real(height),
                    ],
                ));
                ops.push(Operation::new("S", vec![]));
            }
            Element::Paragraph {
                field,
                font,
                size,
                x,
                y,
                width,
                leading,
                max_lines,
            } => {
                let body = shown(&field_text(record, field));
                let lines = wrap_lines(&body, font, size, width, max_lines);
                for (i, line) in lines.iter().enumerate() {
                    let line_y = y + leading * i as f64;
                    push_text(ops, font, size, x, baseline(offset, line_y, size), line);
                }
            }
        }
    }
}

fn push_text(ops: &mut Vec<Operation>, font: Font, size: f64, x: f64, y: f64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.resource_name().into(), real(size)]));
    ops.push(Operation::new("Td", vec![real(x), real(y)]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn resolve(record: &Record, source: TextSource) -> String {
    match source {
        TextSource::Literal(text) => text.to_string(),
        TextSource::Field(field) => field_text(record, field),
        TextSource::Prefixed(prefix, field) => format!("{prefix}{}", field_text(record, field)),
        TextSource::Suffixed(field, suffix) => format!("{}{suffix}", field_text(record, field)),
    }
}

fn field_text(record: &Record, field: Field) -> String {
    match field {
        Field::Folio => record.folio.to_string(),
        Field::Date => record.date.clone(),
        Field::Unit => record.unit.clone(),
        Field::MeasureType => record.measure_type.clone(),
        Field::MeasureValue => record.measure_value.clone(),
        Field::OrderType => record.order_type.clone(),
        Field::ReportedBy => record.reported_by.clone(),
        Field::Comments => record.comments.clone().unwrap_or_default(),
    }
}

/// Text as the viewer will display it, so widths match the glyphs drawn.
fn shown(text: &str) -> String {
    text.chars().map(displayed_char).collect()
}

fn to_pdf_y(offset: f64, y: f64) -> f64 {
    PAGE_HEIGHT - (offset + y)
}

fn baseline(offset: f64, y: f64, size: f64) -> f64 {
    to_pdf_y(offset, y + size * ASCENT)
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Greedy word wrap to `width` points. Words wider than a line are broken
/// by character. Past `max_lines` the last kept line ends in `...`.
pub(crate) fn wrap_lines(
    text: &str,
    font: Font,
    size: f64,
    width: f64,
    max_lines: usize,
) -> Vec<String> {
    let fits = |s: &str| text_width(font, size, s) <= width;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for c in word.chars() {
            current.push(c);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            while !last.is_empty() && !fits(&format!("{last}{ELLIPSIS}")) {
                last.pop();
            }
            let kept = last.trim_end().len();
            last.truncate(kept);
            last.push_str(ELLIPSIS);
        }
    }
    lines
}

/// Records whether a write failure came from the underlying sink.
struct TrackedSink<'a, W: Write> {
    inner: &'a mut W,
    written: u64,
    failed: bool,
}

impl<'a, W: Write> TrackedSink<'a, W> {
    fn new(inner: &'a mut W) -> Self {
        Self {
            inner,
            written: 0,
            failed: false,
        }
    }
}

impl<W: Write> Write for TrackedSink<'_, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.inner.write(buf) {
            Ok(n) => {
                self.written += n as u64;
                Ok(n)
            }
            Err(err) => {
                self.failed = true;
                Err(err)
            }
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush().map_err(|err| {
            self.failed = true;
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_lines("Cambio de aceite", Font::Regular, 12.0, 480.0, 4);
        assert_eq!(lines, vec!["Cambio de aceite".to_string()]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_lines("   ", Font::Regular, 12.0, 480.0, 4).is_empty());
    }

    #[test]
    fn every_wrapped_line_fits_the_width() {
        let text = "revisar frenos ".repeat(20);
        let lines = wrap_lines(&text, Font::Regular, 12.0, 200.0, 50);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(Font::Regular, 12.0, line) <= 200.0);
        }
    }

    #[test]
    fn overflow_truncates_with_ellipsis() {
        let text = "palabra ".repeat(200);
        let lines = wrap_lines(&text, Font::Regular, 12.0, 480.0, 4);
        assert_eq!(lines.len(), 4);
        let last = lines.last().expect("last line");
        assert!(last.ends_with("..."));
        assert!(text_width(Font::Regular, 12.0, last) <= 480.0);
    }

    #[test]
    fn long_word_is_broken_by_character() {
        let word = "W".repeat(60);
        let lines = wrap_lines(&word, Font::Regular, 12.0, 480.0, 4);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn baseline_converts_top_left_layout_to_pdf_space() {
        assert!((baseline(0.0, 40.0, 20.0) - (792.0 - 40.0 - 14.36)).abs() < 1e-9);
        assert!((to_pdf_y(400.0, 100.0) - 292.0).abs() < 1e-9);
    }
}
