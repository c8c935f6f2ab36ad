// SPDX-License-Identifier: Apache-2.0

use lopdf::content::Content;
use lopdf::{Document, Object};
use std::io::{self, Write};
use taller_model::{Folio, Record};
use taller_report::{render_record, to_win_ansi, RenderErrorCode, Watermark};

fn sample_record() -> Record {
    Record {
        folio: Folio::new(17),
        unit: "Truck-102".to_string(),
        measure_type: "Kilometraje".to_string(),
        measure_value: "15000 km".to_string(),
        date: "2024-05-01".to_string(),
        order_type: "Preventivo".to_string(),
        comments: Some("Cambio de aceite y filtros".to_string()),
        reported_by: "Ana".to_string(),
    }
}

fn png_logo(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut buf, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().expect("png header");
    let pixels: Vec<u8> = (0..width * height)
        .flat_map(|i| [200, 30, 30, if i % 2 == 0 { 255 } else { 0 }])
        .collect();
    writer.write_image_data(&pixels).expect("png data");
    drop(writer);
    buf
}

fn render(record: &Record, watermark: Option<&Watermark>) -> Vec<u8> {
    let mut out = Vec::new();
    let written = render_record(record, watermark, &mut out).expect("render");
    assert_eq!(written, out.len() as u64);
    out
}

fn shown_strings(bytes: &[u8]) -> Vec<Vec<u8>> {
    let doc = Document::load_mem(bytes).expect("load pdf");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "single page");
    let page_id = *pages.values().next().expect("page id");
    let raw = doc.get_page_content(page_id).expect("page content");
    let content = Content::decode(&raw).expect("decode content");
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(bytes.clone()),
            _ => None,
        })
        .collect()
}

fn occurrences(strings: &[Vec<u8>], text: &str) -> usize {
    let needle = to_win_ansi(text);
    strings.iter().filter(|s| **s == needle).count()
}

fn image_objects(bytes: &[u8]) -> usize {
    let doc = Document::load_mem(bytes).expect("load pdf");
    doc.objects
        .values()
        .filter(|obj| match obj {
            Object::Stream(stream) => matches!(
                stream.dict.get(b"Subtype").and_then(Object::as_name),
                Ok(name) if name == b"Image"
            ),
            _ => false,
        })
        .count()
}

#[test]
fn every_field_value_appears_in_both_sections() {
    let record = sample_record();
    let strings = shown_strings(&render(&record, None));
    for text in [
        "Reporte de Taller",
        "Fecha: 2024-05-01",
        "Folio: 17",
        "Truck-102",
        "Kilometraje:",
        "15000 km",
        "Preventivo",
        "Ana",
        "Cambio de aceite y filtros",
        "Quién Reporta:",
        "Firma",
    ] {
        assert_eq!(occurrences(&strings, text), 2, "{text}");
    }
}

#[test]
fn watermark_is_embedded_once_and_painted_twice() {
    let record = sample_record();
    let logo = Watermark::from_png_bytes(&png_logo(4, 2)).expect("decode logo");
    let bytes = render(&record, Some(&logo));
    assert_eq!(image_objects(&bytes), 1);

    let doc = Document::load_mem(&bytes).expect("load pdf");
    let page_id = *doc.get_pages().values().next().expect("page");
    let content = Content::decode(&doc.get_page_content(page_id).expect("content"))
        .expect("decode content");
    let draws = content
        .operations
        .iter()
        .filter(|op| op.operator == "Do")
        .count();
    assert_eq!(draws, 2);
}

#[test]
fn no_watermark_means_no_image_objects() {
    let bytes = render(&sample_record(), None);
    assert_eq!(image_objects(&bytes), 0);
}

#[test]
fn absent_comments_render_an_empty_box() {
    let record = Record {
        comments: None,
        ..sample_record()
    };
    let strings = shown_strings(&render(&record, None));
    assert_eq!(occurrences(&strings, "Comentarios:"), 2);
    assert_eq!(occurrences(&strings, "Cambio de aceite y filtros"), 0);
}

#[test]
fn unencodable_characters_degrade_to_question_marks() {
    let record = Record {
        unit: "Grúa\u{2192}7".to_string(),
        ..sample_record()
    };
    let strings = shown_strings(&render(&record, None));
    assert_eq!(occurrences(&strings, "Grúa?7"), 2);
}

#[test]
fn rendering_is_deterministic() {
    let record = sample_record();
    assert_eq!(render(&record, None), render(&record, None));
}

struct ClosedSink;

impl Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "receiver dropped"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn closed_sink_is_reported_as_sink_failure() {
    let err = render_record(&sample_record(), None, &mut ClosedSink).expect_err("sink closed");
    assert_eq!(err.code, RenderErrorCode::Sink);
    assert!(err.is_sink_closed());
}

#[test]
fn logo_file_round_trips_through_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("logo.png");
    std::fs::write(&path, png_logo(10, 5)).expect("write logo");
    let logo = Watermark::load(&path).expect("load").expect("present");
    assert_eq!((logo.width(), logo.height()), (10, 5));
    assert!((logo.scaled_height(500.0) - 250.0).abs() < 1e-9);
}
