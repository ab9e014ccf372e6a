//! PDF rendering with `printpdf`.
//!
//! US Letter pages, built-in Helvetica fonts, one page per scene with
//! the illustration above the text.

use fabula_core::Story;
use fabula_error::{ExportError, ExportErrorKind, FabulaResult};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use std::collections::BTreeMap;
use std::io::BufWriter;

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 25.4;
const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const IMAGE_WIDTH_MM: f32 = 127.0;
const IMAGE_HEIGHT_MM: f32 = 76.2;
const BODY_SIZE: f32 = 12.0;
const LINE_HEIGHT_MM: f32 = 6.3;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Vertical cursor on the current page.
///
/// Content is emitted through the cursor so that anything that would
/// cross the bottom margin continues on a fresh page instead of being
/// drawn below it.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PageCursor<'_> {
    /// Start a fresh page unless `needed` millimetres fit above the
    /// bottom margin.
    fn fit(&mut self, needed: f32) {
        if self.y - needed < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }
}

fn pdf_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::new(ExportErrorKind::PdfRender(e.to_string()))
}

/// Render a story to PDF bytes.
///
/// `images` maps zero-based scene index to raw image bytes; scenes
/// without an entry render text only.
pub(crate) fn render(story: &Story, images: &BTreeMap<u32, Vec<u8>>) -> FabulaResult<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new(&story.title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?,
    };

    let mut cursor = PageCursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - 70.0,
    };
    render_title_page(story, &mut cursor, &fonts);

    for (index, scene) in story.scenes.iter().enumerate() {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        cursor.layer = doc.get_page(page).get_layer(layer);
        cursor.y = PAGE_HEIGHT_MM - MARGIN_MM - 10.0;

        cursor
            .layer
            .use_text(&scene.title, 18.0, Mm(MARGIN_MM), Mm(cursor.y), &fonts.bold);
        cursor.y -= 14.0;

        if let Some(bytes) = images.get(&(index as u32)) {
            cursor.fit(IMAGE_HEIGHT_MM);
            match embed_image(&cursor.layer, bytes, cursor.y) {
                Ok(()) => cursor.y -= IMAGE_HEIGHT_MM + 8.0,
                Err(e) => tracing::warn!(scene = scene.scene_number, error = %e, "Skipping PDF image"),
            }
        }

        write_paragraph(&mut cursor, &scene.text, &fonts.regular);
    }
    drop(cursor);

    let mut buffer = BufWriter::new(Vec::new());
    doc.save(&mut buffer).map_err(pdf_err)?;
    buffer
        .into_inner()
        .map_err(|e| pdf_err(e.to_string()).into())
}

fn render_title_page(story: &Story, cursor: &mut PageCursor<'_>, fonts: &Fonts) {
    cursor
        .layer
        .use_text(&story.title, 24.0, Mm(MARGIN_MM), Mm(cursor.y), &fonts.bold);
    cursor.y -= 12.0;

    let meta = format!("Genre: {} | Age Group: {}", story.genre, story.age_group);
    cursor
        .layer
        .use_text(&meta, 10.0, Mm(MARGIN_MM), Mm(cursor.y), &fonts.regular);
    cursor.y -= 20.0;

    if !story.characters.is_empty() {
        cursor
            .layer
            .use_text("Characters", 18.0, Mm(MARGIN_MM), Mm(cursor.y), &fonts.bold);
        cursor.y -= 10.0;
        for character in &story.characters {
            let line = format!("{}: {}", character.name, character.description);
            write_paragraph(cursor, &line, &fonts.regular);
            cursor.y -= 2.0;
        }
    }
}

/// Decode and place an image below `top`, scaled to a fixed box via dpi.
fn embed_image(layer: &PdfLayerReference, bytes: &[u8], top: f32) -> FabulaResult<()> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ExportError::new(ExportErrorKind::ImageDecode(e.to_string())))?;

    let width_px = decoded.width() as f32;
    // dpi chosen so the image lands at IMAGE_WIDTH_MM wide
    let dpi = width_px * 25.4 / IMAGE_WIDTH_MM;

    let pdf_image = Image::from_dynamic_image(&decoded);
    pdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm((PAGE_WIDTH_MM - IMAGE_WIDTH_MM) / 2.0)),
            translate_y: Some(Mm(top - IMAGE_HEIGHT_MM)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    Ok(())
}

/// Write wrapped text at the cursor, continuing on fresh pages as
/// needed.
fn write_paragraph(cursor: &mut PageCursor<'_>, text: &str, font: &IndirectFontRef) {
    for line in wrap_text(text, max_chars_per_line()) {
        cursor.fit(LINE_HEIGHT_MM);
        cursor
            .layer
            .use_text(&line, BODY_SIZE, Mm(MARGIN_MM), Mm(cursor.y), font);
        cursor.y -= LINE_HEIGHT_MM;
    }
}

/// Approximate character budget for a Helvetica body line.
fn max_chars_per_line() -> usize {
    // Average glyph width of roughly half the point size
    let char_width_mm = BODY_SIZE * 0.5 * 0.3528;
    (TEXT_WIDTH_MM / char_width_mm) as usize
}

/// Greedy word wrap. Paragraph breaks in the input are preserved.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.len() + 1 + word.len() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_core::{AgeGroup, ArtStyle, AspectRatio, Genre, Scene, Story};

    fn one_scene_story(text: &str) -> Story {
        let mut story = Story::new(
            "Test",
            "A test story",
            1,
            AgeGroup::default(),
            Genre::default(),
            ArtStyle::default(),
            AspectRatio::default(),
        );
        story
            .push_scene(Scene::new(1, "Scene 1", text, "prompt", vec![]))
            .unwrap();
        story
    }

    /// Page count from the document's page tree. The `/Count` entries
    /// are written uncompressed, so the largest one is the tree root.
    fn page_count(bytes: &[u8]) -> usize {
        let text = String::from_utf8_lossy(bytes);
        text.match_indices("/Count ")
            .filter_map(|(idx, _)| {
                text[idx + 7..]
                    .chars()
                    .take_while(char::is_ascii_digit)
                    .collect::<String>()
                    .parse::<usize>()
                    .ok()
            })
            .max()
            .expect("page tree count")
    }

    #[test]
    fn long_scene_text_flows_onto_extra_pages() {
        let sentence = "The fox carried the lamp oil up the spiral stairs one step at a time. ";

        let short = render(&one_scene_story(sentence), &BTreeMap::new()).unwrap();
        assert_eq!(page_count(&short), 2); // title page plus the scene

        let long = render(&one_scene_story(&sentence.repeat(120)), &BTreeMap::new()).unwrap();
        assert!(
            page_count(&long) > 2,
            "expected overflow onto continuation pages, got {} pages",
            page_count(&long)
        );
    }

    #[test]
    fn wrap_respects_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.iter().all(|l| l.len() <= 15));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_preserves_paragraph_breaks() {
        let lines = wrap_text("first paragraph\nsecond paragraph", 80);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn wrap_handles_overlong_words() {
        let lines = wrap_text("supercalifragilisticexpialidocious tiny", 10);
        assert_eq!(lines[0], "supercalifragilisticexpialidocious");
        assert_eq!(lines[1], "tiny");
    }
}
