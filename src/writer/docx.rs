//! Word (.docx) output via docx-rs

use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use docx_rs::{
    AlignmentType, BreakType, Docx, Paragraph, Pic, Run, RunFonts, Style, StyleType,
    VertAlignType,
};

use super::DocumentWriter;
use crate::document::models::{ImageSource, StyledRun, TextAlignment};
use crate::document::parsing::numbering::MAX_HEADING_LEVEL;
use crate::error::{Error, Result};

const EMU_PER_INCH: f64 = 914_400.0;
const BULLET: &str = "• ";

/// Heading font sizes in half-points, level 1 first
const HEADING_SIZES: [usize; MAX_HEADING_LEVEL] = [32, 28, 26, 24, 24, 22, 22, 22, 22];
const TITLE_SIZE: usize = 48;

/// Accumulates paragraphs and packs them into a .docx file on [`save`].
///
/// [`save`]: DocxWriter::save
#[derive(Debug)]
pub struct DocxWriter {
    paragraphs: Vec<Paragraph>,
    /// Font used for list bullets
    bullet_font: String,
}

impl DocxWriter {
    pub fn new(bullet_font: impl Into<String>) -> Self {
        Self {
            paragraphs: Vec::new(),
            bullet_font: bullet_font.into(),
        }
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Pack the document in memory and write it to `path`; a packing
    /// failure leaves no file behind.
    pub fn save(self, path: &Path) -> Result<()> {
        let mut packed = Cursor::new(Vec::new());
        self.write_to(&mut packed)?;
        fs::write(path, packed.into_inner())?;
        tracing::info!(path = %path.display(), "saved document");
        Ok(())
    }

    pub fn write_to<W: Write + Seek>(self, writer: W) -> Result<()> {
        let mut docx = Docx::new().add_style(
            Style::new("Title", StyleType::Paragraph)
                .name("Title")
                .size(TITLE_SIZE)
                .bold(),
        );

        for (index, size) in HEADING_SIZES.iter().enumerate() {
            let level = index + 1;
            docx = docx.add_style(
                Style::new(&format!("Heading{level}"), StyleType::Paragraph)
                    .name(&format!("Heading {level}"))
                    .size(*size)
                    .bold()
                    .outline_lvl(index),
            );
        }

        for paragraph in self.paragraphs {
            docx = docx.add_paragraph(paragraph);
        }

        docx.build()
            .pack(writer)
            .map_err(|e| Error::Write(e.to_string()))
    }

    fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }
}

fn to_run(run: StyledRun) -> Run {
    let fonts = RunFonts::new()
        .ascii(&run.font_family)
        .hi_ansi(&run.font_family)
        .east_asia(&run.font_family);

    let mut docx_run = Run::new().add_text(run.text).fonts(fonts);
    if run.superscript {
        docx_run.run_property = docx_run.run_property.vert_align(VertAlignType::SuperScript);
    }
    docx_run
}

fn paragraph_of(runs: Vec<StyledRun>) -> Paragraph {
    runs.into_iter()
        .fold(Paragraph::new(), |paragraph, run| paragraph.add_run(to_run(run)))
}

fn read_image(source: ImageSource) -> Result<Vec<u8>> {
    match source {
        ImageSource::Bytes(bytes) => Ok(bytes),
        ImageSource::Path(path) => fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ImageNotFound(path),
            _ => Error::Io(e),
        }),
    }
}

/// Decoded image re-encoded as PNG, the only format docx-rs embeds.
#[derive(Debug)]
struct PngImage {
    bytes: Vec<u8>,
    width_px: u32,
    height_px: u32,
}

/// Fully decode `bytes` so truncated or foreign data fails here, not inside docx-rs.
fn decode_png(bytes: &[u8]) -> Result<PngImage> {
    let decoded = image::load_from_memory(bytes).map_err(|e| Error::Image(e.to_string()))?;

    let mut png = Cursor::new(Vec::new());
    decoded
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|e| Error::Image(e.to_string()))?;

    Ok(PngImage {
        bytes: png.into_inner(),
        width_px: decoded.width(),
        height_px: decoded.height(),
    })
}

/// Size in EMU for an image scaled to `width_inches`, keeping its aspect ratio.
fn scaled_size(width_px: u32, height_px: u32, width_inches: f32) -> Result<(u32, u32)> {
    if width_px == 0 {
        return Err(Error::Image("image has zero width".to_string()));
    }

    let width_emu = f64::from(width_inches) * EMU_PER_INCH;
    let height_emu = width_emu * f64::from(height_px) / f64::from(width_px);
    Ok((width_emu.round() as u32, height_emu.round() as u32))
}

impl DocumentWriter for DocxWriter {
    fn add_title(&mut self, runs: Vec<StyledRun>) -> Result<()> {
        self.push(paragraph_of(runs).style("Title"));
        Ok(())
    }

    fn add_heading(&mut self, level: u8, runs: Vec<StyledRun>) -> Result<()> {
        let level = level.clamp(1, MAX_HEADING_LEVEL as u8);
        self.push(paragraph_of(runs).style(&format!("Heading{level}")));
        Ok(())
    }

    fn add_paragraph(&mut self, runs: Vec<StyledRun>, alignment: TextAlignment) -> Result<()> {
        let paragraph = paragraph_of(runs);
        self.push(match alignment {
            TextAlignment::Left => paragraph,
            TextAlignment::Center => paragraph.align(AlignmentType::Center),
        });
        Ok(())
    }

    fn add_list_item(&mut self, runs: Vec<StyledRun>) -> Result<()> {
        let bullet = StyledRun {
            text: BULLET.to_string(),
            font_family: self.bullet_font.clone(),
            superscript: false,
        };
        let paragraph = paragraph_of(std::iter::once(bullet).chain(runs).collect());
        self.push(paragraph);
        Ok(())
    }

    fn add_page_break(&mut self) -> Result<()> {
        self.push(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        Ok(())
    }

    fn add_image(&mut self, source: ImageSource, width_inches: Option<f32>) -> Result<()> {
        let png = decode_png(&read_image(source)?)?;
        let (width_px, height_px) = (png.width_px, png.height_px);

        let pic = Pic::new_with_dimensions(png.bytes, width_px, height_px);
        let pic = match width_inches {
            Some(width) => {
                let (width_emu, height_emu) = scaled_size(width_px, height_px, width)?;
                pic.size(width_emu, height_emu)
            }
            None => pic,
        };

        self.push(
            Paragraph::new()
                .add_run(Run::new().add_image(pic))
                .align(AlignmentType::Center),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_scaled_size_keeps_aspect_ratio() {
        let (width, height) = scaled_size(200, 100, 5.0).unwrap();
        assert_eq!(width, 4_572_000);
        assert_eq!(height, 2_286_000);
    }

    #[test]
    fn test_garbage_bytes_are_image_error() {
        let err = decode_png(b"not an image").unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn test_non_image_equation_bytes_are_image_error() {
        let mut writer = DocxWriter::new("Times New Roman");
        let err = writer
            .add_image(ImageSource::Bytes(b"%!PS not png".to_vec()), None)
            .unwrap_err();
        assert!(matches!(err, Error::Image(_)));
        assert_eq!(writer.paragraph_count(), 0);
    }

    #[test]
    fn test_truncated_gif_is_image_error() {
        let image = RgbImage::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 0]));
        let mut gif = Cursor::new(Vec::new());
        image.write_to(&mut gif, ImageFormat::Gif).unwrap();
        let mut gif = gif.into_inner();
        gif.truncate(gif.len() / 2);

        let mut writer = DocxWriter::new("Times New Roman");
        let err = writer
            .add_image(ImageSource::Bytes(gif), Some(5.0))
            .unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn test_bmp_is_embedded_as_png() {
        let image = RgbImage::from_pixel(10, 5, Rgb([0, 0, 255]));
        let mut bmp = Cursor::new(Vec::new());
        image.write_to(&mut bmp, ImageFormat::Bmp).unwrap();

        let png = decode_png(&bmp.into_inner()).unwrap();
        assert_eq!((png.width_px, png.height_px), (10, 5));
        assert!(png.bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_superscript_run_is_marked() {
        let mut writer = DocxWriter::new("Times New Roman");
        writer
            .add_paragraph(
                vec![StyledRun {
                    text: "[1]".to_string(),
                    font_family: "Times New Roman".to_string(),
                    superscript: true,
                }],
                TextAlignment::Left,
            )
            .unwrap();

        let mut packed = Cursor::new(Vec::new());
        writer.write_to(&mut packed).unwrap();
        let mut archive = zip::ZipArchive::new(packed).unwrap();
        let mut xml = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("word/document.xml").unwrap(), &mut xml)
            .unwrap();
        assert!(xml.contains("superscript"));
    }

    #[test]
    fn test_heading_styles_carry_outline_level() {
        let mut packed = Cursor::new(Vec::new());
        DocxWriter::new("Arial").write_to(&mut packed).unwrap();
        let mut archive = zip::ZipArchive::new(packed).unwrap();
        let mut xml = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("word/styles.xml").unwrap(), &mut xml)
            .unwrap();
        assert!(xml.contains("w:outlineLvl w:val=\"0\""));
        assert!(xml.contains("w:outlineLvl w:val=\"8\""));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        DocxWriter::new("Arial").save(&path).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_missing_image_path() {
        let mut writer = DocxWriter::new("Times New Roman");
        let err = writer
            .add_image(ImageSource::Path("/nonexistent/figure.png".into()), Some(5.0))
            .unwrap_err();
        assert!(matches!(err, Error::ImageNotFound(_)));
        assert_eq!(writer.paragraph_count(), 0);
    }

    #[test]
    fn test_every_call_adds_one_paragraph() {
        let run = StyledRun {
            text: "text".to_string(),
            font_family: "Arial".to_string(),
            superscript: false,
        };
        let mut writer = DocxWriter::new("Times New Roman");
        writer.add_title(vec![run.clone()]).unwrap();
        writer.add_heading(2, vec![run.clone()]).unwrap();
        writer
            .add_paragraph(vec![run.clone()], TextAlignment::Center)
            .unwrap();
        writer.add_list_item(vec![run]).unwrap();
        writer.add_page_break().unwrap();
        writer
            .add_image(ImageSource::Bytes(png(8, 4)), Some(2.0))
            .unwrap();
        assert_eq!(writer.paragraph_count(), 6);

        let mut packed = Cursor::new(Vec::new());
        writer.write_to(&mut packed).unwrap();
        assert!(!packed.into_inner().is_empty());
    }
}
