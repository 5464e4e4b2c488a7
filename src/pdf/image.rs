use pdf_writer::{Filter, Pdf, Ref};

use super::flow::PageSink;
use super::writer::ImageRect;
use crate::config::{AspectRatio, LayoutConfig};
use crate::error::Error;
use crate::model::Screenshot;

enum PixelData {
    /// JPEG bytes, embedded untouched.
    Dct(Vec<u8>),
    /// Zlib-compressed 8-bit RGB plus an optional zlib-compressed alpha plane.
    Flate { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// A decoded screenshot ready to be written as an image XObject.
pub(super) struct DecodedImage {
    pub(super) pixel_width: u32,
    pub(super) pixel_height: u32,
    data: PixelData,
}

fn unavailable(shot: &Screenshot, reason: impl ToString) -> Error {
    Error::ImageUnavailable {
        origin: shot.describe(),
        reason: reason.to_string(),
    }
}

pub(super) fn load_screenshot(shot: &Screenshot) -> Result<DecodedImage, Error> {
    let bytes = match shot {
        Screenshot::Path(p) => std::fs::read(p).map_err(|e| unavailable(shot, e))?,
        Screenshot::Bytes(b) => b.clone(),
    };
    decode(&bytes).map_err(|e| unavailable(shot, e))
}

fn decode(bytes: &[u8]) -> Result<DecodedImage, ::image::ImageError> {
    let format = ::image::guess_format(bytes)?;
    let reader = ::image::ImageReader::with_format(std::io::Cursor::new(bytes), format);

    if format == ::image::ImageFormat::Jpeg {
        let (w, h) = reader.into_dimensions()?;
        return Ok(DecodedImage {
            pixel_width: w,
            pixel_height: h,
            data: PixelData::Dct(bytes.to_vec()),
        });
    }

    let rgba = reader.decode()?.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);
    let alpha = has_alpha.then(|| {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6)
    });

    Ok(DecodedImage {
        pixel_width: w,
        pixel_height: h,
        data: PixelData::Flate { rgb, alpha },
    })
}

impl DecodedImage {
    /// Write the XObject (and its soft mask) into `pdf`.
    pub(super) fn embed(
        &self,
        pdf: &mut Pdf,
        xobj_ref: Ref,
        alloc: &mut impl FnMut() -> Ref,
    ) -> Result<(), Error> {
        let w = i32::try_from(self.pixel_width)
            .map_err(|_| Error::Pdf(format!("image width {} out of range", self.pixel_width)))?;
        let h = i32::try_from(self.pixel_height)
            .map_err(|_| Error::Pdf(format!("image height {} out of range", self.pixel_height)))?;

        match &self.data {
            PixelData::Dct(jpeg) => {
                let mut xobj = pdf.image_xobject(xobj_ref, jpeg);
                xobj.filter(Filter::DctDecode);
                xobj.width(w);
                xobj.height(h);
                xobj.color_space().device_rgb();
                xobj.bits_per_component(8);
            }
            PixelData::Flate { rgb, alpha } => {
                let smask_ref = alpha.as_ref().map(|alpha| {
                    let mask_ref = alloc();
                    let mut mask = pdf.image_xobject(mask_ref, alpha);
                    mask.filter(Filter::FlateDecode);
                    mask.width(w);
                    mask.height(h);
                    mask.color_space().device_gray();
                    mask.bits_per_component(8);
                    mask_ref
                });
                let mut xobj = pdf.image_xobject(xobj_ref, rgb);
                xobj.filter(Filter::FlateDecode);
                xobj.width(w);
                xobj.height(h);
                xobj.color_space().device_rgb();
                xobj.bits_per_component(8);
                if let Some(mask_ref) = smask_ref {
                    xobj.s_mask(mask_ref);
                }
            }
        }
        Ok(())
    }
}

/// Sizes the screenshot for a fixed width and keeps it in one piece on one page.
pub(super) struct ImagePlacer {
    x: f32,
    width: f32,
    height: f32,
    spacing_after: f32,
}

impl ImagePlacer {
    /// `pixel_size` is only consulted for [`AspectRatio::Native`].
    pub(super) fn new(config: &LayoutConfig, pixel_size: (u32, u32)) -> Self {
        let printable = config.printable_width();
        let width = if config.image_width > printable {
            log::warn!(
                "image width {:.1}pt exceeds the printable width {:.1}pt; narrowing it",
                config.image_width,
                printable
            );
            printable
        } else {
            config.image_width
        };
        let (aw, ah) = match config.image_aspect {
            AspectRatio::Fixed { width, height } => (width, height),
            AspectRatio::Native if pixel_size.0 > 0 && pixel_size.1 > 0 => {
                (pixel_size.0 as f32, pixel_size.1 as f32)
            }
            AspectRatio::Native => (16.0, 9.0),
        };
        ImagePlacer {
            x: config.margin,
            width,
            height: width * ah / aw,
            spacing_after: config.image_spacing,
        }
    }

    pub(super) fn height(&self) -> f32 {
        self.height
    }

    /// Reserve room for the image plus its trailing space, draw it, and
    /// return where it went.
    pub(super) fn place(&self, sink: &mut impl PageSink) -> ImageRect {
        let top = sink.reserve(self.height() + self.spacing_after);
        let rect = ImageRect {
            x: self.x,
            y: top - self.height,
            width: self.width,
            height: self.height,
        };
        sink.draw_image(rect);
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::flow::tests::letter_flow;
    use crate::pdf::writer::TextStyle;

    fn png_bytes(w: u32, h: u32, alpha: u8) -> Vec<u8> {
        let img = ::image::RgbaImage::from_pixel(w, h, ::image::Rgba([10, 20, 30, alpha]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ::image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn default_width_is_narrowed_to_printable_area() {
        let placer = ImagePlacer::new(&LayoutConfig::default(), (1280, 720));
        assert_eq!(placer.width, 468.0);
        assert!((placer.height() - 263.25).abs() < 1e-3);
    }

    #[test]
    fn fixed_aspect_at_full_width_on_a_wider_page() {
        let config = LayoutConfig {
            margin: 50.0,
            ..LayoutConfig::default()
        };
        let placer = ImagePlacer::new(&config, (100, 100));
        assert_eq!(placer.width, 480.0);
        assert_eq!(placer.height(), 270.0);
    }

    #[test]
    fn native_aspect_uses_pixels() {
        let config = LayoutConfig {
            image_width: 400.0,
            image_aspect: AspectRatio::Native,
            ..LayoutConfig::default()
        };
        let placer = ImagePlacer::new(&config, (800, 600));
        assert_eq!(placer.height(), 300.0);
    }

    #[test]
    fn image_that_does_not_fit_starts_next_page_at_top() {
        let mut flow = letter_flow();
        let y = flow.reserve(500.0);
        flow.draw_text(72.0, y, "filler", TextStyle::Regular, 12.0);
        let placer = ImagePlacer::new(&LayoutConfig::default(), (0, 0));
        let rect = placer.place(&mut flow);
        assert_eq!(rect.top(), 720.0);
        let (pages, _) = flow.finish();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].image().is_none());
        assert_eq!(pages[1].image(), Some(rect));
    }

    #[test]
    fn decodes_png_with_and_without_alpha() {
        let opaque = decode(&png_bytes(4, 3, 255)).unwrap();
        assert_eq!((opaque.pixel_width, opaque.pixel_height), (4, 3));
        assert!(matches!(opaque.data, PixelData::Flate { alpha: None, .. }));

        let translucent = decode(&png_bytes(2, 2, 128)).unwrap();
        assert!(matches!(translucent.data, PixelData::Flate { alpha: Some(_), .. }));
    }

    #[test]
    fn garbage_is_image_unavailable() {
        let shot = Screenshot::Bytes(b"not an image".to_vec());
        assert!(matches!(
            load_screenshot(&shot),
            Err(Error::ImageUnavailable { .. })
        ));
        let missing = Screenshot::Path("/nonexistent/shot.png".into());
        assert!(matches!(
            load_screenshot(&missing),
            Err(Error::ImageUnavailable { .. })
        ));
    }
}
