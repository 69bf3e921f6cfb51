use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::{CapabilityError, PageSize, Rect};

/// One image to be drawn on its own page at `rect`.
#[derive(Debug, Clone)]
pub struct PagePlacement {
    pub image: DynamicImage,
    pub rect: Rect,
}

/// Turns ordered image placements into a single PDF document.
pub trait PdfAssembler: Send + Sync {
    fn assemble(&self, page: PageSize, placements: &[PagePlacement])
        -> Result<Vec<u8>, CapabilityError>;
}

/// Decodes any raster format the `image` crate recognizes from its content.
pub fn decode_image(name: &str, bytes: &[u8]) -> Result<DynamicImage, CapabilityError> {
    image::load_from_memory(bytes).map_err(|err| CapabilityError::Decode {
        name: name.to_string(),
        message: err.to_string(),
    })
}

/// Embeds every image as a DCT (JPEG) XObject, one page per placement.
#[derive(Debug, Clone)]
pub struct LopdfAssembler {
    jpeg_quality: u8,
}

impl LopdfAssembler {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }
}

impl Default for LopdfAssembler {
    fn default() -> Self {
        Self::new(92)
    }
}

impl PdfAssembler for LopdfAssembler {
    fn assemble(
        &self,
        page: PageSize,
        placements: &[PagePlacement],
    ) -> Result<Vec<u8>, CapabilityError> {
        if placements.is_empty() {
            return Err(CapabilityError::NoInput);
        }

        let page_width = PageSize::mm_to_points(page.width) as f32;
        let page_height = PageSize::mm_to_points(page.height) as f32;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let media_box: Vec<Object> = vec![
            0.0f32.into(),
            0.0f32.into(),
            page_width.into(),
            page_height.into(),
        ];
        let mut kids: Vec<Object> = Vec::with_capacity(placements.len());

        for placement in placements {
            let image_stream = self.image_stream(&placement.image)?;
            let image_id = doc.add_object(image_stream);

            let rect = placement.rect;
            let width = PageSize::mm_to_points(rect.width) as f32;
            let height = PageSize::mm_to_points(rect.height) as f32;
            let x = PageSize::mm_to_points(rect.x) as f32;
            // PDF user space grows upwards from the bottom-left corner.
            let y = page_height - PageSize::mm_to_points(rect.y) as f32 - height;

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            width.into(),
                            0.0f32.into(),
                            0.0f32.into(),
                            height.into(),
                            x.into(),
                            y.into(),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let encoded = content
                .encode()
                .map_err(|err| CapabilityError::Assembly(err.to_string()))?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        "Im0" => image_id,
                    },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|err| CapabilityError::Assembly(err.to_string()))?;
        Ok(out)
    }
}

impl LopdfAssembler {
    fn image_stream(&self, image: &DynamicImage) -> Result<Stream, CapabilityError> {
        let rgb = flatten_on_white(image);
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|err| CapabilityError::Assembly(err.to_string()))?;

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(rgb.width()),
            "Height" => i64::from(rgb.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        };
        Ok(Stream::new(dict, jpeg).with_compression(false))
    }
}

/// JPEG has no alpha channel; transparent pixels are composited over white.
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |channel: u8| -> u8 {
            ((u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
