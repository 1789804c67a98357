//! Raster images that can be placed on a report page.
//!
//! Posters arrive as JPEG bytes.  They are decoded with the [`image`] crate to validate them and to
//! learn their natural size, and the original bytes are then embedded unchanged behind a
//! `/DCTDecode` filter so the page carries the exact image the catalog served.

use image::{GenericImageView, ImageFormat};
use lopdf::{Dictionary, Object, Stream};

use crate::error::RenderError;

/// A decoded JPEG ready to be embedded as an image XObject.
#[derive(Clone, Debug)]
pub struct JpegImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    components: u8,
    adobe_cmyk: bool,
}

impl JpegImage {
    /// Decodes `bytes`, rejecting anything that is not a JPEG.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, RenderError> {
        let bytes = bytes.into();
        let format = image::guess_format(&bytes)?;
        if format != ImageFormat::Jpeg {
            return Err(RenderError::UnsupportedImage(format!(
                "expected JPEG data, found {:?}",
                format
            )));
        }

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)?;
        let (width, height) = decoded.dimensions();
        let header = scan_header(&bytes);
        let components = header
            .components
            .unwrap_or_else(|| decoded.color().channel_count());

        Ok(Self {
            bytes,
            width,
            height,
            components,
            adobe_cmyk: header.adobe && components == 4,
        })
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the size in points after scaling the natural size by `factor`, one pixel per point.
    pub fn scaled(&self, factor: f32) -> (f32, f32) {
        (self.width as f32 * factor, self.height as f32 * factor)
    }

    fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }

    /// Builds the image XObject stream wrapping the original JPEG bytes.
    pub fn to_xobject(&self) -> Stream {
        let mut dictionary = Dictionary::new();
        dictionary.set("Type", Object::Name("XObject".into()));
        dictionary.set("Subtype", Object::Name("Image".into()));
        dictionary.set("Width", Object::Integer(i64::from(self.width)));
        dictionary.set("Height", Object::Integer(i64::from(self.height)));
        dictionary.set("ColorSpace", Object::Name(self.color_space().into()));
        dictionary.set("BitsPerComponent", Object::Integer(8));
        dictionary.set("Filter", Object::Name("DCTDecode".into()));
        if self.adobe_cmyk {
            // Adobe writes CMYK JPEGs inverted.
            dictionary.set(
                "Decode",
                Object::Array([1, 0, 1, 0, 1, 0, 1, 0].map(Object::Integer).to_vec()),
            );
        }
        Stream::new(dictionary, self.bytes.clone())
    }
}

/// What the marker segments ahead of the image data say about a JPEG.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct JpegHeader {
    /// Component count from the first start-of-frame marker.
    components: Option<u8>,
    /// Whether an Adobe APP14 segment precedes the frame.
    adobe: bool,
}

/// Walks the marker segments up to the first start-of-frame marker.
fn scan_header(bytes: &[u8]) -> JpegHeader {
    let mut header = JpegHeader::default();
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return header;
    }

    let mut index = 2;
    while index + 4 <= bytes.len() {
        if bytes[index] != 0xFF {
            break;
        }
        let marker = bytes[index + 1];
        if marker == 0xFF {
            index += 1;
            continue;
        }
        let length = usize::from(u16::from_be_bytes([bytes[index + 2], bytes[index + 3]]));
        let segment = bytes.get(index + 4..index + 2 + length).unwrap_or_default();
        if marker == 0xEE && segment.starts_with(b"Adobe") {
            header.adobe = true;
        }
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            // precision(1) height(2) width(2) components(1)
            header.components = segment.get(5).copied();
            break;
        }
        index += 2 + length;
    }

    header
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Luma, Rgb};

    use super::*;

    fn encode(image: DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("encode fixture");
        bytes
    }

    #[test]
    fn reads_natural_size_and_color_space() {
        let rgb = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(40, 60, Rgb([200, 30, 30])));
        let image = JpegImage::from_bytes(encode(rgb, ImageOutputFormat::Jpeg(90))).unwrap();

        assert_eq!((image.width(), image.height()), (40, 60));
        assert_eq!(image.scaled(0.5), (20.0, 30.0));
        assert_eq!(image.color_space(), "DeviceRGB");
    }

    #[test]
    fn grayscale_jpeg_uses_gray_color_space() {
        let gray = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(8, 8, Luma([128])));
        let image = JpegImage::from_bytes(encode(gray, ImageOutputFormat::Jpeg(90))).unwrap();
        assert_eq!(image.color_space(), "DeviceGray");
    }

    #[test]
    fn rejects_non_jpeg_images() {
        let rgb = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(4, 4, Rgb([0, 0, 0])));
        let err = JpegImage::from_bytes(encode(rgb, ImageOutputFormat::Png)).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedImage(_)));
    }

    /// Marker segments of a 4-component baseline JPEG, optionally with an Adobe APP14 segment.
    fn cmyk_header(adobe: bool) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        if adobe {
            bytes.extend_from_slice(&[0xFF, 0xEE, 0x00, 0x0E]);
            bytes.extend_from_slice(b"Adobe");
            bytes.extend_from_slice(&[0x00, 0x64, 0x00, 0x00, 0x00, 0x00, 0x02]);
        }
        bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x14, 0x08, 0x00, 0x10, 0x00, 0x20, 0x04]);
        for id in 1..=4u8 {
            bytes.extend_from_slice(&[id, 0x11, 0x00]);
        }
        bytes
    }

    fn cmyk_image(header: &[u8]) -> JpegImage {
        let scanned = scan_header(header);
        JpegImage {
            bytes: header.to_vec(),
            width: 32,
            height: 16,
            components: scanned.components.unwrap_or(3),
            adobe_cmyk: scanned.adobe && scanned.components == Some(4),
        }
    }

    #[test]
    fn scans_component_count_and_adobe_marker() {
        assert_eq!(
            scan_header(&cmyk_header(true)),
            JpegHeader {
                components: Some(4),
                adobe: true
            }
        );
        assert_eq!(
            scan_header(&cmyk_header(false)),
            JpegHeader {
                components: Some(4),
                adobe: false
            }
        );
        assert_eq!(scan_header(b"not a jpeg"), JpegHeader::default());
    }

    #[test]
    fn only_adobe_cmyk_is_inverted() {
        let adobe = cmyk_image(&cmyk_header(true)).to_xobject();
        assert_eq!(
            adobe.dict.get(b"ColorSpace").and_then(Object::as_name).ok(),
            Some(&b"DeviceCMYK"[..])
        );
        let decode = adobe
            .dict
            .get(b"Decode")
            .and_then(Object::as_array)
            .expect("decode array");
        let values: Vec<_> = decode.iter().filter_map(|value| value.as_i64().ok()).collect();
        assert_eq!(values, [1, 0, 1, 0, 1, 0, 1, 0]);

        let plain = cmyk_image(&cmyk_header(false)).to_xobject();
        assert_eq!(
            plain.dict.get(b"ColorSpace").and_then(Object::as_name).ok(),
            Some(&b"DeviceCMYK"[..])
        );
        assert!(plain.dict.get(b"Decode").is_err());
    }

    #[test]
    fn rgb_jpeg_has_no_decode_array() {
        let rgb = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(8, 8, Rgb([10, 20, 30])));
        let image = JpegImage::from_bytes(encode(rgb, ImageOutputFormat::Jpeg(90))).unwrap();
        assert!(!image.adobe_cmyk);
        assert!(image.to_xobject().dict.get(b"Decode").is_err());
    }

    #[test]
    fn rejects_garbage() {
        let err = JpegImage::from_bytes(b"definitely not an image".to_vec()).unwrap_err();
        assert!(matches!(err, RenderError::Image(_)));
    }
}
