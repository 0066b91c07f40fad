//! Raster images as image XObjects.
//!
//! Images are written as soon as they are opened, while fonts wait for
//! the document to close. An image opened in the middle of a page ends
//! the page's current content segment; a new segment starts right after
//! the XObject.
//!
//! Openers that can't read or recognise their file return `Ok(None)`.

mod ccitt;
mod gif;
mod jpeg;
#[cfg(feature = "tiff")]
mod tiff;

pub use ccitt::CcittParams;

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::document::{Document, ProcSet};
use crate::error::{ErrorHandler, PdfError, Result};
use crate::objects::ObjectId;
use crate::source::{self, DataSource, MemorySource};
use crate::writer::PdfWriter;

/// Width the CCITT filter assumes when `/Columns` is absent.
const CCITT_DEFAULT_COLUMNS: u32 = 1728;

/// Largest thumbnail viewers are expected to handle, in pixels.
const THUMBNAIL_MAX: u32 = 106;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
    DeviceCMYK,
}

impl ColorSpace {
    pub fn from_components(components: u8) -> Option<Self> {
        match components {
            1 => Some(ColorSpace::DeviceGray),
            3 => Some(ColorSpace::DeviceRGB),
            4 => Some(ColorSpace::DeviceCMYK),
            _ => None,
        }
    }

    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
        }
    }

    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// How the pixel data handed to the writer is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Ccitt,
    Dct,
    Flate,
}

impl Compression {
    fn filter_name(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Ccitt => Some("CCITTFaxDecode"),
            Compression::Dct => Some("DCTDecode"),
            Compression::Flate => Some("FlateDecode"),
        }
    }
}

/// Where the pixel data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// Embedded in the output.
    Direct,
    /// An external file, referenced by name.
    File(String),
    /// An external resource, referenced by URL.
    Url(String),
}

/// Encoding of the data passed to [`Document::open_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Ccitt,
    Raw,
}

impl FromStr for ImageKind {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "jpeg" => Ok(ImageKind::Jpeg),
            "ccitt" => Ok(ImageKind::Ccitt),
            "raw" => Ok(ImageKind::Raw),
            other => Err(PdfError::value(format!(
                "Bogus image type '{}' in open_image",
                other
            ))),
        }
    }
}

/// Pixel data passed to [`Document::open_image`].
#[derive(Debug, Clone, Copy)]
pub enum ImageData<'a> {
    Memory(&'a [u8]),
    FileRef(&'a str),
    Url(&'a str),
}

/// Everything the XObject writer needs to know about an image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u8,
    pub color_space: ColorSpace,
    /// Palette of an indexed image; its base is always RGB.
    pub colormap: Option<Vec<[u8; 3]>>,
    pub compression: Compression,
    pub reference: ImageReference,
    /// Set for JPEGs with an Adobe marker, whose CMYK data is inverted.
    pub adobe: bool,
    pub ccitt: Option<CcittParams>,
    /// Resolution found in the file, 0 when unknown.
    pub dpi: f64,
}

impl ImageDescriptor {
    pub(crate) fn new(width: u32, height: u32, color_space: ColorSpace) -> Self {
        Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            colormap: None,
            compression: Compression::None,
            reference: ImageReference::Direct,
            adobe: false,
            ccitt: None,
            dpi: 0.0,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.colormap.is_some()
    }
}

/// An image recognised by one of the openers, ready to be written.
pub(crate) struct OpenedImage<'a> {
    pub(crate) descriptor: ImageDescriptor,
    pub(crate) source: Option<Box<dyn DataSource + 'a>>,
    pub(crate) warnings: Vec<String>,
}

impl<'a> OpenedImage<'a> {
    pub(crate) fn new(descriptor: ImageDescriptor, source: Box<dyn DataSource + 'a>) -> Self {
        Self {
            descriptor,
            source: Some(source),
            warnings: Vec::new(),
        }
    }

    /// An image whose data stays outside the document.
    pub(crate) fn referenced(descriptor: ImageDescriptor) -> Self {
        Self {
            descriptor,
            source: None,
            warnings: Vec::new(),
        }
    }
}

/// Handle of an open image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(usize);

impl ImageHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What is kept of an image once it has been written.
#[derive(Debug, Clone)]
pub struct ImageSlot {
    width: u32,
    height: u32,
    dpi: f64,
    color: bool,
    indexed: bool,
    xobject: usize,
}

impl ImageSlot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Resource name, `I<n>`.
    pub fn name(&self) -> String {
        format!("I{}", self.xobject)
    }
}

#[derive(Debug, Clone, Copy)]
struct XObject {
    id: ObjectId,
    used_on_current_page: bool,
}

/// Open images plus every XObject written so far. Image slots are
/// reused after [`close`](Self::close); XObjects are never removed.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    slots: Vec<Option<ImageSlot>>,
    xobjects: Vec<XObject>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, descriptor: &ImageDescriptor, id: ObjectId) -> ImageHandle {
        let xobject = self.xobjects.len();
        self.xobjects.push(XObject {
            id,
            used_on_current_page: false,
        });

        let slot = ImageSlot {
            width: descriptor.width,
            height: descriptor.height,
            dpi: descriptor.dpi,
            color: descriptor.color_space.components() == 3 || descriptor.is_indexed(),
            indexed: descriptor.is_indexed(),
            xobject,
        };
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                self.slots[index] = Some(slot);
                ImageHandle(index)
            }
            None => {
                self.slots.push(Some(slot));
                ImageHandle(self.slots.len() - 1)
            }
        }
    }

    pub fn get(&self, handle: ImageHandle) -> Result<&ImageSlot> {
        self.slots
            .get(handle.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| PdfError::value(format!("Bad image number {}", handle.0)))
    }

    pub fn close(&mut self, handle: ImageHandle) -> Result<()> {
        self.get(handle)?;
        self.slots[handle.0] = None;
        Ok(())
    }

    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn xobject_id(&self, slot: &ImageSlot) -> ObjectId {
        self.xobjects[slot.xobject].id
    }

    fn mark_used(&mut self, xobject: usize) {
        self.xobjects[xobject].used_on_current_page = true;
    }

    /// Write the page's `/XObject` resources and reset the usage flags.
    pub(crate) fn write_page_xobjects<W: Write>(&mut self, writer: &mut PdfWriter<W>) -> Result<()> {
        if !self.xobjects.iter().any(|x| x.used_on_current_page) {
            return Ok(());
        }
        writer.write_str("/XObject ")?;
        writer.begin_dict()?;
        for (index, xobject) in self.xobjects.iter_mut().enumerate() {
            if xobject.used_on_current_page {
                write!(writer, "/I{} {}\n", index, xobject.id)?;
                xobject.used_on_current_page = false;
            }
        }
        writer.end_dict()
    }
}

fn write_ccitt_params<W: Write>(
    writer: &mut PdfWriter<W>,
    descriptor: &ImageDescriptor,
) -> Result<()> {
    if descriptor.width != CCITT_DEFAULT_COLUMNS {
        write!(writer, "/Columns {} ", descriptor.width)?;
    }
    write!(writer, "/Rows {} ", descriptor.height)?;
    if let Some(params) = &descriptor.ccitt {
        params.write(writer)?;
    }
    writer.write_str(">>]\n")
}

fn write_colormap<W: Write>(writer: &mut PdfWriter<W>, colormap: &[[u8; 3]]) -> Result<ObjectId> {
    let id = writer.begin_obj(None)?;
    writer.begin_dict()?;
    let pending = writer.promise_length()?;
    writer.end_dict()?;

    let stream = writer.begin_stream(pending)?;
    let bytes: Vec<u8> = colormap.iter().flatten().copied().collect();
    writer.write_bytes(&bytes)?;
    let length = writer.measure(stream);
    // the newline stays outside the counted length
    writer.write_bytes(b"\nendstream\n")?;
    writer.end_obj()?;
    writer.write_length(length)?;
    Ok(id)
}

/// Write an image XObject, preceded by its colormap when indexed, and
/// return the XObject's id. Uncompressed data is deflated when
/// `compress` is set; `ascii_hex` hex-encodes whatever is embedded.
pub(crate) fn put_image<W: Write>(
    writer: &mut PdfWriter<W>,
    descriptor: &ImageDescriptor,
    src: Option<&mut (dyn DataSource + '_)>,
    compress: bool,
    ascii_hex: bool,
) -> Result<ObjectId> {
    let colormap_id = match &descriptor.colormap {
        Some(colormap) => Some(write_colormap(writer, colormap)?),
        None => None,
    };

    let id = writer.begin_obj(None)?;
    writer.begin_dict()?;
    writer.write_str("/Type /XObject\n")?;
    writer.write_str("/Subtype /Image\n")?;
    write!(writer, "/Width {}\n", descriptor.width)?;
    write!(writer, "/Height {}\n", descriptor.height)?;
    write!(writer, "/BitsPerComponent {}\n", descriptor.bits_per_component)?;

    writer.write_str("/ColorSpace ")?;
    match (&descriptor.colormap, colormap_id) {
        (Some(colormap), Some(colormap_id)) => write!(
            writer,
            "[/Indexed /DeviceRGB {} {} ]\n",
            colormap.len().saturating_sub(1),
            colormap_id
        )?,
        _ => write!(writer, "/{}\n", descriptor.color_space.pdf_name())?,
    }

    let src = match (&descriptor.reference, src) {
        (ImageReference::Direct, Some(src)) => src,
        (ImageReference::Direct, None) => {
            return Err(PdfError::InvalidStructure(
                "embedded image without data".to_string(),
            ))
        }
        (reference, _) => {
            write_reference(writer, descriptor, reference)?;
            return Ok(id);
        }
    };

    let mut compression = descriptor.compression;
    if ascii_hex {
        writer.write_str("/Filter [/ASCIIHexDecode ")?;
        if let Some(filter) = compression.filter_name() {
            write!(writer, "/{}", filter)?;
        }
        writer.write_str("]\n")?;
    } else {
        if compression == Compression::None && compress {
            compression = Compression::Flate;
        }
        if let Some(filter) = compression.filter_name() {
            write!(writer, "/Filter [/{}]\n", filter)?;
        }
    }

    if compression == Compression::Ccitt {
        write!(writer, "/DecodeParms [{} <<", if ascii_hex { "null" } else { "" })?;
        write_ccitt_params(writer, descriptor)?;
    }

    if compression == Compression::Dct
        && descriptor.adobe
        && descriptor.color_space == ColorSpace::DeviceCMYK
    {
        writer.write_str("/Decode [1 0 1 0 1 0 1 0]\n")?;
    }

    let pending = writer.promise_length()?;
    writer.end_dict()?;

    let stream = writer.begin_stream(pending)?;
    if ascii_hex {
        source::ascii_hex_encode(writer, src)?;
    } else if compression == Compression::Flate && compress {
        crate::compression::compress(writer, src)?;
    } else {
        source::copy(writer, src)?;
    }
    let length = writer.end_stream(stream)?;
    writer.end_obj()?;
    writer.write_length(length)?;

    Ok(id)
}

/// Dictionary tail and empty stream of an image kept outside the file.
fn write_reference<W: Write>(
    writer: &mut PdfWriter<W>,
    descriptor: &ImageDescriptor,
    reference: &ImageReference,
) -> Result<()> {
    if let Some(filter) = descriptor.compression.filter_name() {
        write!(writer, "/FFilter [/{}]\n", filter)?;
    }
    if descriptor.compression == Compression::Ccitt {
        writer.write_str("/FDecodeParms [<<")?;
        write_ccitt_params(writer, descriptor)?;
    }

    match reference {
        ImageReference::File(name) => {
            writer.write_str("/F ")?;
            writer.write_quoted(name.as_bytes())?;
            writer.write_str(" /Length 0 ")?;
        }
        ImageReference::Url(url) => {
            writer.write_str("/F << /FS /URL /F ")?;
            writer.write_quoted(url.as_bytes())?;
            writer.write_str(" >> /Length 0 ")?;
        }
        ImageReference::Direct => {}
    }
    writer.end_dict()?;
    writer.write_str("stream\nendstream\n")?;
    writer.end_obj()
}

impl<W: Write, H: ErrorHandler> Document<W, H> {
    /// Write an opened image and register it.
    fn put_opened(&mut self, opened: OpenedImage<'_>) -> Result<ImageHandle> {
        let OpenedImage {
            descriptor,
            mut source,
            warnings,
        } = opened;
        for warning in warnings {
            self.warn(warning);
        }

        let in_page = self.in_page();
        if in_page {
            self.end_contents_section()?;
        }

        let compress = self.settings.compressing();
        let ascii_hex = self.settings.ascii_hex();
        let id = put_image(
            &mut self.writer,
            &descriptor,
            source.as_deref_mut(),
            compress,
            ascii_hex,
        )?;

        if in_page {
            self.begin_contents_section()?;
        }

        let handle = self.images.insert(&descriptor, id);
        tracing::debug!(
            "Image {} written as {} ({}x{})",
            handle.index(),
            id,
            descriptor.width,
            descriptor.height
        );
        Ok(handle)
    }

    fn put_if_opened(&mut self, opened: Option<OpenedImage<'_>>) -> Result<Option<ImageHandle>> {
        match opened {
            Some(opened) => self.put_opened(opened).map(Some),
            None => Ok(None),
        }
    }

    /// Open a baseline or progressive JPEG file. The compressed data is
    /// passed through unchanged.
    pub fn open_jpeg(&mut self, path: impl AsRef<Path>) -> Result<Option<ImageHandle>> {
        let path = path.as_ref();
        self.guard(|doc| doc.put_if_opened(jpeg::open(path)))
    }

    /// Open the first image of a GIF file.
    pub fn open_gif(&mut self, path: impl AsRef<Path>) -> Result<Option<ImageHandle>> {
        let path = path.as_ref();
        self.guard(|doc| doc.put_if_opened(gif::open(path)))
    }

    /// Open an 8-bit gray, RGB or CMYK TIFF file. Without the `tiff`
    /// feature no file is recognised.
    pub fn open_tiff(&mut self, path: impl AsRef<Path>) -> Result<Option<ImageHandle>> {
        let path = path.as_ref();
        #[cfg(feature = "tiff")]
        let opened = tiff::open(path);
        #[cfg(not(feature = "tiff"))]
        let opened = {
            tracing::debug!("TIFF support not compiled in, ignoring {}", path.display());
            None
        };
        self.guard(|doc| doc.put_if_opened(opened))
    }

    /// Open a file of raw G3 or G4 fax data.
    pub fn open_ccitt(
        &mut self,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        params: CcittParams,
    ) -> Result<Option<ImageHandle>> {
        let path = path.as_ref();
        self.guard(|doc| {
            if width == 0 || height == 0 {
                return Err(PdfError::value(format!(
                    "Bogus CCITT image size {}x{}",
                    width, height
                )));
            }
            doc.put_if_opened(ccitt::open(path, width, height, params))
        })
    }

    /// Register image data the caller has already prepared.
    ///
    /// Raw data in memory must hold exactly `width * height * components`
    /// bytes. `ccitt` is only meaningful for [`ImageKind::Ccitt`].
    #[allow(clippy::too_many_arguments)]
    pub fn open_image(
        &mut self,
        kind: ImageKind,
        data: ImageData<'_>,
        width: u32,
        height: u32,
        components: u8,
        bits_per_component: u8,
        ccitt: Option<CcittParams>,
    ) -> Result<ImageHandle> {
        self.guard(|doc| {
            if kind != ImageKind::Ccitt && ccitt.map_or(false, |p| !p.is_default()) {
                doc.warn("Unnecessary CCITT params in open_image");
            }

            let color_space = ColorSpace::from_components(components).ok_or_else(|| {
                PdfError::value(format!(
                    "Bogus number of components ({}) in open_image",
                    components
                ))
            })?;

            let mut descriptor = ImageDescriptor::new(width, height, color_space);
            descriptor.bits_per_component = bits_per_component;
            descriptor.compression = match kind {
                ImageKind::Jpeg => Compression::Dct,
                ImageKind::Ccitt => Compression::Ccitt,
                ImageKind::Raw => Compression::None,
            };
            let params = if kind == ImageKind::Ccitt {
                ccitt.unwrap_or_default()
            } else {
                CcittParams::default()
            };
            if kind == ImageKind::Ccitt {
                descriptor.ccitt = Some(params);
            }

            let opened = match data {
                ImageData::Memory(bytes) => {
                    let expected = width as u64 * height as u64 * components as u64;
                    if kind == ImageKind::Raw && bytes.len() as u64 != expected {
                        return Err(PdfError::value(format!(
                            "Bogus image data length '{}' in open_image",
                            bytes.len()
                        )));
                    }
                    let source: Box<dyn DataSource + '_> = if params.bit_reverse {
                        Box::new(source::BitReverse::new(MemorySource::new(bytes)))
                    } else {
                        Box::new(MemorySource::new(bytes))
                    };
                    OpenedImage::new(descriptor, source)
                }
                ImageData::FileRef(name) => {
                    descriptor.reference = ImageReference::File(name.to_string());
                    OpenedImage::referenced(descriptor)
                }
                ImageData::Url(url) => {
                    descriptor.reference = ImageReference::Url(url.to_string());
                    OpenedImage::referenced(descriptor)
                }
            };
            doc.put_opened(opened)
        })
    }

    /// Draw an image with its lower left corner at `(x, y)`, one pixel
    /// mapping to `scale` units.
    pub fn place_image(&mut self, image: ImageHandle, x: f64, y: f64, scale: f64) -> Result<()> {
        self.guard(|doc| {
            let slot = doc.images.get(image)?.clone();
            doc.require_page("place_image")?;
            if scale == 0.0 {
                return Err(PdfError::value(format!(
                    "Scale factor 0 for image {}",
                    image.index()
                )));
            }

            doc.page.procset |= if slot.color {
                ProcSet::IMAGE_C
            } else {
                ProcSet::IMAGE_B
            };
            if slot.indexed {
                doc.page.procset |= ProcSet::IMAGE_I;
            }

            doc.end_text()?;
            doc.begin_contents_section()?;

            doc.writer.write_str("q\n")?;
            doc.write_concat(
                slot.width as f64 * scale,
                0.0,
                0.0,
                slot.height as f64 * scale,
                x,
                y,
            )?;
            write!(doc.writer, "/{} Do\n", slot.name())?;
            doc.images.mark_used(slot.xobject);
            doc.writer.write_str("Q\n")
        })
    }

    /// Use an image as the thumbnail of the current page.
    pub fn add_thumbnail(&mut self, image: ImageHandle) -> Result<()> {
        self.guard(|doc| {
            let slot = doc.images.get(image)?.clone();
            doc.require_page("add_thumbnail")?;
            if slot.width > THUMBNAIL_MAX || slot.height > THUMBNAIL_MAX {
                doc.warn("Thumbnail image too large");
            }
            doc.page.thumb = Some(doc.images.xobject_id(&slot));
            Ok(())
        })
    }

    /// Free an image's slot. Pages already drawn keep using the XObject.
    pub fn close_image(&mut self, image: ImageHandle) -> Result<()> {
        self.guard(|doc| doc.images.close(image))
    }

    pub fn image_width(&mut self, image: ImageHandle) -> Result<u32> {
        self.guard(|doc| doc.images.get(image).map(ImageSlot::width))
    }

    pub fn image_height(&mut self, image: ImageHandle) -> Result<u32> {
        self.guard(|doc| doc.images.get(image).map(ImageSlot::height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(writer: PdfWriter<Vec<u8>>) -> String {
        String::from_utf8_lossy(&writer.into_inner()).into_owned()
    }

    #[test]
    fn test_raw_gray_image_uncompressed() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let descriptor = ImageDescriptor::new(2, 2, ColorSpace::DeviceGray);
        let mut src = MemorySource::new(vec![0u8, 85, 170, 255]);

        let id = put_image(&mut writer, &descriptor, Some(&mut src), false, false).unwrap();
        assert_eq!(id, ObjectId::new(1));

        let out = writer.into_inner();
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with(
            "1 0 obj\n<</Type /XObject\n/Subtype /Image\n/Width 2\n/Height 2\n\
             /BitsPerComponent 8\n/ColorSpace /DeviceGray\n/Length 2 0 R\n>>\nstream\n"
        ));
        assert!(!text.contains("/Filter"));
        assert!(text.ends_with("endstream\nendobj\n2 0 obj\n4\nendobj\n"));
    }

    #[test]
    fn test_indexed_image_writes_colormap_first() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let mut descriptor = ImageDescriptor::new(1, 1, ColorSpace::DeviceRGB);
        descriptor.colormap = Some(vec![[0, 0, 0], [255, 255, 255]]);
        let mut src = MemorySource::new(vec![1u8]);

        let id = put_image(&mut writer, &descriptor, Some(&mut src), false, false).unwrap();
        // colormap 1, its length 2, the image 3
        assert_eq!(id, ObjectId::new(3));

        let text = output(writer);
        assert!(text.starts_with("1 0 obj\n<</Length 2 0 R\n>>\nstream\n"));
        assert!(text.contains("\nendstream\nendobj\n2 0 obj\n6\nendobj\n"));
        assert!(text.contains("/ColorSpace [/Indexed /DeviceRGB 1 1 0 R ]\n"));
    }

    #[test]
    fn test_ascii_hex_filter_array() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let mut descriptor = ImageDescriptor::new(1, 1, ColorSpace::DeviceRGB);
        descriptor.compression = Compression::Dct;
        let mut src = MemorySource::new(vec![0xFFu8, 0xD8]);

        put_image(&mut writer, &descriptor, Some(&mut src), true, true).unwrap();
        let text = output(writer);
        assert!(text.contains("/Filter [/ASCIIHexDecode /DCTDecode]\n"));
        assert!(text.contains("stream\nFFD8>\nendstream\n"));
    }

    #[test]
    fn test_ccitt_decode_parms() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let mut descriptor = ImageDescriptor::new(1728, 100, ColorSpace::DeviceGray);
        descriptor.bits_per_component = 1;
        descriptor.compression = Compression::Ccitt;
        descriptor.ccitt = Some(CcittParams {
            k: -1,
            black_is_1: true,
            bit_reverse: false,
        });
        let mut src = MemorySource::new(vec![0u8; 4]);

        put_image(&mut writer, &descriptor, Some(&mut src), true, false).unwrap();
        let text = output(writer);
        assert!(text.contains("/Filter [/CCITTFaxDecode]\n"));
        assert!(text.contains("/DecodeParms [ <</Rows 100 /K -1 /BlackIs1 true >>]\n"));
    }

    #[test]
    fn test_referenced_image_has_empty_stream() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let mut descriptor = ImageDescriptor::new(10, 10, ColorSpace::DeviceRGB);
        descriptor.compression = Compression::Dct;
        descriptor.reference = ImageReference::Url("http://example.com/a.jpg".into());

        put_image(&mut writer, &descriptor, None, true, false).unwrap();
        let text = output(writer);
        assert!(text.contains("/FFilter [/DCTDecode]\n"));
        assert!(text.ends_with(
            "/F << /FS /URL /F (http://example.com/a.jpg) >> /Length 0 >>\nstream\nendstream\nendobj\n"
        ));
    }

    #[test]
    fn test_registry_reuses_closed_slots() {
        let mut registry = ImageRegistry::new();
        let descriptor = ImageDescriptor::new(4, 3, ColorSpace::DeviceGray);

        let a = registry.insert(&descriptor, ObjectId::new(5));
        let b = registry.insert(&descriptor, ObjectId::new(7));
        registry.close(a).unwrap();
        assert!(registry.get(a).is_err());
        assert!(registry.close(a).is_err());

        let c = registry.insert(&descriptor, ObjectId::new(9));
        assert_eq!(c, a);
        // the XObject number keeps growing
        assert_eq!(registry.get(c).unwrap().name(), "I2");
        assert_eq!(registry.get(b).unwrap().width(), 4);
        assert_eq!(registry.open_count(), 2);
    }

    #[test]
    fn test_page_xobjects_reset_after_write() {
        let mut registry = ImageRegistry::new();
        let descriptor = ImageDescriptor::new(1, 1, ColorSpace::DeviceGray);
        registry.insert(&descriptor, ObjectId::new(4));
        registry.insert(&descriptor, ObjectId::new(6));
        registry.mark_used(1);

        let mut writer = PdfWriter::new_with_writer(Vec::new());
        registry.write_page_xobjects(&mut writer).unwrap();
        // nothing used on the next page, so no dictionary at all
        registry.write_page_xobjects(&mut writer).unwrap();
        assert_eq!(output(writer), "/XObject <</I1 6 0 R\n>>\n");
    }

    #[test]
    fn test_image_kind_names() {
        assert_eq!("raw".parse::<ImageKind>().unwrap(), ImageKind::Raw);
        assert!("png".parse::<ImageKind>().is_err());
    }
}
