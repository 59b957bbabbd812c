//! Minimal PDF 1.4 object writer.
//!
//! Objects are written in id order so the cross-reference table is a plain
//! list of offsets. No timestamps or ids are emitted: equal input gives equal
//! bytes.

use std::fmt::Write as _;

use image::RgbImage;

/// A4 in points.
pub const PAGE_WIDTH_PT: f64 = 595.28;
pub const PAGE_HEIGHT_PT: f64 = 841.89;

/// Content stream of one page.
#[derive(Debug, Default)]
pub struct PageContent {
    ops: Vec<u8>,
}

impl PageContent {
    /// Draw encoded text with its baseline at (`x`, `y`) points.
    pub fn text(&mut self, font: &str, size: f64, x: f64, y: f64, bytes: &[u8]) {
        let mut line = format!("BT /{} {:.2} Tf {:.2} {:.2} Td (", font, size, x, y).into_bytes();
        line.extend(escape(bytes));
        line.extend_from_slice(b") Tj ET\n");
        self.ops.extend(line);
    }

    /// Paint the `/Im1` image into the given box, origin at the bottom-left.
    pub fn image(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let mut op = String::new();
        let _ = writeln!(op, "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im1 Do Q", w, h, x, y);
        self.ops.extend(op.into_bytes());
    }
}

fn escape(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' | b'(' | b')' => {
                out.push(b'\\');
                out.push(b);
            }
            0..=31 => out.push(b' '),
            _ => out.push(b),
        }
    }
    out
}

/// Assemble a document from page contents, two Helvetica faces and an
/// optional image shared by all pages.
pub fn assemble(pages: &[PageContent], image: Option<&RgbImage>) -> Vec<u8> {
    let mut objects: Vec<Vec<u8>> = Vec::new();

    // 1 catalog, 2 page tree, 3-4 fonts, then the image, then page/content pairs.
    let first_page_id = if image.is_some() { 6 } else { 5 };
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| first_page_id + 2 * i).collect();

    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .into_bytes(),
    );

    for base_font in ["Helvetica", "Helvetica-Bold"] {
        objects.push(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                base_font
            )
            .into_bytes(),
        );
    }

    if let Some(img) = image {
        let data = img.as_raw();
        let mut obj = format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8 /Length {} >>\nstream\n",
            img.width(),
            img.height(),
            data.len()
        )
        .into_bytes();
        obj.extend_from_slice(data);
        obj.extend_from_slice(b"\nendstream");
        objects.push(obj);
    }

    let xobjects = if image.is_some() {
        " /XObject << /Im1 5 0 R >>"
    } else {
        ""
    };
    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << /F1 3 0 R /F2 4 0 R >>{} >> /Contents {} 0 R >>",
                PAGE_WIDTH_PT,
                PAGE_HEIGHT_PT,
                xobjects,
                id + 1
            )
            .into_bytes(),
        );
        let mut content = format!("<< /Length {} >>\nstream\n", page.ops.len()).into_bytes();
        content.extend_from_slice(&page.ops);
        content.extend_from_slice(b"endstream");
        objects.push(content);
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend(format!("{} 0 obj\n", i + 1).into_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    out.extend(xref.into_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_escape_delimiters() {
        assert_eq!(escape(b"a(b)c\\"), b"a\\(b\\)c\\\\".to_vec());
        assert_eq!(escape(b"x\ny"), b"x y".to_vec());
    }

    #[test]
    fn test_startxref_points_at_xref_table() {
        let mut page = PageContent::default();
        page.text("F1", 12.0, 10.0, 10.0, b"Bonjour");
        let pdf = assemble(&[page], None);

        let marker = find(&pdf, b"startxref\n").unwrap() + b"startxref\n".len();
        let end = marker + pdf[marker..].iter().position(|&b| b == b'\n').unwrap();
        let offset: usize = std::str::from_utf8(&pdf[marker..end]).unwrap().parse().unwrap();
        assert!(pdf[offset..].starts_with(b"xref\n"));
    }

    #[test]
    fn test_object_offsets_are_exact() {
        let pages = vec![PageContent::default(), PageContent::default()];
        let pdf = assemble(&pages, None);
        let xref = find(&pdf, b"xref\n").unwrap();
        let table = std::str::from_utf8(&pdf[xref..]).unwrap().to_string();
        for (i, line) in table.lines().skip(3).take(8).enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            let header = format!("{} 0 obj\n", i + 1);
            assert!(pdf[offset..].starts_with(header.as_bytes()), "object {}", i + 1);
        }
    }

    #[test]
    fn test_image_object_is_referenced() {
        let img = RgbImage::new(2, 2);
        let mut page = PageContent::default();
        page.image(0.0, 0.0, 10.0, 10.0);
        let pdf = assemble(&[page], Some(&img));
        assert!(find(&pdf, b"/Subtype /Image /Width 2 /Height 2").is_some());
        assert!(find(&pdf, b"/XObject << /Im1 5 0 R >>").is_some());
        assert!(find(&pdf, b"/Kids [6 0 R]").is_some());
    }
}
