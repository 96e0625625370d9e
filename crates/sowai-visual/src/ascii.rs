//! ASCII preview of a single generated digit
//!
//! Works on raw model samples, row-major, without the display flip.

/// Two-character cell for a raw sample
pub fn ascii_cell(sample: f32) -> &'static str {
    if sample > 0.5 {
        "##"
    } else if sample > 0.0 {
        "::"
    } else if sample > -0.5 {
        ".."
    } else {
        "  "
    }
}

/// Render one `width × height` image, one line per row
pub fn render_ascii(image: &[f32], width: usize, height: usize) -> String {
    let mut out = String::with_capacity(height * (width * 2 + 1));
    for row in image.chunks(width).take(height) {
        for sample in row {
            out.push_str(ascii_cell(*sample));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_thresholds() {
        assert_eq!(ascii_cell(0.9), "##");
        assert_eq!(ascii_cell(0.5), "::");
        assert_eq!(ascii_cell(0.1), "::");
        assert_eq!(ascii_cell(0.0), "..");
        assert_eq!(ascii_cell(-0.5), "  ");
        assert_eq!(ascii_cell(-1.0), "  ");
    }

    #[test]
    fn test_render_rows() {
        let image = [1.0, 0.2, -0.2, -1.0];
        let text = render_ascii(&image, 2, 2);
        assert_eq!(text, "##::\n..  \n");
    }
}
