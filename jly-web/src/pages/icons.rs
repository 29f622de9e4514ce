//! Link icon glyphs
//!
//! Closed lookup from [`Icon`] to inline SVG. Adding an icon variant fails to
//! compile until it has a glyph here.

use jly_common::Icon;

const SVG_OPEN: &str = r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">"#;

fn glyph_paths(icon: Icon) -> &'static str {
    match icon {
        Icon::Youtube => {
            r#"<path d="M2.5 17a24.12 24.12 0 0 1 0-10 2 2 0 0 1 1.4-1.4 49.56 49.56 0 0 1 16.2 0A2 2 0 0 1 21.5 7a24.12 24.12 0 0 1 0 10 2 2 0 0 1-1.4 1.4 49.55 49.55 0 0 1-16.2 0A2 2 0 0 1 2.5 17"/><path d="m10 15 5-3-5-3z"/>"#
        }
        Icon::Crown => {
            r#"<path d="m2 4 3 12h14l3-12-6 7-4-7-4 7-6-7zm3 16h14"/>"#
        }
        Icon::Headphones => {
            r#"<path d="M3 14h3a2 2 0 0 1 2 2v3a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-7a9 9 0 0 1 18 0v7a2 2 0 0 1-2 2h-1a2 2 0 0 1-2-2v-3a2 2 0 0 1 2-2h3"/>"#
        }
        Icon::Music => {
            r#"<path d="M9 18V5l12-2v13"/><circle cx="6" cy="18" r="3"/><circle cx="18" cy="16" r="3"/>"#
        }
        Icon::AtSign => {
            r#"<circle cx="12" cy="12" r="4"/><path d="M16 8v5a3 3 0 0 0 6 0v-1a10 10 0 1 0-4 8"/>"#
        }
        Icon::Image => {
            r#"<rect width="18" height="18" x="3" y="3" rx="2" ry="2"/><circle cx="9" cy="9" r="2"/><path d="m21 15-3.086-3.086a2 2 0 0 0-2.828 0L6 21"/>"#
        }
    }
}

pub fn icon_svg(icon: Icon) -> String {
    format!("{}{}</svg>", SVG_OPEN, glyph_paths(icon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_icon_has_a_distinct_glyph() {
        let glyphs: Vec<&str> = Icon::ALL.iter().map(|icon| glyph_paths(*icon)).collect();
        for (i, a) in glyphs.iter().enumerate() {
            assert!(!a.is_empty());
            for b in &glyphs[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(icon_svg(Icon::Music).ends_with("</svg>"));
    }
}
