//! Colour themes for the dashboard

use ratatui::style::{Color, Modifier, Style};

use crate::view::{Segment, Tone};

#[derive(Clone, Debug)]
pub struct Theme {
    pub name: String,

    pub border: Color,
    pub title: Color,
    pub text: Color,
    pub label: Color,
    pub highlight: Color,
    pub muted: Color,

    pub success: Color,
    pub warning: Color,
    pub error: Color,

    /// Background of the selected task row
    pub selection: Color,
}

impl Theme {
    /// Unknown names fall back to matrix.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => Self::matrix(),
        }
    }

    /// Green on black
    pub fn matrix() -> Self {
        Self {
            name: "matrix".to_string(),
            border: Color::Rgb(0, 100, 0),
            title: Color::Rgb(0, 255, 0),
            text: Color::Rgb(0, 200, 0),
            label: Color::Rgb(0, 128, 0),
            highlight: Color::Rgb(0, 255, 127),
            muted: Color::Rgb(0, 90, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            selection: Color::Rgb(0, 60, 0),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            border: Color::Rgb(70, 70, 80),
            title: Color::Rgb(100, 200, 255),
            text: Color::Rgb(200, 200, 200),
            label: Color::Rgb(128, 128, 140),
            highlight: Color::Rgb(0, 191, 255),
            muted: Color::Rgb(100, 100, 110),
            success: Color::Rgb(50, 205, 50),
            warning: Color::Rgb(255, 165, 0),
            error: Color::Rgb(255, 69, 0),
            selection: Color::Rgb(40, 40, 55),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            border: Color::Rgb(180, 180, 190),
            title: Color::Rgb(30, 30, 40),
            text: Color::Rgb(50, 50, 60),
            label: Color::Rgb(100, 100, 110),
            highlight: Color::Rgb(0, 120, 215),
            muted: Color::Rgb(140, 140, 150),
            success: Color::Rgb(0, 128, 0),
            warning: Color::Rgb(200, 130, 0),
            error: Color::Rgb(200, 0, 0),
            selection: Color::Rgb(220, 228, 240),
        }
    }

    pub fn color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Text => self.text,
            Tone::Label => self.label,
            Tone::Highlight => self.highlight,
            Tone::Success => self.success,
            Tone::Warning => self.warning,
            Tone::Error => self.error,
            Tone::Muted => self.muted,
        }
    }

    pub fn style(&self, segment: &Segment) -> Style {
        let style = Style::default().fg(self.color(segment.tone));
        if segment.bold {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("Dark").name, "dark");
        assert_eq!(Theme::from_name("light").name, "light");
        assert_eq!(Theme::from_name("neon").name, "matrix");
    }

    #[test]
    fn test_bold_segment_style() {
        let theme = Theme::dark();
        let style = theme.style(&Segment::new("RUNNING", Tone::Success).bold());
        assert_eq!(style.fg, Some(theme.success));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
