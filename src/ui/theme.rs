use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub running: Color,
    pub paused: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub danger: Color,
    /// Low, medium, high CPU.
    pub heat_colors: [Color; 3],
}

impl Theme {
    pub fn from_config(theme_name: &str) -> Self {
        match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Rgb(217, 119, 87),
            header_accent_fg: Color::Black,
            status_ok: Color::Green,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            selection_bg: Color::Rgb(49, 50, 68),
            selection_fg: Color::White,
            running: Color::Rgb(52, 211, 153),
            paused: Color::Rgb(250, 204, 21),
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            danger: Color::Rgb(239, 68, 68),
            heat_colors: [
                Color::Rgb(148, 163, 184),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Rgb(194, 65, 12),
            header_accent_fg: Color::White,
            status_ok: Color::Rgb(21, 128, 61),
            status_err: Color::Rgb(185, 28, 28),
            statusbar_bg: Color::Rgb(229, 231, 235),
            overlay_border: Color::Rgb(156, 163, 175),
            text_primary: Color::Black,
            text_secondary: Color::Rgb(75, 85, 99),
            selection_bg: Color::Rgb(219, 234, 254),
            selection_fg: Color::Black,
            running: Color::Rgb(21, 128, 61),
            paused: Color::Rgb(161, 98, 7),
            pill_key_bg: Color::Rgb(30, 64, 175),
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Rgb(243, 244, 246),
            danger: Color::Rgb(185, 28, 28),
            heat_colors: [
                Color::Rgb(75, 85, 99),
                Color::Rgb(194, 65, 12),
                Color::Rgb(185, 28, 28),
            ],
        }
    }

    pub fn cpu_color(&self, cpu_percent: f32) -> Color {
        if cpu_percent >= 50.0 {
            self.heat_colors[2]
        } else if cpu_percent >= 10.0 {
            self.heat_colors[1]
        } else {
            self.heat_colors[0]
        }
    }
}
