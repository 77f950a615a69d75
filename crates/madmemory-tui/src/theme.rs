use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Frame around the display and buttons
    pub border: Color,
    /// Text on the display
    pub display: Color,
    /// Button face when not selected
    pub button_bg: Color,
    /// Button face when selected
    pub button_selected_bg: Color,
    /// Unlit indicator
    pub led_off: Color,
    /// Indicator of a selected button
    pub led_selected: Color,
    /// Indicator of a cleared stage
    pub led_cleared: Color,
    /// Strike pulse
    pub pulse_red: Color,
    /// Pass pulse
    pub pulse_green: Color,
    /// Status text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 130, g: 140, b: 170 },
            display: Color::Rgb { r: 120, g: 255, b: 160 },
            button_bg: Color::Rgb { r: 45, g: 50, b: 65 },
            button_selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            led_off: Color::Rgb { r: 60, g: 60, b: 70 },
            led_selected: Color::Rgb { r: 255, g: 210, b: 60 },
            led_cleared: Color::Rgb { r: 90, g: 230, b: 120 },
            pulse_red: Color::Rgb { r: 255, g: 70, b: 70 },
            pulse_green: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::White,
            display: Color::Green,
            button_bg: Color::Rgb { r: 30, g: 30, b: 30 },
            button_selected_bg: Color::Blue,
            led_off: Color::DarkGrey,
            led_selected: Color::Yellow,
            led_cleared: Color::Green,
            pulse_red: Color::Red,
            pulse_green: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }
}
