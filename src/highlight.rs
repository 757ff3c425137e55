use inksac::prelude::*;

/// Styles the shell's own diagnostics, falling back to plain text on
/// terminals without color support.
#[derive(Debug, Clone, Copy)]
pub struct MessageStyle {
    color_support: ColorSupport,
}

impl Default for MessageStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStyle {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn error(&self, message: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return message.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();

        message.style(error_style).to_string()
    }

    pub fn notice(&self, message: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return message.to_string();
        }

        let notice_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();

        message.style(notice_style).to_string()
    }
}
