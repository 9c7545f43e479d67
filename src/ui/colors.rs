use ratatui::style::Color;

/// Prefix of the selected list entry.
pub const RIGHT_ARROW: &str = "▶ ";

/// Common colors
pub const GRAY_COLOR: Color = Color::Indexed(237);
pub const BLACK_COLOR: Color = Color::Indexed(234);
pub const WHITE_COLOR: Color = Color::White;

// Footer
pub const FOOTER_BG: Color = GRAY_COLOR;
pub const FOOTER_KEY_FG: Color = Color::Yellow;

// Panels
pub const PANEL_BORDER: Color = Color::DarkGray;
pub const PANEL_FOCUSED_BORDER: Color = Color::Cyan;
pub const INPUT_FOCUSED_BORDER: Color = Color::Yellow;
pub const PLACEHOLDER_FG: Color = Color::DarkGray;
pub const LABEL_FG: Color = Color::Gray;

// Status
pub const STATUS_BUSY_FG: Color = Color::Yellow;
pub const STATUS_OK_FG: Color = Color::Green;
pub const STATUS_ERROR_FG: Color = Color::Red;

// History list
pub const HISTORY_HIGHLIGHT_BG: Color = GRAY_COLOR;
pub const HISTORY_DATE_FG: Color = Color::Cyan;
pub const HISTORY_LOCATION_FG: Color = WHITE_COLOR;
pub const HISTORY_NOTES_FG: Color = Color::Gray;

// Weather card
pub const CARD_VALUE_FG: Color = WHITE_COLOR;
pub const CARD_TEMPERATURE_FG: Color = Color::LightYellow;

// Help
pub const HELP_BG: Color = Color::Blue;
pub const HELP_BORDER_FG: Color = Color::White;
pub const HELP_HEADER_FG: Color = Color::Yellow;
pub const HELP_HIGHLIGHT_FG: Color = Color::LightBlue;

// Messages
pub const MESSAGE_INFO_FG: Color = WHITE_COLOR;
pub const MESSAGE_BORDER: Color = Color::Blue;
pub const MESSAGE_ERROR_FG: Color = Color::Red;
pub const CONFIRM_FG: Color = BLACK_COLOR;
pub const CONFIRM_BG: Color = Color::Yellow;
