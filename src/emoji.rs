//! Emoji glyph table and the pure text transformation behind `clean-emojis`.
//!
//! The table is data: callers hand an [`EmojiTable`] to [`clean_text`], so the
//! glyph list can be extended or swapped in tests without touching file IO.
use regex::Regex;

/// Glyphs removed from the firmware sources, applied in this order.
///
/// Entries carrying a variation selector (`U+FE0F`) are removed as one unit;
/// the bare base character is not in the table.
pub const FIRMWARE_GLYPHS: &[&str] = &[
    "\u{1F4E1}",          // satellite antenna
    "\u{1F50D}",          // magnifying glass
    "\u{1F389}",          // party popper
    "\u{1F6F0}\u{FE0F}",  // satellite
    "\u{23F0}",           // alarm clock
    "\u{1F4CD}",          // round pushpin
    "\u{1F310}",          // globe with meridians
    "\u{1F4AC}",          // speech balloon
    "\u{2705}",           // check mark button
    "\u{274C}",           // cross mark
    "\u{1F50B}",          // battery
    "\u{1F4CA}",          // bar chart
    "\u{1F4C4}",          // page facing up
    "\u{1F6A7}",          // construction
    "\u{1F3AF}",          // direct hit
    "\u{1F527}",          // wrench
    "\u{1F4DA}",          // books
    "\u{26A1}",           // high voltage
    "\u{1F7E1}",          // yellow circle
    "\u{1F504}",          // counterclockwise arrows
    "\u{1F4F1}",          // mobile phone
    "\u{1F194}",          // ID button
    "\u{1F512}",          // locked
    "\u{1F6A8}",          // police car light
    "\u{1F4C8}",          // chart increasing
    "\u{1F4C9}",          // chart decreasing
    "\u{1F4BE}",          // floppy disk
    "\u{1F50C}",          // electric plug
    "\u{2699}\u{FE0F}",   // gear
    "\u{1F6E1}\u{FE0F}",  // shield
    "\u{1F4CB}",          // clipboard
    "\u{1F3A8}",          // artist palette
    "\u{1F513}",          // unlocked
    "\u{1F514}",          // bell
    "\u{1F3AD}",          // performing arts
    "\u{1F3AA}",          // circus tent
    "\u{1F680}",          // rocket
    "\u{1F4A1}",          // light bulb
    "\u{1F525}",          // fire
    "\u{2B50}",           // star
    "\u{1F38A}",          // confetti ball
    "\u{1F388}",          // balloon
    "\u{1F381}",          // wrapped gift
    "\u{1F195}",          // NEW button
    "\u{1F510}",          // locked with key
    "\u{1F4AF}",          // hundred points
    "\u{26A0}\u{FE0F}",   // warning
    "\u{1F4DD}",          // memo
    "\u{1F9EA}",          // test tube
    "\u{1F4ED}",          // open mailbox with lowered flag
    "\u{1F4F6}",          // antenna bars
    "\u{1F517}",          // link
    "\u{23F3}",           // hourglass not done
];

/// Immutable glyph removal table.
#[derive(Debug, Clone, Copy)]
pub struct EmojiTable<'a> {
    glyphs: &'a [&'a str],
}

impl EmojiTable<'static> {
    /// The table used by the firmware project.
    pub fn firmware() -> Self {
        Self::new(FIRMWARE_GLYPHS)
    }
}

impl<'a> EmojiTable<'a> {
    pub fn new(glyphs: &'a [&'a str]) -> Self {
        Self { glyphs }
    }

    pub fn glyphs(&self) -> &'a [&'a str] {
        self.glyphs
    }

    /// Remove every table glyph, one entry at a time.
    pub fn strip(&self, text: &str) -> String {
        let mut out = text.to_string();
        for glyph in self.glyphs.iter().filter(|glyph| !glyph.is_empty()) {
            if out.contains(glyph) {
                out = out.replace(glyph, "");
            }
        }
        out
    }
}

/// Per-line whitespace fixes applied after glyph removal.
#[derive(Debug)]
pub struct LineTidier {
    double_space: Regex,
    log_literal: Regex,
}

impl LineTidier {
    pub fn new() -> Self {
        Self {
            double_space: Regex::new(r" {2,}").expect("regex for repeated spaces"),
            log_literal: Regex::new(r#"(ESP_LOG[A-Z]\(TAG, "[^"]*?) +""#)
                .expect("regex for log literal"),
        }
    }

    /// Collapse space runs, then trim spaces before the closing quote of
    /// `ESP_LOGx(TAG, "...")` literals.
    pub fn tidy(&self, line: &str) -> String {
        let collapsed = self.double_space.replace_all(line, " ");
        self.log_literal
            .replace_all(&collapsed, "${1}\"")
            .into_owned()
    }
}

impl Default for LineTidier {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip glyphs from `content`, then tidy each `\n`-separated line.
pub fn clean_text(content: &str, table: &EmojiTable<'_>) -> String {
    let tidier = LineTidier::new();
    let stripped = table.strip(content);
    stripped
        .split('\n')
        .map(|line| tidier.tidy(line))
        .collect::<Vec<_>>()
        .join("\n")
}
