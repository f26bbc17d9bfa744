//! Underline markup in menu labels.
//!
//! A label may mark one character as its mnemonic by wrapping it in
//! underscores: `"_F_ile"` displays as `File` with the `F` underlined. Only
//! ASCII letters and digits can be marked, and only the first marker counts;
//! any later markers are left in the text verbatim.

/// A label with its underline markup extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLabel {
    /// The label with the first marker's underscores removed.
    pub text: String,
    /// Byte index of the underlined character in `text`.
    pub underline_index: Option<usize>,
    /// The mnemonic character, lowercased.
    pub mnemonic_char: Option<char>,
}

impl FormattedLabel {
    /// Wraps a label that carries no markup.
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            underline_index: None,
            mnemonic_char: None,
        }
    }
}

/// Extracts `_x_` underline markup from a label.
pub fn format_label(label: &str) -> FormattedLabel {
    let bytes = label.as_bytes();

    let mut i = 0;
    while i + 2 < bytes.len() {
        if bytes[i] == b'_' && bytes[i + 1].is_ascii_alphanumeric() && bytes[i + 2] == b'_' {
            let mnemonic = bytes[i + 1] as char;
            let mut text = String::with_capacity(label.len() - 2);
            text.push_str(&label[..i]);
            text.push(mnemonic);
            text.push_str(&label[i + 3..]);

            return FormattedLabel {
                text,
                underline_index: Some(i),
                mnemonic_char: Some(mnemonic.to_ascii_lowercase()),
            };
        }

        i += 1;
    }

    FormattedLabel::plain(label)
}
