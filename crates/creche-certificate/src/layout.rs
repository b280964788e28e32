//! Plain-text page layout: word wrapping and alignment.
//!
//! Widths are counted in characters, not bytes, so accented text lines up.

/// Greedy word wrap of `text` into lines of at most `width` characters.
/// Words longer than `width` are split.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);
  let mut lines = Vec::new();
  let mut line = String::new();
  let mut line_len = 0usize;

  for word in text.split_whitespace() {
    let mut word: Vec<char> = word.chars().collect();

    while word.len() > width {
      if line_len > 0 {
        lines.push(std::mem::take(&mut line));
        line_len = 0;
      }
      let rest = word.split_off(width);
      lines.push(word.into_iter().collect());
      word = rest;
    }

    let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
    if needed > width && line_len > 0 {
      lines.push(std::mem::take(&mut line));
      line_len = 0;
    }
    if line_len > 0 {
      line.push(' ');
      line_len += 1;
    }
    line.extend(word.iter());
    line_len += word.len();
  }

  if line_len > 0 {
    lines.push(line);
  }
  lines
}

pub(crate) fn align_right(text: &str, width: usize) -> String {
  let pad = width.saturating_sub(text.chars().count());
  format!("{}{}", " ".repeat(pad), text)
}

pub(crate) fn center(text: &str, width: usize) -> String {
  let pad = width.saturating_sub(text.chars().count()) / 2;
  format!("{}{}", " ".repeat(pad), text)
}
