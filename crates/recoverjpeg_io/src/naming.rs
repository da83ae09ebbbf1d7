//! Output file naming.
//!
//! File and directory names come from printf-style templates holding exactly
//! one integer conversion, e.g. `image%05d.jpg` or `dir%03d`.

use recoverjpeg_core::{CoreError, Result};
use std::path::PathBuf;

pub const DEFAULT_FILE_FORMAT: &str = "image%05d.jpg";

/// Images sharing one directory when a directory template is set.
const IMAGES_PER_DIRECTORY: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Decimal,
    LowerHex,
    UpperHex,
    Octal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Conversion {
    zero_pad: bool,
    left_align: bool,
    width: usize,
    radix: Radix,
}

/// A parsed name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFormat {
    prefix: String,
    conversion: Conversion,
    suffix: String,
}

impl NameFormat {
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            CoreError::InvalidFormat(format!("name template {template:?}: {reason}"))
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut conversion = None;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            let literal = if conversion.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };

            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }
            if conversion.is_some() {
                return Err(invalid("more than one conversion"));
            }

            let mut zero_pad = false;
            let mut left_align = false;
            while let Some(&flag) = chars.peek() {
                match flag {
                    '0' => zero_pad = true,
                    '-' => left_align = true,
                    _ => break,
                }
                chars.next();
            }

            let mut width = 0usize;
            while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
                width = width
                    .checked_mul(10)
                    .and_then(|w| w.checked_add(digit as usize))
                    .ok_or_else(|| invalid("field width too large"))?;
                chars.next();
            }

            while matches!(chars.peek(), Some('l' | 'h' | 'z' | 'j')) {
                chars.next();
            }

            let radix = match chars.next() {
                Some('d' | 'i' | 'u') => Radix::Decimal,
                Some('x') => Radix::LowerHex,
                Some('X') => Radix::UpperHex,
                Some('o') => Radix::Octal,
                Some(other) => return Err(invalid(&format!("unsupported conversion '%{other}'"))),
                None => return Err(invalid("dangling '%'")),
            };

            conversion = Some(Conversion {
                zero_pad: zero_pad && !left_align,
                left_align,
                width,
                radix,
            });
        }

        let conversion = conversion.ok_or_else(|| invalid("missing integer conversion"))?;
        Ok(Self {
            prefix,
            conversion,
            suffix,
        })
    }

    pub fn render(&self, value: u64) -> String {
        let digits = match self.conversion.radix {
            Radix::Decimal => value.to_string(),
            Radix::LowerHex => format!("{value:x}"),
            Radix::UpperHex => format!("{value:X}"),
            Radix::Octal => format!("{value:o}"),
        };

        let width = self.conversion.width;
        let field = if self.conversion.left_align {
            format!("{digits:<width$}")
        } else if self.conversion.zero_pad {
            format!("{digits:0>width$}")
        } else {
            format!("{digits:>width$}")
        };

        format!("{}{}{}", self.prefix, field, self.suffix)
    }
}

/// Where each recovered image goes.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    file_format: NameFormat,
    dir_format: Option<NameFormat>,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, file_format: NameFormat) -> Self {
        Self {
            root: root.into(),
            file_format,
            dir_format: None,
        }
    }

    /// Buckets images into directories of 100, named
    /// from `index / IMAGES_PER_DIRECTORY`.
    pub fn with_dir_format(mut self, dir_format: NameFormat) -> Self {
        self.dir_format = Some(dir_format);
        self
    }

    pub fn directory_for(&self, index: u64) -> PathBuf {
        match &self.dir_format {
            Some(format) => self.root.join(format.render(index / IMAGES_PER_DIRECTORY)),
            None => self.root.clone(),
        }
    }

    pub fn path_for(&self, index: u64) -> PathBuf {
        self.directory_for(index).join(self.file_format.render(index))
    }
}
