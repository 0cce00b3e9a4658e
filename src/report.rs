//! Writing the report records

use std::io::{self, Write};

use crate::tree::PathKey;

/// Record terminator between reported paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Terminator {
    #[default]
    Newline,
    /// NUL, for `xargs -0` and paths that contain newlines
    Nul,
}

impl Terminator {
    pub fn from_print0(print0: bool) -> Self {
        if print0 {
            Self::Nul
        } else {
            Self::Newline
        }
    }

    fn byte(self) -> u8 {
        match self {
            Self::Newline => b'\n',
            Self::Nul => b'\0',
        }
    }
}

pub struct Reporter<W: Write> {
    out: W,
    terminator: Terminator,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, terminator: Terminator) -> Self {
        Self { out, terminator }
    }

    /// Write every path's raw bytes followed by the terminator, returning the record count
    pub fn emit<'a, I>(&mut self, entries: I) -> io::Result<usize>
    where
        I: IntoIterator<Item = &'a PathKey>,
    {
        let mut written = 0;
        for entry in entries {
            self.out.write_all(entry.as_bytes())?;
            self.out.write_all(&[self.terminator.byte()])?;
            written += 1;
        }
        self.out.flush()?;
        Ok(written)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
