//! Clipboard access through the terminal
//!
//! OSC 52 asks the terminal emulator to set the system clipboard, which
//! also works over SSH. Whether the terminal honours it cannot be observed,
//! so success only means the sequence was written.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;
use std::io::{self, Write};

/// Somewhere text can be copied to
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// OSC 52 clipboard writing to any terminal stream
#[derive(Debug)]
pub struct Osc52Clipboard<W> {
    out: W,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        debug!("Copying {} bytes through OSC 52", text.len());
        self.out.write_all(osc52_sequence(text).as_bytes())?;
        self.out.flush()
    }
}

/// Escape sequence that sets the clipboard to `text`
pub fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}
