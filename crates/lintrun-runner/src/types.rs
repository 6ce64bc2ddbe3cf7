//! Types used by the runner module

use std::ops::BitOr;

/// Which output streams of a child are captured and returned.
///
/// Only three values exist: [`OutputStream::STDOUT`], [`OutputStream::STDERR`]
/// and [`OutputStream::BOTH`] (the union of the other two).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputStream(u8);

impl OutputStream {
    pub const STDOUT: Self = Self(0b01);
    pub const STDERR: Self = Self(0b10);
    pub const BOTH: Self = Self(0b11);

    #[must_use]
    pub const fn includes_stdout(self) -> bool {
        self.0 & Self::STDOUT.0 != 0
    }

    #[must_use]
    pub const fn includes_stderr(self) -> bool {
        self.0 & Self::STDERR.0 != 0
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self.0 {
            0b01 => "stdout",
            0b10 => "stderr",
            _ => "both",
        }
    }
}

impl Default for OutputStream {
    fn default() -> Self {
        Self::BOTH
    }
}

impl BitOr for OutputStream {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Identity of the context that requested a run, e.g. an editor buffer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey(pub u64);

impl std::fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
