//! # Symbol Store Reader
//!
//! Opens debug-info files and streams their function symbols as
//! [`SymbolRecord`]s (raw name, module, source file, line).
//!
//! ## Formats
//!
//! The format is detected from the file's content, not its extension:
//!
//! - **PDB** (MSF 7.00): read with the `pdb` crate. Procedure symbols of
//!   every module, located through the module's line program.
//! - **Object files** (ELF, Mach-O, PE/COFF): parsed with `object`. Text
//!   symbols from the symbol table, located through DWARF via `addr2line`.
//!
//! Anything else is [`LocatorError::UnreadableDebugInfo`].
//!
//! ## Sessions
//!
//! [`open`] returns a [`SymbolSession`] that owns the file for its whole
//! lifetime and releases it when dropped. A session is scanned once with
//! [`SymbolSession::for_each_symbol`]; callers that need another pass open a
//! new session.

pub mod demangle;
mod image;
mod pdb;

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::ops::ControlFlow;
use std::path::Path;

use crate::error::{LocatorError, LocatorResult};
use crate::types::SymbolRecord;

pub use self::image::ImageSession;
pub use self::pdb::PdbSession;

const PDB_MAGIC: &[u8] = b"Microsoft C/C++ MSF 7.00\r\n\x1aDS\0\0\0";

/// Debug-info container formats understood by [`open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugInfoFormat
{
    /// Microsoft program database.
    Pdb,
    /// Executable or object file (ELF, Mach-O, PE/COFF) with optional DWARF.
    Object,
}

impl fmt::Display for DebugInfoFormat
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            DebugInfoFormat::Pdb => "pdb",
            DebugInfoFormat::Object => "object",
        };
        write!(f, "{label}")
    }
}

/// An open debug-info file.
pub trait SymbolSession
{
    /// Path this session was opened from.
    fn path(&self) -> &Path;

    /// Container format of the file.
    fn format(&self) -> DebugInfoFormat;

    /// Stream every function symbol to `visitor`, in file order.
    ///
    /// Symbols without line data are delivered with `line == 0`. Returning
    /// [`ControlFlow::Break`] from the visitor ends the scan early and is not
    /// an error. Records delivered before an `Err` are valid.
    ///
    /// ## Errors
    ///
    /// [`LocatorError::UnreadableDebugInfo`] when the file turns out to be
    /// corrupt part-way through.
    fn for_each_symbol(&mut self, visitor: &mut dyn FnMut(SymbolRecord) -> ControlFlow<()>) -> LocatorResult<()>;

    /// Collect every record. Convenience for tests and small files.
    ///
    /// ## Errors
    ///
    /// Same as [`SymbolSession::for_each_symbol`].
    fn all_symbols(&mut self) -> LocatorResult<Vec<SymbolRecord>>
    {
        let mut records = Vec::new();
        self.for_each_symbol(&mut |record| {
            records.push(record);
            ControlFlow::Continue(())
        })?;
        Ok(records)
    }
}

/// Factory for [`SymbolSession`]s.
///
/// The resolver only talks to this trait, so tests can feed it canned
/// symbols without real debug-info files.
pub trait SymbolSource: Send + Sync
{
    /// Open `path` for scanning.
    ///
    /// ## Errors
    ///
    /// [`LocatorError::UnreadableDebugInfo`] when the file is missing, corrupt
    /// or of an unsupported format.
    fn open(&self, path: &Path) -> LocatorResult<Box<dyn SymbolSession>>;
}

/// The production [`SymbolSource`], backed by [`open`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSymbolSource;

impl SymbolSource for DefaultSymbolSource
{
    fn open(&self, path: &Path) -> LocatorResult<Box<dyn SymbolSession>>
    {
        open(path)
    }
}

/// Detect the format of `path` and open a session on it.
///
/// ## Errors
///
/// [`LocatorError::UnreadableDebugInfo`] when the file cannot be opened or
/// parsed.
pub fn open(path: &Path) -> LocatorResult<Box<dyn SymbolSession>>
{
    match detect_format(path)? {
        DebugInfoFormat::Pdb => Ok(Box::new(PdbSession::open(path)?)),
        DebugInfoFormat::Object => Ok(Box::new(ImageSession::open(path)?)),
    }
}

/// Sniff the container format from the first bytes of `path`.
///
/// Anything that is not a PDB is handed to `object`, which reports its own
/// parse failure for unknown content.
///
/// ## Errors
///
/// [`LocatorError::UnreadableDebugInfo`] when the file cannot be read.
pub fn detect_format(path: &Path) -> LocatorResult<DebugInfoFormat>
{
    let mut header = [0u8; PDB_MAGIC.len()];
    let mut file = File::open(path).map_err(|err| LocatorError::unreadable(path, err))?;
    let read = read_prefix(&mut file, &mut header).map_err(|err| LocatorError::unreadable(path, err))?;

    if header[..read] == *PDB_MAGIC {
        Ok(DebugInfoFormat::Pdb)
    } else {
        Ok(DebugInfoFormat::Object)
    }
}

fn read_prefix(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize>
{
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
