//! Program database (PDB) procedure symbols.

use std::fs::File;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use pdb::{FallibleIterator, LineProgram, PdbInternalSectionOffset, StringTable, SymbolData, PDB};
use tracing::{debug, trace};

use super::{DebugInfoFormat, SymbolSession};
use crate::error::{LocatorError, LocatorResult};
use crate::types::SymbolRecord;

/// Session over a PDB file.
///
/// Walks the module streams of the DBI stream and yields every procedure
/// symbol (`S_GPROC32`/`S_LPROC32`). The location of a procedure is the
/// first line its module's line program maps into the procedure's code range.
pub struct PdbSession
{
    path: PathBuf,
    pdb: PDB<'static, File>,
}

impl PdbSession
{
    /// Open `path` and read the MSF header.
    ///
    /// ## Errors
    ///
    /// [`LocatorError::UnreadableDebugInfo`] when the file cannot be opened or
    /// is not a valid PDB.
    pub fn open(path: &Path) -> LocatorResult<Self>
    {
        let file = File::open(path).map_err(|err| LocatorError::unreadable(path, err))?;
        let pdb = PDB::open(file).map_err(|err| LocatorError::unreadable(path, err))?;
        debug!(path = %path.display(), "Opened program database");

        Ok(Self {
            path: path.to_path_buf(),
            pdb,
        })
    }

    fn unreadable(&self, err: pdb::Error) -> LocatorError
    {
        LocatorError::unreadable(&self.path, err)
    }
}

impl SymbolSession for PdbSession
{
    fn path(&self) -> &Path
    {
        &self.path
    }

    fn format(&self) -> DebugInfoFormat
    {
        DebugInfoFormat::Pdb
    }

    fn for_each_symbol(&mut self, visitor: &mut dyn FnMut(SymbolRecord) -> ControlFlow<()>) -> LocatorResult<()>
    {
        // Without the names stream file names are unknown, records still flow.
        let strings = match self.pdb.string_table() {
            Ok(strings) => Some(strings),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "PDB has no string table");
                None
            }
        };

        let dbi = self.pdb.debug_information().map_err(|err| self.unreadable(err))?;
        let mut modules = dbi.modules().map_err(|err| self.unreadable(err))?;

        while let Some(module) = modules.next().map_err(|err| self.unreadable(err))? {
            let module_name = module.module_name().into_owned();
            let info = match self.pdb.module_info(&module) {
                Ok(Some(info)) => info,
                Ok(None) => continue,
                Err(err) => {
                    debug!(module = %module_name, error = %err, "Skipping unreadable PDB module");
                    continue;
                }
            };

            let program = info.line_program().ok();
            let mut symbols = match info.symbols() {
                Ok(symbols) => symbols,
                Err(err) => {
                    debug!(module = %module_name, error = %err, "Skipping PDB module without symbols");
                    continue;
                }
            };

            while let Some(symbol) = symbols.next().map_err(|err| self.unreadable(err))? {
                // Unknown symbol kinds fail to parse; they are never procedures.
                let Ok(SymbolData::Procedure(procedure)) = symbol.parse() else {
                    continue;
                };

                let (file, line) = program
                    .as_ref()
                    .and_then(|program| first_line(program, procedure.offset, procedure.len, strings.as_ref()))
                    .unwrap_or_default();

                let name = procedure.name.to_string().into_owned();
                trace!(symbol = %name, file = %file, line, "PDB procedure");
                let record = SymbolRecord::new(name, file, line).with_module(module_name.clone());
                if visitor(record).is_break() {
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}

/// First source line inside the `len` code bytes of the procedure at `offset`.
///
/// `lines_for_symbol` falls back to the nearest preceding line block, which
/// belongs to another procedure when this one has no lines of its own.
fn first_line(
    program: &LineProgram<'_>,
    offset: PdbInternalSectionOffset,
    len: u32,
    strings: Option<&StringTable<'_>>,
) -> Option<(String, u32)>
{
    let code = offset.offset..offset.offset.saturating_add(len.max(1));
    let line = program
        .lines_for_symbol(offset)
        .find(|line| Ok(line.offset.section == offset.section && code.contains(&line.offset.offset)))
        .ok()??;
    let file = strings.and_then(|strings| {
        let info = program.get_file_info(line.file_index).ok()?;
        info.name.to_string_lossy(strings).ok().map(|name| name.into_owned())
    });
    Some((file.unwrap_or_default(), line.line_start))
}
