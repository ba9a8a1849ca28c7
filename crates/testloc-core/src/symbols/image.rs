//! Object file symbol tables located through DWARF.

use std::borrow::Cow;
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use addr2line::Context;
use gimli::{Dwarf, EndianArcSlice, RunTimeEndian, SectionId};
use object::{Object, ObjectSection, ObjectSymbol, SymbolKind};
use once_cell::unsync::OnceCell;
use tracing::{debug, trace};

use super::{DebugInfoFormat, SymbolSession};
use crate::error::{LocatorError, LocatorResult};
use crate::types::SymbolRecord;

type OwnedReader = EndianArcSlice<RunTimeEndian>;

/// Session over an ELF, Mach-O or PE/COFF file.
///
/// The whole file is read into memory on open. DWARF line tables are loaded
/// the first time a location is needed, so files without any text symbols
/// never pay for them.
pub struct ImageSession
{
    path: PathBuf,
    module: String,
    data: Arc<[u8]>,
    endian: RunTimeEndian,
    context: OnceCell<Option<Context<OwnedReader>>>,
}

impl ImageSession
{
    /// Read and validate `path`.
    ///
    /// ## Errors
    ///
    /// [`LocatorError::UnreadableDebugInfo`] when the file cannot be read or
    /// is not an object file `object` understands.
    pub fn open(path: &Path) -> LocatorResult<Self>
    {
        let bytes = fs::read(path).map_err(|err| LocatorError::unreadable(path, err))?;
        let data = Arc::<[u8]>::from(bytes);
        let file = object::File::parse(&*data).map_err(|err| LocatorError::unreadable(path, err))?;

        let endian = if file.is_little_endian() {
            RunTimeEndian::Little
        } else {
            RunTimeEndian::Big
        };

        debug!(path = %path.display(), format = ?file.format(), "Opened object file");

        Ok(Self {
            path: path.to_path_buf(),
            module: path
                .file_name()
                .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned()),
            data,
            endian,
            context: OnceCell::new(),
        })
    }

    fn context(&self, file: &object::File<'_>) -> Option<&Context<OwnedReader>>
    {
        self.context
            .get_or_init(|| match load_context(file, self.endian) {
                Ok(context) => Some(context),
                Err(err) => {
                    debug!(path = %self.path.display(), error = %err, "No usable DWARF line information");
                    None
                }
            })
            .as_ref()
    }
}

impl SymbolSession for ImageSession
{
    fn path(&self) -> &Path
    {
        &self.path
    }

    fn format(&self) -> DebugInfoFormat
    {
        DebugInfoFormat::Object
    }

    fn for_each_symbol(&mut self, visitor: &mut dyn FnMut(SymbolRecord) -> ControlFlow<()>) -> LocatorResult<()>
    {
        let data = Arc::clone(&self.data);
        let file = object::File::parse(&*data).map_err(|err| LocatorError::unreadable(&self.path, err))?;

        // Split debug files produced by `objcopy --only-keep-debug` may carry
        // their function symbols in the dynamic table only.
        let use_dynamic = !file.symbols().any(|symbol| is_function_definition(&symbol));
        let symbols = if use_dynamic {
            file.dynamic_symbols()
        } else {
            file.symbols()
        };

        for symbol in symbols.filter(is_function_definition) {
            let Ok(name) = symbol.name() else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            let (source, line) = self
                .context(&file)
                .and_then(|context| context.find_location(symbol.address()).ok().flatten())
                .map_or((String::new(), 0), |location| {
                    (
                        location.file.unwrap_or_default().to_string(),
                        location.line.unwrap_or(0),
                    )
                });

            trace!(symbol = name, file = %source, line, "Object symbol");
            let record = SymbolRecord::new(name, source, line).with_module(self.module.clone());
            if visitor(record).is_break() {
                break;
            }
        }

        Ok(())
    }
}

fn is_function_definition(symbol: &object::Symbol<'_, '_>) -> bool
{
    symbol.kind() == SymbolKind::Text && symbol.is_definition()
}

fn load_context(file: &object::File<'_>, endian: RunTimeEndian) -> Result<Context<OwnedReader>, gimli::Error>
{
    let dwarf = Dwarf::load(|id| Ok::<_, gimli::Error>(section_reader(file, id, endian)))?;
    Context::from_dwarf(dwarf)
}

fn section_reader(file: &object::File<'_>, id: SectionId, endian: RunTimeEndian) -> OwnedReader
{
    let name = id.name();
    // Mach-O spells `.debug_info` as `__debug_info`.
    let macho_name = format!("__{}", name.trim_start_matches('.'));

    let data = [name, macho_name.as_str()]
        .into_iter()
        .find_map(|candidate| file.section_by_name(candidate))
        .and_then(|section| section.uncompressed_data().ok())
        .map_or_else(
            || Arc::<[u8]>::from(Vec::new()),
            |data| match data {
                Cow::Borrowed(bytes) => Arc::<[u8]>::from(bytes),
                Cow::Owned(vec) => vec.into(),
            },
        );

    EndianArcSlice::new(data, endian)
}
