use std::io::Write;

use bdump_wire::ElementIter;

use crate::error::DriverError;

/// Deepest container nesting the debug printer will follow.
pub const MAX_NESTING_DEPTH: usize = 200;

/// Write the structural trace of one raw document.
///
/// Nothing is decoded. Each level gets a fresh [`ElementIter`] and every
/// element is reported with its name, signed type tag and wire size
/// (tabs shown as two spaces):
///
/// ```text
/// --- new object ---
///   size : 17
///     a
///       type:    3 size: 12
///       --- new object ---
///         size : 9
///           b
///             type:    8 size: 4
/// ```
///
/// Embedded documents and arrays recurse at `indent_level + 3`. Whatever was
/// written before a failure stays written.
///
/// # Errors
///
/// - [`DriverError::Wire`] for a malformed element at any depth.
/// - [`DriverError::TooDeep`] past [`MAX_NESTING_DEPTH`] levels.
/// - [`DriverError::Output`] if `out` refuses a write.
pub fn print_debug<W: Write + ?Sized>(
    raw: &[u8],
    indent_level: usize,
    out: &mut W,
) -> Result<(), DriverError> {
    print_level(raw, indent_level, 0, out)
}

fn print_level<W: Write + ?Sized>(
    raw: &[u8],
    indent_level: usize,
    depth: usize,
    out: &mut W,
) -> Result<(), DriverError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(DriverError::TooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }

    let indent = "\t".repeat(indent_level);
    writeln!(out, "{indent}--- new object ---")?;
    writeln!(out, "{indent}\tsize : {}", raw.len())?;

    for element in ElementIter::over_document(raw)? {
        let element = element?;
        // Tags are printed the way a signed byte reads: MinKey is -1.
        let tag = i8::from_ne_bytes([element.tag()]);
        writeln!(out, "{indent}\t\t{}", element.name_lossy())?;
        writeln!(out, "{indent}\t\t\ttype: {tag:>4} size: {}", element.size())?;

        if let Some(nested) = element.nested() {
            print_level(nested, indent_level + 3, depth + 1, out)?;
        }
    }
    Ok(())
}
