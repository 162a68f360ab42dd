//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::book::XlsxBook;
use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use excel_sheet_core::{CellAddress, SheetStore, MAX_COLS, MAX_ROWS};

/// Sheet name and relationship id, in tab order
pub(crate) type SheetEntry = (String, String);

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read every sheet of a workbook
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<XlsxBook> {
        let mut archive = Self::open_archive(reader)?;
        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut book = XlsxBook::new();
        for (name, r_id) in &sheet_info {
            match sheet_paths.get(r_id) {
                Some(path) => {
                    let store = Self::read_worksheet(&mut archive, path, &shared_strings)?;
                    book.add_sheet(name)?.store = store;
                }
                None => log::warn!("sheet \"{}\" has no worksheet part ({})", name, r_id),
            }
        }

        Ok(book)
    }

    /// Read only the named sheet of a workbook file
    ///
    /// Returns `Ok(None)` when the workbook has no such sheet.
    pub fn read_sheet_file<P: AsRef<Path>>(
        path: P,
        sheet_name: &str,
    ) -> XlsxResult<Option<SheetStore>> {
        let file = File::open(path)?;
        Self::read_sheet(file, sheet_name)
    }

    /// Read only the named sheet of a workbook
    pub fn read_sheet<R: Read + Seek>(
        reader: R,
        sheet_name: &str,
    ) -> XlsxResult<Option<SheetStore>> {
        let mut archive = Self::open_archive(reader)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;

        let wanted = sheet_name.to_lowercase();
        let Some((name, r_id)) = sheet_info
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
        else {
            return Ok(None);
        };

        let sheet_paths = Self::read_workbook_rels(&mut archive)?;
        let path = sheet_paths.get(r_id).ok_or_else(|| {
            XlsxError::MissingPart(format!("worksheet for sheet \"{}\" ({})", name, r_id))
        })?;

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        log::debug!("reading sheet \"{}\" from {}", name, path);
        Self::read_worksheet(&mut archive, path, &shared_strings).map(Some)
    }

    /// Sheet names of a workbook file, in tab order
    pub fn sheet_names<P: AsRef<Path>>(path: P) -> XlsxResult<Vec<String>> {
        let mut archive = Self::open_archive(File::open(path)?)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        Ok(sheet_info.into_iter().map(|(name, _)| name).collect())
    }

    pub(crate) fn open_archive<R: Read + Seek>(reader: R) -> XlsxResult<zip::ZipArchive<R>> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        Ok(archive)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs carry reading hints, not cell text
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::CData(e)) if in_t => {
                    current_string.push_str(&String::from_utf8_lossy(&e));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds
    pub(crate) fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SheetEntry>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                    let name = attr_value(&e, b"name");
                    let r_id = attr_value(&e, b"r:id");

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    pub(crate) fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet part into a store
    ///
    /// The store's bounds come from the sheet's `<dimension>` element when it
    /// has one, otherwise from the furthest cell present. Cells outside the
    /// declared dimension and cells with empty text are not stored.
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        shared_strings: &[String],
    ) -> XlsxResult<SheetStore> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut declared: Option<CellAddress> = None;
        let mut cells: Vec<(CellAddress, String)> = Vec::new();
        let mut furthest: Option<(u32, u32)> = None;

        let mut cursor = CellCursor::default();
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"dimension" => declared = Self::parse_dimension(&e)?,
                    b"row" => cursor.start_row(&e)?,
                    b"c" => {
                        // Self-closing cell: present, but holds no text
                        let pending = PendingCell::start(&e, &mut cursor)?;
                        furthest = Some(extend(furthest, pending.addr));
                    }
                    _ => {}
                },
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"dimension" => declared = Self::parse_dimension(&e)?,
                    b"row" => cursor.start_row(&e)?,
                    b"c" => cell = Some(PendingCell::start(&e, &mut cursor)?),
                    b"v" if cell.is_some() => in_value = true,
                    b"is" if cell.is_some() => in_inline_str = true,
                    b"rPh" if in_inline_str => in_phonetic = true,
                    b"t" if in_inline_str && !in_phonetic => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            furthest = Some(extend(furthest, pending.addr));
                            let addr = pending.addr;
                            let text = pending.into_text(shared_strings)?;
                            if !text.is_empty() {
                                cells.push((addr, text));
                            }
                        }
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_phonetic = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    if let Some(pending) = cell.as_mut() {
                        let text = e.unescape()?;
                        if in_value {
                            pending.value.push_str(&text);
                        } else {
                            pending.inline.push_str(&text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        let (row_count, col_count) = match (furthest, declared) {
            (None, _) => (0, 0),
            (Some(_), Some(end)) => (end.row + 1, end.col + 1),
            (Some((row, col)), None) => (row + 1, col + 1),
        };

        let mut store = SheetStore::new();
        for (addr, text) in cells {
            if addr.row < row_count && addr.col < col_count {
                store.set(addr.row, addr.col, text);
            } else {
                log::warn!(
                    "{}: cell {} lies outside the declared dimension, skipped",
                    path,
                    addr
                );
            }
        }
        store.extend_bounds(row_count, col_count);

        Ok(store)
    }

    /// Parse `<dimension ref="A1:C7"/>` into its bottom-right corner
    fn parse_dimension(e: &BytesStart) -> XlsxResult<Option<CellAddress>> {
        let Some(reference) = attr_value(e, b"ref") else {
            return Ok(None);
        };
        let end = reference.rsplit(':').next().unwrap_or(&reference);
        let addr = CellAddress::parse(end).map_err(|err| {
            XlsxError::Parse(format!("Invalid dimension '{}': {}", reference, err))
        })?;
        Ok(Some(addr))
    }
}

/// Unescaped value of the attribute whose qualified name is `key`
fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

fn extend(furthest: Option<(u32, u32)>, addr: CellAddress) -> (u32, u32) {
    match furthest {
        Some((row, col)) => (row.max(addr.row), col.max(addr.col)),
        None => (addr.row, addr.col),
    }
}

/// Position of the next cell when `r` attributes are omitted
#[derive(Debug, Default)]
struct CellCursor {
    row: Option<u32>,
    next_col: u32,
}

impl CellCursor {
    fn start_row(&mut self, e: &BytesStart) -> XlsxResult<()> {
        let row = match attr_value(e, b"r") {
            Some(r) => {
                let r: u32 = r
                    .parse()
                    .map_err(|_| XlsxError::Parse(format!("Invalid row number '{}'", r)))?;
                r.checked_sub(1)
                    .ok_or_else(|| XlsxError::Parse("Row number 0".into()))?
            }
            None => match self.row {
                Some(row) => row.checked_add(1).ok_or_else(|| {
                    XlsxError::Parse(format!("Row after row {} is out of range", row))
                })?,
                None => 0,
            },
        };
        if row >= MAX_ROWS {
            return Err(XlsxError::Parse(format!(
                "Row number {} past the last row ({})",
                row as u64 + 1,
                MAX_ROWS
            )));
        }
        self.row = Some(row);
        self.next_col = 0;
        Ok(())
    }

    fn place(&mut self, reference: Option<&str>) -> XlsxResult<CellAddress> {
        let addr = match reference {
            Some(r) => CellAddress::parse(r).map_err(|e| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", r, e))
            })?,
            None => CellAddress::new(self.row.unwrap_or(0), self.next_col),
        };
        if addr.row >= MAX_ROWS || addr.col >= MAX_COLS {
            return Err(XlsxError::Parse(format!(
                "Cell at row {}, column {} is past the sheet limits",
                addr.row as u64 + 1,
                addr.col as u64 + 1
            )));
        }
        self.row = Some(addr.row);
        // col < MAX_COLS, so this cannot overflow
        self.next_col = addr.col + 1;
        Ok(addr)
    }
}

/// A `<c>` element being read
#[derive(Debug)]
struct PendingCell {
    addr: CellAddress,
    cell_type: Option<String>,
    value: String,
    inline: String,
}

impl PendingCell {
    fn start(e: &BytesStart, cursor: &mut CellCursor) -> XlsxResult<Self> {
        let reference = attr_value(e, b"r");
        Ok(Self {
            addr: cursor.place(reference.as_deref())?,
            cell_type: attr_value(e, b"t"),
            value: String::new(),
            inline: String::new(),
        })
    }

    /// The text a spreadsheet shows for this cell, styling aside
    fn into_text(self, shared_strings: &[String]) -> XlsxResult<String> {
        let text = match self.cell_type.as_deref() {
            // Shared string
            Some("s") if self.value.trim().is_empty() => String::new(),
            Some("s") => {
                let idx: usize = self.value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", self.value))
                })?;
                shared_strings.get(idx).cloned().ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?
            }

            Some("inlineStr") => decode_excel_escapes(&self.inline),

            // Formula string result
            Some("str") => decode_excel_escapes(&self.value),

            Some("b") => match self.value.trim() {
                "" => String::new(),
                "1" => "TRUE".to_string(),
                v if v.eq_ignore_ascii_case("true") => "TRUE".to_string(),
                _ => "FALSE".to_string(),
            },

            // Numbers, dates and error codes keep their stored text
            None | Some("n") | Some("d") | Some("e") => self.value,

            Some(other) => {
                log::warn!("cell {} has unknown type '{}'", self.addr, other);
                self.value
            }
        };
        Ok(text)
    }
}
