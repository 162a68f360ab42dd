//! XLSX writer

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use crate::book::{XlsxBook, XlsxSheet};
use crate::error::{XlsxError, XlsxResult};
use crate::escape::{encode_excel_escapes, escape_xml};
use excel_sheet_core::{CellAddress, SheetStore, MAX_COLS, MAX_ROWS};

mod patch;

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    ///
    /// The whole package is built in memory first; the file is only
    /// created or replaced once that has succeeded.
    pub fn write_file<P: AsRef<Path>>(book: &XlsxBook, path: P) -> XlsxResult<()> {
        let mut buf = Cursor::new(Vec::new());
        Self::write(book, &mut buf)?;
        std::fs::write(path, buf.into_inner())?;
        Ok(())
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(book: &XlsxBook, writer: W) -> XlsxResult<()> {
        if book.is_empty() {
            return Err(XlsxError::InvalidFormat(
                "a workbook needs at least one sheet".into(),
            ));
        }
        for sheet in book.sheets() {
            Self::check_extent(&sheet.name, &sheet.store)?;
        }

        let mut zip = zip::ZipWriter::new(writer);

        Self::write_content_types(&mut zip, book)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, book)?;
        Self::write_workbook_rels(&mut zip, book)?;
        Self::write_styles_xml(&mut zip)?;

        for (i, sheet) in book.sheets().enumerate() {
            Self::write_worksheet(&mut zip, sheet, i)?;
        }

        zip.finish()?;
        Ok(())
    }

    pub(crate) fn check_extent(name: &str, store: &SheetStore) -> XlsxResult<()> {
        let (rows, cols) = (store.row_count(), store.col_count());
        if rows > MAX_ROWS || cols > MAX_COLS {
            return Err(XlsxError::SheetTooLarge {
                name: name.to_string(),
                rows,
                cols,
            });
        }
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        book: &XlsxBook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..book.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        book: &XlsxBook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        for (i, sheet) in book.sheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(&sheet.name),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        book: &XlsxBook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..book.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        // Styles relationship
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            book.sheet_count() + 1
        ));

        content.push_str("\n</Relationships>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// The single default cell format every cell uses
    fn write_styles_xml<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
    <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
    <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
    <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
    <cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
    <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &XlsxSheet,
        index: usize,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;
        zip.write_all(Self::worksheet_xml(&sheet.store).as_bytes())?;
        Ok(())
    }

    /// Worksheet part holding `store` as inline strings
    pub(crate) fn worksheet_xml(store: &SheetStore) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        content.push_str(&format!(
            "\n    <dimension ref=\"{}\"/>\n    <sheetData>",
            Self::dimension_ref(store)
        ));

        // Write cell data (sparse, row-major)
        let mut current_row: Option<u32> = None;
        for (addr, value) in store.iter() {
            if current_row != Some(addr.row) {
                if current_row.is_some() {
                    content.push_str("\n        </row>");
                }
                content.push_str(&format!("\n        <row r=\"{}\">", addr.row + 1));
                current_row = Some(addr.row);
            }

            let text = escape_xml(&encode_excel_escapes(value));
            let space = if value.trim() != value {
                " xml:space=\"preserve\""
            } else {
                ""
            };
            content.push_str(&format!(
                "\n            <c r=\"{}\" t=\"inlineStr\"><is><t{}>{}</t></is></c>",
                addr, space, text
            ));
        }

        if current_row.is_some() {
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");
        content
    }

    /// `A1:<far corner>` of the store's bounds, `A1` for an empty extent
    fn dimension_ref(store: &SheetStore) -> String {
        let (rows, cols) = (store.row_count(), store.col_count());
        if rows == 0 || cols == 0 {
            return "A1".to_string();
        }
        format!("A1:{}", CellAddress::new(rows - 1, cols - 1))
    }
}
